//! SFEN形式の解析・出力

use thiserror::Error;

use crate::types::{Color, File, Piece, PieceType, Rank, Square};

use super::pos::Position;

/// 平手初期局面のSFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// SFENパースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SfenError {
    /// 盤面の形式が不正
    #[error("invalid board: {0}")]
    Board(String),
    /// 手番の形式が不正
    #[error("invalid side to move: {0}")]
    SideToMove(String),
    /// 手駒の形式が不正
    #[error("invalid hand: {0}")]
    Hand(String),
    /// 手数の形式が不正
    #[error("invalid ply: {0}")]
    Ply(String),
    /// 玉がない（詰み探索には両玉が必要）
    #[error("missing king for {0:?}")]
    MissingKing(Color),
}

impl Position {
    /// SFEN文字列から局面を生成（"startpos" も受け付ける）
    pub fn from_sfen(sfen: &str) -> Result<Position, SfenError> {
        let mut pos = Position::new();
        pos.set_sfen(sfen)?;
        Ok(pos)
    }

    /// SFEN文字列から局面を設定
    pub fn set_sfen(&mut self, sfen: &str) -> Result<(), SfenError> {
        let sfen = sfen.trim();
        let sfen = sfen.strip_prefix("sfen ").unwrap_or(sfen);
        let sfen = if sfen == "startpos" { SFEN_HIRATE } else { sfen };

        *self = Position::new();

        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(SfenError::Board("SFEN must have at least 3 parts".to_string()));
        }

        // 1. 盤面
        self.parse_board(parts[0])?;

        // 2. 手番
        self.side_to_move = match parts[1] {
            "b" => Color::Black,
            "w" => Color::White,
            other => {
                return Err(SfenError::SideToMove(format!("expected 'b' or 'w', got '{other}'")));
            }
        };

        // 3. 手駒
        self.parse_hand(parts[2])?;

        // 4. 手数（オプション）
        self.game_ply = match parts.get(3) {
            Some(s) => s.parse().map_err(|_| SfenError::Ply((*s).to_string()))?,
            None => 1,
        };

        self.refresh_state();
        Ok(())
    }

    fn parse_board(&mut self, board: &str) -> Result<(), SfenError> {
        let rows: Vec<&str> = board.split('/').collect();
        if rows.len() != Rank::NUM {
            return Err(SfenError::Board(format!("expected 9 ranks, got {}", rows.len())));
        }
        let mut kings = [false; Color::NUM];

        for (rank, row) in Rank::ALL.iter().zip(rows) {
            // 9筋から1筋へ
            let mut file = File::NUM as i32 - 1;
            let mut promoted = false;
            for c in row.chars() {
                if let Some(n) = c.to_digit(10) {
                    if promoted || n == 0 {
                        return Err(SfenError::Board(row.to_string()));
                    }
                    file -= n as i32;
                    continue;
                }
                if c == '+' {
                    if promoted {
                        return Err(SfenError::Board(row.to_string()));
                    }
                    promoted = true;
                    continue;
                }
                let pt = PieceType::from_usi_char(c)
                    .ok_or_else(|| SfenError::Board(format!("unknown piece '{c}'")))?;
                let pt = if promoted {
                    pt.promote().ok_or_else(|| SfenError::Board(format!("cannot promote '{c}'")))?
                } else {
                    pt
                };
                promoted = false;
                let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
                let f = File::from_u8(u8::try_from(file).map_err(|_| SfenError::Board(row.to_string()))?)
                    .ok_or_else(|| SfenError::Board(row.to_string()))?;
                let sq = Square::new(f, *rank);
                if pt == PieceType::King {
                    if kings[color.index()] {
                        return Err(SfenError::Board("duplicate king".to_string()));
                    }
                    kings[color.index()] = true;
                    self.king_square[color.index()] = sq;
                }
                self.put_piece(Piece::new(color, pt), sq);
                file -= 1;
            }
            if file != -1 || promoted {
                return Err(SfenError::Board(row.to_string()));
            }
        }

        for c in Color::ALL {
            if !kings[c.index()] {
                return Err(SfenError::MissingKing(c));
            }
        }
        Ok(())
    }

    fn parse_hand(&mut self, hand: &str) -> Result<(), SfenError> {
        if hand == "-" {
            return Ok(());
        }
        let mut count = 0u32;
        for c in hand.chars() {
            if let Some(d) = c.to_digit(10) {
                count = count * 10 + d;
                continue;
            }
            let pt = PieceType::from_usi_char(c)
                .filter(|&pt| pt != PieceType::King)
                .ok_or_else(|| SfenError::Hand(format!("unknown piece '{c}'")))?;
            let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
            let n = if count == 0 { 1 } else { count };
            let h = self.hand[color.index()];
            let total = h.count(pt) + n;
            let max = if pt == PieceType::Pawn {
                18
            } else if matches!(pt, PieceType::Bishop | PieceType::Rook) {
                2
            } else {
                4
            };
            if total > max {
                return Err(SfenError::Hand(format!("too many '{c}'")));
            }
            self.hand[color.index()] = h.set(pt, total);
            count = 0;
        }
        if count != 0 {
            return Err(SfenError::Hand(hand.to_string()));
        }
        Ok(())
    }

    /// 現局面のSFEN文字列を取得
    pub fn to_sfen(&self) -> String {
        let mut result = String::new();

        for (i, &rank) in Rank::ALL.iter().enumerate() {
            let mut empty = 0;
            for &file in File::ALL.iter().rev() {
                let pc = self.piece_on(Square::new(file, rank));
                if pc.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    result.push_str(&empty.to_string());
                    empty = 0;
                }
                result.push_str(&pc.to_sfen());
            }
            if empty > 0 {
                result.push_str(&empty.to_string());
            }
            if i < 8 {
                result.push('/');
            }
        }

        result.push(' ');
        result.push(self.side_to_move.to_sfen_char());
        result.push(' ');

        let mut hand = String::new();
        // 飛角金銀桂香歩の順
        const ORDER: [PieceType; 7] = [
            PieceType::Rook,
            PieceType::Bishop,
            PieceType::Gold,
            PieceType::Silver,
            PieceType::Knight,
            PieceType::Lance,
            PieceType::Pawn,
        ];
        for c in Color::ALL {
            for pt in ORDER {
                let n = self.hand(c).count(pt);
                if n == 0 {
                    continue;
                }
                if n > 1 {
                    hand.push_str(&n.to_string());
                }
                let ch = pt.to_usi_char();
                hand.push(if c == Color::White { ch.to_ascii_lowercase() } else { ch });
            }
        }
        if hand.is_empty() {
            result.push('-');
        } else {
            result.push_str(&hand);
        }

        result.push(' ');
        result.push_str(&self.game_ply.to_string());
        result
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sfen())
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({})", self.to_sfen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hirate_roundtrip() {
        let pos = Position::from_sfen("startpos").unwrap();
        assert_eq!(pos.to_sfen(), SFEN_HIRATE);
        assert_eq!(pos.side_to_move(), Color::Black);
        assert!(!pos.in_check());
    }

    #[test]
    fn test_hand_counts() {
        let pos = Position::from_sfen("9/9/4k4/9/4P4/9/9/9/K8 b 3G2r2bg4s4n4l17p 1").unwrap();
        assert_eq!(pos.hand(Color::Black).count(PieceType::Gold), 3);
        assert_eq!(pos.hand(Color::White).count(PieceType::Pawn), 17);
        assert_eq!(pos.hand(Color::White).count(PieceType::Rook), 2);
        assert_eq!(pos.to_sfen(), "9/9/4k4/9/4P4/9/9/9/K8 b 3G2r2bg4s4n4l17p 1");
    }

    #[test]
    fn test_promoted_pieces() {
        let sfen = "4k4/9/4+P4/9/9/9/9/+b8/4K4 w - 10";
        let pos = Position::from_sfen(sfen).unwrap();
        assert_eq!(pos.to_sfen(), sfen);
        assert_eq!(
            pos.piece_on(Square::from_usi("9h").unwrap()),
            Piece::new(Color::White, PieceType::Horse)
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Position::from_sfen("4k4/9/9 b - 1"), Err(SfenError::Board(_))));
        assert!(matches!(
            Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 x - 1"),
            Err(SfenError::SideToMove(_))
        ));
        assert!(matches!(
            Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b 3R 1"),
            Err(SfenError::Hand(_))
        ));
        assert_eq!(
            Position::from_sfen("4k4/9/9/9/9/9/9/9/9 b - 1").unwrap_err(),
            SfenError::MissingKing(Color::Black)
        );
        assert!(matches!(
            Position::from_sfen("4k5/9/9/9/9/9/9/9/4K4 b - 1"),
            Err(SfenError::Board(_))
        ));
    }

    #[test]
    fn test_check_detected_on_load() {
        let pos = Position::from_sfen("4k4/4G4/4P4/9/9/9/9/9/4K4 w - 1").unwrap();
        assert!(pos.in_check());
        assert_eq!(pos.checkers().count(), 1);
    }
}
