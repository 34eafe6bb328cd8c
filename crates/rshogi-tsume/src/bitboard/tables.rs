//! 近接駒の利きテーブル（コンパイル時生成）

use crate::types::{Color, File, PieceType, Rank, Square};

use super::Bitboard;
use super::sliders::{bishop_effect, dragon_effect, horse_effect, lance_effect, rook_effect};

/// 筋のBitboard [File]
pub static FILE_BB: [Bitboard; File::NUM] = init_file_bb();

/// 段のBitboard [Rank]
pub static RANK_BB: [Bitboard; Rank::NUM] = init_rank_bb();

/// 歩の利き [Color][Square]
pub static PAWN_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] = init_step_effect(&[(0, -1)]);

/// 桂の利き [Color][Square]
pub static KNIGHT_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] =
    init_step_effect(&[(-1, -2), (1, -2)]);

/// 銀の利き [Color][Square]
pub static SILVER_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] =
    init_step_effect(&[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)]);

/// 金の利き [Color][Square]
pub static GOLD_EFFECT: [[Bitboard; Square::NUM]; Color::NUM] =
    init_step_effect(&[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)]);

/// 玉の利き [Square]
pub static KING_EFFECT: [Bitboard; Square::NUM] =
    init_step_effect(&[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)])[0];

// === 初期化関数 ===

const fn init_file_bb() -> [Bitboard; File::NUM] {
    let mut result = [Bitboard::EMPTY; File::NUM];
    let mut file = 0;
    while file < 9 {
        result[file] = Bitboard::from_u128(0x1FFu128 << (file * 9));
        file += 1;
    }
    result
}

const fn init_rank_bb() -> [Bitboard; Rank::NUM] {
    let mut result = [Bitboard::EMPTY; Rank::NUM];
    let mut rank = 0;
    while rank < 9 {
        let mut bits = 0u128;
        let mut file = 0;
        while file < 9 {
            bits |= 1u128 << (file * 9 + rank);
            file += 1;
        }
        result[rank] = Bitboard::from_u128(bits);
        rank += 1;
    }
    result
}

/// 先手視点の (筋差分, 段差分) から両手番分のテーブルを作る（後手は段差分を反転）
const fn init_step_effect(deltas: &[(i8, i8)]) -> [[Bitboard; Square::NUM]; Color::NUM] {
    let mut result = [[Bitboard::EMPTY; Square::NUM]; Color::NUM];
    let mut c = 0;
    while c < Color::NUM {
        let mut sq = 0;
        while sq < Square::NUM {
            let file = (sq / 9) as i8;
            let rank = (sq % 9) as i8;
            let mut bits = 0u128;
            let mut i = 0;
            while i < deltas.len() {
                let (df, dr) = deltas[i];
                let dr = if c == 0 { dr } else { -dr };
                let f = file + df;
                let r = rank + dr;
                if f >= 0 && f < 9 && r >= 0 && r < 9 {
                    bits |= 1u128 << (f as u32 * 9 + r as u32);
                }
                i += 1;
            }
            result[c][sq] = Bitboard::from_u128(bits);
            sq += 1;
        }
        c += 1;
    }
    result
}

// === アクセサ ===

/// 歩の利き
#[inline]
pub fn pawn_effect(color: Color, sq: Square) -> Bitboard {
    PAWN_EFFECT[color.index()][sq.index()]
}

/// 桂の利き
#[inline]
pub fn knight_effect(color: Color, sq: Square) -> Bitboard {
    KNIGHT_EFFECT[color.index()][sq.index()]
}

/// 銀の利き
#[inline]
pub fn silver_effect(color: Color, sq: Square) -> Bitboard {
    SILVER_EFFECT[color.index()][sq.index()]
}

/// 金の利き
#[inline]
pub fn gold_effect(color: Color, sq: Square) -> Bitboard {
    GOLD_EFFECT[color.index()][sq.index()]
}

/// 玉の利き
#[inline]
pub fn king_effect(sq: Square) -> Bitboard {
    KING_EFFECT[sq.index()]
}

/// 駒種・手番・升・占有から利きを求める
pub fn piece_effect(pt: PieceType, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match pt {
        PieceType::Pawn => pawn_effect(color, sq),
        PieceType::Lance => lance_effect(color, sq, occupied),
        PieceType::Knight => knight_effect(color, sq),
        PieceType::Silver => silver_effect(color, sq),
        PieceType::Bishop => bishop_effect(sq, occupied),
        PieceType::Rook => rook_effect(sq, occupied),
        PieceType::King => king_effect(sq),
        PieceType::Horse => horse_effect(sq, occupied),
        PieceType::Dragon => dragon_effect(sq, occupied),
        PieceType::Gold
        | PieceType::ProPawn
        | PieceType::ProLance
        | PieceType::ProKnight
        | PieceType::ProSilver => gold_effect(color, sq),
    }
}

/// 敵陣（手番から見た一〜三段）
#[inline]
pub fn enemy_field(color: Color) -> Bitboard {
    match color {
        Color::Black => RANK_BB[0] | RANK_BB[1] | RANK_BB[2],
        Color::White => RANK_BB[6] | RANK_BB[7] | RANK_BB[8],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_usi(s).unwrap()
    }

    #[test]
    fn test_pawn_effect_direction() {
        assert_eq!(pawn_effect(Color::Black, sq("7g")), Bitboard::from_square(sq("7f")));
        assert_eq!(pawn_effect(Color::White, sq("3c")), Bitboard::from_square(sq("3d")));
        assert!(pawn_effect(Color::Black, sq("5a")).is_empty());
    }

    #[test]
    fn test_knight_effect() {
        let bb = knight_effect(Color::Black, sq("5e"));
        assert_eq!(bb.count(), 2);
        assert!(bb.contains(sq("4c")));
        assert!(bb.contains(sq("6c")));
    }

    #[test]
    fn test_gold_and_king_counts() {
        assert_eq!(gold_effect(Color::Black, Square::SQ_55).count(), 6);
        assert_eq!(silver_effect(Color::White, Square::SQ_55).count(), 5);
        assert_eq!(king_effect(Square::SQ_55).count(), 8);
        assert_eq!(king_effect(Square::SQ_11).count(), 3);
    }

    #[test]
    fn test_file_rank_bb() {
        assert_eq!(FILE_BB[0].count(), 9);
        assert!(FILE_BB[4].contains(Square::SQ_55));
        assert!(RANK_BB[4].contains(Square::SQ_55));
        assert_eq!(enemy_field(Color::Black).count(), 27);
    }
}
