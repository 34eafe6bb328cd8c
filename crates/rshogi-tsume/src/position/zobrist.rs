//! Zobristハッシュ
//!
//! 盤面キー（手番込み）と手駒キーを分けて持つ。置換表は盤面キーだけを使い、
//! 手駒は優等判定のためにエントリ側へ別途格納する。

use crate::types::{Color, Piece, PieceType, Square};

/// Zobristハッシュ用乱数テーブル
pub struct Zobrist {
    /// 手番用（後手番のときに xor する）
    pub side: u64,
    /// 駒×升 [Piece.index()][Square.index()]
    pub psq: [[u64; Square::NUM]; Piece::NUM],
    /// 手駒（加算型）[Color][PieceType - 1]
    pub hand: [[u64; PieceType::HAND_NUM]; Color::NUM],
}

impl Zobrist {
    /// テーブル初期化
    pub const fn init() -> Self {
        let mut zobrist = Zobrist {
            side: 0,
            psq: [[0; Square::NUM]; Piece::NUM],
            hand: [[0; PieceType::HAND_NUM]; Color::NUM],
        };

        let mut seed = 0x9E37_79B9_7F4A_7C15u64;

        seed = xorshift64(seed);
        // 手番キーは最下位bitを立てておき、盤面キーの偶奇で手番が分かるようにする
        zobrist.side = seed | 1;

        // pc == 0 (Piece::NONE) は常に0
        let mut pc = 1;
        while pc < Piece::NUM {
            let mut sq = 0;
            while sq < Square::NUM {
                seed = xorshift64(seed);
                zobrist.psq[pc][sq] = seed & !1;
                sq += 1;
            }
            pc += 1;
        }

        let mut c = 0;
        while c < Color::NUM {
            let mut pt = 0;
            while pt < PieceType::HAND_NUM {
                seed = xorshift64(seed);
                zobrist.hand[c][pt] = seed & !1;
                pt += 1;
            }
            c += 1;
        }

        zobrist
    }
}

/// XorShift64疑似乱数生成（const fn対応）
const fn xorshift64(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// グローバルZobristテーブル
pub static ZOBRIST: Zobrist = Zobrist::init();

/// 駒と升のハッシュ
#[inline]
pub fn zobrist_psq(pc: Piece, sq: Square) -> u64 {
    ZOBRIST.psq[pc.index()][sq.index()]
}

/// 手番のハッシュ
#[inline]
pub fn zobrist_side() -> u64 {
    ZOBRIST.side
}

/// 手駒1枚分のハッシュ
#[inline]
pub fn zobrist_hand(c: Color, pt: PieceType) -> u64 {
    debug_assert!(matches!(pt as u8, 1..=7));
    ZOBRIST.hand[c.index()][pt as usize - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_bit_is_exclusive() {
        assert_eq!(zobrist_side() & 1, 1);
        let pc = Piece::new(Color::White, PieceType::Dragon);
        assert_eq!(zobrist_psq(pc, Square::SQ_55) & 1, 0);
        assert_eq!(zobrist_hand(Color::Black, PieceType::Gold) & 1, 0);
    }

    #[test]
    fn test_none_piece_has_zero_key() {
        assert_eq!(zobrist_psq(Piece::NONE, Square::SQ_11), 0);
    }
}
