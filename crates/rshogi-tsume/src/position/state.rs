//! 局面状態（StateInfo）
//!
//! do_move ごとに1つ積み、undo_move で取り除く。

use crate::bitboard::Bitboard;
use crate::types::{Color, Hand, Move, Piece, PieceType};

/// 局面状態
#[derive(Clone, Debug)]
pub struct StateInfo {
    // === do_move時に引き継がれる部分 ===
    /// 盤面ハッシュ（手番込み、手駒を含まない）
    pub board_key: u64,
    /// 手駒ハッシュ
    pub hand_key: u64,
    /// 連続王手カウンタ [Color]（王手1回につき2加算、手数単位で比較する）
    pub continuous_check: [i32; Color::NUM],

    // === 再計算される部分 ===
    /// 手駒スナップショット（千日手・優等局面判定用）
    pub hands: [Hand; Color::NUM],
    /// 王手している駒
    pub checkers: Bitboard,
    /// 玉への利きを遮っている駒（先後両方）[玉のColor]
    pub blockers_for_king: [Bitboard; Color::NUM],
    /// pinしている駒 [pinされている側のColor]
    pub pinners: [Bitboard; Color::NUM],
    /// 手番側がその駒種で王手になる升 [PieceType]
    pub check_squares: [Bitboard; PieceType::NUM + 1],
    /// 捕獲した駒
    pub captured_piece: Piece,
    /// 直前の指し手
    pub last_move: Move,
}

impl StateInfo {
    /// 初期状態
    pub fn new() -> Self {
        StateInfo {
            board_key: 0,
            hand_key: 0,
            continuous_check: [0; Color::NUM],
            hands: [Hand::EMPTY; Color::NUM],
            checkers: Bitboard::EMPTY,
            blockers_for_king: [Bitboard::EMPTY; Color::NUM],
            pinners: [Bitboard::EMPTY; Color::NUM],
            check_squares: [Bitboard::EMPTY; PieceType::NUM + 1],
            captured_piece: Piece::NONE,
            last_move: Move::NONE,
        }
    }

    /// 次の局面用に引き継ぐ部分だけをコピー
    pub(super) fn inherit(&self) -> Self {
        StateInfo {
            board_key: self.board_key,
            hand_key: self.hand_key,
            continuous_check: self.continuous_check,
            ..StateInfo::new()
        }
    }

    /// 局面全体のハッシュ
    #[inline]
    pub fn key(&self) -> u64 {
        self.board_key ^ self.hand_key
    }
}

impl Default for StateInfo {
    fn default() -> Self {
        Self::new()
    }
}
