//! 駒（Piece）
//!
//! - bit 0-3: `PieceType`（1..=14）。0 は `Piece::NONE` のみ。
//! - bit 4: `Color`（0 = Black, 1 = White）。

use super::{Color, PieceType};

/// 駒（先後の区別あり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// 駒なし
    pub const NONE: Piece = Piece(0);

    /// 駒の種類数（NONEを含む、配列サイズ用）
    pub const NUM: usize = 32;

    /// ColorとPieceTypeから生成
    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece(piece_type as u8 | ((color as u8) << 4))
    }

    /// 駒種を取得
    ///
    /// NONE に対して呼んではならない。
    #[inline]
    pub const fn piece_type(self) -> PieceType {
        debug_assert!(self.0 != 0);
        match PieceType::from_u8(self.0 & 0x0F) {
            Some(pt) => pt,
            None => PieceType::King,
        }
    }

    /// 手番を取得
    #[inline]
    pub const fn color(self) -> Color {
        if (self.0 >> 4) & 1 == 0 { Color::Black } else { Color::White }
    }

    /// 駒がないか
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// 駒があるか
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// インデックス（Zobrist用）
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// SFEN表記（"+P", "k" 等）
    pub fn to_sfen(self) -> String {
        let pt = self.piece_type();
        let c = pt.to_usi_char();
        let c = if self.color() == Color::White { c.to_ascii_lowercase() } else { c };
        if pt.is_promoted() { format!("+{c}") } else { c.to_string() }
    }
}
