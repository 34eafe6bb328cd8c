//! 指し手（Move）

use super::{PieceType, Square};

/// 指し手（32bit、使用するのは下位16bit）
///
/// - bit 0-6:  移動先 (to)
/// - bit 7-13: 移動元 (from) / 駒打ちの場合はPieceType
/// - bit 14:   駒打ちフラグ
/// - bit 15:   成りフラグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u32);

impl Move {
    /// 無効な指し手
    pub const NONE: Move = Move(0);

    const TO_MASK: u32 = 0x007F;
    const FROM_MASK: u32 = 0x3F80;
    const FROM_SHIFT: u32 = 7;
    const DROP_FLAG: u32 = 0x4000;
    const PROMOTE_FLAG: u32 = 0x8000;

    /// 移動の指し手を生成
    #[inline]
    pub const fn new_move(from: Square, to: Square, promote: bool) -> Move {
        let mut m = (to.raw() as u32) | ((from.raw() as u32) << Self::FROM_SHIFT);
        if promote {
            m |= Self::PROMOTE_FLAG;
        }
        Move(m)
    }

    /// 駒打ちの指し手を生成
    #[inline]
    pub const fn new_drop(piece_type: PieceType, to: Square) -> Move {
        Move((to.raw() as u32) | ((piece_type as u32) << Self::FROM_SHIFT) | Self::DROP_FLAG)
    }

    /// 移動先を取得
    #[inline]
    pub const fn to(self) -> Square {
        match Square::from_u8((self.0 & Self::TO_MASK) as u8) {
            Some(sq) => sq,
            None => Square::SQ_11,
        }
    }

    /// 移動元を取得（駒打ちの場合は無効）
    #[inline]
    pub const fn from(self) -> Square {
        debug_assert!(!self.is_drop(), "from() called on drop");
        match Square::from_u8(((self.0 & Self::FROM_MASK) >> Self::FROM_SHIFT) as u8) {
            Some(sq) => sq,
            None => Square::SQ_11,
        }
    }

    /// 打つ駒種を取得（駒打ちでない場合は無効）
    #[inline]
    pub const fn drop_piece_type(self) -> PieceType {
        debug_assert!(self.is_drop());
        match PieceType::from_u8(((self.0 & Self::FROM_MASK) >> Self::FROM_SHIFT) as u8) {
            Some(pt) => pt,
            None => PieceType::Pawn,
        }
    }

    /// 駒打ちかどうか
    #[inline]
    pub const fn is_drop(self) -> bool {
        (self.0 & Self::DROP_FLAG) != 0
    }

    /// 成りかどうか
    #[inline]
    pub const fn is_promote(self) -> bool {
        (self.0 & Self::PROMOTE_FLAG) != 0
    }

    /// 歩を打つ手か（打ち歩詰め判定用）
    #[inline]
    pub const fn is_pawn_drop(self) -> bool {
        self.is_drop() && matches!(self.drop_piece_type(), PieceType::Pawn)
    }

    /// 無効な指し手かどうか
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// 有効な指し手かどうか
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// 内部値
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// USI形式に変換（"7g7f", "G*5b", "2a4a+"）
    pub fn to_usi(self) -> String {
        if self.is_none() {
            return "resign".to_string();
        }
        if self.is_drop() {
            format!("{}*{}", self.drop_piece_type().to_usi_char(), self.to().to_usi())
        } else {
            let promote = if self.is_promote() { "+" } else { "" };
            format!("{}{}{promote}", self.from().to_usi(), self.to().to_usi())
        }
    }

    /// USI形式から変換（局面との整合性は見ない）
    pub fn from_usi(s: &str) -> Option<Move> {
        let bytes = s.as_bytes();
        if bytes.len() < 4 {
            return None;
        }
        if bytes[1] == b'*' {
            let pt = PieceType::from_usi_char(bytes[0] as char)?;
            if pt == PieceType::King || !s[0..1].chars().all(|c| c.is_ascii_uppercase()) {
                return None;
            }
            let to = Square::from_usi(s.get(2..4)?)?;
            return (bytes.len() == 4).then_some(Move::new_drop(pt, to));
        }
        let from = Square::from_usi(s.get(0..2)?)?;
        let to = Square::from_usi(s.get(2..4)?)?;
        match s.get(4..)? {
            "" => Some(Move::new_move(from, to, false)),
            "+" => Some(Move::new_move(from, to, true)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_usi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_usi() {
        let m = Move::from_usi("7g7f").unwrap();
        assert!(!m.is_drop());
        assert_eq!(m.from().to_usi(), "7g");
        assert_eq!(m.to().to_usi(), "7f");
        assert_eq!(m.to_usi(), "7g7f");

        let m = Move::from_usi("2a4a+").unwrap();
        assert!(m.is_promote());
        assert_eq!(m.to_usi(), "2a4a+");
    }

    #[test]
    fn test_drop_usi() {
        let m = Move::from_usi("G*5b").unwrap();
        assert!(m.is_drop());
        assert_eq!(m.drop_piece_type(), PieceType::Gold);
        assert_eq!(m.to_usi(), "G*5b");
        assert!(Move::from_usi("P*1b").unwrap().is_pawn_drop());
        assert_eq!(Move::from_usi("K*5b"), None);
        assert_eq!(Move::from_usi("g*5b"), None);
    }

    #[test]
    fn test_none_is_resign() {
        assert_eq!(Move::NONE.to_usi(), "resign");
        assert!(Move::NONE.is_none());
    }
}
