//! 升目（Square）

use super::{File, Rank};

/// 升目（0-80）
///
/// 筋ごとに段を並べる。1一=0, 1九=8, 2一=9, 9九=80。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 升目の数
    pub const NUM: usize = 81;

    /// 1一
    pub const SQ_11: Square = Square(0);
    /// 5五（中央）
    pub const SQ_55: Square = Square(40);
    /// 9九
    pub const SQ_99: Square = Square(80);

    /// 筋と段から
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square(file as u8 * 9 + rank as u8)
    }

    /// 筋を取得
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 / 9) as usize]
    }

    /// 段を取得
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 % 9) as usize]
    }

    /// 配列添字
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 内部値を取得
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// 81 以上は None
    #[inline]
    pub const fn from_u8(n: u8) -> Option<Square> {
        if n < 81 { Some(Square(n)) } else { None }
    }

    /// 180度回転
    #[inline]
    pub const fn inverse(self) -> Square {
        Square(80 - self.0)
    }

    /// 筋・段をずらした升（盤外ならNone）
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = (self.0 / 9) as i8 + df;
        let rank = (self.0 % 9) as i8 + dr;
        if file < 0 || file > 8 || rank < 0 || rank > 8 {
            None
        } else {
            Some(Square((file * 9 + rank) as u8))
        }
    }

    /// USI 表記（例: "7g"）
    pub fn to_usi(self) -> String {
        let file = self.file().to_usi_char();
        let rank = self.rank().to_usi_char();
        format!("{file}{rank}")
    }

    /// USI 表記から。2文字ちょうどでなければ None。
    pub fn from_usi(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::from_usi_char(chars.next()?)?;
        let rank = Rank::from_usi_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    /// 1一から9九まで順に
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file().to_usi_char(), self.rank().to_usi_char())
    }
}
