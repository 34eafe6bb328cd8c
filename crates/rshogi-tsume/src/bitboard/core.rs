//! Bitboard本体
//!
//! 81マスを u128 の下位81bitで表す。bit index は `Square::index()` と一致する。

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::types::Square;

/// 81マスの盤面表現
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(u128);

impl Bitboard {
    /// 空
    pub const EMPTY: Bitboard = Bitboard(0);
    /// 全升
    pub const ALL: Bitboard = Bitboard((1u128 << 81) - 1);

    /// u128から生成（盤外ビットは落とす）
    #[inline]
    pub const fn from_u128(v: u128) -> Bitboard {
        Bitboard(v & Self::ALL.0)
    }

    /// 1升だけ立ったBitboard
    #[inline]
    pub const fn from_square(sq: Square) -> Bitboard {
        Bitboard(1u128 << sq.index())
    }

    /// 内部値
    #[inline]
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// 空かどうか
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 空でないか
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// 立っているビット数
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// 2つ以上ビットが立っているか
    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// 指定升が立っているか
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u128 << sq.index()) != 0
    }

    /// 指定升を立てる
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u128 << sq.index();
    }

    /// 指定升を落とす
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u128 << sq.index());
    }

    /// 指定升を反転
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= 1u128 << sq.index();
    }

    /// 最下位の升
    #[inline]
    pub fn lsb(self) -> Option<Square> {
        if self.0 == 0 { None } else { Square::from_u8(self.0.trailing_zeros() as u8) }
    }

    /// 最上位の升
    #[inline]
    pub fn msb(self) -> Option<Square> {
        if self.0 == 0 { None } else { Square::from_u8((127 - self.0.leading_zeros()) as u8) }
    }

    /// 最下位の升を取り出して落とす
    #[inline]
    pub fn pop(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// `self & !other`
    #[inline]
    pub const fn and_not(self, other: Bitboard) -> Bitboard {
        Bitboard(self.0 & !other.0)
    }

    /// 立っている升を列挙
    #[inline]
    pub const fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

/// Bitboardの升イテレータ
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    fn into_iter(self) -> BitboardIter {
        self.iter()
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0 & Self::ALL.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl std::fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 9筋を左に、一段を上にして表示
        writeln!(f)?;
        for rank in 0..9u8 {
            for file in (0..9u8).rev() {
                let sq = Square::from_u8(file * 9 + rank).ok_or(std::fmt::Error)?;
                f.write_str(if self.contains(sq) { " *" } else { " ." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
