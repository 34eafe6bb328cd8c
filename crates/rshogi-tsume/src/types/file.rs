//! 筋（File）と段（Rank）

use super::Color;

/// 筋（1筋〜9筋）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    File1 = 0,
    File2,
    File3,
    File4,
    File5,
    File6,
    File7,
    File8,
    File9,
}

impl File {
    /// 筋の数
    pub const NUM: usize = 9;

    /// 全ての筋（1筋から順に）
    pub const ALL: [File; 9] = [
        File::File1,
        File::File2,
        File::File3,
        File::File4,
        File::File5,
        File::File6,
        File::File7,
        File::File8,
        File::File9,
    ];

    /// u8から変換（範囲チェックあり）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<File> {
        if n < 9 { Some(File::ALL[n as usize]) } else { None }
    }

    /// インデックス
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// USI文字（'1'〜'9'）
    #[inline]
    pub const fn to_usi_char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// USI文字から変換
    #[inline]
    pub const fn from_usi_char(c: char) -> Option<File> {
        match c {
            '1'..='9' => File::from_u8(c as u8 - b'1'),
            _ => None,
        }
    }
}

/// 段（一段〜九段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Rank1 = 0,
    Rank2,
    Rank3,
    Rank4,
    Rank5,
    Rank6,
    Rank7,
    Rank8,
    Rank9,
}

impl Rank {
    /// 段の数
    pub const NUM: usize = 9;

    /// 全ての段（一段から順に）
    pub const ALL: [Rank; 9] = [
        Rank::Rank1,
        Rank::Rank2,
        Rank::Rank3,
        Rank::Rank4,
        Rank::Rank5,
        Rank::Rank6,
        Rank::Rank7,
        Rank::Rank8,
        Rank::Rank9,
    ];

    /// u8から変換（範囲チェックあり）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<Rank> {
        if n < 9 { Some(Rank::ALL[n as usize]) } else { None }
    }

    /// インデックス
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 手番から見た段（先手ならそのまま、後手なら反転）
    ///
    /// 敵陣判定・行き所のない駒の判定に使う。
    #[inline]
    pub const fn relative(self, c: Color) -> Rank {
        match c {
            Color::Black => self,
            Color::White => Rank::ALL[8 - self as usize],
        }
    }

    /// USI文字（'a'〜'i'）
    #[inline]
    pub const fn to_usi_char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// USI文字から変換
    #[inline]
    pub const fn from_usi_char(c: char) -> Option<Rank> {
        match c {
            'a'..='i' => Rank::from_u8(c as u8 - b'a'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usi_char_roundtrip() {
        for f in File::ALL {
            assert_eq!(File::from_usi_char(f.to_usi_char()), Some(f));
        }
        for r in Rank::ALL {
            assert_eq!(Rank::from_usi_char(r.to_usi_char()), Some(r));
        }
        assert_eq!(File::from_usi_char('0'), None);
        assert_eq!(Rank::from_usi_char('j'), None);
    }

    #[test]
    fn test_rank_relative() {
        assert_eq!(Rank::Rank1.relative(Color::Black), Rank::Rank1);
        assert_eq!(Rank::Rank1.relative(Color::White), Rank::Rank9);
        assert_eq!(Rank::Rank3.relative(Color::White), Rank::Rank7);
    }
}
