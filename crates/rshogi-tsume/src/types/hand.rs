//! 手駒（Hand）

use super::PieceType;

/// 手駒（32bit packed）
///
/// ビット配置:
/// - bit 0-4:   歩 (5bit, 最大18枚)
/// - bit 5-7:   香 (3bit, 最大4枚)
/// - bit 8-10:  桂 (3bit, 最大4枚)
/// - bit 11-13: 銀 (3bit, 最大4枚)
/// - bit 14-16: 金 (3bit, 最大4枚)
/// - bit 17-18: 角 (2bit, 最大2枚)
/// - bit 19-20: 飛 (2bit, 最大2枚)
///
/// 置換表には `raw()` をそのまま持ち駒（stand）として格納する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Hand(u32);

impl Hand {
    /// 空の手駒
    pub const EMPTY: Hand = Hand(0);

    const fn shift_mask(pt: PieceType) -> (u32, u32) {
        match pt {
            PieceType::Pawn => (0, 0x1F),
            PieceType::Lance => (5, 0x07),
            PieceType::Knight => (8, 0x07),
            PieceType::Silver => (11, 0x07),
            PieceType::Gold => (14, 0x07),
            PieceType::Bishop => (17, 0x03),
            PieceType::Rook => (19, 0x03),
            _ => (0, 0), // King, 成駒は手駒にならない
        }
    }

    /// 指定駒種の枚数を取得
    #[inline]
    pub const fn count(self, pt: PieceType) -> u32 {
        let (shift, mask) = Self::shift_mask(pt);
        (self.0 >> shift) & mask
    }

    /// 指定駒種を持っているか
    #[inline]
    pub const fn has(self, pt: PieceType) -> bool {
        self.count(pt) > 0
    }

    /// 1枚追加
    #[inline]
    pub const fn add(self, pt: PieceType) -> Hand {
        let (shift, _) = Self::shift_mask(pt);
        Hand(self.0 + (1 << shift))
    }

    /// 1枚減らす
    #[inline]
    pub const fn sub(self, pt: PieceType) -> Hand {
        debug_assert!(self.has(pt));
        let (shift, _) = Self::shift_mask(pt);
        Hand(self.0 - (1 << shift))
    }

    /// 指定枚数をセット
    #[inline]
    pub const fn set(self, pt: PieceType, count: u32) -> Hand {
        let (shift, mask) = Self::shift_mask(pt);
        Hand((self.0 & !(mask << shift)) | ((count & mask) << shift))
    }

    /// 優等判定: 全ての駒種で self が other 以上持っている
    #[inline]
    pub const fn is_superior_or_equal(self, other: Hand) -> bool {
        let mut i = 0;
        while i < PieceType::HAND_NUM {
            let pt = PieceType::HAND_PIECES[i];
            if self.count(pt) < other.count(pt) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// 歩以外の手駒を持っているか
    #[inline]
    pub const fn has_except_pawn(self) -> bool {
        self.0 & !0x1F != 0
    }

    /// 空かどうか
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 内部値を取得
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// 内部値から生成
    #[inline]
    pub const fn from_raw(raw: u32) -> Hand {
        Hand(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hand_add_sub() {
        let hand = Hand::EMPTY.add(PieceType::Pawn).add(PieceType::Pawn).add(PieceType::Rook);
        assert_eq!(hand.count(PieceType::Pawn), 2);
        assert_eq!(hand.count(PieceType::Rook), 1);
        let hand = hand.sub(PieceType::Pawn);
        assert_eq!(hand.count(PieceType::Pawn), 1);
        assert!(hand.has_except_pawn());
        assert!(!Hand::EMPTY.add(PieceType::Pawn).has_except_pawn());
    }

    #[test]
    fn test_superior_is_piecewise() {
        let gold = Hand::EMPTY.add(PieceType::Gold);
        let gold_pawn = gold.add(PieceType::Pawn);
        let silver = Hand::EMPTY.add(PieceType::Silver);
        assert!(gold_pawn.is_superior_or_equal(gold));
        assert!(!gold.is_superior_or_equal(gold_pawn));
        assert!(!gold.is_superior_or_equal(silver));
        assert!(!silver.is_superior_or_equal(gold));
        assert!(Hand::EMPTY.is_superior_or_equal(Hand::EMPTY));
    }

    fn arb_hand() -> impl Strategy<Value = Hand> {
        (0u32..=18, 0u32..=4, 0u32..=4, 0u32..=4, 0u32..=4, 0u32..=2, 0u32..=2).prop_map(
            |(p, l, n, s, g, b, r)| {
                Hand::EMPTY
                    .set(PieceType::Pawn, p)
                    .set(PieceType::Lance, l)
                    .set(PieceType::Knight, n)
                    .set(PieceType::Silver, s)
                    .set(PieceType::Gold, g)
                    .set(PieceType::Bishop, b)
                    .set(PieceType::Rook, r)
            },
        )
    }

    proptest! {
        #[test]
        fn superior_is_reflexive(h in arb_hand()) {
            prop_assert!(h.is_superior_or_equal(h));
        }

        #[test]
        fn superior_is_antisymmetric(a in arb_hand(), b in arb_hand()) {
            if a.is_superior_or_equal(b) && b.is_superior_or_equal(a) {
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn adding_a_piece_dominates(h in arb_hand(), i in 1usize..7) {
            let pt = PieceType::HAND_PIECES[i];
            prop_assume!(h.count(pt) < 2);
            let more = h.add(pt);
            prop_assert!(more.is_superior_or_equal(h));
            prop_assert!(!h.is_superior_or_equal(more));
        }
    }
}
