//! 証明数・反証数

/// 証明数・反証数の無限大
pub const INFINITY: u32 = 1 << 20;

/// 証明数と反証数の組
///
/// `pn == 0` なら詰み（攻め方の勝ち）、`dn == 0` なら不詰。
/// 両方が 0 になることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PnDn {
    pub pn: u32,
    pub dn: u32,
}

impl PnDn {
    #[inline]
    pub const fn new(pn: u32, dn: u32) -> Self {
        debug_assert!(pn <= INFINITY && dn <= INFINITY);
        debug_assert!(pn != 0 || dn != 0);
        Self { pn, dn }
    }

    /// 詰み
    #[inline]
    pub const fn proven() -> Self {
        Self { pn: 0, dn: INFINITY }
    }

    /// 不詰
    #[inline]
    pub const fn disproven() -> Self {
        Self { pn: INFINITY, dn: 0 }
    }

    /// 未展開
    #[inline]
    pub const fn unknown() -> Self {
        Self { pn: 1, dn: 1 }
    }

    #[inline]
    pub const fn is_proven(self) -> bool {
        self.pn == 0
    }

    #[inline]
    pub const fn is_disproven(self) -> bool {
        self.dn == 0
    }

    /// 詰みか不詰が確定しているか
    #[inline]
    pub const fn is_decided(self) -> bool {
        self.pn == 0 || self.dn == 0
    }

    /// しきい値に達したか（どちらか一方でも超えたら打ち切り）
    #[inline]
    pub const fn exceeds(self, threshold: PnDn) -> bool {
        self.pn >= threshold.pn || self.dn >= threshold.dn
    }
}

impl Default for PnDn {
    fn default() -> Self {
        Self::unknown()
    }
}

/// 子の値の和
///
/// 無限大を含めば無限大。そうでなければ `INFINITY - 1` で飽和させ、
/// 未確定の値の和が確定値に化けないようにする。
#[inline]
pub fn saturating_sum(a: u32, b: u32) -> u32 {
    if a >= INFINITY || b >= INFINITY {
        INFINITY
    } else {
        (a + b).min(INFINITY - 1)
    }
}
