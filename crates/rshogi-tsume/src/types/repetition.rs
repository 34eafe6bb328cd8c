//! 千日手状態（RepetitionState）

/// 千日手状態（手番側から見た分類）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepetitionState {
    /// 千日手ではない
    #[default]
    None,
    /// 通常の千日手（引き分け）
    Draw,
    /// 相手の連続王手の千日手で勝ち
    Win,
    /// 自分の連続王手の千日手で負け
    Lose,
    /// 優等局面（盤面が同一で手駒が多い）
    Superior,
    /// 劣等局面（盤面が同一で手駒が少ない）
    Inferior,
}

impl RepetitionState {
    /// 千日手かどうか（通常の千日手または連続王手）
    #[inline]
    pub const fn is_repetition(self) -> bool {
        matches!(self, RepetitionState::Draw | RepetitionState::Win | RepetitionState::Lose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repetition_state_is_repetition() {
        assert!(!RepetitionState::None.is_repetition());
        assert!(RepetitionState::Draw.is_repetition());
        assert!(RepetitionState::Win.is_repetition());
        assert!(!RepetitionState::Superior.is_repetition());
        assert_eq!(RepetitionState::default(), RepetitionState::None);
    }
}
