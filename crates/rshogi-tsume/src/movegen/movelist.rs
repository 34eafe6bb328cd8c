//! 指し手リスト

use crate::types::Move;

/// 1局面の合法手の最大数（593手）に余裕を持たせた容量
pub const MAX_MOVES: usize = 600;

/// 指し手生成バッファ（固定長配列、ヒープ確保なし）
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// 空のMoveListを作成
    #[inline]
    pub const fn new() -> Self {
        Self {
            moves: [Move::NONE; MAX_MOVES],
            len: 0,
        }
    }

    /// 指し手の数
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// 空かどうか
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 全消去
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// 指し手を追加
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    /// 条件を満たす手だけを残す（順序は保つ）
    pub fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut n = 0;
        for i in 0..self.len {
            let m = self.moves[i];
            if keep(m) {
                self.moves[n] = m;
                n += 1;
            }
        }
        self.len = n;
    }

    /// 指定された指し手が含まれているか
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// スライスとして取得
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// イテレータを取得
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
