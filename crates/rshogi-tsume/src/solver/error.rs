//! 詰み探索のエラー型
//!
//! 探索そのものは失敗しない。設定値の検証と局面の読み込みだけがエラーを返す。

use thiserror::Error;

pub use crate::position::SfenError;

/// 探索設定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 置換表のサイズが 0
    #[error("memory_mb must be at least 1")]
    ZeroMemory,
    /// 置換表のサイズが大きすぎる
    #[error("memory_mb {requested} exceeds the limit of {max} MB")]
    MemoryTooLarge { requested: usize, max: usize },
}
