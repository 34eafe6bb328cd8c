//! 詰み探索の設定

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// 置換表サイズの上限（MB）
pub const MAX_MEMORY_MB: usize = 1 << 20;

/// DF-PN 探索の設定
///
/// `max_depth` と `max_node_count` は 0 で無制限。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// 置換表のサイズ（MB）
    pub memory_mb: usize,
    /// 探索する最大手数（ルートからの手数）
    pub max_depth: u32,
    /// 探索する最大ノード数
    pub max_node_count: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            memory_mb: 16,
            max_depth: 0,
            max_node_count: 0,
        }
    }
}

impl SolverConfig {
    /// 設定値を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_mb == 0 {
            return Err(ConfigError::ZeroMemory);
        }
        if self.memory_mb > MAX_MEMORY_MB {
            return Err(ConfigError::MemoryTooLarge {
                requested: self.memory_mb,
                max: MAX_MEMORY_MB,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert_eq!(config.memory_mb, 16);
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.max_node_count, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_memory() {
        let zero = SolverConfig { memory_mb: 0, ..SolverConfig::default() };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroMemory));
        let huge = SolverConfig { memory_mb: MAX_MEMORY_MB + 1, ..SolverConfig::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::MemoryTooLarge { .. })));
    }
}
