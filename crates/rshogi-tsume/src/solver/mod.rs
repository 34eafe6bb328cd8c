//! 詰み探索
//!
//! - `DfPnSolver`: 置換表を使う DF-PN 探索（詰み手順の復元つき）
//! - `dfs::solve`: 置換表を使わない深さ制限付き探索
//! - `TranspositionTable`: 攻め方の手駒の優劣を考慮する置換表

pub mod dfs;

mod config;
mod dfpn;
mod error;
mod pn;
mod pv;
mod table;

pub use config::{MAX_MEMORY_MB, SolverConfig};
pub use dfpn::{DfPnSolver, MAX_PLY, SolveOutcome};
pub use error::{ConfigError, SfenError};
pub use pn::{INFINITY, PnDn, saturating_sum};
pub use table::{BUCKET_SIZE, Bucket, Entry, TranspositionTable};
