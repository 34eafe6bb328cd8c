//! 将棋の詰み探索ライブラリ
//!
//! 盤面表現・指し手生成の上に、1手詰め判定・DF-PN 詰み探索・
//! 深さ制限付き探索を実装する。
//!
//! ```
//! use rshogi_tsume::prelude::*;
//!
//! let mut pos = Position::from_sfen("4k4/9/4G4/9/9/9/9/9/4K4 b G 1").unwrap();
//! let mut solver = DfPnSolver::new(1);
//! assert_eq!(solver.solve(&mut pos).map(|m| m.to_usi()).as_deref(), Some("G*5b"));
//! ```

pub mod bitboard;
pub mod mate;
pub mod movegen;
pub mod position;
pub mod solver;
pub mod types;

/// よく使う型の再エクスポート
pub mod prelude {
    pub use crate::mate::{mate_1ply, mate_1ply_fast};
    pub use crate::movegen::{MoveList, generate_checks, generate_evasions, generate_legal, is_mated};
    pub use crate::position::{Position, SfenError};
    pub use crate::solver::{DfPnSolver, SolveOutcome, SolverConfig, dfs};
    pub use crate::types::{Color, Hand, Move, PieceType, Square};
}
