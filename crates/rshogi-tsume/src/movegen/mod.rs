//! 指し手生成モジュール

mod generator;
mod movelist;

pub use generator::{
    generate_checks, generate_evasions, generate_legal, generate_legal_all, is_dead_end, is_mated,
    pawn_drop_mask,
};
pub use movelist::{MAX_MOVES, MoveList};
