//! 局面モジュール
//!
//! - `Position`: 盤面・手駒・状態スタック
//! - `StateInfo`: do_move ごとの差分情報
//! - Zobrist ハッシュ
//! - SFEN の入出力

mod pos;
mod sfen;
mod state;
mod zobrist;

pub use pos::Position;
pub use sfen::{SFEN_HIRATE, SfenError};
pub use state::StateInfo;
pub use zobrist::{zobrist_hand, zobrist_psq, zobrist_side};
