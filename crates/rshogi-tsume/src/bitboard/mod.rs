//! ビットボードモジュール
//!
//! 81マスの盤面を128bitで表現し、利き計算を提供する。
//!
//! - `Bitboard`: 128bit盤面表現
//! - 近接駒の利きテーブル
//! - 飛び駒の利き計算

mod core;
mod sliders;
mod tables;

pub use self::core::{Bitboard, BitboardIter};
pub use sliders::*;
pub use tables::*;
