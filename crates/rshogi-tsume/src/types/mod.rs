//! 基本型モジュール
//!
//! # 型の依存関係
//!
//! ```text
//! Color
//!   ↓
//! File, Rank
//!   ↓
//! Square
//!   ↓
//! PieceType
//!   ↓
//! Piece, Move, Hand
//!
//! RepetitionState は独立
//! ```

mod color;
mod file;
mod hand;
mod moves;
mod piece;
mod piece_type;
mod repetition;
mod square;

pub use color::Color;
pub use file::{File, Rank};
pub use hand::Hand;
pub use moves::Move;
pub use piece::Piece;
pub use piece_type::PieceType;
pub use repetition::RepetitionState;
pub use square::Square;
