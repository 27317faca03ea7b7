pub mod board;
pub mod game;
pub mod movegen;
pub mod types;

pub use board::Board;
pub use game::{EndReason, Game, GameState, StalemateRule};
pub use types::*;
