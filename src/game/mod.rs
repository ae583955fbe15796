//! Pure game logic: the board value type and the move/win/draw rules.

mod board;
mod rules;

pub use board::{Board, Cell, Mark};
pub use rules::{WIN_LENGTH, apply_move, is_draw, is_legal_move, winner};
