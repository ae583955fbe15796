//! Move legality and win/draw evaluation.
//!
//! These functions are pure and operate on a session snapshot passed
//! by the orchestrator; they keep no state of their own. Validation
//! (`is_legal_move`) is deliberately separate from mutation
//! (`apply_move`) so the orchestrator can validate once inside an
//! exclusive section without redundant re-checks.

use crate::game::board::{Cell, Mark};
use crate::session::{ActorId, GameStatus, Session};
use std::collections::BTreeSet;
use tracing::instrument;

/// Number of consecutive same-mark cells required to win.
///
/// A domain rule, fixed at 3 regardless of configured board
/// dimensions; never derived from them.
pub const WIN_LENGTH: usize = 3;

/// Checks whether the actor may place a mark at the cell.
///
/// Legal iff all of: the game is in progress, it is the actor's turn,
/// the cell is within the board, the cell is unoccupied, and the
/// actor occupies one of the two slots. Fail-closed: any failing
/// check makes the move illegal.
#[instrument(skip(session), fields(game_id = %session.game_id()))]
pub fn is_legal_move(session: &Session, actor: &ActorId, cell: Cell) -> bool {
    session.status() == GameStatus::InProgress
        && session.turn().as_deref() == Some(actor.as_str())
        && cell.row < session.rows()
        && cell.col < session.cols()
        && !session.board().is_occupied(cell)
        && session.mark_of(actor).is_some()
}

/// Places the actor's mark at the cell and flips the turn to the
/// other slot's participant.
///
/// Requires a prior [`is_legal_move`] check by the caller; legality
/// is not re-validated here.
#[instrument(skip(session), fields(game_id = %session.game_id()))]
pub fn apply_move(session: &mut Session, actor: &ActorId, cell: Cell) {
    let Some(mark) = session.mark_of(actor) else {
        // Caller violated the legality precondition; leave state untouched.
        return;
    };
    session.board_mut().place(cell, mark);
    let next = session.actor_for(mark.opponent()).cloned();
    session.set_turn(next);
}

/// Evaluates the win condition anchored at the last-moved cell.
///
/// Only lines passing through the cell are scanned: its full row, its
/// full column, and the main/anti diagonal when the cell lies on one.
/// A line wins if it contains [`WIN_LENGTH`] consecutive same-mark
/// cells anywhere along its length.
#[instrument(skip(session), fields(game_id = %session.game_id()))]
pub fn winner(session: &Session, last: Cell) -> Option<Mark> {
    let mark = session.board().occupant(last)?;
    let positions = session.board().positions_of(mark);
    let rows = session.rows();
    let cols = session.cols();

    let row_win = has_run(positions, (0..cols).map(|col| Cell::new(last.row, col)));
    let col_win = has_run(positions, (0..rows).map(|row| Cell::new(row, last.col)));

    let diag_len = rows.min(cols);
    let main_diag_win = last.row == last.col
        && has_run(positions, (0..diag_len).map(|i| Cell::new(i, i)));
    let anti_diag_win = last.row as u32 + last.col as u32 == cols as u32 - 1
        && has_run(positions, (0..diag_len).map(|i| Cell::new(i, cols - 1 - i)));

    if row_win || col_win || main_diag_win || anti_diag_win {
        Some(mark)
    } else {
        None
    }
}

/// Checks the draw condition: every cell on the board is occupied.
///
/// The orchestrator checks this only after [`winner`] came up empty
/// for the move that filled the board.
#[instrument(skip(session), fields(game_id = %session.game_id()))]
pub fn is_draw(session: &Session) -> bool {
    let total = session.rows() as usize * session.cols() as usize;
    session.board().occupied_count() == total
}

/// Scans a line for a run of [`WIN_LENGTH`] occupied cells.
fn has_run(positions: &BTreeSet<Cell>, line: impl Iterator<Item = Cell>) -> bool {
    let mut consecutive = 0;
    for cell in line {
        if positions.contains(&cell) {
            consecutive += 1;
            if consecutive == WIN_LENGTH {
                return true;
            }
        } else {
            consecutive = 0;
        }
    }
    false
}
