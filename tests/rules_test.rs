//! Tests for board occupancy and move/win/draw evaluation.

use chrono::Utc;
use gridmatch::{
    Board, Cell, GameStatus, Mark, Session, apply_move, is_draw, is_legal_move, winner,
};

fn in_progress(rows: u16, cols: u16) -> Session {
    let mut session = Session::new(
        "game-1".to_string(),
        rows,
        cols,
        "alice".to_string(),
        Mark::X,
        Utc::now(),
    );
    session.assign_slot(Mark::O, "bob".to_string());
    session.set_status(GameStatus::InProgress);
    session.set_turn(Some("alice".to_string()));
    session
}

fn place_all(session: &mut Session, mark: Mark, cells: &[(u16, u16)]) {
    for &(row, col) in cells {
        session.board_mut().place(Cell::new(row, col), mark);
    }
}

#[test]
fn test_occupancy_stays_disjoint() {
    let mut board = Board::new();
    let cells = [(0, 0), (1, 1), (0, 0), (2, 2), (1, 1)];
    let marks = [Mark::X, Mark::O, Mark::O, Mark::X, Mark::X];
    for (&(row, col), &mark) in cells.iter().zip(marks.iter()) {
        board.place(Cell::new(row, col), mark);
    }

    for row in 0..3 {
        for col in 0..3 {
            let cell = Cell::new(row, col);
            let in_x = board.positions_of(Mark::X).contains(&cell);
            let in_o = board.positions_of(Mark::O).contains(&cell);
            assert!(!(in_x && in_o), "cell ({row}, {col}) in both sets");
            assert_eq!(board.occupant(cell).is_some(), in_x || in_o);
        }
    }
    assert_eq!(board.occupied_count(), 3);
}

#[test]
fn test_legality_requires_all_five_checks() {
    let alice = "alice".to_string();
    let bob = "bob".to_string();
    let carol = "carol".to_string();
    let cell = Cell::new(1, 1);

    let session = in_progress(3, 3);
    assert!(is_legal_move(&session, &alice, cell));

    // Status not in progress.
    let mut waiting = in_progress(3, 3);
    waiting.set_status(GameStatus::Waiting);
    assert!(!is_legal_move(&waiting, &alice, cell));

    // Not the actor's turn.
    assert!(!is_legal_move(&session, &bob, cell));

    // Out of bounds.
    assert!(!is_legal_move(&session, &alice, Cell::new(0, 5)));
    assert!(!is_legal_move(&session, &alice, Cell::new(5, 0)));

    // Cell occupied.
    let mut occupied = in_progress(3, 3);
    occupied.board_mut().place(cell, Mark::O);
    assert!(!is_legal_move(&occupied, &alice, cell));

    // Actor not a slot participant.
    let mut hijacked = in_progress(3, 3);
    hijacked.set_turn(Some(carol.clone()));
    assert!(!is_legal_move(&hijacked, &carol, cell));
}

#[test]
fn test_apply_move_hands_turn_to_opponent() {
    let mut session = in_progress(3, 3);
    apply_move(&mut session, &"alice".to_string(), Cell::new(0, 0));
    assert_eq!(session.turn().as_deref(), Some("bob"));

    session.set_turn(Some("bob".to_string()));
    apply_move(&mut session, &"bob".to_string(), Cell::new(1, 0));
    assert_eq!(session.turn().as_deref(), Some("alice"));
}

#[test]
fn test_winner_horizontal_run() {
    let mut session = in_progress(3, 3);
    place_all(&mut session, Mark::X, &[(0, 0), (0, 1), (0, 2)]);
    assert_eq!(winner(&session, Cell::new(0, 2)), Some(Mark::X));
}

#[test]
fn test_winner_vertical_and_main_diagonal() {
    let mut session = in_progress(4, 4);
    place_all(&mut session, Mark::O, &[(1, 2), (2, 2), (3, 2)]);
    assert_eq!(winner(&session, Cell::new(2, 2)), Some(Mark::O));

    let mut session = in_progress(4, 4);
    place_all(&mut session, Mark::X, &[(1, 1), (2, 2), (3, 3)]);
    assert_eq!(winner(&session, Cell::new(3, 3)), Some(Mark::X));
}

#[test]
fn test_winner_partial_run_on_large_board() {
    let mut session = in_progress(5, 5);
    place_all(&mut session, Mark::X, &[(2, 1), (2, 2), (2, 3)]);
    // Scattered marks far from the run must not affect the result.
    place_all(&mut session, Mark::X, &[(0, 0), (4, 4)]);
    assert_eq!(winner(&session, Cell::new(2, 3)), Some(Mark::X));
}

#[test]
fn test_no_false_positive_from_scattered_marks() {
    let mut session = in_progress(5, 5);
    place_all(&mut session, Mark::X, &[(2, 0), (2, 1), (2, 3), (0, 3), (4, 3)]);
    // Row 2 and column 3 each hold marks but never three consecutive.
    assert_eq!(winner(&session, Cell::new(2, 3)), None);
}

#[test]
fn test_win_length_fixed_regardless_of_board_size() {
    // A 3-run wins even on a board much larger than 3 in either axis.
    let mut session = in_progress(9, 4);
    place_all(&mut session, Mark::O, &[(6, 1), (7, 1), (8, 1)]);
    assert_eq!(winner(&session, Cell::new(7, 1)), Some(Mark::O));
}

#[test]
fn test_draw_requires_full_board() {
    let mut session = in_progress(2, 2);
    place_all(&mut session, Mark::X, &[(0, 0), (1, 1)]);
    place_all(&mut session, Mark::O, &[(0, 1)]);
    assert!(!is_draw(&session));

    place_all(&mut session, Mark::O, &[(1, 0)]);
    assert!(is_draw(&session));
}

#[test]
fn test_full_board_with_winning_move_is_a_win() {
    // 3x3 board where the final move both fills the board and wins;
    // the win must be reported before the draw check ever runs.
    let mut session = in_progress(3, 3);
    place_all(&mut session, Mark::X, &[(0, 0), (1, 1), (2, 0), (0, 1)]);
    place_all(&mut session, Mark::O, &[(0, 2), (1, 0), (1, 2), (2, 1)]);
    session.board_mut().place(Cell::new(2, 2), Mark::X);

    assert_eq!(winner(&session, Cell::new(2, 2)), Some(Mark::X));
    assert!(is_draw(&session), "board is full");
}
