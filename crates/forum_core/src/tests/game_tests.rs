use super::*;

const X: Option<Mark> = Some(Mark::X);
const O: Option<Mark> = Some(Mark::O);
const E: Option<Mark> = None;

fn open_game(seed: u64) -> TicTacToe {
    let mut game = TicTacToe::with_seed(Duration::from_millis(10), seed);
    game.open();
    game
}

fn expect_ticket(result: MoveResult) -> OpponentTicket {
    match result {
        MoveResult::Continued {
            opponent: Some(ticket),
        } => ticket,
        other => panic!("expected an opponent ticket, got {other:?}"),
    }
}

#[test]
fn top_row_is_a_win() {
    let game = TicTacToe::from_board([X, X, X, O, O, E, E, E, E], Mark::O, 1);
    assert!(game.check_winner());
    assert_eq!(game.winner(), Some(Mark::X));
}

#[test]
fn winner_iff_some_line_is_uniform() {
    // Every board over {empty, X, O}; 3^9 states covers all reachable ones.
    for code in 0..3usize.pow(9) {
        let mut board = [None; BOARD_CELLS];
        let mut rest = code;
        for cell in board.iter_mut() {
            *cell = match rest % 3 {
                0 => None,
                1 => Some(Mark::X),
                _ => Some(Mark::O),
            };
            rest /= 3;
        }

        let expected = WIN_LINES.iter().any(|&[a, b, c]| {
            board[a].is_some() && board[a] == board[b] && board[b] == board[c]
        });
        assert_eq!(winner_of(&board).is_some(), expected, "board {board:?}");
    }
}

#[test]
fn human_move_then_opponent_leaves_two_marks_and_x_to_move() {
    let mut game = open_game(7);
    let ticket = expect_ticket(game.play(4));
    assert_eq!(game.to_move(), Mark::O);
    assert_ne!(ticket.cell, 4);
    assert_eq!(ticket.delay_ms, 10);

    let result = game.resolve_opponent(ticket);
    assert_eq!(result, MoveResult::Continued { opponent: None });
    assert_eq!(game.filled_cells(), 2);
    assert_eq!(game.to_move(), Mark::X);
    assert_eq!(game.board()[4], Some(Mark::X));
    assert_eq!(game.board()[ticket.cell], Some(Mark::O));
}

#[test]
fn occupied_cell_never_changes_board() {
    let mut game = open_game(3);
    let ticket = expect_ticket(game.play(0));
    game.resolve_opponent(ticket);
    let before = *game.board();

    assert_eq!(game.play(0), MoveResult::Ignored(IgnoredMove::Occupied));
    assert_eq!(
        game.play(ticket.cell),
        MoveResult::Ignored(IgnoredMove::Occupied)
    );
    assert_eq!(*game.board(), before);
}

#[test]
fn human_cannot_move_on_opponents_turn() {
    let mut game = open_game(11);
    let ticket = expect_ticket(game.play(4));
    let free = (0..BOARD_CELLS)
        .find(|&cell| cell != 4 && cell != ticket.cell)
        .expect("free cell");

    assert_eq!(game.play(free), MoveResult::Ignored(IgnoredMove::NotYourTurn));
    assert_eq!(game.filled_cells(), 1);
}

#[test]
fn moves_are_ignored_while_closed_or_out_of_range() {
    let mut game = TicTacToe::with_seed(DEFAULT_OPPONENT_DELAY, 1);
    assert_eq!(game.phase(), GamePhase::Closed);
    assert_eq!(game.play(0), MoveResult::Ignored(IgnoredMove::GameClosed));

    game.open();
    assert_eq!(game.play(9), MoveResult::Ignored(IgnoredMove::OutOfRange));
    assert_eq!(game.filled_cells(), 0);
}

#[test]
fn full_board_without_line_is_a_draw_and_resets() {
    // X O X / X O O / O X _ ; X completes at 8 with no line.
    let mut game = TicTacToe::from_board([X, O, X, X, O, O, O, X, E], Mark::X, 5);
    let generation = game.generation();

    let MoveResult::Finished {
        outcome,
        final_board,
    } = game.play(8)
    else {
        panic!("expected the game to finish");
    };
    assert_eq!(outcome, GameOutcome::Draw);
    assert!(final_board.iter().all(Option::is_some));
    assert_eq!(game.filled_cells(), 0);
    assert_eq!(game.to_move(), Mark::X);
    assert!(game.generation() > generation);
}

#[test]
fn winning_move_announces_winner_and_resets() {
    let mut game = TicTacToe::from_board([X, X, E, O, O, E, E, E, E], Mark::X, 5);
    assert!(matches!(
        game.play(2),
        MoveResult::Finished {
            outcome: GameOutcome::Win(Mark::X),
            ..
        }
    ));
    assert_eq!(*game.board(), [None; BOARD_CELLS]);
    assert_eq!(game.to_move(), Mark::X);
}

#[test]
fn opponent_can_win() {
    let mut game = TicTacToe::from_board([O, O, E, X, X, E, X, E, E], Mark::O, 5);
    let ticket = OpponentTicket {
        generation: game.generation(),
        cell: 2,
        delay_ms: 0,
    };
    assert!(matches!(
        game.resolve_opponent(ticket),
        MoveResult::Finished {
            outcome: GameOutcome::Win(Mark::O),
            final_board,
        } if final_board[2] == Some(Mark::O)
    ));
}

#[test]
fn stale_ticket_after_reset_is_discarded() {
    let mut game = open_game(9);
    let ticket = expect_ticket(game.play(4));
    game.reset();

    assert_eq!(
        game.resolve_opponent(ticket),
        MoveResult::Ignored(IgnoredMove::StaleTicket)
    );
    assert_eq!(game.filled_cells(), 0);
    assert_eq!(game.to_move(), Mark::X);
}

#[test]
fn stale_ticket_after_close_and_reopen_is_discarded() {
    let mut game = open_game(9);
    let ticket = expect_ticket(game.play(0));
    assert!(!game.toggle());
    assert!(game.toggle());

    assert_eq!(
        game.resolve_opponent(ticket),
        MoveResult::Ignored(IgnoredMove::StaleTicket)
    );
    assert_eq!(game.filled_cells(), 0);
}

#[test]
fn opponent_only_picks_empty_cells() {
    for seed in 0..50 {
        let mut game = TicTacToe::from_board([X, O, X, O, X, E, E, O, E], Mark::X, seed);
        let ticket = expect_ticket(game.play(5));
        assert!(
            ticket.cell == 6 || ticket.cell == 8,
            "seed {seed} picked {}",
            ticket.cell
        );
    }
}
