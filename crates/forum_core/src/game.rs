//! Tic-Tac-Toe easter egg: X is the human, O picks a uniformly random empty
//! cell after a short delay.

use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use shared::{
    domain::{Board, Mark, BOARD_CELLS},
    protocol::{GameOutcome, IgnoredMove, OpponentTicket},
};
use tracing::{debug, info};

pub const DEFAULT_OPPONENT_DELAY: Duration = Duration::from_millis(500);

pub const HUMAN: Mark = Mark::X;
pub const OPPONENT: Mark = Mark::O;

/// Rows, columns, diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Closed,
    AwaitingMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Ignored(IgnoredMove),
    /// The mark was placed and the turn passed. Carries the opponent's
    /// pending move when it is now O's turn.
    Continued { opponent: Option<OpponentTicket> },
    /// Win or draw. `final_board` is the board as it stood on the last
    /// move; the live board has already been reset.
    Finished {
        outcome: GameOutcome,
        final_board: Board,
    },
}

pub fn winner_of(board: &Board) -> Option<Mark> {
    WIN_LINES.iter().find_map(|&[a, b, c]| match board[a] {
        Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => Some(mark),
        _ => None,
    })
}

pub struct TicTacToe {
    board: Board,
    to_move: Mark,
    phase: GamePhase,
    generation: u64,
    opponent_delay: Duration,
    rng: StdRng,
}

impl TicTacToe {
    pub fn new(opponent_delay: Duration) -> Self {
        Self::with_rng(opponent_delay, StdRng::from_entropy())
    }

    pub fn with_seed(opponent_delay: Duration, seed: u64) -> Self {
        Self::with_rng(opponent_delay, StdRng::seed_from_u64(seed))
    }

    fn with_rng(opponent_delay: Duration, rng: StdRng) -> Self {
        Self {
            board: [None; BOARD_CELLS],
            to_move: HUMAN,
            phase: GamePhase::Closed,
            generation: 0,
            opponent_delay,
            rng,
        }
    }

    /// An open game positioned at `board` with `to_move` next.
    pub fn from_board(board: Board, to_move: Mark, seed: u64) -> Self {
        let mut game = Self::with_seed(DEFAULT_OPPONENT_DELAY, seed);
        game.board = board;
        game.to_move = to_move;
        game.phase = GamePhase::AwaitingMove;
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == GamePhase::AwaitingMove
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn open(&mut self) {
        self.phase = GamePhase::AwaitingMove;
        self.reset();
    }

    pub fn close(&mut self) {
        self.phase = GamePhase::Closed;
        self.generation += 1;
        debug!(generation = self.generation, "game closed");
    }

    /// Returns whether the game is open afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
        self.is_open()
    }

    /// Clears the board and hands the first move to X. Pending opponent
    /// tickets from before the reset go stale.
    pub fn reset(&mut self) {
        self.board = [None; BOARD_CELLS];
        self.to_move = HUMAN;
        self.generation += 1;
        debug!(generation = self.generation, "game reset");
    }

    pub fn check_winner(&self) -> bool {
        self.winner().is_some()
    }

    pub fn winner(&self) -> Option<Mark> {
        winner_of(&self.board)
    }

    pub fn filled_cells(&self) -> usize {
        self.board.iter().filter(|cell| cell.is_some()).count()
    }

    /// The human's move.
    pub fn play(&mut self, cell: usize) -> MoveResult {
        self.place(HUMAN, cell)
    }

    pub fn resolve_opponent(&mut self, ticket: OpponentTicket) -> MoveResult {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale opponent move"
            );
            return MoveResult::Ignored(IgnoredMove::StaleTicket);
        }
        self.place(OPPONENT, ticket.cell)
    }

    fn place(&mut self, mark: Mark, cell: usize) -> MoveResult {
        if let Some(reason) = self.reject(mark, cell) {
            debug!(%mark, cell, ?reason, "ignoring move");
            return MoveResult::Ignored(reason);
        }

        self.board[cell] = Some(mark);

        let outcome = match self.winner() {
            Some(winner) => Some(GameOutcome::Win(winner)),
            None if self.filled_cells() == BOARD_CELLS => Some(GameOutcome::Draw),
            None => None,
        };
        if let Some(outcome) = outcome {
            info!(?outcome, "game finished");
            let final_board = self.board;
            self.reset();
            return MoveResult::Finished {
                outcome,
                final_board,
            };
        }

        self.to_move = mark.other();
        let opponent = if self.to_move == OPPONENT {
            self.schedule_opponent()
        } else {
            None
        };
        MoveResult::Continued { opponent }
    }

    fn reject(&self, mark: Mark, cell: usize) -> Option<IgnoredMove> {
        if !self.is_open() {
            Some(IgnoredMove::GameClosed)
        } else if cell >= BOARD_CELLS {
            Some(IgnoredMove::OutOfRange)
        } else if self.board[cell].is_some() {
            Some(IgnoredMove::Occupied)
        } else if mark != self.to_move {
            Some(IgnoredMove::NotYourTurn)
        } else {
            None
        }
    }

    fn schedule_opponent(&mut self) -> Option<OpponentTicket> {
        let empty: Vec<usize> = (0..BOARD_CELLS)
            .filter(|&cell| self.board[cell].is_none())
            .collect();
        let cell = *empty.choose(&mut self.rng)?;
        Some(OpponentTicket {
            generation: self.generation,
            cell,
            delay_ms: self.opponent_delay.as_millis() as u64,
        })
    }
}

#[cfg(test)]
#[path = "tests/game_tests.rs"]
mod tests;
