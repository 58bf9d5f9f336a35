//! Forum core: post store, theme switcher, the Tic-Tac-Toe easter egg and the
//! command-driven application context tying them to a key-value store.

pub mod app;
pub mod driver;
pub mod forum;
pub mod game;
pub mod theme;

pub use app::{AppOptions, ForumApp};
pub use driver::apply_and_settle;
pub use forum::{ForumStore, LikeOutcome, NewPost};
pub use game::{GamePhase, MoveResult, TicTacToe};
pub use theme::ThemeSwitcher;

use shared::error::ForumError;

pub(crate) fn storage_error(err: anyhow::Error) -> ForumError {
    ForumError::storage(format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/forum_tests.rs"]
mod forum_tests;
