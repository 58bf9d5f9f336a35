//! Line-oriented session: every forum command plus post view state, delete
//! mode and the tic-tac-toe game.

use anyhow::Result;
use clap::Parser;
use forum_core::{apply_and_settle, ForumApp};
use shared::protocol::Command;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{
    commands::{split_line, ShellLine, ShellStep},
    render::print_event,
    report_user_error,
};

pub async fn run(app: &mut ForumApp) -> Result<()> {
    println!("DarkConverse shell. Type `help` for commands, `quit` to leave.");
    apply_and_settle(app, Command::ListPosts { filter: None }, print_event).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words = match split_line(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(err) => {
                // clap renders help and usage errors itself
                let _ = err.print();
                continue;
            }
        };

        let command = match parsed.action.into_step() {
            Ok(ShellStep::Apply(command)) => command,
            Ok(ShellStep::Quit) => break,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };

        if let Err(err) = apply_and_settle(app, command, print_event).await {
            report_user_error(err)?;
        }
    }

    debug!("shell session ended");
    Ok(())
}
