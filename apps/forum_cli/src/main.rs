use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use forum_core::ForumApp;
use shared::error::ForumError;
use storage::Storage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod shell;

use commands::ForumAction;
use config::{load_settings, prepare_data_path};

#[derive(Parser, Debug)]
#[command(name = "forum", about = "DarkConverse forum with a tic-tac-toe easter egg")]
struct Cli {
    /// JSON file holding the forum's key-value store.
    #[arg(long)]
    data_path: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    #[command(flatten)]
    Forum(ForumAction),
    /// Interactive session with post views, delete mode and tic-tac-toe.
    Shell,
}

/// Prints validation and not-found errors as notices; anything else is fatal.
pub(crate) fn report_user_error(err: ForumError) -> Result<()> {
    if err.is_user_facing() {
        eprintln!("{}", err.message());
        Ok(())
    } else {
        Err(err.into())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let settings = load_settings();
    let cli = Cli::parse();
    if matches!(&cli.command, CliCommand::Forum(action) if action.needs_viewed_post()) {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--post <POST> is required outside the shell",
            )
            .exit();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let data_path = prepare_data_path(
        cli.data_path
            .as_deref()
            .unwrap_or(settings.data_path.as_path()),
    )?;
    let storage = Storage::open_file(&data_path).map_err(|error| {
        error!(
            data_path = %data_path.display(),
            error = %format!("{error:#}"),
            "failed to open forum store"
        );
        error
    })?;
    let mut app = ForumApp::open(storage, settings.app_options())?;
    if let Some(theme) = app.theme() {
        info!(%theme, "restored theme");
    }

    match cli.command {
        CliCommand::Forum(action) => {
            let command = action.into_command()?;
            match app.apply(command) {
                Ok(events) => events.iter().for_each(render::print_event),
                Err(err) => {
                    let failed = err.is_user_facing();
                    report_user_error(err)?;
                    if failed {
                        return Ok(ExitCode::from(2));
                    }
                }
            }
        }
        CliCommand::Shell => shell::run(&mut app).await?,
    }

    Ok(ExitCode::SUCCESS)
}
