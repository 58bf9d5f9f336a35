//! clap surface shared by one-shot invocations and the interactive shell.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use shared::{domain::PostId, protocol::Command};

#[derive(Subcommand, Debug)]
pub enum ForumAction {
    /// Create a post.
    Create {
        title: String,
        content: String,
        #[arg(long)]
        tag: Option<String>,
        /// Image file to embed in the post.
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// List posts, newest first.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    View {
        post_id: i64,
    },
    Like {
        post_id: i64,
    },
    /// Comment on a post.
    Comment {
        /// Target post; required outside the shell, where it defaults to the post in view.
        #[arg(long)]
        post: Option<i64>,
        text: String,
    },
    /// Delete the comment at `index` (as shown in delete mode).
    DeleteComment {
        /// Target post; required outside the shell, where it defaults to the post in view.
        #[arg(long)]
        post: Option<i64>,
        index: usize,
    },
    Delete {
        post_id: i64,
    },
    /// Switch between the light and dark theme.
    Theme {
        name: String,
    },
    Join,
}

impl ForumAction {
    /// True for comment actions that rely on a viewed post, which only the
    /// shell has.
    pub fn needs_viewed_post(&self) -> bool {
        matches!(
            self,
            ForumAction::Comment { post: None, .. } | ForumAction::DeleteComment { post: None, .. }
        )
    }

    pub fn into_command(self) -> Result<Command> {
        Ok(match self {
            ForumAction::Create {
                title,
                content,
                tag,
                image,
            } => Command::CreatePost {
                title,
                content,
                tag,
                image: image.as_deref().map(image_data_uri).transpose()?,
            },
            ForumAction::List { search } => Command::ListPosts { filter: search },
            ForumAction::View { post_id } => Command::ViewPost {
                post_id: PostId(post_id),
            },
            ForumAction::Like { post_id } => Command::LikePost {
                post_id: PostId(post_id),
            },
            ForumAction::Comment { post, text } => Command::AddComment {
                post_id: post.map(PostId),
                text,
            },
            ForumAction::DeleteComment { post, index } => Command::DeleteComment {
                post_id: post.map(PostId),
                index,
            },
            ForumAction::Delete { post_id } => Command::DeletePost {
                post_id: PostId(post_id),
            },
            ForumAction::Theme { name } => Command::SetTheme { name },
            ForumAction::Join => Command::Join,
        })
    }
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub action: ShellAction,
}

#[derive(Subcommand, Debug)]
pub enum ShellAction {
    #[command(flatten)]
    Forum(ForumAction),
    /// Leave the post view.
    Back,
    /// Show or hide delete controls.
    DeleteMode,
    /// Open or close tic-tac-toe.
    Game,
    /// Place an X on cell 0-8.
    Play {
        cell: usize,
    },
    ResetGame,
    #[command(alias = "exit")]
    Quit,
}

pub enum ShellStep {
    Apply(Command),
    Quit,
}

impl ShellAction {
    pub fn into_step(self) -> Result<ShellStep> {
        Ok(ShellStep::Apply(match self {
            ShellAction::Forum(action) => action.into_command()?,
            ShellAction::Back => Command::BackToPosts,
            ShellAction::DeleteMode => Command::ToggleDeleteMode,
            ShellAction::Game => Command::ToggleGame,
            ShellAction::Play { cell } => Command::PlayMove { cell },
            ShellAction::ResetGame => Command::ResetGame,
            ShellAction::Quit => return Ok(ShellStep::Quit),
        }))
    }
}

pub fn image_data_uri(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image '{}'", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        bail!("'{}' does not look like an image ({mime})", path.display());
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Splits a shell line on whitespace, keeping quoted runs together.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
