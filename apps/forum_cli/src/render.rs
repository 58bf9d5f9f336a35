//! Plain-text view layer for forum events.

use shared::{
    domain::{Board, Mark},
    protocol::{ForumEvent, IgnoredMove, PostListView},
};

pub fn print_event(event: &ForumEvent) {
    println!("{}", render_event(event));
}

pub fn render_event(event: &ForumEvent) -> String {
    match event {
        ForumEvent::PostsRendered(view) => render_post_list(view),
        ForumEvent::PostRendered(post) => {
            let mut out = format!(
                "# {}\n{}\nTag: {}\nLikes: {}\nCreated: {}",
                post.title,
                post.content,
                post.tag_label,
                post.likes,
                post.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            if let Some(image) = &post.image {
                let kind = image
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .unwrap_or("unknown");
                out.push_str(&format!("\n[image: {kind}, {} bytes encoded]", image.len()));
            }
            out
        }
        ForumEvent::CommentsRendered(view) => {
            if view.comments.is_empty() {
                return "(no comments)".to_string();
            }
            view.comments
                .iter()
                .map(|comment| {
                    let prefix = if view.delete_controls {
                        format!("[{}] ", comment.index)
                    } else {
                        String::new()
                    };
                    format!(
                        "{prefix}{}\n    Posted: {}",
                        comment.text,
                        comment.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        ForumEvent::PostCreated { post_id } => format!("created post {post_id}"),
        ForumEvent::PostDeleted { post_id } => format!("deleted post {post_id}"),
        ForumEvent::Celebration { likes, .. } => format!("*** {likes} likes! ***"),
        ForumEvent::BoardUpdated { board, to_move } => match to_move {
            Some(mark) => format!("{}\n{mark} to move", render_board(board)),
            None => render_board(board),
        },
        ForumEvent::OpponentScheduled(_) => "O is thinking...".to_string(),
        ForumEvent::MoveIgnored { cell, reason } => {
            let why = match reason {
                IgnoredMove::GameClosed => "the game is closed (use `game` to open it)",
                IgnoredMove::OutOfRange => "cells are numbered 0-8",
                IgnoredMove::Occupied => "that cell is taken",
                IgnoredMove::NotYourTurn => "it is not your turn",
                IgnoredMove::StaleTicket => "the game was reset",
            };
            format!("move {cell} ignored: {why}")
        }
        ForumEvent::GameOver(outcome) => outcome.announcement(),
        ForumEvent::GameVisibility { open } => {
            if *open {
                "tic-tac-toe opened".to_string()
            } else {
                "tic-tac-toe closed".to_string()
            }
        }
        ForumEvent::ThemeApplied { theme } => format!("theme: {theme}"),
        ForumEvent::DeleteModeChanged { enabled } => {
            format!("delete mode {}", if *enabled { "on" } else { "off" })
        }
        ForumEvent::Notice(message) => message.clone(),
    }
}

fn render_post_list(view: &PostListView) -> String {
    if view.posts.is_empty() {
        return match &view.filter {
            Some(filter) => format!("no posts match '{filter}'"),
            None => "no posts yet".to_string(),
        };
    }

    view.posts
        .iter()
        .map(|post| {
            let delete = if view.delete_controls { " [delete]" } else { "" };
            format!(
                "{} | {}{delete}\n  {}\n  Tag: {} | Likes: {} | Created: {}",
                post.post_id,
                post.title,
                post.excerpt,
                post.tag_label,
                post.likes,
                post.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_board(board: &Board) -> String {
    board
        .chunks(3)
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Some(Mark::X) => "X".to_string(),
                    Some(Mark::O) => "O".to_string(),
                    None => (row * 3 + col).to_string(),
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n--+---+--\n")
}
