use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Board, Mark, PostId, Theme};

/// Characters of post content shown in the list view before the ellipsis.
pub const EXCERPT_CHARS: usize = 100;
pub const NO_TAG_LABEL: &str = "No Tag";
pub const CELEBRATION_DISPLAY_MS: u64 = 2_000;
pub const WELCOME_NOTICE: &str =
    "Welcome to DarkConverse! Start exploring our forums and sharing your ideas.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Command {
    CreatePost {
        title: String,
        content: String,
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
    ListPosts {
        #[serde(default)]
        filter: Option<String>,
    },
    ViewPost {
        post_id: PostId,
    },
    BackToPosts,
    LikePost {
        post_id: PostId,
    },
    /// Targets `post_id` when given, otherwise the post currently in view.
    AddComment {
        #[serde(default)]
        post_id: Option<PostId>,
        text: String,
    },
    DeleteComment {
        #[serde(default)]
        post_id: Option<PostId>,
        index: usize,
    },
    DeletePost {
        post_id: PostId,
    },
    ToggleDeleteMode,
    ToggleGame,
    PlayMove {
        cell: usize,
    },
    ResolveOpponent {
        ticket: OpponentTicket,
    },
    ResetGame,
    SetTheme {
        name: String,
    },
    LoadTheme,
    Join,
}

/// A deferred opponent move. It is only honoured while the game is still on
/// the generation it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentTicket {
    pub generation: u64,
    pub cell: usize,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "mark", rename_all = "snake_case")]
pub enum GameOutcome {
    Win(Mark),
    Draw,
}

impl GameOutcome {
    pub fn announcement(self) -> String {
        match self {
            GameOutcome::Win(mark) => format!("{mark} wins!"),
            GameOutcome::Draw => "It's a draw!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredMove {
    GameClosed,
    OutOfRange,
    Occupied,
    NotYourTurn,
    StaleTicket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post_id: PostId,
    pub title: String,
    pub excerpt: String,
    pub tag_label: String,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListView {
    pub posts: Vec<PostSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub delete_controls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    pub tag_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub index: usize,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsView {
    pub post_id: PostId,
    pub comments: Vec<CommentView>,
    pub delete_controls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ForumEvent {
    PostsRendered(PostListView),
    PostRendered(PostView),
    CommentsRendered(CommentsView),
    PostCreated {
        post_id: PostId,
    },
    PostDeleted {
        post_id: PostId,
    },
    Celebration {
        post_id: PostId,
        likes: u64,
        display_ms: u64,
    },
    /// `to_move` is `None` for a board whose game just ended.
    BoardUpdated {
        board: Board,
        to_move: Option<Mark>,
    },
    OpponentScheduled(OpponentTicket),
    MoveIgnored {
        cell: usize,
        reason: IgnoredMove,
    },
    GameOver(GameOutcome),
    GameVisibility {
        open: bool,
    },
    ThemeApplied {
        theme: Theme,
    },
    DeleteModeChanged {
        enabled: bool,
    },
    Notice(String),
}
