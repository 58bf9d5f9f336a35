use std::time::Duration;

use shared::{
    domain::{Post, PostId, Theme},
    error::ForumError,
    protocol::{
        Command, CommentView, CommentsView, ForumEvent, PostListView, PostSummary, PostView,
        CELEBRATION_DISPLAY_MS, EXCERPT_CHARS, NO_TAG_LABEL, WELCOME_NOTICE,
    },
};
use storage::Storage;
use tracing::debug;

use crate::{
    forum::{ForumStore, NewPost},
    game::{MoveResult, TicTacToe, DEFAULT_OPPONENT_DELAY},
    theme::ThemeSwitcher,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppOptions {
    pub opponent_delay: Duration,
    /// Fixed seed for the opponent's move picker; random when unset.
    pub opponent_seed: Option<u64>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            opponent_delay: DEFAULT_OPPONENT_DELAY,
            opponent_seed: None,
        }
    }
}

/// Application context owning the forum, the game and the theme, plus the
/// view state the page kept in the DOM.
pub struct ForumApp {
    forum: ForumStore,
    game: TicTacToe,
    theme: ThemeSwitcher,
    current_post: Option<PostId>,
    delete_mode: bool,
}

impl ForumApp {
    /// Loads posts and the persisted theme from `storage`.
    pub fn open(storage: Storage, options: AppOptions) -> Result<Self, ForumError> {
        let forum = ForumStore::load(storage.clone())?;
        let mut theme = ThemeSwitcher::new(storage);
        theme.load_theme()?;
        let game = match options.opponent_seed {
            Some(seed) => TicTacToe::with_seed(options.opponent_delay, seed),
            None => TicTacToe::new(options.opponent_delay),
        };

        Ok(Self {
            forum,
            game,
            theme,
            current_post: None,
            delete_mode: false,
        })
    }

    pub fn forum(&self) -> &ForumStore {
        &self.forum
    }

    pub fn game(&self) -> &TicTacToe {
        &self.game
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme.applied()
    }

    pub fn current_post(&self) -> Option<PostId> {
        self.current_post
    }

    pub fn delete_mode(&self) -> bool {
        self.delete_mode
    }

    pub fn apply(&mut self, command: Command) -> Result<Vec<ForumEvent>, ForumError> {
        debug!(command = command_name(&command), "applying command");
        match command {
            Command::CreatePost {
                title,
                content,
                tag,
                image,
            } => {
                let post_id = self
                    .forum
                    .create_post(NewPost {
                        title,
                        content,
                        tag,
                        image,
                    })?
                    .id;
                Ok(vec![
                    ForumEvent::PostCreated { post_id },
                    self.render_posts(None),
                ])
            }
            Command::ListPosts { filter } => Ok(vec![self.render_posts(filter)]),
            Command::ViewPost { post_id } => {
                let post = self.forum.get_post(post_id)?;
                let events = vec![render_post(post), self.render_comments(post)];
                self.current_post = Some(post_id);
                Ok(events)
            }
            Command::BackToPosts => {
                let mut events = Vec::new();
                self.current_post = None;
                if self.delete_mode {
                    self.delete_mode = false;
                    events.push(ForumEvent::DeleteModeChanged { enabled: false });
                }
                events.push(self.render_posts(None));
                Ok(events)
            }
            Command::LikePost { post_id } => {
                let outcome = self.forum.like_post(post_id)?;
                let mut events = Vec::new();
                if self.current_post == Some(post_id) {
                    events.push(render_post(self.forum.get_post(post_id)?));
                } else {
                    events.push(self.render_posts(None));
                }
                if outcome.celebrate {
                    events.push(ForumEvent::Celebration {
                        post_id,
                        likes: outcome.likes,
                        display_ms: CELEBRATION_DISPLAY_MS,
                    });
                }
                Ok(events)
            }
            Command::AddComment { post_id, text } => {
                let post_id = self.comment_target(post_id)?;
                self.forum.add_comment(post_id, &text)?;
                Ok(vec![self.render_comments(self.forum.get_post(post_id)?)])
            }
            Command::DeleteComment { post_id, index } => {
                let post_id = self.comment_target(post_id)?;
                self.forum.delete_comment(post_id, index)?;
                Ok(vec![self.render_comments(self.forum.get_post(post_id)?)])
            }
            Command::DeletePost { post_id } => {
                let mut events = Vec::new();
                if self.forum.delete_post(post_id)? {
                    events.push(ForumEvent::PostDeleted { post_id });
                }
                if self.current_post == Some(post_id) {
                    self.current_post = None;
                }
                if self.current_post.is_none() {
                    events.push(self.render_posts(None));
                }
                Ok(events)
            }
            Command::ToggleDeleteMode => {
                self.delete_mode = !self.delete_mode;
                let mut events = vec![ForumEvent::DeleteModeChanged {
                    enabled: self.delete_mode,
                }];
                match self.current_post {
                    Some(post_id) => {
                        events.push(self.render_comments(self.forum.get_post(post_id)?))
                    }
                    None => events.push(self.render_posts(None)),
                }
                Ok(events)
            }
            Command::ToggleGame => {
                let open = self.game.toggle();
                let mut events = vec![ForumEvent::GameVisibility { open }];
                if open {
                    events.push(self.board_updated());
                }
                Ok(events)
            }
            Command::PlayMove { cell } => {
                let result = self.game.play(cell);
                Ok(self.move_events(cell, result))
            }
            Command::ResolveOpponent { ticket } => {
                let result = self.game.resolve_opponent(ticket);
                Ok(self.move_events(ticket.cell, result))
            }
            Command::ResetGame => {
                if !self.game.is_open() {
                    debug!("game is closed; ignoring reset");
                    return Ok(Vec::new());
                }
                self.game.reset();
                Ok(vec![self.board_updated()])
            }
            Command::SetTheme { name } => {
                let theme = self.theme.set_theme(&name)?;
                Ok(vec![ForumEvent::ThemeApplied { theme }])
            }
            Command::LoadTheme => Ok(self
                .theme
                .load_theme()?
                .map(|theme| ForumEvent::ThemeApplied { theme })
                .into_iter()
                .collect()),
            Command::Join => Ok(vec![ForumEvent::Notice(WELCOME_NOTICE.to_string())]),
        }
    }

    fn comment_target(&self, post_id: Option<PostId>) -> Result<PostId, ForumError> {
        post_id
            .or(self.current_post)
            .ok_or_else(|| ForumError::not_found("no post is open"))
    }

    fn render_posts(&self, filter: Option<String>) -> ForumEvent {
        let posts = self
            .forum
            .list_posts(filter.as_deref())
            .into_iter()
            .map(summarize)
            .collect();
        ForumEvent::PostsRendered(PostListView {
            posts,
            filter,
            delete_controls: self.delete_mode,
        })
    }

    fn render_comments(&self, post: &Post) -> ForumEvent {
        ForumEvent::CommentsRendered(CommentsView {
            post_id: post.id,
            comments: post
                .comments
                .iter()
                .enumerate()
                .map(|(index, comment)| CommentView {
                    index,
                    text: comment.text.clone(),
                    created_at: comment.created_at,
                })
                .collect(),
            delete_controls: self.delete_mode,
        })
    }

    fn board_updated(&self) -> ForumEvent {
        ForumEvent::BoardUpdated {
            board: *self.game.board(),
            to_move: Some(self.game.to_move()),
        }
    }

    fn move_events(&self, cell: usize, result: MoveResult) -> Vec<ForumEvent> {
        match result {
            MoveResult::Ignored(reason) => vec![ForumEvent::MoveIgnored { cell, reason }],
            MoveResult::Continued { opponent } => {
                let mut events = vec![self.board_updated()];
                events.extend(opponent.map(ForumEvent::OpponentScheduled));
                events
            }
            MoveResult::Finished {
                outcome,
                final_board,
            } => vec![
                ForumEvent::BoardUpdated {
                    board: final_board,
                    to_move: None,
                },
                ForumEvent::GameOver(outcome),
                self.board_updated(),
            ],
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::CreatePost { .. } => "create_post",
        Command::ListPosts { .. } => "list_posts",
        Command::ViewPost { .. } => "view_post",
        Command::BackToPosts => "back_to_posts",
        Command::LikePost { .. } => "like_post",
        Command::AddComment { .. } => "add_comment",
        Command::DeleteComment { .. } => "delete_comment",
        Command::DeletePost { .. } => "delete_post",
        Command::ToggleDeleteMode => "toggle_delete_mode",
        Command::ToggleGame => "toggle_game",
        Command::PlayMove { .. } => "play_move",
        Command::ResolveOpponent { .. } => "resolve_opponent",
        Command::ResetGame => "reset_game",
        Command::SetTheme { .. } => "set_theme",
        Command::LoadTheme => "load_theme",
        Command::Join => "join",
    }
}

fn tag_label(post: &Post) -> String {
    post.tag.clone().unwrap_or_else(|| NO_TAG_LABEL.to_string())
}

fn summarize(post: &Post) -> PostSummary {
    let excerpt: String = post.content.chars().take(EXCERPT_CHARS).collect();
    PostSummary {
        post_id: post.id,
        title: post.title.clone(),
        excerpt: format!("{excerpt}..."),
        tag_label: tag_label(post),
        likes: post.likes,
        created_at: post.created_at,
    }
}

fn render_post(post: &Post) -> ForumEvent {
    ForumEvent::PostRendered(PostView {
        post_id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        tag_label: tag_label(post),
        image: post.image.clone(),
        likes: post.likes,
        created_at: post.created_at,
    })
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
