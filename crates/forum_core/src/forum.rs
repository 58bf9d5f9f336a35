use chrono::Utc;
use shared::{
    domain::{Comment, Post, PostId, CELEBRATION_MILESTONE},
    error::ForumError,
};
use storage::{LoadedPosts, Storage};
use tracing::{debug, info, warn};

use crate::storage_error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tag: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub likes: u64,
    pub celebrate: bool,
}

/// Post collection backed by the posts key. Every mutation works on a staged
/// copy and only replaces the live collection once the copy is persisted.
pub struct ForumStore {
    storage: Storage,
    posts: Vec<Post>,
}

impl ForumStore {
    /// Loads the persisted collection. A value that fails to decode is
    /// treated as an empty collection; it is replaced on the next mutation.
    pub fn load(storage: Storage) -> Result<Self, ForumError> {
        let posts = match storage.load_posts().map_err(storage_error)? {
            LoadedPosts::Fresh => Vec::new(),
            LoadedPosts::Restored(posts) => posts,
            LoadedPosts::Corrupt(error) => {
                warn!(%error, "persisted posts are unreadable; starting with an empty forum");
                Vec::new()
            }
        };
        debug!(count = posts.len(), "loaded posts");
        Ok(Self { storage, posts })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn create_post(&mut self, new_post: NewPost) -> Result<&Post, ForumError> {
        let NewPost {
            title,
            content,
            tag,
            image,
        } = new_post;

        if title.is_empty() || content.is_empty() {
            return Err(ForumError::validation("Please enter a title and content"));
        }

        let created_at = Utc::now();
        let id = self.next_id(created_at.timestamp_millis());
        let post = Post {
            id,
            title,
            content,
            tag: tag.filter(|tag| !tag.trim().is_empty()),
            image: image.filter(|image| !image.is_empty()),
            likes: 0,
            created_at,
            comments: Vec::new(),
        };

        let mut posts = self.posts.clone();
        posts.push(post);
        self.commit(posts)?;
        info!(post_id = id.0, "created post");
        Ok(&self.posts[self.posts.len() - 1])
    }

    /// Posts newest first, optionally narrowed to those whose title, content
    /// or tag contains `filter` (case-insensitive).
    pub fn list_posts(&self, filter: Option<&str>) -> Vec<&Post> {
        let needle = filter
            .map(str::to_lowercase)
            .filter(|needle| !needle.is_empty());

        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|post| needle.as_deref().map_or(true, |needle| post.matches(needle)))
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }

    pub fn get_post(&self, post_id: PostId) -> Result<&Post, ForumError> {
        self.posts
            .iter()
            .find(|post| post.id == post_id)
            .ok_or_else(|| ForumError::post_not_found(post_id))
    }

    pub fn like_post(&mut self, post_id: PostId) -> Result<LikeOutcome, ForumError> {
        let mut posts = self.posts.clone();
        let post = find_mut(&mut posts, post_id)?;
        post.likes += 1;
        let likes = post.likes;
        self.commit(posts)?;

        let celebrate = likes % CELEBRATION_MILESTONE == 0;
        if celebrate {
            info!(post_id = post_id.0, likes, "like milestone reached");
        }
        Ok(LikeOutcome { likes, celebrate })
    }

    pub fn add_comment(&mut self, post_id: PostId, text: &str) -> Result<&Comment, ForumError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ForumError::validation("Please enter a comment"));
        }

        let mut posts = self.posts.clone();
        let post = find_mut(&mut posts, post_id)?;
        post.comments.push(Comment {
            text: text.to_string(),
            created_at: Utc::now(),
        });
        let index = post.comments.len() - 1;
        self.commit(posts)?;
        info!(post_id = post_id.0, index, "added comment");

        let post = self.get_post(post_id)?;
        Ok(&post.comments[index])
    }

    /// Returns `false` without touching the store when `index` is out of range.
    pub fn delete_comment(&mut self, post_id: PostId, index: usize) -> Result<bool, ForumError> {
        if index >= self.get_post(post_id)?.comments.len() {
            debug!(post_id = post_id.0, index, "comment index out of range; ignoring");
            return Ok(false);
        }

        let mut posts = self.posts.clone();
        find_mut(&mut posts, post_id)?.comments.remove(index);
        self.commit(posts)?;
        info!(post_id = post_id.0, index, "deleted comment");
        Ok(true)
    }

    /// Returns `false` when no post has this id.
    pub fn delete_post(&mut self, post_id: PostId) -> Result<bool, ForumError> {
        if self.get_post(post_id).is_err() {
            debug!(post_id = post_id.0, "no such post; nothing deleted");
            return Ok(false);
        }

        let posts = self
            .posts
            .iter()
            .filter(|post| post.id != post_id)
            .cloned()
            .collect();
        self.commit(posts)?;
        info!(post_id = post_id.0, "deleted post");
        Ok(true)
    }

    // Millisecond timestamps collide when two posts land in the same
    // millisecond; step past the largest id in use instead.
    fn next_id(&self, now_millis: i64) -> PostId {
        let max_existing = self.posts.iter().map(|post| post.id.0).max();
        match max_existing {
            Some(max) if max >= now_millis => PostId(max + 1),
            _ => PostId(now_millis),
        }
    }

    fn commit(&mut self, posts: Vec<Post>) -> Result<(), ForumError> {
        self.storage.save_posts(&posts).map_err(storage_error)?;
        self.posts = posts;
        Ok(())
    }
}

fn find_mut(posts: &mut [Post], post_id: PostId) -> Result<&mut Post, ForumError> {
    posts
        .iter_mut()
        .find(|post| post.id == post_id)
        .ok_or_else(|| ForumError::post_not_found(post_id))
}
