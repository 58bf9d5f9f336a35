use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct ForumError {
    pub code: ErrorCode,
    pub message: String,
}

impl ForumError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn post_not_found(post_id: PostId) -> Self {
        Self::not_found(format!("post {post_id} not found"))
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Validation and not-found errors are shown to the user as a notice and
    /// leave state untouched.
    pub fn is_user_facing(&self) -> bool {
        matches!(self.code, ErrorCode::Validation | ErrorCode::NotFound)
    }
}
