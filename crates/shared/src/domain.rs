use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PostId);

/// Likes count at which the view layer shows a celebration; every positive
/// multiple of this value triggers it again.
pub const CELEBRATION_MILESTONE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A forum post as persisted under the posts key.
///
/// Field names match the JSON the original page wrote to local storage, so an
/// exported `darkconverse-posts` value loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<String>,
    /// Embedded image encoded as a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Case-insensitive substring match over title, content and tag.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
            || self
                .tag
                .as_deref()
                .is_some_and(|tag| tag.to_lowercase().contains(needle_lowercase))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

pub const BOARD_CELLS: usize = 9;

pub type Board = [Option<Mark>; BOARD_CELLS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTheme(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_post_json_written_by_the_web_page() {
        let raw = r#"[{"id":1700000000000,"title":"Hi","content":"Body","tag":"","comments":[],"createdAt":"2023-11-14T22:13:20.000Z"}]"#;
        let posts: Vec<Post> = serde_json::from_str(raw).expect("posts");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, PostId(1_700_000_000_000));
        assert_eq!(posts[0].tag, None);
        assert_eq!(posts[0].likes, 0);
        assert!(posts[0].image.is_none());
    }

    #[test]
    fn serializes_camel_case_field_names() {
        let post = Post {
            id: PostId(7),
            title: "t".into(),
            content: "c".into(),
            tag: Some("rust".into()),
            image: None,
            likes: 3,
            created_at: Utc::now(),
            comments: Vec::new(),
        };
        let value = serde_json::to_value(&post).expect("json");
        assert_eq!(value["id"], 7);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("image").is_none());
    }

    #[test]
    fn matches_tag_case_insensitively() {
        let post = Post {
            id: PostId(1),
            title: "title".into(),
            content: "content".into(),
            tag: Some("Gaming".into()),
            image: None,
            likes: 0,
            created_at: Utc::now(),
            comments: Vec::new(),
        };
        assert!(post.matches("gam"));
        assert!(!post.matches("rust"));
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn marks_alternate() {
        assert_eq!(Mark::X.other(), Mark::O);
        assert_eq!(Mark::O.other(), Mark::X);
    }
}
