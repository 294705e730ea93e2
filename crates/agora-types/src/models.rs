use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of an identity. The password hash never leaves agora-db.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// The thing a like points at. A like references exactly one post or exactly
/// one comment, never both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post(i64),
    Comment(i64),
}

impl LikeTarget {
    pub fn id(&self) -> i64 {
        match self {
            Self::Post(id) | Self::Comment(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
        }
    }
}

impl std::fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Result of flipping a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Added,
    Removed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_target_accessors() {
        assert_eq!(LikeTarget::Post(7).id(), 7);
        assert_eq!(LikeTarget::Comment(9).kind(), "comment");
        assert_eq!(LikeTarget::Post(3).to_string(), "post 3");
    }

    #[test]
    fn toggle_state_wire_names() {
        assert_eq!(serde_json::to_string(&ToggleState::Added).unwrap(), "\"added\"");
        assert_eq!(serde_json::to_string(&ToggleState::Removed).unwrap(), "\"removed\"");
    }
}
