//! Database row types. These map directly to SQLite rows and convert into the
//! agora-types API models on the way out.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use agora_types::models::{Comment, Post, User};

pub(crate) const USER_COLUMNS: &str = "id, nickname, email, password_hash";
pub(crate) const POST_COLUMNS: &str =
    "id, author_id, content, like_count, comment_count, created_at";
pub(crate) const COMMENT_COLUMNS: &str =
    "id, author_id, post_id, content, like_count, created_at";

#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug)]
pub struct PostRow {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CommentRow {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            nickname: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
        })
    }
}

impl PostRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author_id: row.get(1)?,
            content: row.get(2)?,
            like_count: row.get(3)?,
            comment_count: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl CommentRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author_id: row.get(1)?,
            post_id: row.get(2)?,
            content: row.get(3)?,
            like_count: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
        }
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            content: row.content,
            like_count: row.like_count,
            comment_count: row.comment_count,
            created_at: row.created_at,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            post_id: row.post_id,
            content: row.content,
            like_count: row.like_count,
            created_at: row.created_at,
        }
    }
}
