use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::debug;

use agora_types::ownership::authorize;

use crate::models::{COMMENT_COLUMNS, CommentRow, POST_COLUMNS, PostRow, USER_COLUMNS, UserRow};
use crate::{Database, StoreError, StoreResult};

/// Fields of a self-service profile update. `None` leaves the column as is.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub password_hash: Option<String>,
}

impl Database {
    // -- Users --

    pub fn create_user(&self, nickname: &str, email: &str, password_hash: &str) -> StoreResult<UserRow> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO users (nickname, email, password_hash) VALUES (?1, ?2, ?3)
                     RETURNING {USER_COLUMNS}"
                ),
                params![nickname, email, password_hash],
                UserRow::from_row,
            )
            .map_err(email_conflict)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                    [email],
                    UserRow::from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                    [id],
                    UserRow::from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn update_user(&self, id: i64, changes: &UserChanges) -> StoreResult<UserRow> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE users SET
                        email = COALESCE(?2, email),
                        nickname = COALESCE(?3, nickname),
                        password_hash = COALESCE(?4, password_hash)
                     WHERE id = ?1
                     RETURNING {USER_COLUMNS}"
                ),
                params![id, changes.email, changes.nickname, changes.password_hash],
                UserRow::from_row,
            )
            .optional()
            .map_err(email_conflict)?
            .ok_or(StoreError::NotFound("user"))
        })
    }

    /// Delete a user together with everything they own. Likes the user gave
    /// are released from the counters of targets that survive, and comments
    /// they left on other people's posts are subtracted from those posts.
    pub fn delete_user(&self, id: i64) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !row_exists(&tx, "users", id)? {
                return Err(StoreError::NotFound("user"));
            }

            // Likes given by the user
            tx.execute(
                "UPDATE posts SET like_count = like_count
                    - (SELECT COUNT(*) FROM likes l WHERE l.post_id = posts.id AND l.user_id = ?1)
                 WHERE id IN (SELECT post_id FROM likes WHERE user_id = ?1 AND post_id IS NOT NULL)",
                [id],
            )?;
            tx.execute(
                "UPDATE comments SET like_count = like_count
                    - (SELECT COUNT(*) FROM likes l WHERE l.comment_id = comments.id AND l.user_id = ?1)
                 WHERE id IN (SELECT comment_id FROM likes WHERE user_id = ?1 AND comment_id IS NOT NULL)",
                [id],
            )?;
            tx.execute("DELETE FROM likes WHERE user_id = ?1", [id])?;

            // The user's posts and everything hanging off them
            tx.execute(
                "DELETE FROM likes
                 WHERE post_id IN (SELECT id FROM posts WHERE author_id = ?1)
                    OR comment_id IN (
                        SELECT c.id FROM comments c JOIN posts p ON c.post_id = p.id
                        WHERE p.author_id = ?1
                    )",
                [id],
            )?;
            tx.execute(
                "DELETE FROM comments WHERE post_id IN (SELECT id FROM posts WHERE author_id = ?1)",
                [id],
            )?;
            let posts = tx.execute("DELETE FROM posts WHERE author_id = ?1", [id])?;

            // Comments left on other people's posts
            tx.execute(
                "DELETE FROM likes WHERE comment_id IN (SELECT id FROM comments WHERE author_id = ?1)",
                [id],
            )?;
            tx.execute(
                "UPDATE posts SET comment_count = comment_count
                    - (SELECT COUNT(*) FROM comments c WHERE c.post_id = posts.id AND c.author_id = ?1)
                 WHERE id IN (SELECT post_id FROM comments WHERE author_id = ?1)",
                [id],
            )?;
            let comments = tx.execute("DELETE FROM comments WHERE author_id = ?1", [id])?;

            tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            tx.commit()?;

            debug!(user_id = id, posts, comments, "user deleted");
            Ok(())
        })
    }

    // -- Posts --

    pub fn create_post(&self, author_id: i64, content: &str) -> StoreResult<PostRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO posts (author_id, content, created_at) VALUES (?1, ?2, ?3)
                     RETURNING {POST_COLUMNS}"
                ),
                params![author_id, content, Utc::now()],
                PostRow::from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_post(&self, id: i64) -> StoreResult<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    pub fn update_post(&self, acting_user: i64, id: i64, content: &str) -> StoreResult<PostRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let post = query_post(&tx, id)?.ok_or(StoreError::NotFound("post"))?;
            ensure_owner(acting_user, post.author_id, "post")?;

            let row = tx.query_row(
                &format!("UPDATE posts SET content = ?2 WHERE id = ?1 RETURNING {POST_COLUMNS}"),
                params![id, content],
                PostRow::from_row,
            )?;
            tx.commit()?;
            Ok(row)
        })
    }

    /// Delete a post, its comments and every like on either, as one unit.
    /// Returns the post as it was before removal.
    pub fn delete_post(&self, acting_user: i64, id: i64) -> StoreResult<PostRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let post = query_post(&tx, id)?.ok_or(StoreError::NotFound("post"))?;
            ensure_owner(acting_user, post.author_id, "post")?;

            tx.execute(
                "DELETE FROM likes
                 WHERE post_id = ?1
                    OR comment_id IN (SELECT id FROM comments WHERE post_id = ?1)",
                [id],
            )?;
            let comments = tx.execute("DELETE FROM comments WHERE post_id = ?1", [id])?;
            tx.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            tx.commit()?;

            debug!(post_id = id, comments, "post deleted");
            Ok(post)
        })
    }

    // -- Comments --

    pub fn create_comment(&self, author_id: i64, post_id: i64, content: &str) -> StoreResult<CommentRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !row_exists(&tx, "posts", post_id)? {
                return Err(StoreError::NotFound("post"));
            }

            let row = tx.query_row(
                &format!(
                    "INSERT INTO comments (author_id, post_id, content, created_at) VALUES (?1, ?2, ?3, ?4)
                     RETURNING {COMMENT_COLUMNS}"
                ),
                params![author_id, post_id, content, Utc::now()],
                CommentRow::from_row,
            )?;
            tx.execute(
                "UPDATE posts SET comment_count = comment_count + 1 WHERE id = ?1",
                [post_id],
            )?;
            tx.commit()?;
            Ok(row)
        })
    }

    pub fn get_comment(&self, id: i64) -> StoreResult<Option<CommentRow>> {
        self.with_conn(|conn| query_comment(conn, id))
    }

    /// Comments of a post, oldest first.
    pub fn list_comments(&self, post_id: i64) -> StoreResult<Vec<CommentRow>> {
        self.with_conn(|conn| {
            if !row_exists(conn, "posts", post_id)? {
                return Err(StoreError::NotFound("post"));
            }

            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map([post_id], CommentRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_comment(&self, acting_user: i64, id: i64, content: &str) -> StoreResult<CommentRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let comment = query_comment(&tx, id)?.ok_or(StoreError::NotFound("comment"))?;
            ensure_owner(acting_user, comment.author_id, "comment")?;

            let row = tx.query_row(
                &format!("UPDATE comments SET content = ?2 WHERE id = ?1 RETURNING {COMMENT_COLUMNS}"),
                params![id, content],
                CommentRow::from_row,
            )?;
            tx.commit()?;
            Ok(row)
        })
    }

    pub fn delete_comment(&self, acting_user: i64, id: i64) -> StoreResult<CommentRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let comment = query_comment(&tx, id)?.ok_or(StoreError::NotFound("comment"))?;
            ensure_owner(acting_user, comment.author_id, "comment")?;

            tx.execute("DELETE FROM likes WHERE comment_id = ?1", [id])?;
            tx.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            tx.execute(
                "UPDATE posts SET comment_count = comment_count - 1 WHERE id = ?1",
                [comment.post_id],
            )?;
            tx.commit()?;
            Ok(comment)
        })
    }
}

fn ensure_owner(acting_user: i64, owner: i64, kind: &'static str) -> StoreResult<()> {
    if authorize(acting_user, owner).is_allowed() {
        Ok(())
    } else {
        Err(StoreError::Forbidden(kind))
    }
}

/// `table` is always one of our own table names, never caller input.
pub(crate) fn row_exists(conn: &Connection, table: &str, id: i64) -> StoreResult<bool> {
    let exists = conn
        .query_row(&format!("SELECT 1 FROM {table} WHERE id = ?1"), [id], |_| Ok(()))
        .optional()?
        .is_some();
    Ok(exists)
}

fn email_conflict(err: rusqlite::Error) -> StoreError {
    match StoreError::from(err) {
        StoreError::Conflict(_) => StoreError::Conflict("email already registered".into()),
        other => other,
    }
}

fn query_post(conn: &Connection, id: i64) -> StoreResult<Option<PostRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
            [id],
            PostRow::from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_comment(conn: &Connection, id: i64) -> StoreResult<Option<CommentRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
            [id],
            CommentRow::from_row,
        )
        .optional()?;
    Ok(row)
}
