use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::debug;

use agora_types::models::{LikeTarget, ToggleState};

use crate::queries::row_exists;
use crate::{Database, StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub state: ToggleState,
    pub like_count: i64,
}

/// Table holding the target's counter, and the like column pointing at it.
fn sql_names(target: LikeTarget) -> (&'static str, &'static str) {
    match target {
        LikeTarget::Post(_) => ("posts", "post_id"),
        LikeTarget::Comment(_) => ("comments", "comment_id"),
    }
}

impl Database {
    /// Flip `user_id`'s like on `target` and adjust the target's counter.
    ///
    /// Runs as a single IMMEDIATE transaction: the existence check, the like
    /// row and the counter either all change or none do. The unique index on
    /// `(user_id, target)` decides which way the toggle goes, so two racing
    /// toggles from the same user can never both insert.
    pub fn toggle_like(&self, user_id: i64, target: LikeTarget) -> StoreResult<ToggleOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let outcome = toggle_in(&tx, user_id, target)?;
            tx.commit()?;

            debug!(user_id, %target, state = ?outcome.state, like_count = outcome.like_count, "like toggled");
            Ok(outcome)
        })
    }

    /// Number of like rows referencing `target`.
    pub fn count_likes(&self, target: LikeTarget) -> StoreResult<i64> {
        let (_, column) = sql_names(target);
        self.with_conn(|conn| {
            let count = conn.query_row(
                &format!("SELECT COUNT(*) FROM likes WHERE {column} = ?1"),
                [target.id()],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    pub fn has_liked(&self, user_id: i64, target: LikeTarget) -> StoreResult<bool> {
        let (_, column) = sql_names(target);
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    &format!("SELECT 1 FROM likes WHERE user_id = ?1 AND {column} = ?2"),
                    params![user_id, target.id()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            Ok(found)
        })
    }
}

fn toggle_in(conn: &Connection, user_id: i64, target: LikeTarget) -> StoreResult<ToggleOutcome> {
    let (table, column) = sql_names(target);
    let target_id = target.id();

    if !row_exists(conn, table, target_id)? {
        return Err(StoreError::NotFound(target.kind()));
    }

    let inserted = conn.execute(
        &format!("INSERT INTO likes (user_id, {column}) VALUES (?1, ?2) ON CONFLICT DO NOTHING"),
        params![user_id, target_id],
    )?;

    let (state, delta) = if inserted == 1 {
        (ToggleState::Added, 1)
    } else {
        conn.execute(
            &format!("DELETE FROM likes WHERE user_id = ?1 AND {column} = ?2"),
            params![user_id, target_id],
        )?;
        (ToggleState::Removed, -1)
    };

    let like_count = conn.query_row(
        &format!("UPDATE {table} SET like_count = like_count + ?1 WHERE id = ?2 RETURNING like_count"),
        params![delta, target_id],
        |row| row.get(0),
    )?;

    Ok(ToggleOutcome { state, like_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_names_follow_the_target_arm() {
        assert_eq!(sql_names(LikeTarget::Post(1)), ("posts", "post_id"));
        assert_eq!(sql_names(LikeTarget::Comment(1)), ("comments", "comment_id"));
    }
}
