use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        let tx = conn.transaction()?;
        tx.execute_batch(
            "
            CREATE TABLE users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                nickname        TEXT NOT NULL,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL
            );

            CREATE TABLE posts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                content         TEXT NOT NULL,
                like_count      INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0),
                comment_count   INTEGER NOT NULL DEFAULT 0 CHECK (comment_count >= 0),
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_posts_author ON posts(author_id);

            CREATE TABLE comments (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                post_id         INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                content         TEXT NOT NULL,
                like_count      INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0),
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_comments_post ON comments(post_id, created_at);
            CREATE INDEX idx_comments_author ON comments(author_id);

            -- Exactly one of post_id / comment_id is set.
            CREATE TABLE likes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                post_id         INTEGER REFERENCES posts(id) ON DELETE CASCADE,
                comment_id      INTEGER REFERENCES comments(id) ON DELETE CASCADE,
                CHECK ((post_id IS NULL) <> (comment_id IS NULL)),
                UNIQUE (user_id, post_id),
                UNIQUE (user_id, comment_id)
            );

            CREATE INDEX idx_likes_post ON likes(post_id);
            CREATE INDEX idx_likes_comment ON likes(comment_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
        tx.commit()?;
    }

    info!("Database migrations complete");
    Ok(())
}
