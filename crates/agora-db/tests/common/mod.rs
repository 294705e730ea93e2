#![allow(dead_code)]

use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use agora_db::Database;

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// A database file in the temp dir, removed again on drop.
pub struct TestDb {
    db: Database,
    path: PathBuf,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "agora_db_test_{}_{}_{}.db",
            name,
            std::process::id(),
            n
        ));
        let _ = fs::remove_file(&path);
        let db = Database::open(&path).unwrap();
        Self { db, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user(&self, nickname: &str) -> i64 {
        self.db
            .create_user(nickname, &format!("{nickname}@example.com"), "not-a-real-hash")
            .unwrap()
            .id
    }
}

impl Deref for TestDb {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = fs::remove_file(p);
        }
    }
}
