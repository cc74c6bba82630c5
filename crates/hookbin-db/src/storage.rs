//! Storage handle shared by the ingest and query paths

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::StoreError;

/// Handle to the webhook table
///
/// Cloning is cheap; clones share the connection pool and the write lock.
/// Every write goes through [`Storage::lock_writes`], which serializes id
/// allocation, timestamping and deletes within the process.
#[derive(Clone)]
pub struct Storage {
    db: DatabaseConnection,
    /// Last `created_at` handed out, guarded by the write lock
    write_lock: Arc<Mutex<i64>>,
}

impl Storage {
    /// Connect, create the data directory and schema if absent
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        if let Some(path) = sqlite_file_path(database_url) {
            ensure_parent_dir(&path)?;
        }

        let db = crate::connect(database_url).await?;
        crate::migrate(&db).await?;

        Ok(Self::from_connection(db))
    }

    /// Wrap a connection that already has the schema applied
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(0)),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await?;
        Ok(())
    }

    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, i64> {
        self.write_lock.lock().await
    }

    /// Store-local clock in milliseconds since the Unix epoch
    pub fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("backend", &self.db.get_database_backend())
            .finish()
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }

    info!("Creating data directory {}", parent.display());
    std::fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
        path: parent.to_path_buf(),
        source,
    })
}

/// Path and parameters of a SQLite URL, `None` for other backends
fn split_sqlite_url(database_url: &str) -> Option<(&str, Option<&str>)> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;

    Some(match rest.split_once('?') {
        Some((path, params)) => (path, Some(params)),
        None => (rest, None),
    })
}

/// Whether the URL names an in-memory SQLite database
pub(crate) fn is_sqlite_memory_url(database_url: &str) -> bool {
    let Some((path, params)) = split_sqlite_url(database_url) else {
        return false;
    };

    path.is_empty()
        || path == ":memory:"
        || params.is_some_and(|p| p.split('&').any(|kv| kv == "mode=memory"))
}

/// File path behind a SQLite URL, `None` for in-memory or non-SQLite URLs
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    if is_sqlite_memory_url(database_url) {
        return None;
    }
    let (path, _) = split_sqlite_url(database_url)?;

    debug!("SQLite database file: {}", path);
    Some(PathBuf::from(path))
}
