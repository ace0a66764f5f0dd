//! Bookmark Store for Smartmarks.
//!
//! Implements `BookmarkStore`: the persistent system of record for bookmark
//! rows, backed by SQLite via `rusqlite`. Committed mutations are published
//! to the [`ChangeHub`] so every mounted dashboard converges on store state.

use rusqlite::params;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::database::Database;
use crate::services::change_hub::ChangeHub;
use crate::types::bookmark::Bookmark;
use crate::types::errors::StoreError;
use crate::types::event::BookmarkChange;

/// Trait defining the persistent bookmark store operations.
///
/// Calls are synchronous; async callers run them on a blocking worker
/// thread. Implementations must be shareable across sessions.
pub trait BookmarkStore: Send + Sync {
    /// Inserts a validated draft for `user_id` and returns the committed row,
    /// with its store-assigned id and creation timestamp.
    fn insert_row(&self, user_id: &str, title: &str, url: &str) -> Result<Bookmark, StoreError>;

    /// Deletes `user_id`'s row with the given id. Rows owned by other users
    /// are left untouched; deleting an absent or foreign id succeeds and
    /// publishes nothing.
    fn delete_row(&self, user_id: &str, id: &str) -> Result<(), StoreError>;

    /// Returns all of `user_id`'s rows, newest first.
    fn select_rows(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError>;
}

/// Bookmark store backed by a shared SQLite database.
///
/// Change events are published while the connection lock is still held, so
/// subscribers observe a user's changes in commit order.
pub struct SqliteBookmarkStore {
    db: Arc<Database>,
    hub: Arc<ChangeHub>,
    last_created_at: AtomicI64,
}

impl SqliteBookmarkStore {
    /// Creates a store over the given database, publishing changes to `hub`.
    pub fn new(db: Arc<Database>, hub: Arc<ChangeHub>) -> Self {
        Self {
            db,
            hub,
            last_created_at: AtomicI64::new(0),
        }
    }

    /// Returns a creation timestamp in unix milliseconds, strictly greater
    /// than any timestamp this store has handed out before.
    ///
    /// Must be called with the connection lock held; the lock serializes
    /// updates, which keeps `ORDER BY created_at DESC` a total order even
    /// for inserts landing within the same millisecond.
    fn next_created_at(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;
        let prev = self.last_created_at.load(Ordering::Relaxed);
        let next = now.max(prev + 1);
        self.last_created_at.store(next, Ordering::Relaxed);
        next
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl BookmarkStore for SqliteBookmarkStore {
    fn insert_row(&self, user_id: &str, title: &str, url: &str) -> Result<Bookmark, StoreError> {
        let conn = self.db.connection();
        let row = Bookmark {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            created_at: self.next_created_at(),
        };
        conn.execute(
            "INSERT INTO bookmarks (id, user_id, title, url, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.id, row.user_id, row.title, row.url, row.created_at],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        // Published before the lock is released: per-user delivery order
        // therefore matches commit order.
        self.hub
            .publish(user_id, BookmarkChange::Inserted(row.clone()));
        Ok(row)
    }

    fn delete_row(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        let conn = self.db.connection();
        // The delete is scoped to the owner: a session can never reach
        // another user's rows, whatever id it passes.
        let affected = conn
            .execute(
                "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        // Absent or foreign row: nothing was deleted, nothing to notify.
        if affected == 0 {
            return Ok(());
        }

        self.hub
            .publish(user_id, BookmarkChange::Deleted { id: id.to_string() });
        Ok(())
    }

    fn select_rows(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, title, url, created_at FROM bookmarks
                 WHERE user_id = ?1 ORDER BY created_at DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![user_id], Self::row_to_bookmark)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut bookmarks = Vec::new();
        for row in rows {
            bookmarks.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(bookmarks)
    }
}
