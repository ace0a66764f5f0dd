//! App Core for Smartmarks.
//!
//! Central struct wiring the store, the change hub, and the identity
//! provider, plus the registry of currently mounted dashboard sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::managers::bookmark_store::{BookmarkStore, SqliteBookmarkStore};
use crate::managers::dashboard::{DashboardHandle, DashboardSession};
use crate::services::change_hub::ChangeHub;
use crate::services::identity::IdentityProvider;
use crate::types::errors::AuthError;

/// One mounted dashboard: its command handle plus the session task, kept so
/// unmounting can wait for the subscription to be released.
struct Mount {
    handle: DashboardHandle,
    task: JoinHandle<()>,
}

/// Central application struct.
///
/// Dashboards are mounted per view (a browser tab, a window) and addressed
/// by a mount id; every mount for the same user converges on the same store
/// state through the change hub.
pub struct App {
    pub db: Arc<Database>,
    pub store: Arc<SqliteBookmarkStore>,
    pub hub: Arc<ChangeHub>,
    pub identity: Arc<dyn IdentityProvider>,
    mounts: Mutex<HashMap<String, Mount>>,
}

impl App {
    /// Creates a new App backed by a SQLite database at `db_path`.
    pub fn new(
        db_path: &str,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::with_database(db, identity))
    }

    /// Creates a new App over an in-memory database, for demos and tests.
    pub fn in_memory(
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self::with_database(db, identity))
    }

    fn with_database(db: Arc<Database>, identity: Arc<dyn IdentityProvider>) -> Self {
        let hub = Arc::new(ChangeHub::new());
        let store = Arc::new(SqliteBookmarkStore::new(db.clone(), hub.clone()));
        Self {
            db,
            store,
            hub,
            identity,
            mounts: Mutex::new(HashMap::new()),
        }
    }

    /// Mounts a dashboard for the current user.
    ///
    /// Returns the new mount id together with a handle to the session.
    /// Fails only if no user is authenticated.
    pub async fn mount_dashboard(&self) -> Result<(String, DashboardHandle), AuthError> {
        let user = self.identity.current_user()?;
        let store: Arc<dyn BookmarkStore> = self.store.clone();
        let (handle, task) = DashboardSession::mount(store, &self.hub, user).await;
        let mount_id = Uuid::new_v4().to_string();
        self.lock_mounts().insert(
            mount_id.clone(),
            Mount {
                handle: handle.clone(),
                task,
            },
        );
        Ok((mount_id, handle))
    }

    /// Returns a handle to a mounted dashboard, if the mount id is live.
    pub fn dashboard(&self, mount_id: &str) -> Option<DashboardHandle> {
        self.lock_mounts()
            .get(mount_id)
            .map(|mount| mount.handle.clone())
    }

    /// Unmounts a dashboard and waits for its session task to exit, which
    /// releases the change subscription. Returns false for an unknown mount
    /// id. Handle clones held elsewhere keep the session alive until they
    /// are dropped too.
    pub async fn unmount_dashboard(&self, mount_id: &str) -> bool {
        let mount = self.lock_mounts().remove(mount_id);
        match mount {
            Some(mount) => {
                drop(mount.handle);
                let _ = mount.task.await;
                true
            }
            None => false,
        }
    }

    /// Number of currently mounted dashboards.
    pub fn mounted(&self) -> usize {
        self.lock_mounts().len()
    }

    fn lock_mounts(&self) -> MutexGuard<'_, HashMap<String, Mount>> {
        self.mounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
