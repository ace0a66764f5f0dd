//! Dashboard Session for Smartmarks.
//!
//! One mounted dashboard view of one user's bookmarks. Each mount runs a
//! single task that owns the visible [`BookmarkList`]; UI commands, the
//! settlements of in-flight store calls, and remote change notifications are
//! multiplexed onto that task, so every state update is one sequential
//! reducer step and the view never blocks on the store.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::managers::bookmark_list::{BookmarkList, ListSnapshot};
use crate::managers::bookmark_store::BookmarkStore;
use crate::services::change_hub::{ChangeHub, Subscription};
use crate::types::bookmark::Bookmark;
use crate::types::errors::{DashboardError, StoreError, SubscriptionError, ValidationError};
use crate::types::event::BookmarkChange;
use crate::types::user::AuthenticatedUser;

/// Command inbox depth per session.
const COMMAND_BUFFER: usize = 32;

/// Validates and trims a bookmark draft without contacting the store.
///
/// Returns the trimmed `(title, url)` on success. The URL must parse as an
/// absolute URL; bare hostnames like "example.com" are rejected.
pub fn validate_draft(title: &str, url: &str) -> Result<(String, String), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if Url::parse(url).is_err() {
        return Err(ValidationError::InvalidUrl(url.to_string()));
    }
    Ok((title.to_string(), url.to_string()))
}

/// UI commands accepted by a mounted session.
enum Command {
    Create {
        title: String,
        url: String,
        reply: oneshot::Sender<Result<Bookmark, DashboardError>>,
    },
    Delete {
        id: String,
        reply: oneshot::Sender<Result<(), DashboardError>>,
    },
    Snapshot {
        reply: oneshot::Sender<ListSnapshot>,
    },
}

/// Settlement of a store call that was running off-task.
enum Settled {
    Create {
        result: Result<Bookmark, StoreError>,
        reply: oneshot::Sender<Result<Bookmark, DashboardError>>,
    },
    Delete {
        id: String,
        result: Result<(), StoreError>,
        reply: oneshot::Sender<Result<(), DashboardError>>,
    },
}

/// Cloneable handle to a mounted dashboard session.
///
/// All clones address the same session. Dropping the last clone unmounts it:
/// the session task drains, releases its subscription, and exits. Operations
/// on an unmounted session return [`DashboardError::Closed`].
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    user: AuthenticatedUser,
}

impl DashboardHandle {
    /// The user this session is scoped to.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    /// Validates a draft and, if it passes, writes it to the store.
    ///
    /// Resolves once the insert settles: the committed row on success (by
    /// then already prepended to the visible collection), a validation error
    /// without the store having been contacted, or the store's error with
    /// the collection unchanged.
    pub async fn create(&self, title: &str, url: &str) -> Result<Bookmark, DashboardError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Create {
                title: title.to_string(),
                url: url.to_string(),
                reply,
            })
            .await
            .map_err(|_| DashboardError::Closed)?;
        response.await.map_err(|_| DashboardError::Closed)?
    }

    /// Deletes a bookmark by id.
    ///
    /// The entry stays visible, marked in-flight, until the store settles;
    /// a second delete for the same id while one is pending is rejected
    /// with [`DashboardError::DeleteInFlight`]. On store failure the entry
    /// is restored untouched and the delete may be retried.
    pub async fn delete(&self, id: &str) -> Result<(), DashboardError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Delete {
                id: id.to_string(),
                reply,
            })
            .await
            .map_err(|_| DashboardError::Closed)?;
        response.await.map_err(|_| DashboardError::Closed)?
    }

    /// Returns the current visible collection plus in-flight delete marks.
    pub async fn snapshot(&self) -> Result<ListSnapshot, DashboardError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| DashboardError::Closed)?;
        response.await.map_err(|_| DashboardError::Closed)
    }
}

/// The task state behind one mounted dashboard view.
pub struct DashboardSession {
    user: AuthenticatedUser,
    store: Arc<dyn BookmarkStore>,
    list: BookmarkList,
    subscription: Option<Subscription>,
    inbox: mpsc::Receiver<Command>,
    settled_tx: mpsc::Sender<Settled>,
    settled_rx: mpsc::Receiver<Settled>,
}

impl DashboardSession {
    /// Mounts a dashboard for `user`: fetches the initial collection, opens
    /// a user-scoped subscription, and spawns the session task.
    ///
    /// A failed initial fetch is logged and the view starts empty rather
    /// than refusing to mount; the store stays the system of record and
    /// later mutations proceed normally. The returned [`JoinHandle`] can be
    /// awaited (after dropping all handles) to observe unmount completion.
    pub async fn mount(
        store: Arc<dyn BookmarkStore>,
        hub: &ChangeHub,
        user: AuthenticatedUser,
    ) -> (DashboardHandle, JoinHandle<()>) {
        let initial = {
            let store = store.clone();
            let user_id = user.id.clone();
            run_store_op(move || store.select_rows(&user_id)).await
        };
        let items = match initial {
            Ok(rows) => rows,
            Err(e) => {
                error!(user = %user.id, "initial bookmark fetch failed: {}", e);
                Vec::new()
            }
        };
        // Subscribe after the fetch, like the view it models. Changes that
        // land in between are only recovered on remount.
        let subscription = hub.subscribe(&user.id);
        debug!(channel = %subscription.channel(), bookmarks = items.len(), "dashboard mounted");

        let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
        let (settled_tx, settled_rx) = mpsc::channel(COMMAND_BUFFER);
        let session = DashboardSession {
            user: user.clone(),
            store,
            list: BookmarkList::with_items(items),
            subscription: Some(subscription),
            inbox,
            settled_tx,
            settled_rx,
        };
        let task = tokio::spawn(session.run());
        (DashboardHandle { commands, user }, task)
    }

    /// The session loop. Exits when every [`DashboardHandle`] clone has been
    /// dropped; dropping `self` then releases the subscription, and any
    /// still-running store call settles into a closed channel and is never
    /// applied.
    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.inbox.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
                Some(settled) = self.settled_rx.recv() => self.on_settled(settled),
                event = next_change(&mut self.subscription), if self.subscription.is_some() => {
                    self.on_event(event);
                }
            }
        }
        debug!(user = %self.user.id, "dashboard unmounted");
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Create { title, url, reply } => {
                let (title, url) = match validate_draft(&title, &url) {
                    Ok(draft) => draft,
                    Err(e) => {
                        let _ = reply.send(Err(DashboardError::Validation(e)));
                        return;
                    }
                };
                let store = self.store.clone();
                let user_id = self.user.id.clone();
                let settled = self.settled_tx.clone();
                tokio::spawn(async move {
                    let result =
                        run_store_op(move || store.insert_row(&user_id, &title, &url)).await;
                    let _ = settled.send(Settled::Create { result, reply }).await;
                });
            }
            Command::Delete { id, reply } => {
                if !self.list.begin_delete(&id) {
                    let _ = reply.send(Err(DashboardError::DeleteInFlight(id)));
                    return;
                }
                let store = self.store.clone();
                let user_id = self.user.id.clone();
                let settled = self.settled_tx.clone();
                tokio::spawn(async move {
                    let op_id = id.clone();
                    let result = run_store_op(move || store.delete_row(&user_id, &op_id)).await;
                    let _ = settled.send(Settled::Delete { id, result, reply }).await;
                });
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.list.snapshot());
            }
        }
    }

    fn on_settled(&mut self, settled: Settled) {
        match settled {
            Settled::Create { result, reply } => match result {
                Ok(row) => {
                    self.list.apply(&BookmarkChange::Inserted(row.clone()));
                    let _ = reply.send(Ok(row));
                }
                Err(e) => {
                    warn!(user = %self.user.id, "bookmark create failed: {}", e);
                    let _ = reply.send(Err(DashboardError::Store(e)));
                }
            },
            Settled::Delete { id, result, reply } => match result {
                Ok(()) => {
                    self.list.confirm_delete(&id);
                    let _ = reply.send(Ok(()));
                }
                Err(e) => {
                    warn!(user = %self.user.id, id = %id, "bookmark delete failed, entry restored: {}", e);
                    self.list.rollback_delete(&id);
                    let _ = reply.send(Err(DashboardError::Store(e)));
                }
            },
        }
    }

    fn on_event(&mut self, event: Result<BookmarkChange, SubscriptionError>) {
        match event {
            Ok(change) => {
                trace!(user = %self.user.id, id = %change.id(), "remote change received");
                self.list.apply(&change);
            }
            Err(SubscriptionError::Lagged(missed)) => {
                // Changes were dropped; the view may miss remote updates
                // until remount. Local mutations still settle correctly.
                warn!(user = %self.user.id, missed, "subscription lagged");
            }
            Err(SubscriptionError::Closed) => {
                warn!(user = %self.user.id, "subscription closed, live sync degraded until remount");
                self.subscription = None;
            }
        }
    }
}

/// Receives from the subscription if one is still open.
///
/// The session guards this arm on `subscription.is_some()`; the pending
/// branch keeps the future total for the select.
async fn next_change(
    subscription: &mut Option<Subscription>,
) -> Result<BookmarkChange, SubscriptionError> {
    match subscription {
        Some(sub) => sub.recv().await,
        None => std::future::pending().await,
    }
}

/// Runs one synchronous store call on the blocking worker pool.
///
/// A worker that panics or is cancelled surfaces as the store being
/// unavailable, the same as any other failed call.
async fn run_store_op<T, F>(op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result,
        Err(e) => Err(StoreError::Unavailable(e.to_string())),
    }
}
