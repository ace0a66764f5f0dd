//! Change Hub: in-process pub/sub for committed bookmark changes.
//!
//! The store publishes every committed mutation here; dashboard sessions hold
//! user-scoped subscriptions and replay the changes into their visible
//! collections. Delivery is fan-out per user id, in publish order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::types::errors::SubscriptionError;
use crate::types::event::BookmarkChange;

/// Changes buffered per user channel before slow subscribers start lagging.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out hub routing committed bookmark changes to per-user subscribers.
///
/// One broadcast channel exists per user id with at least one live
/// subscription; channels with no remaining subscribers are pruned on the
/// next publish for that user.
pub struct ChangeHub {
    channels: Mutex<HashMap<String, broadcast::Sender<BookmarkChange>>>,
    capacity: usize,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a hub whose per-user channels buffer `capacity` changes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Opens a subscription to `user_id`'s changes.
    ///
    /// Each subscription gets a unique channel identity, so several mounted
    /// views of the same account never collide. Changes published after this
    /// call are delivered; earlier ones are not replayed.
    pub fn subscribe(&self, user_id: &str) -> Subscription {
        let mut channels = self.lock_channels();
        let sender = channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        let receiver = sender.subscribe();
        let channel = format!("bookmarks:{}:{}", user_id, Uuid::new_v4());
        debug!(channel = %channel, "subscription opened");
        Subscription {
            channel,
            user_id: user_id.to_string(),
            receiver,
        }
    }

    /// Publishes one committed change to every live subscriber of `user_id`.
    ///
    /// Returns the number of subscribers the change was delivered to. A user
    /// with no subscribers costs one map lookup and nothing else.
    pub fn publish(&self, user_id: &str, change: BookmarkChange) -> usize {
        let mut channels = self.lock_channels();
        let Some(sender) = channels.get(user_id) else {
            return 0;
        };
        match sender.send(change) {
            Ok(delivered) => {
                trace!(user_id, delivered, "change published");
                delivered
            }
            Err(_) => {
                // Last subscriber is gone; drop the channel entry.
                channels.remove(user_id);
                0
            }
        }
    }

    /// Number of live subscriptions for a user.
    pub fn subscriber_count(&self, user_id: &str) -> usize {
        self.lock_channels()
            .get(user_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    fn lock_channels(&self) -> MutexGuard<'_, HashMap<String, broadcast::Sender<BookmarkChange>>> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A live, user-filtered subscription to bookmark changes.
///
/// Dropping the subscription releases it; there is no explicit unsubscribe
/// call. Receiving only ever yields changes for the subscribed user.
pub struct Subscription {
    channel: String,
    user_id: String,
    receiver: broadcast::Receiver<BookmarkChange>,
}

impl Subscription {
    /// The unique channel identity of this subscription.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The user id this subscription is filtered to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Waits for the next change.
    ///
    /// `Lagged(n)` means the subscriber fell more than the channel capacity
    /// behind and `n` changes were discarded; receiving can continue
    /// afterwards. `Closed` means the hub shut the channel down.
    pub async fn recv(&mut self) -> Result<BookmarkChange, SubscriptionError> {
        match self.receiver.recv().await {
            Ok(change) => Ok(change),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                Err(SubscriptionError::Lagged(missed))
            }
            Err(broadcast::error::RecvError::Closed) => Err(SubscriptionError::Closed),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(channel = %self.channel, "subscription released");
    }
}
