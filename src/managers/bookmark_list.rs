//! Bookmark List for Smartmarks.
//!
//! The in-memory visible collection behind one mounted dashboard view. All
//! updates funnel through [`reduce`], one change at a time, so local
//! confirmations and remote notifications cannot interleave mid-update.

use std::collections::HashSet;

use crate::types::bookmark::Bookmark;
use crate::types::event::BookmarkChange;

/// Applies one change to a visible collection and returns the new collection.
///
/// An insert whose id is already visible is discarded, otherwise the row is
/// prepended (the collection is newest first, and a new row always outranks
/// everything already fetched). A delete removes the id if present and is a
/// no-op otherwise. Both cases are idempotent, which is what makes a local
/// confirmation and its own echoed change event safe in either order.
pub fn reduce(items: Vec<Bookmark>, change: &BookmarkChange) -> Vec<Bookmark> {
    match change {
        BookmarkChange::Inserted(row) => {
            if items.iter().any(|b| b.id == row.id) {
                return items;
            }
            let mut next = Vec::with_capacity(items.len() + 1);
            next.push(row.clone());
            next.extend(items);
            next
        }
        BookmarkChange::Deleted { id } => items.into_iter().filter(|b| b.id != *id).collect(),
    }
}

/// Point-in-time view of a bookmark list, for rendering.
///
/// `deleting` lists the ids with a delete in flight, sorted for stable
/// presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub bookmarks: Vec<Bookmark>,
    pub deleting: Vec<String>,
}

/// The visible bookmark collection of one dashboard session.
///
/// Tracks, per entry, whether a delete is in flight; an entry stays visible
/// (and marked) until its delete settles.
pub struct BookmarkList {
    items: Vec<Bookmark>,
    deleting: HashSet<String>,
}

impl BookmarkList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            deleting: HashSet::new(),
        }
    }

    /// Builds the list from an initial store fetch.
    ///
    /// Duplicate ids in the input keep their first (newest) occurrence, so
    /// the visible-ids-are-unique invariant holds from the start.
    pub fn with_items(items: Vec<Bookmark>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|b| seen.insert(b.id.clone()))
            .collect();
        Self {
            items,
            deleting: HashSet::new(),
        }
    }

    /// Applies a change event to the visible collection.
    ///
    /// A delete event also clears any in-flight mark for that id: once the
    /// row is gone from the store there is nothing left to settle.
    pub fn apply(&mut self, change: &BookmarkChange) {
        if let BookmarkChange::Deleted { id } = change {
            self.deleting.remove(id);
        }
        self.items = reduce(std::mem::take(&mut self.items), change);
    }

    /// Marks an entry as delete-in-flight. Returns false if a delete for
    /// this id is already pending, in which case the caller must not issue
    /// another one.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        self.deleting.insert(id.to_string())
    }

    /// Settles a successful delete: clears the mark and removes the entry.
    pub fn confirm_delete(&mut self, id: &str) {
        self.deleting.remove(id);
        self.items = reduce(
            std::mem::take(&mut self.items),
            &BookmarkChange::Deleted { id: id.to_string() },
        );
    }

    /// Settles a failed delete: clears the mark and keeps the entry visible,
    /// eligible for retry.
    pub fn rollback_delete(&mut self, id: &str) {
        self.deleting.remove(id);
    }

    /// Whether a delete for this id is currently in flight.
    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Whether the id is currently visible.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|b| b.id == id)
    }

    pub fn items(&self) -> &[Bookmark] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clones the current state into a [`ListSnapshot`].
    pub fn snapshot(&self) -> ListSnapshot {
        let mut deleting: Vec<String> = self.deleting.iter().cloned().collect();
        deleting.sort();
        ListSnapshot {
            bookmarks: self.items.clone(),
            deleting,
        }
    }
}

impl Default for BookmarkList {
    fn default() -> Self {
        Self::new()
    }
}
