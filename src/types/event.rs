use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// A row-level change to the bookmarks table, as published to subscribers.
///
/// Inserts carry the full committed row so subscribers never have to read the
/// store back. Deletes carry only the row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookmarkChange {
    Inserted(Bookmark),
    Deleted { id: String },
}

impl BookmarkChange {
    /// The id of the affected row.
    pub fn id(&self) -> &str {
        match self {
            BookmarkChange::Inserted(row) => &row.id,
            BookmarkChange::Deleted { id } => id,
        }
    }
}
