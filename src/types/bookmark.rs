use serde::{Deserialize, Serialize};

/// Represents a saved bookmark row.
///
/// `created_at` is assigned by the store in unix milliseconds and is the sort
/// key for the newest-first dashboard ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub created_at: i64,
}
