use std::fmt;

// === ValidationError ===

/// Errors produced by bookmark draft validation, before the store is touched.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The title is empty after trimming.
    EmptyTitle,
    /// The URL is empty after trimming.
    EmptyUrl,
    /// The URL does not parse as an absolute URL.
    InvalidUrl(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "Title must not be empty"),
            ValidationError::EmptyUrl => write!(f, "URL must not be empty"),
            ValidationError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
        }
    }
}

impl std::error::Error for ValidationError {}

// === StoreError ===

/// Errors surfaced by the persistent bookmark store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The underlying database rejected the operation.
    Database(String),
    /// The store could not be reached at all.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(msg) => write!(f, "Store database error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === SubscriptionError ===

/// Errors reported by a live change subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionError {
    /// The subscriber fell behind and missed this many changes.
    Lagged(u64),
    /// The channel was shut down; no further changes will arrive.
    Closed,
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionError::Lagged(missed) => {
                write!(f, "Subscription lagged: {} changes missed", missed)
            }
            SubscriptionError::Closed => write!(f, "Subscription closed"),
        }
    }
}

impl std::error::Error for SubscriptionError {}

// === AuthError ===

/// Errors related to resolving the current user.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No authenticated user is available.
    Unauthenticated,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for AuthError {}

// === DashboardError ===

/// Errors returned by dashboard session operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// The submitted draft failed validation.
    Validation(ValidationError),
    /// The store rejected or could not perform the operation.
    Store(StoreError),
    /// A delete for this id is already in flight.
    DeleteInFlight(String),
    /// The session has been unmounted.
    Closed,
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Validation(err) => write!(f, "{}", err),
            DashboardError::Store(err) => write!(f, "{}", err),
            DashboardError::DeleteInFlight(id) => {
                write!(f, "Delete already in flight: {}", id)
            }
            DashboardError::Closed => write!(f, "Dashboard session closed"),
        }
    }
}

impl std::error::Error for DashboardError {}
