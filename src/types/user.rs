use serde::{Deserialize, Serialize};

/// The authenticated user a dashboard session is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
}
