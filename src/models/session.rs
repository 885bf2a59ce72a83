use serde::{Deserialize, Serialize};

/// Logged-in staff member. Persisted as `{"mobileNo": "..."}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub mobile_no: String,
}

impl User {
    pub fn new(mobile_no: impl Into<String>) -> Self {
        Self {
            mobile_no: mobile_no.into(),
        }
    }
}

/// Snapshot of the authentication state read from storage.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Session {
    pub is_logged_in: bool,
    pub user: Option<User>,
    /// `clientID` of the pending OTP request, if any.
    pub correlation_token: Option<String>,
}

/// Which storage scope a login is written to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StorageScope {
    /// Survives reloads (localStorage).
    #[default]
    Durable,
    /// Current tab only (sessionStorage).
    Volatile,
}
