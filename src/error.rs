// ============================================================================
// ERRORS - Validation, transport, storage, auth, fetch and mutation failures
// ============================================================================
// Every error ends up as a transient Notice at the action that started it.
// ============================================================================

use thiserror::Error;

use crate::models::ResponseEnvelope;

/// Local input checks. Never reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Mobile number is required")]
    MobileRequired,
    #[error("Enter a valid 10-digit mobile number")]
    InvalidMobile,
    #[error("OTP is required")]
    OtpRequired,
    #[error("Enter a valid 4-digit OTP")]
    InvalidOtp,
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Valid price is required")]
    InvalidPrice,
    #[error("Selected file is empty")]
    EmptyFile,
    #[error("Enter a date as YYYY-MM-DD")]
    InvalidDate,
    #[error("Unknown booking status '{0}'")]
    InvalidStatus(String),
}

/// Transport-level failures of a single HTTP exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Parse error: {0}")]
    Decode(String),
    #[error("Serialization error: {0}")]
    Encode(String),
}

impl ApiError {
    /// `responseStatus.message` from an error body, when the server sent one.
    pub fn remote_message(&self) -> Option<String> {
        match self {
            ApiError::Http { body, .. } => serde_json::from_str::<ResponseEnvelope>(body)
                .ok()
                .and_then(|envelope| envelope.response_status)
                .and_then(|status| status.message)
                .filter(|message| !message.trim().is_empty()),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,
    #[error("Could not write '{0}' to storage")]
    Write(String),
    #[error("Could not remove '{0}' from storage")]
    Remove(String),
    #[error("Could not serialize '{key}': {reason}")]
    Serialize { key: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to send OTP")]
    SendOtpFailed(#[source] ApiError),
    #[error("Invalid OTP")]
    InvalidOtp(#[source] ApiError),
    #[error("No OTP request is pending; request a new OTP")]
    MissingClientId,
    #[error("Action not available while {0}")]
    InvalidState(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of a collection fetch. Ambiguous empty responses are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(reason) => FetchError::Network(reason),
            ApiError::Http { status, .. } => FetchError::Http { status },
            ApiError::Decode(reason) | ApiError::Encode(reason) => FetchError::Decode(reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    RemoteRejection { code: Option<i64>, message: String },
    #[error("Booking is already {0}")]
    InvalidTransition(String),
    #[error("Booking {0} is not in the current list")]
    UnknownBooking(String),
}

pub const GENERIC_REMOTE_ERROR: &str = "Unknown error";

impl From<ApiError> for MutationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(reason) => MutationError::Network(reason),
            ApiError::Http { .. } => MutationError::RemoteRejection {
                code: None,
                message: err
                    .remote_message()
                    .unwrap_or_else(|| GENERIC_REMOTE_ERROR.to_string()),
            },
            ApiError::Decode(_) | ApiError::Encode(_) => MutationError::RemoteRejection {
                code: None,
                message: GENERIC_REMOTE_ERROR.to_string(),
            },
        }
    }
}
