//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// Local input validation failure. Blocks the triggering action,
    /// leaves all state intact, never reaches an external capability.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Classified session failure reasons.
///
/// Each variant maps to a specific user-facing message via
/// [`SessionError::user_message`]. The remote identity provider reports
/// these as error codes; the local provider only produces a subset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("weak password")]
    WeakPassword,

    #[error("identity provider not configured")]
    ProviderNotConfigured,

    #[error("sign-in popup blocked")]
    PopupBlocked,

    #[error("sign-in popup closed")]
    PopupClosed,

    #[error("unauthorized origin")]
    UnauthorizedOrigin,

    #[error("not signed in")]
    NotSignedIn,

    #[error("{0}")]
    Other(String),
}

impl SessionError {
    /// Map a provider error code (e.g. "email-already-in-use") to a variant.
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalid-credential" | "user-not-found" | "wrong-password" => {
                Self::InvalidCredentials
            }
            "email-already-in-use" => Self::EmailAlreadyInUse,
            "weak-password" => Self::WeakPassword,
            "configuration-not-found" => Self::ProviderNotConfigured,
            "popup-blocked" => Self::PopupBlocked,
            "popup-closed-by-user" => Self::PopupClosed,
            "unauthorized-domain" => Self::UnauthorizedOrigin,
            other => Self::Other(other.to_string()),
        }
    }

    /// The message shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => {
                "Invalid email or password. Please try again.".to_string()
            }
            Self::EmailAlreadyInUse => {
                "This email address is already in use by another account.".to_string()
            }
            Self::WeakPassword => {
                "The password is too weak. Please choose a stronger password.".to_string()
            }
            Self::ProviderNotConfigured => {
                "The identity provider is not configured for this installation.".to_string()
            }
            Self::PopupBlocked => {
                "The sign-in window was blocked. Please allow it and try again.".to_string()
            }
            Self::PopupClosed => "Sign-in was cancelled.".to_string(),
            Self::UnauthorizedOrigin => {
                "This origin is not authorized for federated sign-in.".to_string()
            }
            Self::NotSignedIn => "You are not signed in. Please log in first.".to_string(),
            Self::Other(code) => {
                format!("There was a problem signing in. (Error: {})", code)
            }
        }
    }
}

/// Classified list-store failure reasons
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("store unavailable")]
    Unavailable,

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// The message shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "You do not have permission to modify these lists.".to_string()
            }
            Self::Unavailable => {
                "Could not reach the list store. Please check your connection and try again."
                    .to_string()
            }
            Self::Other(msg) => format!("The list store reported an error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_from_code() {
        assert_eq!(
            SessionError::from_code("wrong-password"),
            SessionError::InvalidCredentials
        );
        assert_eq!(
            SessionError::from_code("email-already-in-use"),
            SessionError::EmailAlreadyInUse
        );
        assert_eq!(
            SessionError::from_code("something-else"),
            SessionError::Other("something-else".to_string())
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("invalid amount");
        assert_eq!(err.to_string(), "Validation error: invalid amount");
    }

    #[test]
    fn test_user_messages_are_specific() {
        assert_ne!(
            SessionError::InvalidCredentials.user_message(),
            SessionError::WeakPassword.user_message()
        );
        assert_ne!(
            StoreError::PermissionDenied.user_message(),
            StoreError::Unavailable.user_message()
        );
    }
}
