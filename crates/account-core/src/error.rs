//! Unified application error types for the account service.
//!
//! Every crate maps its internal failures into [`AppError`]. The session
//! layer is responsible for collapsing detailed causes into the externally
//! safe kinds before an error leaves the core.

use std::fmt;

use thiserror::Error;

/// Error classification shared by the core and the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource does not exist.
    NotFound,
    /// A user with the given email is already registered.
    DuplicateEmail,
    /// Unknown email or wrong password. The two are never distinguished.
    InvalidCredentials,
    /// The presented refresh token cannot be redeemed.
    InvalidRefreshToken,
    /// The presented access token is malformed, forged, or of the wrong type.
    InvalidAccessToken,
    /// The presented access token was valid but has expired.
    ExpiredAccessToken,
    /// Caller input failed validation.
    Validation,
    /// Token signing failed.
    Signing,
    /// The credential store failed.
    Storage,
    /// The caller cancelled the operation or its deadline elapsed.
    Cancelled,
    /// Configuration is missing or invalid.
    Configuration,
    /// Any other internal failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::DuplicateEmail => write!(f, "DUPLICATE_EMAIL"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::InvalidRefreshToken => write!(f, "INVALID_REFRESH_TOKEN"),
            Self::InvalidAccessToken => write!(f, "INVALID_ACCESS_TOKEN"),
            Self::ExpiredAccessToken => write!(f, "TOKEN_EXPIRED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Signing => write!(f, "SIGNING"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl ErrorKind {
    /// Whether the failure is attributable to the caller rather than the
    /// service. Server-side kinds must not expose their message to clients.
    pub fn is_client_error(self) -> bool {
        !matches!(
            self,
            Self::Signing | Self::Storage | Self::Configuration | Self::Internal
        )
    }
}

/// The unified application error used throughout the account service.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// A specialized `Result` type for account service operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a duplicate-email error.
    pub fn duplicate_email() -> Self {
        Self::new(ErrorKind::DuplicateEmail, "Email is already registered")
    }

    /// Create the single error returned for any failed login.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create the single error returned for any failed refresh.
    pub fn invalid_refresh_token() -> Self {
        Self::new(ErrorKind::InvalidRefreshToken, "Invalid refresh token")
    }

    /// Create an invalid access token error.
    pub fn invalid_access_token() -> Self {
        Self::new(ErrorKind::InvalidAccessToken, "Invalid access token")
    }

    /// Create an expired access token error.
    pub fn expired_access_token() -> Self {
        Self::new(ErrorKind::ExpiredAccessToken, "Access token has expired")
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "Operation was cancelled")
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
