//! Error types for azvm.
//!
//! The crate surfaces exactly two error kinds: a credential could not be
//! obtained, or the provisioning request failed. Both are propagated to the
//! caller without local recovery or retry.

use thiserror::Error;

/// Result type alias for azvm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for azvm operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A credential could not be obtained from the identity collaborator.
    ///
    /// Covers missing environment configuration, token endpoint rejections,
    /// and transport failures during the token exchange.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Human-readable description of what went wrong
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provisioning request failed.
    ///
    /// Covers rejections by the management API (the ARM error payload's code
    /// and message are preserved) as well as failures to construct or deliver
    /// the request at all.
    #[error("Provisioning request failed: {message}")]
    Request {
        /// HTTP status returned by the management endpoint, if the request
        /// got that far
        status: Option<u16>,
        /// Error code from the ARM error payload, if present
        code: Option<String>,
        /// Human-readable description of what went wrong
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an authentication error with a source.
    pub fn authentication_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Authentication {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a request error for a failure before or during delivery.
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            status: None,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a request error with a source.
    pub fn request_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Request {
            status: None,
            code: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a request error for a rejection by the management API.
    pub fn rejected(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self::Request {
            status: Some(status),
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this is an authentication error.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Returns true if this is a request error.
    pub fn is_request(&self) -> bool {
        matches!(self, Error::Request { .. })
    }

    /// Returns the HTTP status of a management API rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request { status, .. } => *status,
            Error::Authentication { .. } => None,
        }
    }

    /// Returns the ARM error code of a management API rejection, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Request { code, .. } => code.as_deref(),
            Error::Authentication { .. } => None,
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Authentication { .. } => 3,
            Error::Request { .. } => 2,
        }
    }
}
