// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for reqkit
//!
//! Every failure of a verb call surfaces here, synchronously, to the
//! immediate caller. The library never retries and never logs an error it
//! is about to return.

use thiserror::Error;

/// Result type alias for reqkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for reqkit
#[derive(Error, Debug)]
pub enum Error {
    /// Method and body do not fit together (POST without vars, PUT data on GET, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The transport reported a failure; message and code are passed through verbatim
    #[error("Transport error {code}: {message}")]
    Transport { message: String, code: u32 },

    /// A raw option name or value could not be mapped to a transport option
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Error::InvalidRequest(msg.into())
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>, code: u32) -> Self {
        Error::Transport {
            message: message.into(),
            code,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Check if this is a validation failure raised before any I/O
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }

    /// Check if this came from the transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Get the transport code if available
    pub fn transport_code(&self) -> Option<u32> {
        match self {
            Error::Transport { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error() {
        let err = Error::transport("Could not resolve host", 6);

        assert!(err.is_transport());
        assert!(!err.is_invalid_request());
        assert_eq!(err.transport_code(), Some(6));
        assert_eq!(err.to_string(), "Transport error 6: Could not resolve host");
    }

    #[test]
    fn test_invalid_request_error() {
        let err = Error::invalid_request("POST vars required");

        assert!(err.is_invalid_request());
        assert_eq!(err.transport_code(), None);
        assert_eq!(err.to_string(), "Invalid request: POST vars required");
    }

    #[test]
    fn test_url_error_conversion() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::Url(_)));
    }
}
