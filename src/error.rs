//! Error types and handling for the webservice framework
//!
//! Every request reports exactly one of these, exactly once. `MalformedTarget`
//! is the only kind raised before dispatch; everything else reaches the caller
//! (white-box) or the framework's error surface (black-box).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for framework operations
pub type Result<T> = std::result::Result<T, FrameworkError>;

/// Message shown to users for any transport-level failure
pub const GENERIC_NETWORK_MESSAGE: &str = "Something went wrong! Please try again later.";

/// Error kinds produced by the request executors and their collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameworkError {
    // ═══════════════════════════════════════════════════════════════
    // Request Errors
    // ═══════════════════════════════════════════════════════════════
    /// Base address and path do not form a well-formed request target
    #[error("Malformed request target '{base}{path}': {reason}")]
    MalformedTarget {
        base: String,
        path: String,
        reason: String,
    },

    /// The request was dispatched but did not produce a payload
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The transport gave up waiting for the server
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request was cancelled before its outcome was delivered
    #[error("Request cancelled")]
    Cancelled,

    /// Payload could not be decoded into the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No async runtime is available to dispatch on
    #[error("No async runtime available: {0}")]
    Runtime(String),

    // ═══════════════════════════════════════════════════════════════
    // Dependency Errors
    // ═══════════════════════════════════════════════════════════════
    /// The news agency has nobody to send
    #[error("Agency '{agency}' has no newspaper agent available")]
    NoAgentAvailable { agency: String },

    // ═══════════════════════════════════════════════════════════════
    // Configuration & File Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// Failed to write configuration file
    #[error("Failed to write config to {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Directory operation failed
    #[error("Directory operation failed: {path}: {reason}")]
    DirError { path: PathBuf, reason: String },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FrameworkError {
    /// Build the generic network failure shown to users
    #[must_use]
    pub fn network() -> Self {
        Self::NetworkFailure(GENERIC_NETWORK_MESSAGE.to_string())
    }

    /// Get the process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MalformedTarget { .. } => 2,
            Self::InvalidConfig(_) | Self::ConfigRead { .. } | Self::ConfigWrite { .. } => 3,
            Self::NetworkFailure(_) => 4,
            Self::Decode(_) => 5,
            Self::NoAgentAvailable { .. } => 6,
            Self::Timeout(_) => 124,
            Self::Cancelled => 130,
            _ => 1,
        }
    }

    /// Whether the error was raised before any network activity
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedTarget { .. } | Self::Runtime(_))
    }
}

impl From<reqwest::Error> for FrameworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::NetworkFailure(format!("HTTP {status}"))
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FrameworkError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            Self::Decode(format!("JSON syntax error: {err}"))
        } else {
            Self::Decode(err.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(FrameworkError::network().exit_code(), 4);
        assert_eq!(FrameworkError::Cancelled.exit_code(), 130);
        assert_eq!(FrameworkError::Timeout("slow".to_string()).exit_code(), 124);
        assert_eq!(FrameworkError::Internal("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_only_pre_dispatch_errors_are_fatal() {
        let malformed = FrameworkError::MalformedTarget {
            base: "xyz".to_string(),
            path: "/all".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(malformed.is_fatal());
        assert!(!FrameworkError::network().is_fatal());
        assert!(!FrameworkError::Cancelled.is_fatal());
    }

    #[test]
    fn test_generic_network_message() {
        assert_eq!(
            FrameworkError::network().to_string(),
            "Network failure: Something went wrong! Please try again later."
        );
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(FrameworkError::from(err), FrameworkError::Decode(_)));
    }
}
