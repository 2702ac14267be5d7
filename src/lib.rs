#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # Webservice Framework
//!
//! Two shapes of the same thin network-call wrapper, plus the dependency
//! injection they rely on.
//!
//! ## Architecture
//!
//! - **[`executor`]** - White-box and black-box request executors
//! - **[`transport`]** - The network seam and its `reqwest` implementation
//! - **[`endpoint`]** - Request target construction
//! - **[`surface`]** - Error presentation and acknowledgement
//! - **[`assets`]** - A service built on an injected executor
//! - **[`house`]** - Constructor injection without any network at all
//! - **[`config`]** - Configuration management
//! - **[`client`]** - HTTP client construction
//! - **[`log`]** - Request activity logging
//! - **[`error`]** - Error types and error handling
//!
//! ## Quick Start
//!
//! ```bash
//! webservice fetch /assets                      # caller handles the error
//! webservice fetch /assets --approach black-box # framework handles the error
//! webservice house --owner Batman --agent Alfred
//! ```

pub mod assets;
pub mod cli;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod house;
pub mod log;
pub mod surface;
pub mod transport;

/// Error type alias for convenience
pub use error::{FrameworkError, Result};

/// Configuration type alias for convenience
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "webservice";
