//! Request target construction
//!
//! A target is the plain concatenation of a fixed base address and a relative
//! path. Nothing is normalized or joined: `"https://xyz" + "/allData"` is
//! `"https://xyz/allData"`. A concatenation that does not parse, or that would
//! only parse after being rewritten (dot segments, default port, escaping), is
//! rejected before any network activity.

use crate::error::{FrameworkError, Result};
use reqwest::Url;

/// Base address plus relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    path: String,
}

impl Endpoint {
    /// Pair a base address with a relative path
    pub fn new(base: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            path: path.into(),
        }
    }

    /// Base address as configured
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Relative path as requested
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw concatenation of base and path
    #[must_use]
    pub fn joined(&self) -> String {
        format!("{}{}", self.base, self.path)
    }

    /// Parse the concatenation into a request target
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::MalformedTarget`] if the concatenation is not an
    /// absolute `http`/`https` URL with a host, or if parsing would change it.
    pub fn target(&self) -> Result<Url> {
        let joined = self.joined();
        let url = Url::parse(&joined).map_err(|e| self.malformed(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(self.malformed(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !url.has_host() {
            return Err(self.malformed("missing host".to_string()));
        }
        if url.as_str() != joined {
            return Err(self.malformed(format!("normalizes to '{url}'")));
        }

        Ok(url)
    }

    fn malformed(&self, reason: String) -> FrameworkError {
        FrameworkError::MalformedTarget {
            base: self.base.clone(),
            path: self.path.clone(),
            reason,
        }
    }
}
