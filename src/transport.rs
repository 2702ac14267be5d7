//! Network seam used by the request executors
//!
//! The executors never construct their own HTTP session. They receive a
//! [`Transport`], and the production [`HttpTransport`] in turn receives its
//! `reqwest::Client` through its constructor, so tests can swap either layer.

use crate::error::{FrameworkError, Result};
use futures::future::{self, BoxFuture};
use reqwest::{Client, Method, Url};

/// Opaque response body
pub type Payload = Vec<u8>;

/// Either the payload or the error, never both
pub type Outcome = Result<Payload>;

/// A single outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// HTTP method; only GET is ever sent
    pub method: Method,
    /// Fully built request target
    pub url: Url,
}

impl FetchRequest {
    /// GET request for `url`
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
        }
    }
}

/// Performs one request and resolves to its outcome
///
/// Implementations must not retry: one `fetch` is at most one network call.
pub trait Transport: Send + Sync {
    /// Issue `request` and resolve to the response bytes or an error
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'static, Outcome>;
}

/// Transport backed by an injected `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Wrap an already configured client
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// The injected client
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'static, Outcome> {
        if request.method != Method::GET {
            return Box::pin(future::ready(Err(FrameworkError::network())));
        }

        let client = self.client.clone();
        Box::pin(async move {
            let response = client.get(request.url).send().await?;

            if !response.status().is_success() {
                return Err(FrameworkError::NetworkFailure(format!(
                    "HTTP {}",
                    response.status()
                )));
            }

            let body = response.bytes().await?;
            Ok(body.to_vec())
        })
    }
}
