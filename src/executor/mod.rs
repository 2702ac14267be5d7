//! Request executors
//!
//! Both executors share one dispatch path: build the target from the fixed base
//! address and the requested path, spawn a single fetch on the current tokio
//! runtime, and hand the outcome to a contract-specific delivery step.
//!
//! - [`WhiteBoxExecutor`] delivers the outcome to a caller-supplied callback and
//!   leaves every later decision (showing the error, dismissing it) to the
//!   caller.
//! - [`BlackBoxExecutor`] owns the error flow: it asks its bound listener for a
//!   surface, shows the error, waits for acknowledgement and only then notifies
//!   the listener.
//!
//! Executors hold no per-request state. Everything about one request lives in
//! its [`RequestHandle`].

use crate::endpoint::Endpoint;
use crate::error::{FrameworkError, Result};
use crate::log::{ActivityLog, Mark, RequestId};
use crate::transport::{FetchRequest, Outcome, Transport};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub mod black_box;
pub mod white_box;

pub use black_box::{BlackBoxExecutor, Bound, FrameworkListener, ListenerFns, Unbound};
pub use white_box::WhiteBoxExecutor;

/// Where a single request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    /// Accepted, not yet handed to the transport
    Idle,
    /// Waiting on the transport
    Dispatched,
    /// Payload delivered
    Succeeded,
    /// Transport reported an error
    Failed,
    /// Error is on screen, waiting for the user (black-box only)
    AwaitingAcknowledgement,
    /// Error acknowledged and listener notified (black-box only)
    Completed,
    /// Cancelled before the outcome was delivered
    Cancelled,
}

impl RequestState {
    /// Whether no further transition can happen under `flow`
    #[must_use]
    pub const fn is_terminal(self, flow: Flow) -> bool {
        match self {
            Self::Succeeded | Self::Completed | Self::Cancelled => true,
            Self::Failed => matches!(flow, Flow::CallerDriven),
            Self::Idle | Self::Dispatched | Self::AwaitingAcknowledgement => false,
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Dispatched => "dispatched",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::AwaitingAcknowledgement => "awaiting acknowledgement",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Who drives the error flow of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// White-box: the caller's callback sees the error
    CallerDriven,
    /// Black-box: the framework shows the error and waits for acknowledgement
    FrameworkDriven,
}

/// Caller's view of one dispatched request
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct RequestHandle {
    id: RequestId,
    flow: Flow,
    state: watch::Receiver<RequestState>,
    token: CancellationToken,
}

impl RequestHandle {
    /// Id used in activity logs
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Contract this request was issued under
    #[must_use]
    pub const fn flow(&self) -> Flow {
        self.flow
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> RequestState {
        *self.state.borrow()
    }

    /// Suppress any callback or listener call that has not happened yet
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait until the request reaches a terminal state
    pub async fn settled(&mut self) -> RequestState {
        let flow = self.flow;
        let settled = self
            .state
            .wait_for(|state| state.is_terminal(flow))
            .await
            .map(|state| *state);
        // Task ended without a terminal state (runtime shut down)
        settled.unwrap_or_else(|_| *self.state.borrow())
    }
}

/// Task-side half of a [`RequestHandle`]
#[derive(Debug)]
pub(crate) struct RequestProgress {
    id: RequestId,
    state: watch::Sender<RequestState>,
    token: CancellationToken,
    log: ActivityLog,
}

impl RequestProgress {
    pub(crate) fn advance(&self, state: RequestState) {
        let mark = match state {
            RequestState::Succeeded | RequestState::Completed => Mark::Success,
            RequestState::Failed => Mark::Failure,
            RequestState::Cancelled => Mark::Warning,
            RequestState::Idle | RequestState::Dispatched | RequestState::AwaitingAcknowledgement => {
                Mark::Progress
            }
        };
        self.log.record(self.id, mark, &state.to_string());
        let _ = self.state.send_replace(state);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub(crate) fn log(&self, mark: Mark, message: &str) {
        self.log.record(self.id, mark, message);
    }
}

/// Target construction and single-shot dispatch shared by both executors
#[derive(Clone)]
pub(crate) struct Dispatcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    log: ActivityLog,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub(crate) fn new(base_url: String, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url,
            transport,
            log: ActivityLog::disabled(),
        }
    }

    pub(crate) fn set_log(&mut self, log: ActivityLog) {
        self.log = log;
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the target, spawn one fetch and hand its outcome to `deliver`
    ///
    /// Fails before any network activity if the target is malformed or no
    /// runtime is running. Cancellation while the fetch is in flight drops the
    /// fetch and never calls `deliver`.
    pub(crate) fn dispatch<F, Fut>(&self, flow: Flow, path: &str, deliver: F) -> Result<RequestHandle>
    where
        F: FnOnce(Outcome, RequestProgress) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let target = Endpoint::new(self.base_url.as_str(), path).target()?;
        let runtime = Handle::try_current().map_err(|e| FrameworkError::Runtime(e.to_string()))?;

        let id = RequestId::new();
        let (state_tx, state_rx) = watch::channel(RequestState::Idle);
        let token = CancellationToken::new();
        let progress = RequestProgress {
            id,
            state: state_tx,
            token: token.clone(),
            log: self.log.clone(),
        };
        let transport = Arc::clone(&self.transport);

        drop(runtime.spawn(async move {
            progress.log(Mark::Progress, &format!("GET {target}"));
            progress.advance(RequestState::Dispatched);

            let outcome = tokio::select! {
                biased;
                () = progress.cancelled() => None,
                outcome = transport.fetch(FetchRequest::get(target)) => Some(outcome),
            };

            match outcome {
                Some(outcome) if !progress.is_cancelled() => deliver(outcome, progress).await,
                _ => progress.advance(RequestState::Cancelled),
            }
        }));

        Ok(RequestHandle {
            id,
            flow,
            state: state_rx,
            token,
        })
    }
}
