//! Caller-driven executor
//!
//! The caller receives the raw outcome and decides what happens next. Showing
//! and dismissing an error are separate calls the caller makes on its own
//! schedule; the executor attaches no flow to them.

use super::{Dispatcher, Flow, RequestHandle, RequestState};
use crate::error::{FrameworkError, Result};
use crate::log::{ActivityLog, Mark};
use crate::surface::{Acknowledgement, ErrorSurface, PendingAcknowledgement};
use crate::transport::{Outcome, Transport};
use std::sync::Arc;

/// Executor whose caller owns the full control flow
#[derive(Debug, Clone)]
pub struct WhiteBoxExecutor {
    dispatcher: Dispatcher,
}

impl WhiteBoxExecutor {
    /// Executor for `base_url` that sends requests through `transport`
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            dispatcher: Dispatcher::new(base_url.into(), transport),
        }
    }

    /// Record request activity to `log`
    #[must_use]
    pub fn with_log(mut self, log: ActivityLog) -> Self {
        self.dispatcher.set_log(log);
        self
    }

    /// Fixed base address
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    /// GET `base_url + path` and pass the outcome to `on_complete`
    ///
    /// Returns as soon as the request is dispatched. `on_complete` runs exactly
    /// once on a runtime worker, unless the request is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::MalformedTarget`] if `base_url + path` is not a
    /// valid address, or [`FrameworkError::Runtime`] when called outside a
    /// tokio runtime. Neither touches the network.
    pub fn perform_request<F>(&self, path: &str, on_complete: F) -> Result<RequestHandle>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        self.dispatcher
            .dispatch(Flow::CallerDriven, path, move |outcome, progress| async move {
                if progress.is_cancelled() {
                    progress.advance(RequestState::Cancelled);
                    return;
                }

                let state = if outcome.is_ok() {
                    RequestState::Succeeded
                } else {
                    RequestState::Failed
                };
                if let Err(error) = &outcome {
                    progress.log(Mark::Failure, &error.to_string());
                }

                on_complete(outcome);
                progress.advance(state);
            })
    }

    /// Show `error` on `on`
    ///
    /// The returned future resolves when the user dismisses the error; the
    /// caller may await it or ignore it.
    pub fn present_error(&self, error: &FrameworkError, on: &dyn ErrorSurface) -> PendingAcknowledgement {
        let (acknowledgement, pending) = Acknowledgement::channel();
        on.show_error(error, acknowledgement);
        pending
    }

    /// Take the error notification on `on` down
    pub fn acknowledge_error(&self, on: &dyn ErrorSurface) {
        on.dismiss();
    }
}
