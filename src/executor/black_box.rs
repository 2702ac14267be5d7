//! Framework-driven executor
//!
//! The caller registers a listener once and then only issues requests. On
//! failure the executor itself obtains a surface from the listener, shows the
//! error, waits for the user to acknowledge it and only afterwards reports
//! completion (with no payload). The caller never sees the error.
//!
//! Registration is a typestate: `perform_request` exists only on a
//! [`BlackBoxExecutor<Bound>`].

use super::{Dispatcher, Flow, RequestHandle, RequestProgress, RequestState};
use crate::error::{FrameworkError, Result};
use crate::log::{ActivityLog, Mark};
use crate::surface::{Acknowledgement, ErrorSurface};
use crate::transport::{Payload, Transport};
use std::fmt;
use std::sync::Arc;

/// Notification points the framework calls back into
pub trait FrameworkListener: Send + Sync {
    /// The request finished; `None` after an acknowledged error
    fn request_completed(&self, payload: Option<Payload>);

    /// Surface to host an error notification on
    fn provide_error_surface(&self) -> Arc<dyn ErrorSurface>;
}

/// Listener built from a pair of closures
pub struct ListenerFns<C, S> {
    request_completed: C,
    provide_error_surface: S,
}

impl<C, S> ListenerFns<C, S>
where
    C: Fn(Option<Payload>) + Send + Sync,
    S: Fn() -> Arc<dyn ErrorSurface> + Send + Sync,
{
    /// Pair a completion closure with a surface provider
    pub const fn new(request_completed: C, provide_error_surface: S) -> Self {
        Self {
            request_completed,
            provide_error_surface,
        }
    }
}

impl<C, S> fmt::Debug for ListenerFns<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerFns").finish_non_exhaustive()
    }
}

impl<C, S> FrameworkListener for ListenerFns<C, S>
where
    C: Fn(Option<Payload>) + Send + Sync,
    S: Fn() -> Arc<dyn ErrorSurface> + Send + Sync,
{
    fn request_completed(&self, payload: Option<Payload>) {
        (self.request_completed)(payload);
    }

    fn provide_error_surface(&self) -> Arc<dyn ErrorSurface> {
        (self.provide_error_surface)()
    }
}

/// No listener registered yet
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbound;

/// Listener registered; requests may be issued
#[derive(Clone)]
pub struct Bound {
    listener: Arc<dyn FrameworkListener>,
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound").finish_non_exhaustive()
    }
}

/// Executor that owns the error-handling flow
#[derive(Debug, Clone)]
pub struct BlackBoxExecutor<S = Unbound> {
    dispatcher: Dispatcher,
    binding: S,
}

impl BlackBoxExecutor<Unbound> {
    /// Executor for `base_url` that sends requests through `transport`
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            dispatcher: Dispatcher::new(base_url.into(), transport),
            binding: Unbound,
        }
    }

    /// Register the listener pair; required before issuing requests
    pub fn bind<L>(self, listener: L) -> BlackBoxExecutor<Bound>
    where
        L: FrameworkListener + 'static,
    {
        self.bind_shared(Arc::new(listener))
    }

    /// Register a listener that is shared with other owners
    pub fn bind_shared(self, listener: Arc<dyn FrameworkListener>) -> BlackBoxExecutor<Bound> {
        BlackBoxExecutor {
            dispatcher: self.dispatcher,
            binding: Bound { listener },
        }
    }
}

impl<S> BlackBoxExecutor<S> {
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
}

impl BlackBoxExecutor<Bound> {
    /// GET `base_url + path`; the outcome goes to the bound listener
    ///
    /// Success calls `request_completed(Some(payload))`. Failure shows the error
    /// on the listener's surface and calls `request_completed(None)` once the
    /// user acknowledges it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::MalformedTarget`] if `base_url + path` is not a
    /// valid address, or [`FrameworkError::Runtime`] when called outside a
    /// tokio runtime. Neither touches the network or the listener.
    pub fn perform_request(&self, path: &str) -> Result<RequestHandle> {
        let listener = Arc::clone(&self.binding.listener);
        self.dispatcher
            .dispatch(Flow::FrameworkDriven, path, move |outcome, progress| async move {
                match outcome {
                    Ok(payload) => {
                        listener.request_completed(Some(payload));
                        progress.advance(RequestState::Succeeded);
                    }
                    Err(error) => {
                        progress.log(Mark::Failure, &error.to_string());
                        progress.advance(RequestState::Failed);
                        show_error(listener.as_ref(), &error, &progress).await;
                    }
                }
            })
    }

    /// Drop the listener registration
    #[must_use]
    pub fn unbind(self) -> BlackBoxExecutor<Unbound> {
        BlackBoxExecutor {
            dispatcher: self.dispatcher,
            binding: Unbound,
        }
    }
}

/// Show `error`, wait for acknowledgement, then report completion
async fn show_error(listener: &dyn FrameworkListener, error: &FrameworkError, progress: &RequestProgress) {
    if progress.is_cancelled() {
        progress.advance(RequestState::Cancelled);
        return;
    }

    let surface = listener.provide_error_surface();
    let (acknowledgement, pending) = Acknowledgement::channel();
    progress.advance(RequestState::AwaitingAcknowledgement);
    surface.show_error(error, acknowledgement);

    tokio::select! {
        biased;
        () = progress.cancelled() => {
            surface.dismiss();
            progress.advance(RequestState::Cancelled);
            return;
        }
        () = pending.wait() => {}
    }

    surface.dismiss();
    listener.request_completed(None);
    progress.advance(RequestState::Completed);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Hands every acknowledgement to the test instead of a user
    struct TestSurface {
        acknowledgements: mpsc::UnboundedSender<Acknowledgement>,
        shown: AtomicUsize,
        dismissed: AtomicUsize,
    }

    impl ErrorSurface for TestSurface {
        fn show_error(&self, _error: &FrameworkError, acknowledgement: Acknowledgement) {
            let _ = self.shown.fetch_add(1, Ordering::SeqCst);
            let _ = self.acknowledgements.send(acknowledgement);
        }

        fn dismiss(&self) {
            let _ = self.dismissed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct TestListener {
        completed: Mutex<Vec<Option<Payload>>>,
        surface_requests: AtomicUsize,
        surface: Arc<TestSurface>,
    }

    impl FrameworkListener for TestListener {
        fn request_completed(&self, payload: Option<Payload>) {
            self.completed.lock().unwrap().push(payload);
        }

        fn provide_error_surface(&self) -> Arc<dyn ErrorSurface> {
            let _ = self.surface_requests.fetch_add(1, Ordering::SeqCst);
            self.surface.clone()
        }
    }

    fn listener() -> (Arc<TestListener>, mpsc::UnboundedReceiver<Acknowledgement>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = Arc::new(TestSurface {
            acknowledgements: tx,
            shown: AtomicUsize::new(0),
            dismissed: AtomicUsize::new(0),
        });
        let listener = Arc::new(TestListener {
            completed: Mutex::new(Vec::new()),
            surface_requests: AtomicUsize::new(0),
            surface,
        });
        (listener, rx)
    }

    fn bound(transport: &MockTransport, listener: &Arc<TestListener>) -> BlackBoxExecutor<Bound> {
        let shared: Arc<dyn FrameworkListener> = listener.clone();
        BlackBoxExecutor::new("https://xyz", Arc::new(transport.clone())).bind_shared(shared)
    }

    #[tokio::test]
    async fn test_success_notifies_listener_once_without_surface() {
        let transport = MockTransport::succeeding(b"P");
        let (listener, _acks) = listener();

        let mut handle = bound(&transport, &listener).perform_request("/allData").unwrap();

        assert_eq!(handle.settled().await, RequestState::Succeeded);
        assert_eq!(*listener.completed.lock().unwrap(), vec![Some(b"P".to_vec())]);
        assert_eq!(listener.surface_requests.load(Ordering::SeqCst), 0);
        assert_eq!(listener.surface.shown.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_waits_for_acknowledgement_before_completing() {
        let transport = MockTransport::failing();
        let (listener, mut acks) = listener();

        let mut handle = bound(&transport, &listener).perform_request("/allData").unwrap();

        let acknowledgement = acks.recv().await.unwrap();
        assert_eq!(listener.surface_requests.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), RequestState::AwaitingAcknowledgement);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(listener.completed.lock().unwrap().is_empty());
        assert_eq!(listener.surface.dismissed.load(Ordering::SeqCst), 0);

        acknowledgement.acknowledge();

        assert_eq!(handle.settled().await, RequestState::Completed);
        assert_eq!(*listener.completed.lock().unwrap(), vec![None]);
        assert_eq!(listener.surface_requests.load(Ordering::SeqCst), 1);
        assert_eq!(listener.surface.shown.load(Ordering::SeqCst), 1);
        assert_eq!(listener.surface.dismissed.load(Ordering::SeqCst), 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_while_awaiting_acknowledgement_suppresses_completion() {
        let transport = MockTransport::failing();
        let (listener, mut acks) = listener();

        let mut handle = bound(&transport, &listener).perform_request("/allData").unwrap();
        let acknowledgement = acks.recv().await.unwrap();

        handle.cancel();

        assert_eq!(handle.settled().await, RequestState::Cancelled);
        acknowledgement.acknowledge();
        tokio::task::yield_now().await;
        assert!(listener.completed.lock().unwrap().is_empty());
        assert_eq!(listener.surface.dismissed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_target_touches_neither_network_nor_listener() {
        let transport = MockTransport::failing();
        let (listener, _acks) = listener();
        let shared: Arc<dyn FrameworkListener> = listener.clone();
        let executor = BlackBoxExecutor::new("https://xyz:notaport", Arc::new(transport.clone()))
            .bind_shared(shared);

        let result = executor.perform_request("/allData");

        assert!(matches!(result, Err(FrameworkError::MalformedTarget { .. })));
        assert!(transport.requests().is_empty());
        assert_eq!(listener.surface_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_closure_listener_receives_payload() {
        let transport = MockTransport::succeeding(b"closure");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listener = ListenerFns::new(
            move |payload: Option<Payload>| {
                let _ = tx.send(payload);
            },
            || -> Arc<dyn ErrorSurface> { Arc::new(crate::surface::ConsoleSurface::new().interactive(false)) },
        );

        let executor = BlackBoxExecutor::new("https://xyz", Arc::new(transport)).bind(listener);
        let _handle = executor.perform_request("/allData").unwrap();

        assert_eq!(rx.recv().await.unwrap(), Some(b"closure".to_vec()));
    }

    #[tokio::test]
    async fn test_unbind_returns_to_unbound() {
        let transport = MockTransport::succeeding(b"P");
        let (listener, _acks) = listener();
        let executor = bound(&transport, &listener).unbind();
        assert_eq!(executor.base_url(), "https://xyz");
    }
}
