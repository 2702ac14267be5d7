//! Error presentation surfaces
//!
//! A surface hosts one error notification at a time. Whoever shows the error
//! hands the surface an [`Acknowledgement`]; the surface fires it when the user
//! dismisses the notification.

use crate::error::FrameworkError;
use console::{style, Term};
use dialoguer::Confirm;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// Display surface for error notifications
pub trait ErrorSurface: Send + Sync {
    /// Show `error` and fire `acknowledgement` once the user has seen it
    fn show_error(&self, error: &FrameworkError, acknowledgement: Acknowledgement);

    /// Take the notification down
    fn dismiss(&self) {}
}

/// Single-use signal that the user dismissed an error
///
/// Dropping it without calling [`acknowledge`](Self::acknowledge) counts as a
/// dismissal, so a surface that goes away never strands the request.
#[derive(Debug)]
pub struct Acknowledgement {
    sender: Option<oneshot::Sender<()>>,
}

impl Acknowledgement {
    /// Linked acknowledgement and the future that resolves when it fires
    #[must_use]
    pub fn channel() -> (Self, PendingAcknowledgement) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            PendingAcknowledgement { receiver },
        )
    }

    /// Signal that the user dismissed the error
    pub fn acknowledge(mut self) {
        if let Some(sender) = self.sender.take() {
            // Receiver gone means nobody is waiting any more
            let _ = sender.send(());
        }
    }
}

/// Resolves once the matching [`Acknowledgement`] fires or is dropped
#[derive(Debug)]
pub struct PendingAcknowledgement {
    receiver: oneshot::Receiver<()>,
}

impl PendingAcknowledgement {
    /// Wait for the user to dismiss the error
    pub async fn wait(self) {
        // A dropped sender is a dismissal too
        let _ = self.receiver.await;
    }
}

/// Terminal alert: prints the error and asks the user to dismiss it
///
/// Clones share the prompt state, since they share the terminal.
#[derive(Debug, Clone)]
pub struct ConsoleSurface {
    prompt: String,
    interactive: bool,
    prompt_open: Arc<AtomicBool>,
}

impl ConsoleSurface {
    /// Surface that prompts only when stdout is a terminal
    #[must_use]
    pub fn new() -> Self {
        Self {
            prompt: "Dismiss this error?".to_string(),
            interactive: Term::stdout().is_term(),
            prompt_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a dismissal prompt is still waiting on stdin
    #[must_use]
    pub fn is_prompt_open(&self) -> bool {
        self.prompt_open.load(Ordering::SeqCst)
    }

    /// Override whether the dismissal prompt is shown
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::print_stdout)] // the terminal is the surface
impl ErrorSurface for ConsoleSurface {
    fn show_error(&self, error: &FrameworkError, acknowledgement: Acknowledgement) {
        println!("{} {}", style("✗").red(), style(error).bold());

        // Without a runtime there is nowhere to park the blocking prompt
        let runtime = match Handle::try_current() {
            Ok(runtime) if self.interactive => runtime,
            _ => {
                acknowledgement.acknowledge();
                return;
            }
        };

        self.prompt_open.store(true, Ordering::SeqCst);
        let prompt_open = Arc::clone(&self.prompt_open);
        let prompt = self.prompt.clone();
        drop(runtime.spawn_blocking(move || {
            let _ = Confirm::new().with_prompt(prompt).default(true).interact();
            prompt_open.store(false, Ordering::SeqCst);
            acknowledgement.acknowledge();
        }));
    }

    fn dismiss(&self) {
        // A blocking stdin read cannot be interrupted; the answer is ignored
        if self.is_prompt_open() {
            println!(
                "{} Alert withdrawn, the open prompt no longer affects the request",
                style("⚠").yellow()
            );
        } else {
            println!("{} Alert dismissed", style("·").dim());
        }
    }
}
