// Signal handling module
//
// Supported signals:
// - SIGTERM: stop serving
// - SIGINT:  stop serving (Ctrl+C)
//
// Configuration is fixed for the process lifetime, so there is no reload
// signal. On non-Unix targets only Ctrl+C is handled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Interrupt-driven shutdown trigger shared with the accept loop.
pub struct ShutdownSignal {
    notify: Notify,
    requested: AtomicBool,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            notify: Notify::new(),
            requested: AtomicBool::new(false),
        }
    }

    /// Mark shutdown as requested and wake every waiter.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Wait until shutdown is requested. Returns immediately if it already
    /// was.
    pub async fn wait(&self) {
        // Register with the Notify before checking the flag, otherwise a
        // request landing between the check and the await is lost.
        let mut notified = std::pin::pin!(self.notify.notified());
        notified.as_mut().enable();

        if self.requested.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the signal listener task (Unix).
///
/// SIGINT and SIGTERM both fire the shutdown trigger; the accept loop
/// observes it and stops accepting.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<ShutdownSignal>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }

        shutdown.request();
    });
}

/// Non-Unix fallback: only Ctrl+C is handled.
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<ShutdownSignal>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown.request();
        }
    });
}
