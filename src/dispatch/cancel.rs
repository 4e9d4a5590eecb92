// src/dispatch/cancel.rs

//! Invocation-wide cancellation.
//!
//! Cancelling never interrupts the target that is currently running; the
//! dispatcher and pipeline only check the signal before starting the next
//! target or phase.

use std::sync::Arc;

use tokio::sync::watch;

/// Read side, held by the dispatcher.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Write side, held by whoever listens for Ctrl-C.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Create a connected handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelSignal { rx })
}

impl CancelSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}
