//! Action channel
//!
//! Single-slot broadcast of the latest navigation action. Only the most
//! recent action is kept; a new receiver starts from it instead of the
//! full history. Every send bumps a generation counter so a pipeline can
//! tell whether the action it is working on has been superseded.

use super::types::NavigationAction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// An action together with the generation it was issued under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// The requested navigation
    pub action: NavigationAction,
    /// Monotonic issue counter
    pub generation: u64,
}

/// Sending side of the action channel
#[derive(Debug)]
pub struct ActionChannel {
    tx: watch::Sender<Dispatch>,
    closed: Arc<AtomicBool>,
}

impl ActionChannel {
    /// Create a channel holding `initial` as generation 0
    pub fn new(initial: NavigationAction) -> Self {
        let (tx, _rx) = watch::channel(Dispatch {
            action: initial,
            generation: 0,
        });
        Self {
            tx,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Store `action` as the latest and notify receivers
    pub fn paginate(&self, action: NavigationAction) -> Dispatch {
        let mut issued = self.latest();
        self.tx.send_modify(|dispatch| {
            dispatch.action = action;
            dispatch.generation += 1;
            issued = *dispatch;
        });
        issued
    }

    /// The most recently issued dispatch
    pub fn latest(&self) -> Dispatch {
        *self.tx.borrow()
    }

    /// Create a receiver positioned at the latest dispatch
    pub fn subscribe(&self) -> ActionReceiver {
        ActionReceiver {
            rx: self.tx.subscribe(),
            closed: Arc::clone(&self.closed),
        }
    }

    /// Close the channel; waiting receivers observe the end
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.tx.send_modify(|_| {});
    }

    /// Check if the channel was closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Receiving side of the action channel
#[derive(Debug)]
pub struct ActionReceiver {
    rx: watch::Receiver<Dispatch>,
    closed: Arc<AtomicBool>,
}

impl ActionReceiver {
    /// The latest dispatch, marking it as seen
    pub fn latest(&mut self) -> Dispatch {
        *self.rx.borrow_and_update()
    }

    /// Wait for a dispatch newer than the last one seen.
    ///
    /// Returns `None` once the channel is closed. Cancel safe.
    pub async fn changed(&mut self) -> Option<Dispatch> {
        if self.is_closed() {
            return None;
        }
        self.rx.changed().await.ok()?;
        if self.is_closed() {
            return None;
        }
        Some(*self.rx.borrow_and_update())
    }

    /// Check if `generation` is still the latest issued
    pub fn is_current(&self, generation: u64) -> bool {
        self.rx.borrow().generation == generation
    }

    /// Check if the channel was closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
