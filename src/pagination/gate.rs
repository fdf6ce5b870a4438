//! Stall gate
//!
//! While stalled, actions reaching the gate are dropped rather than queued,
//! so the data source is never queried.

use super::types::NavigationAction;
use std::sync::atomic::{AtomicBool, Ordering};

/// Suspends and resumes query issuance
#[derive(Debug, Default)]
pub struct StallGate {
    stalled: AtomicBool,
}

impl StallGate {
    /// Create a gate, optionally stalled
    pub fn new(stalled: bool) -> Self {
        Self {
            stalled: AtomicBool::new(stalled),
        }
    }

    /// Stop letting actions through
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    /// Let actions through again and return the action to issue.
    ///
    /// Leaving the stalled state restarts with `reset`, since the data may be
    /// stale. Resuming an active gate asks for `current` to refresh the
    /// present page.
    pub fn resume(&self) -> NavigationAction {
        if self.stalled.swap(false, Ordering::SeqCst) {
            NavigationAction::Reset
        } else {
            NavigationAction::Current
        }
    }

    /// Check if the gate is stalled
    pub fn is_stalled(&self) -> bool {
        self.stalled.load(Ordering::SeqCst)
    }

    /// Check if an action may pass
    pub fn admits(&self) -> bool {
        !self.is_stalled()
    }
}
