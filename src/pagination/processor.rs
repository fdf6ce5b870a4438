//! Page processor
//!
//! Interprets an overfetched page. The only information about the
//! collection's size is whether the extra record came back, so boundaries
//! are inferred from the returned count and the id of the canonical first
//! record.
//!
//! Transition table for a page of `n` records fetched with width `w`:
//!
//! | action          | condition                         | outcome              |
//! |-----------------|-----------------------------------|----------------------|
//! | not first/reset | `n == 0`                          | correct with `reset` |
//! | `prev`          | `0 < n < w`                       | correct with `reset` |
//! | `next`          | `0 < n < w`, not on the first page | correct with `last`  |
//! | anything else   |                                   | settle               |
//!
//! `reset` never corrects, and `last` only corrects on an empty collection,
//! so a stable collection settles after at most two corrections.

use super::types::{Anchors, NavigationAction, NavigationFlags};
use crate::source::Snapshot;

/// What to store after a page settles
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement<A> {
    /// Availability flags for the page
    pub flags: NavigationFlags,
    /// Anchors into the page
    pub anchors: Anchors<A>,
    /// Id of the canonical first record
    pub first_item_id: Option<String>,
}

/// Result of processing one fetched page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<A> {
    /// The page is consistent and can be emitted
    Settled(Settlement<A>),
    /// The page is inconsistent; navigate again with this action
    Correct(NavigationAction),
}

/// Process a fetched page
pub fn process<T, A: Clone>(
    action: NavigationAction,
    page: &[Snapshot<T, A>],
    page_size: usize,
    first_item_id: Option<&str>,
) -> PageOutcome<A> {
    match correction(action, page, page_size, first_item_id) {
        Some(corrective) => PageOutcome::Correct(corrective),
        None => PageOutcome::Settled(settle(action, page, page_size, first_item_id)),
    }
}

/// Corrective action for an inconsistent page, if any
pub fn correction<T, A>(
    action: NavigationAction,
    page: &[Snapshot<T, A>],
    page_size: usize,
    first_item_id: Option<&str>,
) -> Option<NavigationAction> {
    let Some(head) = page.first() else {
        // The requested page vanished underneath the cursor
        return (!action.is_restart()).then_some(NavigationAction::Reset);
    };

    let short = page.len() < action.fetch_width(page_size);
    match action {
        // Scanned backward past the true start
        NavigationAction::Prev if short => Some(NavigationAction::Reset),
        // Scanned forward past the true end
        NavigationAction::Next if short && Some(head.id.as_str()) != first_item_id => {
            Some(NavigationAction::Last)
        }
        _ => None,
    }
}

/// Settle a page: recompute flags and anchors from scratch
pub fn settle<T, A: Clone>(
    action: NavigationAction,
    page: &[Snapshot<T, A>],
    page_size: usize,
    first_item_id: Option<&str>,
) -> Settlement<A> {
    let first_item_id = if action.is_restart() {
        page.first().map(|s| s.id.clone())
    } else {
        first_item_id.map(ToOwned::to_owned)
    };

    let Some(head) = page.first() else {
        return Settlement {
            flags: NavigationFlags::default(),
            anchors: Anchors::default(),
            first_item_id,
        };
    };

    let has_next = page.len() == page_size.saturating_add(1);
    let has_previous = Some(head.id.as_str()) != first_item_id.as_deref();

    Settlement {
        flags: NavigationFlags::new(has_previous, has_next),
        anchors: Anchors {
            prev: page.get(1).map(|s| s.anchor.clone()),
            next: page.last().map(|s| s.anchor.clone()),
        },
        first_item_id,
    }
}
