//! Pagination module
//!
//! Cursor-based forward/backward navigation over an ordered, filterable
//! collection that is only reachable through queries.
//!
//! # Overview
//!
//! The paginator never knows the collection's size. Each page is fetched
//! with one extra record; whether that record came back tells if another
//! page follows. Pages whose boundaries turn out inconsistent (a backward
//! scan running off the start, a forward scan running off the end, a page
//! that vanished) are repaired by issuing a corrective action.
//!
//! - `channel` - Latest-action broadcast with generation counter
//! - `gate` - Stall / resume
//! - `query` - Builds the bounded query for an action
//! - `processor` - Boundary detection and corrective transitions
//! - `transform` - Marks the overfetched tail as hidden
//! - `paginator` - The `Paginator` handle and its pipeline

mod channel;
mod gate;
mod paginator;
mod processor;
mod query;
mod transform;
mod types;

pub use channel::{ActionChannel, ActionReceiver, Dispatch};
pub use gate::StallGate;
pub use paginator::{PageStream, Paginator};
pub use processor::{correction, process, settle, PageOutcome, Settlement};
pub use query::build_query;
pub use transform::transform;
pub use types::{Anchors, NavigationAction, NavigationFlags, Page, PageItem, PaginatorState};

#[cfg(test)]
mod tests;
