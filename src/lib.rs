// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # anchor-pager
//!
//! Cursor-based forward/backward pagination over an ordered, filterable
//! collection that lives behind a query interface.
//!
//! ## Features
//!
//! - **Anchor Cursors**: Pages resume from records, not offsets
//! - **Overfetch Boundaries**: One extra record per page tells whether more follow
//! - **Self-Correcting**: Inconsistent pages are repaired by re-navigating
//! - **Supersession**: Only the latest action's result is ever applied
//! - **Stall / Resume**: Pause querying without losing the paginator's place
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anchor_pager::{MemorySource, Paginator, PaginatorConfig, SortEntry};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anchor_pager::Result<()> {
//!     let source = Arc::new(MemorySource::from_json_array(records, "id")?);
//!     let config = PaginatorConfig::new()
//!         .with_page_size(5)
//!         .with_sort(vec![SortEntry::asc("rank")]);
//!
//!     let pager = Paginator::new(source, config)?;
//!     let mut pages = pager.subscribe();
//!
//!     let page = pages.next().await.unwrap()?;
//!     println!("{:?} next={}", page.visible_ids(), pager.flags().next_enabled);
//!
//!     pager.next();
//!     let page = pages.next().await.unwrap()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Paginator                               │
//! │  first() prev() next() last() set_sort() set_filter() stall()    │
//! │  subscribe() → Stream<Page>          flags() → NavigationFlags   │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────┬──────────┬─────────┴─────┬─────────────┬──────────────┐
//! │ Channel  │  Gate    │  Query        │  Processor  │  Transform   │
//! ├──────────┼──────────┼───────────────┼─────────────┼──────────────┤
//! │ Latest   │ Stall    │ Filter, Sort  │ Boundaries  │ Hidden tail  │
//! │ Replay   │ Resume   │ Cursor, Limit │ Corrections │ Page items   │
//! └──────────┴──────────┴───────────────┴─────────────┴──────────────┘
//!                                 │
//!                     DataSource (MemorySource, ...)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document FilterOperator variants and the CLI surface

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paginator configuration
pub mod config;

/// Queryable data sources
pub mod source;

/// Pagination engine
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::PaginatorConfig;
pub use pagination::{NavigationAction, NavigationFlags, Page, PageItem, PageStream, Paginator};
pub use source::{DataSource, MemoryRecord, MemorySource, Query};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
