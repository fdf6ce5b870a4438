//! Queryable data source module
//!
//! The paginator never stores records itself. Every page is fetched by
//! handing a [`Query`] to a [`DataSource`], which executes it against the
//! underlying ordered, filterable collection.
//!
//! # Overview
//!
//! The source module provides:
//! - `Query` / `Clause` - A bounded, sorted, filtered query description
//! - `DataSource` - The async capability the paginator consumes
//! - `MemorySource` - An in-memory JSON collection implementing it

mod memory;
mod types;

pub use memory::{MemoryRecord, MemorySource};
pub use types::{Clause, DataSource, Query, Snapshot, SnapshotStream};
