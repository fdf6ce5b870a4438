//! Data source types and traits
//!
//! Defines the query description and the capability every backing
//! store has to provide.

use crate::error::Result;
use crate::types::{FilterEntry, SortEntry};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A single query clause, in the order it was applied
#[derive(Debug, Clone, PartialEq)]
pub enum Clause<A> {
    /// Keep only records matching the filter
    FilterBy(FilterEntry),
    /// Order by a field. Multiple clauses compose in sequence.
    OrderBy(SortEntry),
    /// Start the ordered scan at the anchored record, inclusive
    StartAt(A),
    /// End the ordered scan before the anchored record, exclusive
    EndBefore(A),
    /// Keep the first `n` records of the scan
    LimitFirst(usize),
    /// Keep the last `n` records of the scan
    LimitLast(usize),
}

/// A bounded, sorted, filtered query against a data source
#[derive(Debug, Clone, PartialEq)]
pub struct Query<A> {
    clauses: Vec<Clause<A>>,
}

impl<A> Default for Query<A> {
    fn default() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }
}

impl<A> Query<A> {
    /// Create an unbounded query over the whole collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter clause
    #[must_use]
    pub fn filter_by(mut self, filter: FilterEntry) -> Self {
        self.clauses.push(Clause::FilterBy(filter));
        self
    }

    /// Add an ordering clause
    #[must_use]
    pub fn order_by(mut self, sort: SortEntry) -> Self {
        self.clauses.push(Clause::OrderBy(sort));
        self
    }

    /// Start at the anchored record (inclusive)
    #[must_use]
    pub fn start_at(mut self, anchor: A) -> Self {
        self.clauses.push(Clause::StartAt(anchor));
        self
    }

    /// End before the anchored record (exclusive)
    #[must_use]
    pub fn end_before(mut self, anchor: A) -> Self {
        self.clauses.push(Clause::EndBefore(anchor));
        self
    }

    /// Limit to the first `n` records
    #[must_use]
    pub fn limit_first(mut self, n: usize) -> Self {
        self.clauses.push(Clause::LimitFirst(n));
        self
    }

    /// Limit to the last `n` records
    #[must_use]
    pub fn limit_last(mut self, n: usize) -> Self {
        self.clauses.push(Clause::LimitLast(n));
        self
    }

    /// Clauses in application order
    pub fn clauses(&self) -> &[Clause<A>] {
        &self.clauses
    }

    /// Filter clauses in application order
    pub fn filters(&self) -> impl Iterator<Item = &FilterEntry> {
        self.clauses.iter().filter_map(|c| match c {
            Clause::FilterBy(f) => Some(f),
            _ => None,
        })
    }

    /// Ordering clauses in application order
    pub fn orderings(&self) -> impl Iterator<Item = &SortEntry> {
        self.clauses.iter().filter_map(|c| match c {
            Clause::OrderBy(s) => Some(s),
            _ => None,
        })
    }

    /// Record limit of the query, if bounded
    pub fn limit(&self) -> Option<usize> {
        self.clauses.iter().rev().find_map(|c| match c {
            Clause::LimitFirst(n) | Clause::LimitLast(n) => Some(*n),
            _ => None,
        })
    }
}

/// One record returned by a query execution
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T, A> {
    /// Stable identifier of the record
    pub id: String,
    /// Reference that can resume an ordered scan at this record
    pub anchor: A,
    /// The record itself
    pub data: T,
}

/// One-shot sequence of snapshots produced by a single execution
pub type SnapshotStream<T, A> = BoxStream<'static, Result<Snapshot<T, A>>>;

/// Capability consumed by the paginator
///
/// Implementations re-run the query on every call; nothing is cached by
/// the paginator between executions.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Record payload
    type Record: Clone + Send + Sync + 'static;

    /// Opaque reference to a record, used with `StartAt` / `EndBefore`
    type Anchor: Clone + Send + Sync + 'static;

    /// Execute a query, yielding the matching records in scan order
    async fn execute(
        &self,
        query: &Query<Self::Anchor>,
    ) -> Result<SnapshotStream<Self::Record, Self::Anchor>>;
}
