//! In-memory data source
//!
//! Keeps a collection of JSON records and executes queries against it the
//! way a document store does: filters first, then ordering with an implicit
//! id tie-break, then cursor bounds, then limits.

use super::types::{Clause, DataSource, Query, Snapshot, SnapshotStream};
use crate::error::{Error, Result};
use crate::types::{FilterEntry, FilterOperator, JsonObject, JsonValue, SortDirection, SortEntry};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

/// A record stored in a [`MemorySource`]
///
/// The record doubles as the source's anchor type: an anchor is a snapshot
/// of the record as it was fetched, so scans resume by its field values
/// even after the record itself has been changed or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Record identifier
    pub id: String,
    /// Record fields
    pub data: JsonValue,
}

impl MemoryRecord {
    /// Create a record
    pub fn new(id: impl Into<String>, data: JsonValue) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Look up a field by dotted path (e.g. `author.name`)
    pub fn field(&self, path: &str) -> Option<&JsonValue> {
        let mut current = &self.data;
        for part in path.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

/// In-memory, mutable, ordered collection of JSON records
#[derive(Debug, Default)]
pub struct MemorySource {
    records: RwLock<Vec<MemoryRecord>>,
    failures: Mutex<VecDeque<String>>,
    latency: Mutex<Option<Duration>>,
    executions: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `records`
    pub fn from_records(records: impl IntoIterator<Item = MemoryRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Create a source from a JSON array of objects, taking each record's
    /// id from `id_field`
    pub fn from_json_array(value: JsonValue, id_field: &str) -> Result<Self> {
        let JsonValue::Array(items) = value else {
            return Err(Error::config("Records must be a JSON array"));
        };

        let mut records = Vec::with_capacity(items.len());
        let mut seen = HashSet::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let JsonValue::Object(object) = item else {
                return Err(Error::config(format!("Record {index} is not a JSON object")));
            };
            let id = record_id(&object, id_field)
                .ok_or_else(|| {
                    Error::config(format!(
                        "Record {index} has no string or numeric '{id_field}' field"
                    ))
                })?;
            if !seen.insert(id.clone()) {
                return Err(Error::config(format!("Record {index} repeats id '{id}'")));
            }
            records.push(MemoryRecord::new(id, JsonValue::Object(object)));
        }

        Ok(Self::from_records(records))
    }

    /// Insert a record, replacing any record with the same id
    pub async fn insert(&self, record: MemoryRecord) {
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            records.push(record);
        }
    }

    /// Remove a record by id
    pub async fn remove(&self, id: &str) -> Option<MemoryRecord> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.id == id)?;
        Some(records.remove(index))
    }

    /// Replace the whole collection
    pub async fn replace(&self, records: impl IntoIterator<Item = MemoryRecord>) {
        *self.records.write().await = records.into_iter().collect();
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the collection is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Make the next execution fail with a data source error
    pub fn fail_next(&self, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message.into());
    }

    /// Delay every execution by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap_or_else(PoisonError::into_inner) = latency;
    }

    /// Number of executions started so far
    pub fn executions(&self) -> usize {
        self.executions.load(AtomicOrdering::SeqCst)
    }

    /// Run a query against the current records
    async fn run(&self, query: &Query<MemoryRecord>) -> Result<Vec<MemoryRecord>> {
        validate_clause_order(query)?;

        let orderings: Vec<&SortEntry> = query.orderings().collect();
        let records = self.records.read().await;

        let mut matched: Vec<MemoryRecord> = records
            .iter()
            .filter(|r| query.filters().all(|f| matches_filter(r, f)))
            .filter(|r| orderings.iter().all(|s| r.field(&s.field).is_some()))
            .cloned()
            .collect();
        drop(records);

        matched.sort_by(|a, b| compare_records(a, b, &orderings));

        for clause in query.clauses() {
            match clause {
                Clause::StartAt(anchor) => {
                    matched.retain(|r| compare_records(r, anchor, &orderings) != Ordering::Less);
                }
                Clause::EndBefore(anchor) => {
                    matched.retain(|r| compare_records(r, anchor, &orderings) == Ordering::Less);
                }
                _ => {}
            }
        }

        match query.clauses().iter().rev().find(|c| {
            matches!(c, Clause::LimitFirst(_) | Clause::LimitLast(_))
        }) {
            Some(Clause::LimitFirst(n)) => matched.truncate(*n),
            Some(Clause::LimitLast(n)) => {
                let skip = matched.len().saturating_sub(*n);
                matched.drain(..skip);
            }
            _ => {}
        }

        Ok(matched)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    type Record = JsonValue;
    type Anchor = MemoryRecord;

    async fn execute(
        &self,
        query: &Query<MemoryRecord>,
    ) -> Result<SnapshotStream<JsonValue, MemoryRecord>> {
        self.executions.fetch_add(1, AtomicOrdering::SeqCst);

        let latency = *self.latency.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(message) = failure {
            return Err(Error::data_source(message));
        }

        let snapshots: Vec<Result<Snapshot<JsonValue, MemoryRecord>>> = self
            .run(query)
            .await?
            .into_iter()
            .map(|record| {
                Ok(Snapshot {
                    id: record.id.clone(),
                    data: record.data.clone(),
                    anchor: record,
                })
            })
            .collect();

        Ok(stream::iter(snapshots).boxed())
    }
}

fn record_id(object: &JsonObject, id_field: &str) -> Option<String> {
    match object.get(id_field)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Filters have to come before orderings, and cursors and limits after both
fn validate_clause_order<A>(query: &Query<A>) -> Result<()> {
    let mut seen_order = false;
    let mut seen_bound = false;
    for clause in query.clauses() {
        match clause {
            Clause::FilterBy(f) if seen_order || seen_bound => {
                return Err(Error::query(format!(
                    "filter on '{}' must precede ordering and bounds",
                    f.field
                )));
            }
            Clause::OrderBy(s) if seen_bound => {
                return Err(Error::query(format!(
                    "ordering on '{}' must precede cursors and limits",
                    s.field
                )));
            }
            Clause::OrderBy(_) => seen_order = true,
            Clause::StartAt(_) | Clause::EndBefore(_) | Clause::LimitFirst(_) | Clause::LimitLast(_) => {
                seen_bound = true;
            }
            Clause::FilterBy(_) => {}
        }
    }
    Ok(())
}

fn matches_filter(record: &MemoryRecord, filter: &FilterEntry) -> bool {
    let Some(field) = record.field(&filter.field) else {
        return false;
    };
    let value = &filter.value;

    match filter.operator {
        FilterOperator::Equal => values_equal(field, value),
        FilterOperator::NotEqual => !values_equal(field, value),
        FilterOperator::LessThan => same_kind(field, value) && compare_values(field, value).is_lt(),
        FilterOperator::LessThanOrEqual => {
            same_kind(field, value) && compare_values(field, value).is_le()
        }
        FilterOperator::GreaterThan => same_kind(field, value) && compare_values(field, value).is_gt(),
        FilterOperator::GreaterThanOrEqual => {
            same_kind(field, value) && compare_values(field, value).is_ge()
        }
        FilterOperator::ArrayContains => field
            .as_array()
            .is_some_and(|items| items.iter().any(|i| values_equal(i, value))),
        FilterOperator::ArrayContainsAny => match (field.as_array(), value.as_array()) {
            (Some(items), Some(candidates)) => items
                .iter()
                .any(|i| candidates.iter().any(|c| values_equal(i, c))),
            _ => false,
        },
        FilterOperator::In => value
            .as_array()
            .is_some_and(|candidates| candidates.iter().any(|c| values_equal(field, c))),
        FilterOperator::NotIn => value
            .as_array()
            .is_some_and(|candidates| !candidates.iter().any(|c| values_equal(field, c))),
    }
}

/// Compare two records by the orderings, breaking ties on id in the
/// direction of the last ordering
fn compare_records(a: &MemoryRecord, b: &MemoryRecord, orderings: &[&SortEntry]) -> Ordering {
    for sort in orderings {
        let ord = match (a.field(&sort.field), b.field(&sort.field)) {
            (Some(x), Some(y)) => compare_values(x, y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = apply_direction(ord, sort.direction);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    let direction = orderings.last().map_or(SortDirection::Asc, |s| s.direction);
    apply_direction(a.id.cmp(&b.id), direction)
}

fn apply_direction(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Type ordering: null < bool < number < string < array < object
fn kind_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

fn same_kind(a: &JsonValue, b: &JsonValue) -> bool {
    kind_rank(a) == kind_rank(b)
}

fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    same_kind(a, b) && compare_values(a, b) == Ordering::Equal
}

/// Total order over JSON values
fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            for (i, j) in x.iter().zip(y.iter()) {
                let ord = compare_values(i, j);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (JsonValue::Object(x), JsonValue::Object(y)) => {
            JsonValue::Object(x.clone())
                .to_string()
                .cmp(&JsonValue::Object(y.clone()).to_string())
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}
