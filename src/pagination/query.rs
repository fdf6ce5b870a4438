//! Query builder
//!
//! Turns an action plus the held sort, filter and anchors into a bounded
//! query. Filters are applied before orderings, orderings before cursors
//! and limits.

use super::types::{NavigationAction, PaginatorState};
use crate::source::Query;

/// Build the query that fetches the page for `action`
pub fn build_query<A: Clone>(action: NavigationAction, state: &PaginatorState<A>) -> Query<A> {
    let query = state
        .filter
        .iter()
        .cloned()
        .fold(Query::new(), Query::filter_by);
    let query = state.sort.iter().cloned().fold(query, Query::order_by);

    let width = action.fetch_width(state.page_size);
    match action {
        NavigationAction::First | NavigationAction::Reset => query.limit_first(width),
        NavigationAction::Prev => match &state.anchors.prev {
            Some(anchor) => query.end_before(anchor.clone()).limit_last(width),
            None => query.limit_first(width),
        },
        NavigationAction::Next => match &state.anchors.next {
            Some(anchor) => query.start_at(anchor.clone()).limit_first(width),
            None => query.limit_first(width),
        },
        NavigationAction::Current => match &state.anchors.prev {
            Some(anchor) => query.start_at(anchor.clone()).limit_first(width),
            None => query.limit_first(width),
        },
        NavigationAction::Last => query.limit_last(width),
    }
}
