//! Item transformer

use super::types::PageItem;
use crate::source::Snapshot;

/// Wrap fetched records into page items.
///
/// The record at index `i` is displayed iff `i < page_size`; the overfetched
/// tail is handed on already hidden.
pub fn transform<T, A>(page: Vec<Snapshot<T, A>>, page_size: usize) -> Vec<PageItem<T>> {
    page.into_iter()
        .enumerate()
        .map(|(index, snapshot)| PageItem {
            id: snapshot.id,
            display_in_pagination: index < page_size,
            data: snapshot.data,
        })
        .collect()
}
