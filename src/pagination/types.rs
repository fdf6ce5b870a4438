//! Pagination types
//!
//! Navigation actions, availability flags, emitted pages and the state a
//! paginator owns between pages.

use crate::error::Error;
use crate::types::{FilterSpec, SortSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationAction {
    /// Re-fetch the present page
    Current,
    /// Jump to the first page
    First,
    /// Step one page backward
    #[serde(alias = "previous")]
    Prev,
    /// Step one page forward
    Next,
    /// Jump to the last page
    Last,
    /// Restart from the first page
    Reset,
}

impl NavigationAction {
    /// `first` and `reset` both restart at the canonical first page
    pub fn is_restart(self) -> bool {
        matches!(self, Self::First | Self::Reset)
    }

    /// Number of records fetched for a page of `page_size` items.
    ///
    /// Every action overfetches one record to learn whether another page
    /// follows, except `last` which is terminal already.
    pub fn fetch_width(self, page_size: usize) -> usize {
        match self {
            Self::Last => page_size,
            _ => page_size.saturating_add(1),
        }
    }

    /// Lowercase name of the action
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for NavigationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "first" => Ok(Self::First),
            "prev" | "previous" => Ok(Self::Prev),
            "next" => Ok(Self::Next),
            "last" => Ok(Self::Last),
            "reset" => Ok(Self::Reset),
            other => Err(Error::invalid_value(
                "action",
                format!("unknown navigation action '{other}'"),
            )),
        }
    }
}

/// Which navigation actions lead somewhere from the current page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationFlags {
    /// A first page other than this one exists
    pub first_enabled: bool,
    /// A previous page exists
    pub previous_enabled: bool,
    /// A next page exists
    pub next_enabled: bool,
    /// A last page other than this one exists
    pub last_enabled: bool,
}

impl NavigationFlags {
    /// Flags derived from a settled page
    pub fn new(has_previous: bool, has_next: bool) -> Self {
        Self {
            first_enabled: has_previous,
            previous_enabled: has_previous,
            next_enabled: has_next,
            last_enabled: has_next,
        }
    }
}

/// One item of an emitted page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageItem<T> {
    /// Record identifier
    pub id: String,
    /// `false` for the overfetched record that only exists for boundary
    /// detection
    pub display_in_pagination: bool,
    /// The record
    pub data: T,
}

/// A page emitted by the paginator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Action whose result this page is
    pub action: NavigationAction,
    /// Fetched items, overfetch tail included
    pub items: Vec<PageItem<T>>,
    /// Navigation availability for this page
    pub flags: NavigationFlags,
}

impl<T> Page<T> {
    /// Items meant to be displayed
    pub fn visible(&self) -> impl Iterator<Item = &PageItem<T>> {
        self.items.iter().filter(|item| item.display_in_pagination)
    }

    /// Ids of the displayed items
    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible().map(|item| item.id.as_str()).collect()
    }

    /// Total number of items, hidden ones included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Anchors into the most recently settled page
#[derive(Debug, Clone, PartialEq)]
pub struct Anchors<A> {
    /// Second record of the page, for paging backward
    pub prev: Option<A>,
    /// Last record of the page, for paging forward
    pub next: Option<A>,
}

impl<A> Default for Anchors<A> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
        }
    }
}

/// Everything a paginator owns between pages
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatorState<A> {
    /// Visible items per page
    pub page_size: usize,
    /// Sort specification
    pub sort: SortSpec,
    /// Filter specification
    pub filter: FilterSpec,
    /// Id of the first record of the canonical first page
    pub first_item_id: Option<String>,
    /// Anchors of the last settled page
    pub anchors: Anchors<A>,
    /// Flags of the navigation cycle in progress
    pub flags: NavigationFlags,
}

impl<A> PaginatorState<A> {
    /// Fresh state with no page fetched yet
    pub fn new(page_size: usize, sort: SortSpec, filter: FilterSpec) -> Self {
        Self {
            page_size,
            sort,
            filter,
            first_item_id: None,
            anchors: Anchors::default(),
            flags: NavigationFlags::default(),
        }
    }
}
