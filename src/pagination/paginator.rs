//! Paginator
//!
//! Owns the pagination state and drives the pipeline:
//!
//! ```text
//! paginate(action) → ActionChannel → StallGate → build_query → DataSource
//!        ▲                                                          │
//!        └──── corrective action ◄── processor ◄────────────────────┘
//!                                        │
//!                                   transform → Page
//! ```
//!
//! Only the result of the most recently issued action is ever applied to
//! the state or emitted. A newer action, corrective ones included, drops
//! interest in any query still in flight.

use super::channel::{ActionChannel, ActionReceiver, Dispatch};
use super::gate::StallGate;
use super::processor::{self, PageOutcome};
use super::query::build_query;
use super::transform::transform;
use super::types::{NavigationAction, NavigationFlags, Page, PaginatorState};
use crate::config::{validate_page_size, PaginatorConfig};
use crate::error::Result;
use crate::source::{DataSource, Query, Snapshot};
use crate::types::{FilterEntry, FilterSpec, SortEntry, SortSpec};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Stream of pages produced by one subscription
pub type PageStream<T> = BoxStream<'static, Result<Page<T>>>;

/// State shared between the paginator handle and its pipeline
struct Shared<S: DataSource> {
    source: Arc<S>,
    channel: ActionChannel,
    gate: StallGate,
    state: Mutex<PaginatorState<S::Anchor>>,
    flags: watch::Sender<NavigationFlags>,
    subscription: AtomicU64,
    max_corrections: usize,
}

impl<S: DataSource> Shared<S> {
    fn state(&self) -> MutexGuard<'_, PaginatorState<S::Anchor>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cursor-based paginator over a [`DataSource`]
pub struct Paginator<S: DataSource> {
    shared: Arc<Shared<S>>,
}

impl<S: DataSource> Paginator<S> {
    /// Create a paginator. Nothing is fetched until a subscription exists.
    pub fn new(source: Arc<S>, config: PaginatorConfig) -> Result<Self> {
        config.validate()?;

        let (flags, _) = watch::channel(NavigationFlags::default());
        let shared = Shared {
            source,
            channel: ActionChannel::new(NavigationAction::First),
            gate: StallGate::new(config.stalled),
            state: Mutex::new(PaginatorState::new(
                config.page_size,
                config.sort,
                config.filter,
            )),
            flags,
            subscription: AtomicU64::new(0),
            max_corrections: config.max_corrections,
        };

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Issue a navigation action
    pub fn paginate(&self, action: NavigationAction) {
        let dispatch = self.shared.channel.paginate(action);
        debug!(
            "Issued {} (generation {})",
            dispatch.action, dispatch.generation
        );
    }

    /// Go to the first page
    pub fn first(&self) {
        self.paginate(NavigationAction::First);
    }

    /// Go to the last page
    pub fn last(&self) {
        self.paginate(NavigationAction::Last);
    }

    /// Go to the next page
    pub fn next(&self) {
        self.paginate(NavigationAction::Next);
    }

    /// Go to the previous page
    pub fn previous(&self) {
        self.paginate(NavigationAction::Prev);
    }

    /// Alias of [`Paginator::previous`]
    pub fn prev(&self) {
        self.previous();
    }

    // ========================================================================
    // Sort, filter and page size
    // ========================================================================

    /// Replace the sort specification (`None` clears it) and restart
    pub fn set_sort(&self, sort: Option<SortSpec>) {
        self.shared.state().sort = sort.unwrap_or_default();
        self.paginate(NavigationAction::Reset);
    }

    /// Replace the sort entry on the same field and restart.
    ///
    /// Returns `false` without touching anything if no entry sorts on
    /// `entry.field`.
    pub fn set_sort_value(&self, entry: SortEntry) -> bool {
        {
            let mut state = self.shared.state();
            let Some(slot) = state.sort.iter_mut().find(|s| s.field == entry.field) else {
                debug!("No sort entry on '{}', ignoring", entry.field);
                return false;
            };
            *slot = entry;
        }
        self.paginate(NavigationAction::Reset);
        true
    }

    /// Replace the filter specification (`None` clears it) and restart
    pub fn set_filter(&self, filter: Option<FilterSpec>) {
        self.shared.state().filter = filter.unwrap_or_default();
        self.paginate(NavigationAction::Reset);
    }

    /// Replace the filter entry on the same field and restart.
    ///
    /// Returns `false` without touching anything if no entry filters on
    /// `entry.field`.
    pub fn set_filter_value(&self, entry: FilterEntry) -> bool {
        {
            let mut state = self.shared.state();
            let Some(slot) = state.filter.iter_mut().find(|f| f.field == entry.field) else {
                debug!("No filter entry on '{}', ignoring", entry.field);
                return false;
            };
            *slot = entry;
        }
        self.paginate(NavigationAction::Reset);
        true
    }

    /// Change the page size and re-fetch the present page
    pub fn set_page_size(&self, page_size: usize) -> Result<()> {
        validate_page_size(page_size)?;
        self.shared.state().page_size = page_size;
        self.paginate(NavigationAction::Current);
        Ok(())
    }

    // ========================================================================
    // Stall / resume
    // ========================================================================

    /// Stop querying; actions issued while stalled are dropped
    pub fn stall(&self) {
        self.shared.gate.stall();
        debug!("Paginator stalled");
    }

    /// Resume querying.
    ///
    /// Coming out of a stall restarts with `reset`. Calling this while
    /// already active refreshes the present page with `current`.
    pub fn resume(&self) {
        let action = self.shared.gate.resume();
        debug!("Paginator resumed with {action}");
        self.paginate(action);
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Start a new subscription.
    ///
    /// The stream first replays the latest action, then follows every
    /// action issued afterwards. Starting a subscription ends any older one.
    /// A data source error is yielded as an `Err` item; the stream then
    /// waits for the next action.
    pub fn subscribe(&self) -> PageStream<S::Record> {
        let subscription = self.shared.subscription.fetch_add(1, Ordering::SeqCst) + 1;
        let mut actions = self.shared.channel.subscribe();
        let pending = Some(actions.latest());

        let pipeline = Pipeline {
            shared: Arc::clone(&self.shared),
            actions,
            subscription,
            pending,
            corrections: 0,
            correction_generation: None,
        };

        stream::unfold(pipeline, |mut pipeline| async move {
            let item = pipeline.next_page().await?;
            Some((item, pipeline))
        })
        .boxed()
    }

    /// Flags of the most recently emitted page
    pub fn flags(&self) -> NavigationFlags {
        *self.shared.flags.borrow()
    }

    /// Receiver notified whenever a page is emitted with new flags
    pub fn watch_flags(&self) -> watch::Receiver<NavigationFlags> {
        self.shared.flags.subscribe()
    }

    /// Current page size
    pub fn page_size(&self) -> usize {
        self.shared.state().page_size
    }

    /// Current sort specification
    pub fn sort(&self) -> SortSpec {
        self.shared.state().sort.clone()
    }

    /// Current filter specification
    pub fn filter(&self) -> FilterSpec {
        self.shared.state().filter.clone()
    }

    /// Check if the paginator is stalled
    pub fn is_stalled(&self) -> bool {
        self.shared.gate.is_stalled()
    }

    /// Read-only copy of the paginator state
    pub fn snapshot(&self) -> PaginatorState<S::Anchor> {
        self.shared.state().clone()
    }
}

impl<S: DataSource> Drop for Paginator<S> {
    fn drop(&mut self) {
        self.shared.channel.close();
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Outcome of waiting on a query
enum Fetch<T, A> {
    Done(Result<Vec<Snapshot<T, A>>>),
    Superseded(Option<Dispatch>),
}

/// One subscription's processing loop
struct Pipeline<S: DataSource> {
    shared: Arc<Shared<S>>,
    actions: ActionReceiver,
    subscription: u64,
    pending: Option<Dispatch>,
    corrections: usize,
    correction_generation: Option<u64>,
}

impl<S: DataSource> Pipeline<S> {
    fn is_active(&self) -> bool {
        !self.actions.is_closed()
            && self.shared.subscription.load(Ordering::SeqCst) == self.subscription
    }

    /// Run actions until one produces a page, or the subscription ends
    async fn next_page(&mut self) -> Option<Result<Page<S::Record>>> {
        loop {
            let dispatch = match self.pending.take() {
                Some(dispatch) => dispatch,
                None => self.actions.changed().await?,
            };
            if !self.is_active() {
                return None;
            }

            if self.correction_generation != Some(dispatch.generation) {
                self.corrections = 0;
            }

            if !self.shared.gate.admits() {
                debug!("Stalled, dropping {}", dispatch.action);
                continue;
            }

            let (query, page_size) = {
                let mut state = self.shared.state();
                state.flags = NavigationFlags::default();
                (build_query(dispatch.action, &state), state.page_size)
            };
            debug!(
                "Fetching {} (generation {}) with {} clauses",
                dispatch.action,
                dispatch.generation,
                query.clauses().len()
            );

            let fetched = tokio::select! {
                biased;
                newer = self.actions.changed() => Fetch::Superseded(newer),
                result = fetch(self.shared.source.as_ref(), &query) => Fetch::Done(result),
            };

            let page = match fetched {
                Fetch::Superseded(Some(newer)) => {
                    debug!(
                        "{} superseded by {} before its query finished",
                        dispatch.action, newer.action
                    );
                    self.pending = Some(newer);
                    continue;
                }
                Fetch::Superseded(None) => return None,
                Fetch::Done(Err(e)) => {
                    if !self.is_active() {
                        return None;
                    }
                    if !self.actions.is_current(dispatch.generation) {
                        debug!("Dropping error from superseded {}: {e}", dispatch.action);
                        continue;
                    }
                    warn!("Query for {} failed: {e}", dispatch.action);
                    return Some(Err(e));
                }
                Fetch::Done(Ok(page)) => page,
            };

            if !self.is_active() {
                return None;
            }
            if !self.actions.is_current(dispatch.generation) {
                debug!("Discarding stale result for {}", dispatch.action);
                continue;
            }

            if let Some(page) = self.apply(dispatch, page, page_size) {
                return Some(Ok(page));
            }
        }
    }

    /// Process a fetched page. Returns `None` when a corrective action was
    /// issued instead.
    fn apply(
        &mut self,
        dispatch: Dispatch,
        page: Vec<Snapshot<S::Record, S::Anchor>>,
        page_size: usize,
    ) -> Option<Page<S::Record>> {
        let mut state = self.shared.state();
        let outcome = processor::process(
            dispatch.action,
            &page,
            page_size,
            state.first_item_id.as_deref(),
        );

        let settlement = match outcome {
            PageOutcome::Settled(settlement) => settlement,
            PageOutcome::Correct(corrective) if self.corrections < self.shared.max_corrections => {
                drop(state);
                info!(
                    "{} returned {} records for page size {page_size}, correcting with {corrective}",
                    dispatch.action,
                    page.len()
                );
                self.corrections += 1;
                let issued = self.shared.channel.paginate(corrective);
                self.correction_generation = Some(issued.generation);
                return None;
            }
            PageOutcome::Correct(corrective) => {
                warn!(
                    "Giving up on {corrective} after {} consecutive corrections, settling {} as fetched",
                    self.corrections, dispatch.action
                );
                processor::settle(
                    dispatch.action,
                    &page,
                    page_size,
                    state.first_item_id.as_deref(),
                )
            }
        };

        state.first_item_id = settlement.first_item_id;
        state.anchors = settlement.anchors;
        state.flags = settlement.flags;
        drop(state);

        self.corrections = 0;
        self.correction_generation = None;
        self.shared.flags.send_replace(settlement.flags);

        Some(Page {
            action: dispatch.action,
            items: transform(page, page_size),
            flags: settlement.flags,
        })
    }
}

/// Execute a query and collect its one-shot result
async fn fetch<S: DataSource>(
    source: &S,
    query: &Query<S::Anchor>,
) -> Result<Vec<Snapshot<S::Record, S::Anchor>>> {
    source.execute(query).await?.try_collect().await
}
