//! Tests for pagination module

use super::*;
use crate::config::PaginatorConfig;
use crate::error::{Error, Result};
use crate::source::{Clause, DataSource, MemoryRecord, MemorySource, Query, Snapshot, SnapshotStream};
use crate::types::{FilterEntry, FilterOperator, SortEntry};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use tokio_test::{assert_pending, assert_ready};

fn snap(id: &str) -> Snapshot<(), String> {
    Snapshot {
        id: id.to_string(),
        anchor: id.to_string(),
        data: (),
    }
}

fn snaps(ids: &[&str]) -> Vec<Snapshot<(), String>> {
    ids.iter().map(|id| snap(id)).collect()
}

fn ranked_source(n: usize) -> Arc<MemorySource> {
    Arc::new(MemorySource::from_records((1..=n).map(|i| {
        MemoryRecord::new(format!("r{i:02}"), json!({"rank": i, "odd": i % 2 == 1}))
    })))
}

fn ranked_pager(source: &Arc<MemorySource>, page_size: usize) -> Paginator<MemorySource> {
    let config = PaginatorConfig::new()
        .with_page_size(page_size)
        .with_sort(vec![SortEntry::asc("rank")]);
    Paginator::new(Arc::clone(source), config).unwrap()
}

async fn next_page(pages: &mut PageStream<Value>) -> Page<Value> {
    pages.next().await.expect("stream ended").expect("query failed")
}

// ============================================================================
// NavigationAction Tests
// ============================================================================

#[test]
fn test_action_fetch_width() {
    assert_eq!(NavigationAction::First.fetch_width(5), 6);
    assert_eq!(NavigationAction::Next.fetch_width(5), 6);
    assert_eq!(NavigationAction::Current.fetch_width(5), 6);
    assert_eq!(NavigationAction::Last.fetch_width(5), 5);
    assert_eq!(NavigationAction::Next.fetch_width(usize::MAX), usize::MAX);
}

#[test]
fn test_action_parse_and_display() {
    assert_eq!("previous".parse::<NavigationAction>().unwrap(), NavigationAction::Prev);
    assert_eq!(" Next ".parse::<NavigationAction>().unwrap(), NavigationAction::Next);
    assert!("jump".parse::<NavigationAction>().is_err());
    assert_eq!(NavigationAction::Reset.to_string(), "reset");

    let action: NavigationAction = serde_json::from_value(json!("previous")).unwrap();
    assert_eq!(action, NavigationAction::Prev);
}

#[test]
fn test_restart_actions() {
    assert!(NavigationAction::First.is_restart());
    assert!(NavigationAction::Reset.is_restart());
    assert!(!NavigationAction::Current.is_restart());
    assert!(!NavigationAction::Last.is_restart());
}

// ============================================================================
// Query Builder Tests
// ============================================================================

fn anchored_state(prev: Option<&str>, next: Option<&str>) -> PaginatorState<String> {
    let mut state = PaginatorState::new(
        5,
        vec![SortEntry::asc("rank")],
        vec![FilterEntry::eq("status", "active")],
    );
    state.anchors = Anchors {
        prev: prev.map(String::from),
        next: next.map(String::from),
    };
    state
}

#[test_case(NavigationAction::First, Clause::LimitFirst(6), None ; "first ignores anchors")]
#[test_case(NavigationAction::Reset, Clause::LimitFirst(6), None ; "reset ignores anchors")]
#[test_case(NavigationAction::Prev, Clause::LimitLast(6), Some(Clause::EndBefore("p".to_string())) ; "prev ends before prev anchor")]
#[test_case(NavigationAction::Next, Clause::LimitFirst(6), Some(Clause::StartAt("n".to_string())) ; "next starts at next anchor")]
#[test_case(NavigationAction::Current, Clause::LimitFirst(6), Some(Clause::StartAt("p".to_string())) ; "current starts at prev anchor")]
#[test_case(NavigationAction::Last, Clause::LimitLast(5), None ; "last takes trailing page without overfetch")]
fn test_build_query_with_anchors(
    action: NavigationAction,
    limit: Clause<String>,
    cursor: Option<Clause<String>>,
) {
    let query = build_query(action, &anchored_state(Some("p"), Some("n")));

    let mut expected = vec![
        Clause::FilterBy(FilterEntry::eq("status", "active")),
        Clause::OrderBy(SortEntry::asc("rank")),
    ];
    expected.extend(cursor);
    expected.push(limit);
    assert_eq!(query.clauses(), expected.as_slice());
}

#[test_case(NavigationAction::Prev ; "prev")]
#[test_case(NavigationAction::Next ; "next")]
#[test_case(NavigationAction::Current ; "current")]
fn test_build_query_without_anchors_falls_back_to_first(action: NavigationAction) {
    let state = anchored_state(None, None);
    assert_eq!(
        build_query(action, &state),
        build_query(NavigationAction::First, &state)
    );
}

#[test]
fn test_build_query_applies_filters_then_sorts_in_order() {
    let mut state: PaginatorState<String> = PaginatorState::new(
        2,
        vec![SortEntry::desc("score"), SortEntry::asc("name")],
        vec![
            FilterEntry::eq("kind", "post"),
            FilterEntry::new("score", FilterOperator::GreaterThan, 3),
        ],
    );
    state.anchors.next = Some("x".to_string());

    let query = build_query(NavigationAction::Next, &state);
    assert_eq!(
        query.clauses(),
        &[
            Clause::FilterBy(FilterEntry::eq("kind", "post")),
            Clause::FilterBy(FilterEntry::new("score", FilterOperator::GreaterThan, 3)),
            Clause::OrderBy(SortEntry::desc("score")),
            Clause::OrderBy(SortEntry::asc("name")),
            Clause::StartAt("x".to_string()),
            Clause::LimitFirst(3),
        ]
    );
}

// ============================================================================
// Processor Tests
// ============================================================================

#[test]
fn test_process_first_page_records_first_item() {
    let page = snaps(&["a", "b", "c", "d"]);
    let PageOutcome::Settled(settled) = process(NavigationAction::First, &page, 3, None) else {
        panic!("Expected Settled");
    };
    assert_eq!(settled.first_item_id.as_deref(), Some("a"));
    assert_eq!(settled.flags, NavigationFlags::new(false, true));
    assert_eq!(settled.anchors.prev.as_deref(), Some("b"));
    assert_eq!(settled.anchors.next.as_deref(), Some("d"));
}

#[test]
fn test_process_middle_page_enables_everything() {
    let page = snaps(&["d", "e", "f", "g"]);
    let PageOutcome::Settled(settled) = process(NavigationAction::Next, &page, 3, Some("a")) else {
        panic!("Expected Settled");
    };
    assert_eq!(settled.first_item_id.as_deref(), Some("a"));
    assert_eq!(
        settled.flags,
        NavigationFlags {
            first_enabled: true,
            previous_enabled: true,
            next_enabled: true,
            last_enabled: true,
        }
    );
}

#[test]
fn test_process_empty_page() {
    let empty = snaps(&[]);
    for action in [
        NavigationAction::Next,
        NavigationAction::Prev,
        NavigationAction::Current,
        NavigationAction::Last,
    ] {
        assert_eq!(
            process(action, &empty, 3, Some("a")),
            PageOutcome::Correct(NavigationAction::Reset)
        );
    }

    let PageOutcome::Settled(settled) = process(NavigationAction::Reset, &empty, 3, Some("a"))
    else {
        panic!("Expected Settled");
    };
    assert_eq!(settled.flags, NavigationFlags::default());
    assert_eq!(settled.anchors, Anchors::default());
    assert_eq!(settled.first_item_id, None);
}

#[test]
fn test_process_short_prev_resets() {
    let page = snaps(&["a", "b"]);
    assert_eq!(
        process(NavigationAction::Prev, &page, 3, Some("a")),
        PageOutcome::Correct(NavigationAction::Reset)
    );
}

#[test]
fn test_process_short_next_jumps_to_last() {
    let page = snaps(&["j", "k"]);
    assert_eq!(
        process(NavigationAction::Next, &page, 3, Some("a")),
        PageOutcome::Correct(NavigationAction::Last)
    );
}

#[test]
fn test_process_short_next_on_first_page_settles() {
    let page = snaps(&["a", "b"]);
    let PageOutcome::Settled(settled) = process(NavigationAction::Next, &page, 3, Some("a")) else {
        panic!("Expected Settled");
    };
    assert_eq!(settled.flags, NavigationFlags::default());
}

#[test]
fn test_process_last_never_corrects() {
    let page = snaps(&["k", "l"]);
    let PageOutcome::Settled(settled) = process(NavigationAction::Last, &page, 3, Some("a")) else {
        panic!("Expected Settled");
    };
    assert_eq!(settled.flags, NavigationFlags::new(true, false));
    assert_eq!(settled.anchors.prev.as_deref(), Some("l"));
    assert_eq!(settled.anchors.next.as_deref(), Some("l"));
}

#[test]
fn test_settle_single_record_page_has_no_prev_anchor() {
    let page = snaps(&["a"]);
    let settled = settle(NavigationAction::First, &page, 3, None);
    assert_eq!(settled.anchors.prev, None);
    assert_eq!(settled.anchors.next.as_deref(), Some("a"));
}

#[test]
fn test_correction_without_known_first_item() {
    let page = snaps(&["a", "b"]);
    assert_eq!(
        correction(NavigationAction::Next, &page, 3, None),
        Some(NavigationAction::Last)
    );
    assert_eq!(correction(NavigationAction::Current, &page, 3, None), None);
}

// ============================================================================
// Transformer Tests
// ============================================================================

#[test]
fn test_transform_hides_overfetch_tail() {
    let items = transform(snaps(&["a", "b", "c", "d"]), 3);
    let visible: Vec<bool> = items.iter().map(|i| i.display_in_pagination).collect();
    assert_eq!(visible, vec![true, true, true, false]);
    assert_eq!(items[3].id, "d");
}

#[test]
fn test_transform_short_page_all_visible() {
    let items = transform(snaps(&["a", "b"]), 3);
    assert!(items.iter().all(|i| i.display_in_pagination));
}

// ============================================================================
// Channel and Gate Tests
// ============================================================================

#[test]
fn test_channel_keeps_only_latest() {
    let channel = ActionChannel::new(NavigationAction::First);
    channel.paginate(NavigationAction::Next);
    let issued = channel.paginate(NavigationAction::Last);
    assert_eq!(issued.generation, 2);

    let mut receiver = channel.subscribe();
    assert_eq!(
        receiver.latest(),
        Dispatch {
            action: NavigationAction::Last,
            generation: 2,
        }
    );
    assert!(receiver.is_current(2));
    channel.paginate(NavigationAction::Prev);
    assert!(!receiver.is_current(2));
}

#[tokio::test]
async fn test_channel_changed_and_close() {
    let channel = ActionChannel::new(NavigationAction::First);
    let mut receiver = channel.subscribe();
    receiver.latest();

    channel.paginate(NavigationAction::Next);
    let dispatch = receiver.changed().await.unwrap();
    assert_eq!(dispatch.action, NavigationAction::Next);

    channel.close();
    assert!(channel.is_closed());
    assert_eq!(receiver.changed().await, None);
}

#[test]
fn test_gate_resume_depends_on_prior_state() {
    let gate = StallGate::new(false);
    assert!(gate.admits());
    assert_eq!(gate.resume(), NavigationAction::Current);

    gate.stall();
    assert!(!gate.admits());
    assert_eq!(gate.resume(), NavigationAction::Reset);
    assert!(gate.admits());
    assert_eq!(gate.resume(), NavigationAction::Current);
}

// ============================================================================
// Paginator Tests
// ============================================================================

#[test]
fn test_paginator_rejects_invalid_config() {
    let source = ranked_source(3);
    let err = Paginator::new(source, PaginatorConfig::new().with_page_size(0))
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[tokio::test]
async fn test_subscribe_replays_initial_first() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();

    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::First);
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04", "r05"]);
    assert_eq!(page.len(), 6);
    assert!(!page.items[5].display_in_pagination);
    assert_eq!(pager.flags(), NavigationFlags::new(false, true));
    assert_eq!(pager.snapshot().first_item_id.as_deref(), Some("r01"));
}

#[tokio::test]
async fn test_prev_from_second_page() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    pager.next();
    next_page(&mut pages).await;

    pager.prev();
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Prev);
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04", "r05"]);
    assert_eq!(page.flags, NavigationFlags::new(false, true));
}

#[tokio::test]
async fn test_prev_past_start_snaps_to_first_page() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    pager.previous();
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Reset);
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04", "r05"]);
    assert!(!page.flags.first_enabled);
    assert!(!page.flags.previous_enabled);
}

#[tokio::test]
async fn test_set_page_size_refetches_current() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;
    pager.next();
    next_page(&mut pages).await;

    pager.set_page_size(3).unwrap();
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Current);
    assert_eq!(page.visible_ids(), vec!["r07", "r08", "r09"]);
    assert_eq!(page.len(), 4);
    assert_eq!(pager.page_size(), 3);

    assert!(pager.set_page_size(0).is_err());
    assert_eq!(pager.page_size(), 3);
}

#[tokio::test]
async fn test_set_page_size_rejects_overflowing_width() {
    let source = ranked_source(4);
    let pager = ranked_pager(&source, 2);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    assert!(pager.set_page_size(usize::MAX).is_err());
    assert_eq!(pager.page_size(), 2);

    pager.set_page_size(crate::config::MAX_PAGE_SIZE).unwrap();
    let page = next_page(&mut pages).await;
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04"]);
    assert!(!page.flags.next_enabled);
}

#[tokio::test]
async fn test_set_sort_and_filter_reset() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 3);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    assert!(pager.set_sort_value(SortEntry::desc("rank")));
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Reset);
    assert_eq!(page.visible_ids(), vec!["r12", "r11", "r10"]);

    pager.set_filter(Some(vec![FilterEntry::eq("odd", true)]));
    let page = next_page(&mut pages).await;
    assert_eq!(page.visible_ids(), vec!["r11", "r09", "r07"]);

    assert!(pager.set_filter_value(FilterEntry::eq("odd", false)));
    let page = next_page(&mut pages).await;
    assert_eq!(page.visible_ids(), vec!["r12", "r10", "r08"]);
    assert_eq!(pager.filter(), vec![FilterEntry::eq("odd", false)]);

    pager.set_sort(None);
    let page = next_page(&mut pages).await;
    assert_eq!(page.visible_ids(), vec!["r02", "r04", "r06"]);
    assert!(pager.sort().is_empty());
}

#[tokio::test]
async fn test_set_value_on_unknown_field_is_ignored() {
    let source = ranked_source(4);
    let pager = ranked_pager(&source, 2);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    assert!(!pager.set_sort_value(SortEntry::desc("missing")));
    assert!(!pager.set_filter_value(FilterEntry::eq("missing", 1)));
    assert_eq!(pager.sort(), vec![SortEntry::asc("rank")]);
    assert!(pager.filter().is_empty());

    let mut pending = tokio_test::task::spawn(pages.next());
    assert_pending!(pending.poll());
    assert_eq!(source.executions(), 1);
}

#[tokio::test]
async fn test_empty_collection_settles_on_empty_page() {
    let source = Arc::new(MemorySource::new());
    let pager = Paginator::new(Arc::clone(&source), PaginatorConfig::new()).unwrap();
    let mut pages = pager.subscribe();

    let page = next_page(&mut pages).await;
    assert!(page.is_empty());
    assert_eq!(page.flags, NavigationFlags::default());

    pager.last();
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Reset);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_vanished_page_resets() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;
    pager.next();
    next_page(&mut pages).await;

    for i in 6..=12 {
        source.remove(&format!("r{i:02}")).await;
    }

    pager.next();
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Reset);
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04", "r05"]);
    assert_eq!(page.flags, NavigationFlags::default());
}

#[tokio::test]
async fn test_stall_drops_actions_until_resume() {
    let source = ranked_source(12);
    let config = PaginatorConfig::new()
        .with_page_size(5)
        .with_sort(vec![SortEntry::asc("rank")])
        .with_stalled(true);
    let pager = Paginator::new(Arc::clone(&source), config).unwrap();
    assert!(pager.is_stalled());

    let mut pages = pager.subscribe();
    let mut pending = tokio_test::task::spawn(pages.next());
    assert_pending!(pending.poll());

    pager.next();
    assert!(pending.is_woken());
    assert_pending!(pending.poll());
    assert_eq!(source.executions(), 0);

    pager.resume();
    let page = assert_ready!(pending.poll()).unwrap().unwrap();
    assert_eq!(page.action, NavigationAction::Reset);
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04", "r05"]);
    assert_eq!(source.executions(), 1);
}

#[tokio::test]
async fn test_resume_while_active_refreshes_current() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    source
        .insert(MemoryRecord::new("r02", json!({"rank": 2, "odd": false, "edited": true})))
        .await;
    pager.resume();
    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Current);
    assert_eq!(page.items[0].id, "r02");
    assert_eq!(page.items[0].data["edited"], json!(true));
}

#[tokio::test]
async fn test_stall_then_resume_restarts() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;
    pager.next();
    next_page(&mut pages).await;

    pager.stall();
    pager.next();
    pager.resume();
    assert!(!pager.is_stalled());

    let page = next_page(&mut pages).await;
    assert_eq!(page.action, NavigationAction::Reset);
    assert_eq!(page.visible_ids(), vec!["r01", "r02", "r03", "r04", "r05"]);
}

#[tokio::test]
async fn test_data_source_error_is_forwarded_then_recovers() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    source.fail_next("permission denied");

    let mut pages = pager.subscribe();
    let err = pages.next().await.unwrap().unwrap_err();
    assert!(err.is_data_source());
    assert_eq!(err.to_string(), "Data source error: permission denied");

    pager.first();
    let page = next_page(&mut pages).await;
    assert_eq!(page.visible_ids().len(), 5);
}

#[tokio::test]
async fn test_watch_flags_follow_emitted_pages() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut flags = pager.watch_flags();
    let mut pages = pager.subscribe();

    next_page(&mut pages).await;
    assert!(flags.has_changed().unwrap());
    assert_eq!(*flags.borrow_and_update(), NavigationFlags::new(false, true));

    pager.last();
    next_page(&mut pages).await;
    assert_eq!(*flags.borrow_and_update(), NavigationFlags::new(true, false));
}

#[tokio::test]
async fn test_new_subscription_ends_older_one() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut older = pager.subscribe();
    next_page(&mut older).await;

    let mut newer = pager.subscribe();
    let page = next_page(&mut newer).await;
    assert_eq!(page.action, NavigationAction::First);

    pager.next();
    assert!(older.next().await.is_none());
    let page = next_page(&mut newer).await;
    assert_eq!(page.action, NavigationAction::Next);
}

#[tokio::test]
async fn test_dropping_paginator_ends_stream() {
    let source = ranked_source(3);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    drop(pager);
    assert!(pages.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_action_supersedes_query_in_flight() {
    let source = ranked_source(12);
    let pager = ranked_pager(&source, 5);
    let mut pages = pager.subscribe();
    next_page(&mut pages).await;

    source.set_latency(Some(Duration::from_millis(100)));
    pager.next();
    let pending = tokio::spawn(async move {
        let page = pages.next().await;
        (page, pages)
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(source.executions(), 2);
    pager.last();

    let (page, _pages) = pending.await.unwrap();
    let page = page.unwrap().unwrap();
    assert_eq!(page.action, NavigationAction::Last);
    assert_eq!(page.visible_ids(), vec!["r08", "r09", "r10", "r11", "r12"]);

    let state = pager.snapshot();
    assert_eq!(state.anchors.prev.map(|a| a.id).as_deref(), Some("r09"));
    assert_eq!(state.anchors.next.map(|a| a.id).as_deref(), Some("r12"));
    assert_eq!(source.executions(), 3);
}

// ============================================================================
// Correction Guard Tests
// ============================================================================

/// Answers cursor queries with a short page, `limit_last` with nothing and
/// everything else with a single record
struct ScriptedSource;

#[async_trait]
impl DataSource for ScriptedSource {
    type Record = Value;
    type Anchor = String;

    async fn execute(&self, query: &Query<String>) -> Result<SnapshotStream<Value, String>> {
        let has_cursor = query
            .clauses()
            .iter()
            .any(|c| matches!(c, Clause::StartAt(_)));
        let is_last = query
            .clauses()
            .iter()
            .any(|c| matches!(c, Clause::LimitLast(_)));

        let ids: Vec<&str> = if is_last {
            vec![]
        } else if has_cursor {
            vec!["b"]
        } else {
            vec!["a"]
        };
        let snapshots: Vec<_> = ids
            .into_iter()
            .map(|id| {
                Ok(Snapshot {
                    id: id.to_string(),
                    anchor: id.to_string(),
                    data: json!({ "id": id }),
                })
            })
            .collect();
        Ok(stream::iter(snapshots).boxed())
    }
}

#[tokio::test]
async fn test_correction_chain_settles_on_reset() {
    let pager = Paginator::new(Arc::new(ScriptedSource), PaginatorConfig::new()).unwrap();
    let mut pages = pager.subscribe();
    pages.next().await.unwrap().unwrap();

    // next → short → last → empty → reset
    pager.next();
    let page = pages.next().await.unwrap().unwrap();
    assert_eq!(page.action, NavigationAction::Reset);
    assert_eq!(page.items[0].id, "a");
}

#[tokio::test]
async fn test_correction_guard_settles_page_as_fetched() {
    let config = PaginatorConfig::new().with_max_corrections(1);
    let pager = Paginator::new(Arc::new(ScriptedSource), config).unwrap();
    let mut pages = pager.subscribe();
    pages.next().await.unwrap().unwrap();

    pager.next();
    let page = pages.next().await.unwrap().unwrap();
    assert_eq!(page.action, NavigationAction::Last);
    assert!(page.is_empty());
    assert_eq!(page.flags, NavigationFlags::default());
}
