//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Tracked items in every lifecycle phase
//! - Batch generation for queue and decay scenarios
//! - Practice date patterns for streak tests

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use revisit_core::{ItemKind, ItemRef, ReviewEngine, TrackedItem};
use uuid::Uuid;

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let engine = ReviewEngine::default();
/// let owner = TestDataFactory::owner();
///
/// // A brand new item, due immediately
/// let card = TestDataFactory::new_item(&engine, &owner, TestDataFactory::epoch());
///
/// // An item that has walked the whole learning ladder
/// let (graduated, at) = TestDataFactory::graduated_item(&engine, &owner, TestDataFactory::epoch());
/// ```
pub struct TestDataFactory;

/// Configuration for batch item generation
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of items to create
    pub count: usize,
    /// Item kind to use
    pub kind: ItemKind,
    /// Item `i` is due `i % overdue_spread_days` days before `now`
    pub overdue_spread_days: i64,
    /// Whether to set up decay tracking
    pub with_decay: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 10,
            kind: ItemKind::Flashcard,
            overdue_spread_days: 5,
            with_decay: true,
        }
    }
}

impl TestDataFactory {
    /// Fixed instant every scenario starts from
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
    }

    /// A fresh owner id
    pub fn owner() -> String {
        Uuid::new_v4().to_string()
    }

    /// A fresh item reference for `owner`
    pub fn item_ref(owner: &str, kind: ItemKind) -> ItemRef {
        ItemRef::new(owner, kind, Uuid::new_v4().to_string())
    }

    /// A new flashcard with decay tracking at difficulty 50
    pub fn new_item(engine: &ReviewEngine, owner: &str, now: DateTime<Utc>) -> TrackedItem {
        engine.track(Self::item_ref(owner, ItemKind::Flashcard), now, Some(50))
    }

    /// An item reviewed with quality 4 on schedule until it graduates
    ///
    /// Returns the item and the instant of the graduating review.
    pub fn graduated_item(
        engine: &ReviewEngine,
        owner: &str,
        start: DateTime<Utc>,
    ) -> (TrackedItem, DateTime<Utc>) {
        let mut item = Self::new_item(engine, owner, start);
        let mut at = start;
        loop {
            let outcome = engine.submit_review(&item, 4, at).unwrap();
            item = outcome.item;
            if outcome.graduated {
                return (item, at);
            }
            at = item.schedule.next_review_at;
        }
    }

    /// Review `item` on its due date with each quality in turn
    pub fn review_on_schedule(
        engine: &ReviewEngine,
        item: &TrackedItem,
        qualities: &[i32],
    ) -> TrackedItem {
        let mut current = item.clone();
        for &q in qualities {
            let at = current.schedule.next_review_at;
            current = engine.submit_review(&current, q, at).unwrap().item;
        }
        current
    }

    /// Items with staggered due dates
    pub fn create_batch(
        engine: &ReviewEngine,
        owner: &str,
        now: DateTime<Utc>,
        config: BatchConfig,
    ) -> Vec<TrackedItem> {
        (0..config.count)
            .map(|i| {
                let days_late = i as i64 % config.overdue_spread_days.max(1);
                let difficulty = config.with_decay.then_some(((i * 13) % 100) as u8 + 1);
                engine.track(
                    Self::item_ref(owner, config.kind),
                    now - Duration::days(days_late),
                    difficulty,
                )
            })
            .collect()
    }

    /// Dates ending at `end`; `pattern[i]` marks whether day `end - (len - 1 - i)` was practiced
    pub fn practice_dates(end: NaiveDate, pattern: &[bool]) -> Vec<NaiveDate> {
        let len = pattern.len() as i64;
        pattern
            .iter()
            .enumerate()
            .filter(|(_, practiced)| **practiced)
            .map(|(i, _)| end - Duration::days(len - 1 - i as i64))
            .collect()
    }

    /// Round-trip items through the JSON snapshot format
    pub fn via_snapshot(items: &[TrackedItem]) -> Vec<TrackedItem> {
        let json = serde_json::to_string(items).unwrap();
        serde_json::from_str(&json).unwrap()
    }
}
