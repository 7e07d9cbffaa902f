//! Review engine: the four components behind one configuration
//!
//! The engine holds no item state. Callers load [`TrackedItem`]s, pass them
//! in together with `now`, and persist whatever comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::decay::{DecayAlert, DecayModel, DecayOverview, DecayState, DecayStatus};
use crate::error::{EngineError, Result};
use crate::item::ItemRef;
use crate::ledger::PracticeLedger;
use crate::priority::{PriorityRanker, ReviewCandidate};
use crate::scheduler::{
    feedback_message, QueueStats, RecallQuality, ReviewScheduler, ReviewStatus, SchedulingState,
};

// ============================================================================
// TYPES
// ============================================================================

/// An item together with its scheduling and optional decay state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem {
    pub item: ItemRef,
    pub schedule: SchedulingState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<DecayState>,
}

/// Result of submitting one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// The item with updated state, to be persisted by the caller
    pub item: TrackedItem,
    /// Left the learning ladder with this review
    pub graduated: bool,
    /// The review was a failed recall
    pub lapsed: bool,
    /// Crossed the leech threshold with this review
    pub became_leech: bool,
    pub message: String,
}

/// One row of a review queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// 1-based position in the queue
    pub position: usize,
    pub item: ItemRef,
    pub priority: f64,
    pub days_overdue: i64,
    pub status: ReviewStatus,
    pub decay_score: u8,
    pub decay_status: DecayStatus,
    pub ease_factor: f64,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Spaced-repetition engine over one configuration
#[derive(Debug, Clone, Default)]
pub struct ReviewEngine {
    config: EngineConfig,
    scheduler: ReviewScheduler,
    decay: DecayModel,
    ranker: PriorityRanker,
    ledger: PracticeLedger,
}

impl ReviewEngine {
    /// Build an engine, rejecting unusable configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: ReviewScheduler::new(config.scheduler.clone()),
            decay: DecayModel::new(config.decay.clone()),
            ranker: PriorityRanker::new(config.priority.clone()),
            ledger: PracticeLedger::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    pub fn decay_model(&self) -> &DecayModel {
        &self.decay
    }

    pub fn ranker(&self) -> &PriorityRanker {
        &self.ranker
    }

    pub fn ledger(&self) -> &PracticeLedger {
        &self.ledger
    }

    /// Start tracking a new item, due immediately
    ///
    /// Decay tracking is only set up when a difficulty is given.
    pub fn track(&self, item: ItemRef, now: DateTime<Utc>, difficulty: Option<u8>) -> TrackedItem {
        debug!(item = %item, ?difficulty, "Tracking new item");
        TrackedItem {
            item,
            schedule: self.scheduler.new_state(now),
            decay: difficulty.map(|d| self.decay.track(d)),
        }
    }

    /// Apply a review to a tracked item
    ///
    /// Fails with [`EngineError::Suspended`] when the item is suspended.
    pub fn submit_review(
        &self,
        tracked: &TrackedItem,
        quality: i32,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        self.submit_timed_review(tracked, quality, None, now)
    }

    /// Apply a review and add the time spent on it to the item's total
    pub fn submit_timed_review(
        &self,
        tracked: &TrackedItem,
        quality: i32,
        time_taken_seconds: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        if tracked.schedule.is_suspended() {
            return Err(EngineError::Suspended(tracked.item.clone()));
        }

        let rating = RecallQuality::from_score(quality);
        let mut schedule = self.scheduler.advance(&tracked.schedule, quality, now);
        if let Some(seconds) = time_taken_seconds {
            schedule.total_time_seconds = schedule.total_time_seconds.saturating_add(seconds as u64);
        }
        let decay = tracked
            .decay
            .as_ref()
            .map(|d| self.decay.reset(d, now, rating.score() as i32));

        let graduated = !tracked.schedule.is_graduated() && schedule.is_graduated();
        let lapsed = !rating.is_success();
        let became_leech = !tracked.schedule.is_leech && schedule.is_leech;

        info!(
            item = %tracked.item,
            quality = rating.score(),
            ?time_taken_seconds,
            interval_days = schedule.interval_days,
            status = %schedule.status,
            "Review submitted"
        );
        if graduated {
            info!(item = %tracked.item, "Item graduated to review");
        }
        if became_leech {
            info!(item = %tracked.item, lapses = schedule.lapse_count, "Item became a leech");
        }

        let message = feedback_message(rating, schedule.interval_days);
        Ok(ReviewOutcome {
            item: TrackedItem {
                item: tracked.item.clone(),
                schedule,
                decay,
            },
            graduated,
            lapsed,
            became_leech,
            message,
        })
    }

    /// Remove an item from every queue
    pub fn suspend(&self, tracked: &TrackedItem) -> TrackedItem {
        info!(item = %tracked.item, "Item suspended");
        TrackedItem {
            schedule: self.scheduler.suspend(&tracked.schedule),
            ..tracked.clone()
        }
    }

    /// Put a suspended item back into its previous phase
    pub fn unsuspend(&self, tracked: &TrackedItem) -> TrackedItem {
        info!(item = %tracked.item, "Item unsuspended");
        TrackedItem {
            schedule: self.scheduler.unsuspend(&tracked.schedule),
            ..tracked.clone()
        }
    }

    /// The `limit` most urgent due items
    ///
    /// Items without decay tracking count as fully retained. Stored schedules
    /// are normalized before ranking.
    pub fn build_queue(
        &self,
        items: &[TrackedItem],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<QueueEntry> {
        let candidates: Vec<ReviewCandidate> = items
            .iter()
            .filter(|t| t.schedule.is_due(now))
            .map(|t| {
                let schedule = self.scheduler.normalize(&t.schedule);
                ReviewCandidate {
                    item: t.item.clone(),
                    next_review_at: schedule.next_review_at,
                    decay_score: t
                        .decay
                        .as_ref()
                        .map(|d| self.decay.evaluate(d, now).score)
                        .unwrap_or(100),
                    ease_factor: schedule.ease_factor,
                    status: schedule.status,
                }
            })
            .collect();

        let queue: Vec<QueueEntry> = self
            .ranker
            .due_queue(candidates, now, limit)
            .into_iter()
            .enumerate()
            .map(|(i, ranked)| QueueEntry {
                position: i + 1,
                decay_status: DecayStatus::from_score(ranked.candidate.decay_score),
                item: ranked.candidate.item,
                priority: ranked.score,
                days_overdue: ranked.days_overdue,
                status: ranked.candidate.status,
                decay_score: ranked.candidate.decay_score,
                ease_factor: ranked.candidate.ease_factor,
            })
            .collect();

        debug!(total = items.len(), queued = queue.len(), limit, "Built review queue");
        queue
    }

    /// Workload counts over all items
    pub fn queue_stats(&self, items: &[TrackedItem], now: DateTime<Utc>) -> QueueStats {
        QueueStats::compute(items.iter().map(|t| &t.schedule), now, &self.config.queue)
    }

    /// Decay overview over the items that have decay tracking
    pub fn decay_overview(&self, items: &[TrackedItem], now: DateTime<Utc>) -> DecayOverview {
        self.decay
            .overview(items.iter().filter_map(|t| t.decay.as_ref()), now)
    }

    /// Decay alerts over the items that have decay tracking
    pub fn critical_alerts(
        &self,
        items: &[TrackedItem],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<DecayAlert> {
        self.decay.critical_alerts(
            items
                .iter()
                .filter_map(|t| t.decay.as_ref().map(|d| (&t.item, d))),
            now,
            limit,
        )
    }

    /// Find an item by reference
    pub fn find<'a>(&self, items: &'a [TrackedItem], item: &ItemRef) -> Option<&'a TrackedItem> {
        items.iter().find(|t| &t.item == item)
    }
}

// ============================================================================
// TESTS
// ============================================================================
