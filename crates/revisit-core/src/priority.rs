//! Review priority ranking
//!
//! Combines three signals into one score, highest first:
//!
//! ```text
//! score = max(0, days_overdue) * overdue_per_day
//!       + (100 - decay_score)  * decay
//!       + (ease_pivot - ease)  * difficulty
//! ```
//!
//! With the default weights, one day overdue is worth 10 points, every lost
//! retention point 0.5 and every 0.1 of ease below 3.0 another 0.5.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PriorityWeights;
use crate::item::ItemRef;
use crate::scheduler::ReviewStatus;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The inputs the ranker needs for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCandidate {
    pub item: ItemRef,
    pub next_review_at: DateTime<Utc>,
    pub decay_score: u8,
    pub ease_factor: f64,
    pub status: ReviewStatus,
}

/// A candidate with its computed priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub candidate: ReviewCandidate,
    pub score: f64,
    /// Whole days past due, negative when not yet due
    pub days_overdue: i64,
}

/// Orders review candidates by urgency
#[derive(Debug, Clone, Default)]
pub struct PriorityRanker {
    weights: PriorityWeights,
}

impl PriorityRanker {
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &PriorityWeights {
        &self.weights
    }

    /// Priority of one candidate at `now`
    ///
    /// A decay score above 100 counts as 100. A non-finite ease contributes
    /// nothing to the difficulty term.
    pub fn score(&self, candidate: &ReviewCandidate, now: DateTime<Utc>) -> f64 {
        let w = &self.weights;
        let overdue = days_overdue(candidate.next_review_at, now).max(0) as f64;

        if candidate.decay_score > 100 {
            warn!(
                item = %candidate.item,
                decay_score = candidate.decay_score,
                "Decay score out of range, clamping to 100"
            );
        }
        let lost = 100.0 - candidate.decay_score.min(100) as f64;

        let ease = if candidate.ease_factor.is_finite() {
            candidate.ease_factor
        } else {
            warn!(item = %candidate.item, ease = candidate.ease_factor, "Non-finite ease ignored");
            w.ease_pivot
        };

        overdue * w.overdue_per_day + lost * w.decay + (w.ease_pivot - ease) * w.difficulty
    }

    /// Score and sort all candidates
    ///
    /// Highest score first; ties go to the earliest `next_review_at`, then
    /// to input order.
    pub fn rank(&self, candidates: Vec<ReviewCandidate>, now: DateTime<Utc>) -> Vec<RankedItem> {
        let mut ranked: Vec<RankedItem> = candidates
            .into_iter()
            .map(|candidate| RankedItem {
                score: self.score(&candidate, now),
                days_overdue: days_overdue(candidate.next_review_at, now),
                candidate,
            })
            .collect();

        ranked.sort_by(compare_ranked);
        ranked
    }

    /// The `limit` most urgent candidates that are due and not suspended
    pub fn due_queue(
        &self,
        candidates: Vec<ReviewCandidate>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<RankedItem> {
        let due: Vec<ReviewCandidate> = candidates
            .into_iter()
            .filter(|c| c.status != ReviewStatus::Suspended && c.next_review_at <= now)
            .collect();

        let mut ranked = self.rank(due, now);
        ranked.truncate(limit);
        ranked
    }
}

fn compare_ranked(a: &RankedItem, b: &RankedItem) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.candidate.next_review_at.cmp(&b.candidate.next_review_at))
}

/// Whole days from `next_review_at` to `now`, rounded down
pub fn days_overdue(next_review_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - next_review_at).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).floor() as i64
}

// ============================================================================
// TESTS
// ============================================================================
