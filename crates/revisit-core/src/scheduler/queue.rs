//! Review queue statistics

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{ReviewStatus, SchedulingState};
use crate::config::QueueConfig;

/// Counts describing one user's review workload at a given instant
///
/// "Today" is the UTC calendar day containing `now`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    /// Due at or before `now`
    pub due_now: usize,
    /// Due before the end of today
    pub due_today: usize,
    /// Items in the learning phase
    pub learning_count: usize,
    /// Items in the review phase
    pub review_count: usize,
    /// Due before the start of today
    pub overdue_count: usize,
    /// Rough time needed for today's reviews
    pub estimated_minutes: u32,
}

impl QueueStats {
    /// Tally the given states. Suspended items only count towards nothing.
    pub fn compute<'a>(
        states: impl IntoIterator<Item = &'a SchedulingState>,
        now: DateTime<Utc>,
        config: &QueueConfig,
    ) -> Self {
        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let today_end = today_start + Duration::days(1);

        let mut stats = QueueStats::default();
        for state in states {
            match state.status {
                ReviewStatus::Suspended => continue,
                ReviewStatus::Learning => stats.learning_count += 1,
                ReviewStatus::Review => stats.review_count += 1,
            }
            if state.next_review_at <= now {
                stats.due_now += 1;
            }
            if state.next_review_at <= today_end {
                stats.due_today += 1;
            }
            if state.next_review_at < today_start {
                stats.overdue_count += 1;
            }
        }
        stats.estimated_minutes = (stats.due_today as u32).saturating_mul(config.minutes_per_item);
        stats
    }
}

// ============================================================================
// TESTS
// ============================================================================
