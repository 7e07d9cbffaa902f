//! Aggregate decay views: per-status overview and low-retention alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{DecayModel, DecayState, DecayStatus};
use crate::item::ItemRef;

/// Scores below this are flagged [`Urgency::Critical`]
pub const ALERT_CRITICAL_SCORE: u8 = 30;

/// Counts of tracked items per decay status at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayOverview {
    pub total: usize,
    pub fresh: usize,
    pub stable: usize,
    pub decaying: usize,
    pub critical: usize,
    pub forgotten: usize,
    /// Mean score to one decimal; 0.0 with nothing tracked
    pub average_score: f64,
    /// Items whose advisory review date is today or earlier
    pub items_due_today: usize,
}

/// How loudly an alert should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Urgent,
    Warning,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::Urgent => "urgent",
            Urgency::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An item whose retention fell below the warning threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayAlert {
    pub item: ItemRef,
    pub score: u8,
    pub status: DecayStatus,
    pub last_practiced_at: Option<DateTime<Utc>>,
    /// Whole days since the last practice, if ever practiced
    pub days_since_practice: Option<i64>,
    pub urgency: Urgency,
}

impl DecayModel {
    /// Evaluate every state and tally the results
    pub fn overview<'a>(
        &self,
        states: impl IntoIterator<Item = &'a DecayState>,
        now: DateTime<Utc>,
    ) -> DecayOverview {
        let today = now.date_naive();
        let mut overview = DecayOverview::default();
        let mut score_sum: u64 = 0;

        for state in states {
            let report = self.evaluate(state, now);
            overview.total += 1;
            score_sum += report.score as u64;
            match report.status {
                DecayStatus::Fresh => overview.fresh += 1,
                DecayStatus::Stable => overview.stable += 1,
                DecayStatus::Decaying => overview.decaying += 1,
                DecayStatus::Critical => overview.critical += 1,
                DecayStatus::Forgotten => overview.forgotten += 1,
            }
            if state.next_review_date.is_some_and(|d| d <= today) {
                overview.items_due_today += 1;
            }
        }

        if overview.total > 0 {
            let mean = score_sum as f64 / overview.total as f64;
            overview.average_score = (mean * 10.0).round() / 10.0;
        }
        overview
    }

    /// Items scoring below the warning threshold, weakest first
    pub fn critical_alerts<'a>(
        &self,
        items: impl IntoIterator<Item = (&'a ItemRef, &'a DecayState)>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<DecayAlert> {
        let config = self.config();
        let mut alerts: Vec<DecayAlert> = items
            .into_iter()
            .filter_map(|(item, state)| {
                let report = self.evaluate(state, now);
                if report.score >= config.warning_threshold {
                    return None;
                }
                let urgency = if report.score < ALERT_CRITICAL_SCORE {
                    Urgency::Critical
                } else if report.score < config.critical_threshold {
                    Urgency::Urgent
                } else {
                    Urgency::Warning
                };
                Some(DecayAlert {
                    item: item.clone(),
                    score: report.score,
                    status: report.status,
                    last_practiced_at: state.last_practiced_at,
                    days_since_practice: state.last_practiced_at.map(|t| (now - t).num_days()),
                    urgency,
                })
            })
            .collect();

        alerts.sort_by_key(|a| a.score);
        alerts.truncate(limit);
        alerts
    }
}

// ============================================================================
// TESTS
// ============================================================================
