//! SuperMemo-2 review scheduler
//!
//! ## Core Formulas:
//! - Ease: EF' = max(MIN_EASE, EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
//! - Review interval: 1 day, then 6 days, then round(I * EF')
//! - Lapse (q < 3): EF' = max(MIN_EASE, EF - 0.2), back to the first learning step

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::state::{RecallQuality, ReviewStatus, SchedulingState};
use crate::config::SchedulerConfig;

/// Ease penalty applied on a lapse
const LAPSE_EASE_PENALTY: f64 = 0.2;

/// Fixed interval of the second review-phase repetition
const SECOND_REVIEW_INTERVAL: u32 = 6;

// ============================================================================
// SCHEDULER
// ============================================================================

/// The spaced-repetition state machine
///
/// Pure: every method takes a state snapshot and returns a new one.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    /// Create a scheduler with the given settings
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// State for an item that just became reviewable
    pub fn new_state(&self, now: DateTime<Utc>) -> SchedulingState {
        SchedulingState::new(now, &self.config)
    }

    /// Apply one review to `state`
    ///
    /// `quality` is clamped to `[0, 5]`; anything below 3 is a lapse.
    /// Suspension is not checked here: a suspended state is scheduled as the
    /// phase it was suspended from.
    pub fn advance(
        &self,
        state: &SchedulingState,
        quality: i32,
        now: DateTime<Utc>,
    ) -> SchedulingState {
        let rating = RecallQuality::from_score(quality);
        if rating.score() as i32 != quality {
            debug!(quality, clamped = rating.score(), "Recall quality out of range, clamped");
        }

        let prior = self.normalize(state);
        let phase = match prior.status {
            ReviewStatus::Suspended => {
                let resumed = prior.suspended_from.unwrap_or(ReviewStatus::Learning);
                warn!(
                    resumed = %resumed,
                    "advance called on a suspended item; scheduling as {}",
                    resumed
                );
                resumed
            }
            status => status,
        };

        let mut next = if rating.is_success() {
            self.on_success(&prior, phase, rating)
        } else {
            self.on_lapse(&prior)
        };

        next.next_review_at = now + Duration::days(next.interval_days as i64);
        next.review_count = prior.review_count.saturating_add(1);
        next.last_review_at = Some(now);
        next.last_quality = Some(rating.score());
        next.suspended_from = None;
        next
    }

    fn on_lapse(&self, prior: &SchedulingState) -> SchedulingState {
        let lapse_count = prior.lapse_count.saturating_add(1);
        let first_step = self.config.learning_steps.first().copied().unwrap_or(0);
        SchedulingState {
            ease_factor: (prior.ease_factor - LAPSE_EASE_PENALTY).max(self.config.min_ease),
            interval_days: self.clamp_interval(first_step as f64),
            repetition_number: 0,
            status: ReviewStatus::Learning,
            lapse_count,
            is_leech: prior.is_leech || lapse_count >= self.config.leech_threshold,
            ..prior.clone()
        }
    }

    fn on_success(
        &self,
        prior: &SchedulingState,
        phase: ReviewStatus,
        rating: RecallQuality,
    ) -> SchedulingState {
        let ease_factor = next_ease(prior.ease_factor, rating).max(self.config.min_ease);
        let steps = &self.config.learning_steps;

        let (raw_interval, status) = match phase {
            ReviewStatus::Review => {
                let days = match prior.repetition_number {
                    0 => self.config.initial_interval as f64,
                    1 => SECOND_REVIEW_INTERVAL as f64,
                    _ => (prior.interval_days as f64 * ease_factor).round(),
                };
                (days, ReviewStatus::Review)
            }
            _ => {
                let rep = prior.repetition_number as usize;
                if rep + 1 < steps.len() {
                    (steps[rep + 1] as f64, ReviewStatus::Learning)
                } else {
                    (self.config.initial_interval as f64, ReviewStatus::Review)
                }
            }
        };

        SchedulingState {
            ease_factor,
            interval_days: self.clamp_interval(raw_interval),
            repetition_number: prior.repetition_number.saturating_add(1),
            status,
            ..prior.clone()
        }
    }

    /// Suspend an item, remembering its phase
    pub fn suspend(&self, state: &SchedulingState) -> SchedulingState {
        if state.status == ReviewStatus::Suspended {
            return state.clone();
        }
        SchedulingState {
            status: ReviewStatus::Suspended,
            suspended_from: Some(state.status),
            ..state.clone()
        }
    }

    /// Lift a suspension, restoring the remembered phase
    ///
    /// When the phase was not recorded, items with successful repetitions
    /// resume in review and the rest in learning.
    pub fn unsuspend(&self, state: &SchedulingState) -> SchedulingState {
        if state.status != ReviewStatus::Suspended {
            return state.clone();
        }
        let status = state.suspended_from.unwrap_or(if state.repetition_number > 0 {
            ReviewStatus::Review
        } else {
            ReviewStatus::Learning
        });
        SchedulingState {
            status,
            suspended_from: None,
            ..state.clone()
        }
    }

    /// Clamp persisted values back into their valid ranges
    ///
    /// Out-of-range values mean something upstream wrote a bad row; they are
    /// repaired rather than rejected so the review loop keeps running.
    pub fn normalize(&self, state: &SchedulingState) -> SchedulingState {
        let mut fixed = state.clone();

        if !fixed.ease_factor.is_finite() {
            fixed.ease_factor = self.config.default_ease;
        } else if fixed.ease_factor < self.config.min_ease {
            fixed.ease_factor = self.config.min_ease;
        }
        fixed.interval_days = fixed
            .interval_days
            .clamp(self.config.min_interval, self.config.max_interval);
        if let Some(q) = fixed.last_quality {
            fixed.last_quality = Some(q.min(5));
        }
        if fixed.lapse_count >= self.config.leech_threshold {
            fixed.is_leech = true;
        }

        if fixed != *state {
            warn!(
                interval_days = state.interval_days,
                ease_factor = state.ease_factor,
                last_quality = ?state.last_quality,
                lapse_count = state.lapse_count,
                is_leech = state.is_leech,
                "Scheduling state out of range, normalized"
            );
        }
        fixed
    }

    fn clamp_interval(&self, days: f64) -> u32 {
        let min = self.config.min_interval as f64;
        let max = self.config.max_interval as f64;
        days.clamp(min, max) as u32
    }
}

/// SM-2 ease update, before flooring
pub fn next_ease(ease_factor: f64, rating: RecallQuality) -> f64 {
    let miss = (5 - rating.score()) as f64;
    ease_factor + (0.1 - miss * (0.08 + miss * 0.02))
}

/// Short feedback line for a submitted review
pub fn feedback_message(rating: RecallQuality, interval_days: u32) -> String {
    match rating {
        RecallQuality::Perfect => format!("Perfect! See you in {} days.", interval_days),
        RecallQuality::Good => format!("Good recall! Next review in {} days.", interval_days),
        RecallQuality::HardCorrect => format!(
            "Correct, but needs practice. See you in {} days.",
            interval_days
        ),
        RecallQuality::HardIncorrect => "Keep practicing - you'll get it!".to_string(),
        RecallQuality::Incorrect | RecallQuality::Blackout => {
            "No worries, we'll review this again soon.".to_string()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
