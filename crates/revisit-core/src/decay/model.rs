//! Forgetting-curve retention model
//!
//! ## Core Formulas:
//! - Stability: S = min(MAX, (1 + sum_{i<n} 0.3 * 0.8^i) * (1 - d/200) * (0.7 + q/5 * 0.6))
//! - Half-life: H = BASE_HALF_LIFE_DAYS * S
//! - Retention: R(t) = e^(-t / H * ln 2), so R(H) = 0.5
//! - Time to threshold: t = -H * ln(threshold / score) / ln 2

use std::f64::consts::LN_2;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DecayConfig;

/// Quality assumed when an item has never been rated
pub const DEFAULT_QUALITY: u8 = 4;

/// Difficulty of an item nobody rated
pub const DEFAULT_DIFFICULTY: u8 = 50;

/// Lower bound that keeps the half-life strictly positive
const MIN_STABILITY: f64 = 0.1;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

// ============================================================================
// DECAY STATUS
// ============================================================================

/// Retention band of a decay score
///
/// | Status    | Score  |
/// |-----------|--------|
/// | Fresh     | 80-100 |
/// | Stable    | 60-79  |
/// | Decaying  | 40-59  |
/// | Critical  | 20-39  |
/// | Forgotten | 0-19   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayStatus {
    /// Recently reviewed, strong memory
    Fresh,
    /// Good retention, review soon
    Stable,
    /// Starting to forget
    Decaying,
    /// Significant forgetting, urgent review
    Critical,
    /// Likely forgotten, needs relearning
    Forgotten,
}

impl DecayStatus {
    /// Band containing `score`
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => DecayStatus::Fresh,
            60..=79 => DecayStatus::Stable,
            40..=59 => DecayStatus::Decaying,
            20..=39 => DecayStatus::Critical,
            _ => DecayStatus::Forgotten,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DecayStatus::Fresh => "fresh",
            DecayStatus::Stable => "stable",
            DecayStatus::Decaying => "decaying",
            DecayStatus::Critical => "critical",
            DecayStatus::Forgotten => "forgotten",
        }
    }
}

impl std::fmt::Display for DecayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DECAY STATE
// ============================================================================

/// Persisted decay tracking of one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayState {
    /// Last written retention score (0-100)
    pub decay_score: u8,
    /// Last written stability multiplier
    pub stability_factor: f64,
    /// When the item was last practiced
    #[serde(default)]
    pub last_practiced_at: Option<DateTime<Utc>>,
    /// Number of practice events
    #[serde(default)]
    pub times_reviewed: u32,
    /// Difficulty assigned at creation (1-100, higher is harder)
    pub initial_difficulty: u8,
    /// Quality of the last practice (0-5)
    #[serde(default)]
    pub last_quality: Option<u8>,
    /// Advisory date for the next practice
    #[serde(default)]
    pub next_review_date: Option<NaiveDate>,
}

// ============================================================================
// DECAY REPORT
// ============================================================================

/// Result of evaluating a [`DecayState`] at an instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayReport {
    /// Current retention score (0-100)
    pub score: u8,
    /// Band of `score`
    pub status: DecayStatus,
    /// Whole days until the critical threshold; `None` once at or below it
    pub days_until_critical: Option<u32>,
    /// When to practice to stay above the warning threshold
    pub recommended_review_at: DateTime<Utc>,
    /// Stability multiplier used
    pub stability: f64,
}

// ============================================================================
// DECAY MODEL
// ============================================================================

/// Exponential retention model
#[derive(Debug, Clone, Default)]
pub struct DecayModel {
    config: DecayConfig,
}

impl DecayModel {
    /// Create a model with the given settings
    pub fn new(config: DecayConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    /// Tracking state for an item that just became trackable
    pub fn track(&self, initial_difficulty: u8) -> DecayState {
        let initial_difficulty = initial_difficulty.clamp(1, 100);
        DecayState {
            decay_score: 100,
            stability_factor: self.stability(0, initial_difficulty, None),
            last_practiced_at: None,
            times_reviewed: 0,
            initial_difficulty,
            last_quality: None,
            next_review_date: None,
        }
    }

    /// Stability multiplier for a review history
    pub fn stability(&self, times_reviewed: u32, initial_difficulty: u8, last_quality: Option<u8>) -> f64 {
        let bonus = self.config.review_stability_bonus;
        let falloff = self.config.review_bonus_falloff;
        let n = times_reviewed as f64;
        // Closed form of sum_{i<n} bonus * falloff^i
        let review_bonus = if (1.0 - falloff).abs() < f64::EPSILON {
            bonus * n
        } else {
            bonus * (1.0 - falloff.powf(n)) / (1.0 - falloff)
        };

        let difficulty = initial_difficulty.clamp(1, 100) as f64;
        let difficulty_modifier = 1.0 - difficulty / 200.0;

        let quality = last_quality.unwrap_or(DEFAULT_QUALITY).min(5) as f64;
        let quality_modifier = 0.7 + (quality / 5.0) * 0.6;

        ((1.0 + review_bonus) * difficulty_modifier * quality_modifier)
            .min(self.config.max_stability)
            .max(MIN_STABILITY)
    }

    /// Half-life in days for a stability multiplier
    #[inline]
    pub fn half_life(&self, stability: f64) -> f64 {
        self.config.base_half_life_days * stability
    }

    /// Estimate retention of `state` at `now`
    ///
    /// Pure: the stored score is not touched. Items never practiced do not
    /// decay.
    pub fn evaluate(&self, state: &DecayState, now: DateTime<Utc>) -> DecayReport {
        let state = self.normalize(state);
        let stability = self.stability(
            state.times_reviewed,
            state.initial_difficulty,
            state.last_quality,
        );
        let half_life = self.half_life(stability);
        let elapsed = elapsed_days(state.last_practiced_at, now);
        let score = score_from_retention(retention(elapsed, half_life));

        let days_until_critical =
            days_until_threshold(score, self.config.critical_threshold, half_life);
        let recommended_review_at =
            match days_until_threshold(score, self.config.warning_threshold, half_life) {
                Some(days) if days > 0 => now + Duration::days(days.saturating_sub(1).max(1) as i64),
                _ => now,
            };

        DecayReport {
            score,
            status: DecayStatus::from_score(score),
            days_until_critical,
            recommended_review_at,
            stability,
        }
    }

    /// Evaluate many states at one instant, in input order
    pub fn evaluate_batch(&self, states: &[DecayState], now: DateTime<Utc>) -> Vec<DecayReport> {
        states.iter().map(|s| self.evaluate(s, now)).collect()
    }

    /// Record a practice event
    pub fn reset(&self, state: &DecayState, now: DateTime<Utc>, quality: i32) -> DecayState {
        let quality = quality.clamp(0, 5) as u8;
        let state = self.normalize(state);
        let times_reviewed = state.times_reviewed.saturating_add(1);
        let stability = self.stability(times_reviewed, state.initial_difficulty, Some(quality));
        let days = (stability * self.config.base_half_life_days * 0.5).round().max(1.0) as i64;

        debug!(times_reviewed, stability, days, "Decay tracking reset after practice");

        DecayState {
            decay_score: 100,
            stability_factor: stability,
            last_practiced_at: Some(now),
            times_reviewed,
            last_quality: Some(quality),
            next_review_date: Some((now + Duration::days(days)).date_naive()),
            ..state
        }
    }

    /// Write the evaluated score and stability back into the state
    pub fn refresh(&self, state: &DecayState, now: DateTime<Utc>) -> DecayState {
        let report = self.evaluate(state, now);
        DecayState {
            decay_score: report.score,
            stability_factor: report.stability,
            ..self.normalize(state)
        }
    }

    /// Clamp persisted values back into their valid ranges
    pub fn normalize(&self, state: &DecayState) -> DecayState {
        let mut fixed = state.clone();
        fixed.decay_score = fixed.decay_score.min(100);
        fixed.initial_difficulty = fixed.initial_difficulty.clamp(1, 100);
        fixed.last_quality = fixed.last_quality.map(|q| q.min(5));
        if !(fixed.stability_factor.is_finite() && fixed.stability_factor > 0.0) {
            fixed.stability_factor =
                self.stability(fixed.times_reviewed, fixed.initial_difficulty, fixed.last_quality);
        } else {
            fixed.stability_factor = fixed.stability_factor.min(self.config.max_stability);
        }

        if fixed != *state {
            warn!(
                decay_score = state.decay_score,
                initial_difficulty = state.initial_difficulty,
                last_quality = ?state.last_quality,
                stability_factor = state.stability_factor,
                "Decay state out of range, normalized"
            );
        }
        fixed
    }
}

// ============================================================================
// CURVE FUNCTIONS
// ============================================================================

/// Fraction remembered after `elapsed_days` with the given half-life
#[inline]
pub fn retention(elapsed_days: f64, half_life: f64) -> f64 {
    (-elapsed_days / half_life * LN_2).exp()
}

/// Whole days until a score decays to `threshold`
///
/// `None` when the score is already at or below the threshold, which
/// includes a score of zero.
pub fn days_until_threshold(score: u8, threshold: u8, half_life: f64) -> Option<u32> {
    if threshold == 0 || score <= threshold {
        return None;
    }
    let ratio = threshold as f64 / score as f64;
    let days = -half_life * ratio.ln() / LN_2;
    Some(days.max(0.0).floor() as u32)
}

fn score_from_retention(retention: f64) -> u8 {
    (retention * 100.0).round().clamp(0.0, 100.0) as u8
}

fn elapsed_days(last_practiced_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(last) = last_practiced_at else {
        return 0.0;
    };
    let days = (now - last).num_milliseconds() as f64 / MILLIS_PER_DAY;
    if days < 0.0 {
        debug!(%last, %now, "Last practice is in the future, treating as just practiced");
        return 0.0;
    }
    days
}

// ============================================================================
// TESTS
// ============================================================================
