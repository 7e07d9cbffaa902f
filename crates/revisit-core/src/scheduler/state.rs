//! Scheduling state and recall ratings

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;

// ============================================================================
// REVIEW STATUS
// ============================================================================

/// Lifecycle phase of a reviewable item
///
/// ```text
///            success, ladder not finished
///              +-----+
///              v     |
///  new --> Learning --+-- ladder finished --> Review --+
///              ^                                 |     | success
///              +------------ lapse --------------+  <--+
///
///  Learning | Review  <-- suspend / unsuspend -->  Suspended
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Walking the learning ladder
    #[default]
    Learning,
    /// Graduated; intervals grow with the ease factor
    Review,
    /// Frozen; excluded from every due queue
    Suspended,
}

impl ReviewStatus {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Learning => "learning",
            ReviewStatus::Review => "review",
            ReviewStatus::Suspended => "suspended",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "learning" => Some(ReviewStatus::Learning),
            "review" => Some(ReviewStatus::Review),
            "suspended" => Some(ReviewStatus::Suspended),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RECALL QUALITY
// ============================================================================

/// Named recall ratings on the 0-5 scale
///
/// 0-2 are lapses, 3-5 are successful recalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallQuality {
    /// Complete failure, no memory
    Blackout = 0,
    /// Incorrect, but the answer felt familiar
    Incorrect = 1,
    /// Incorrect, but remembered after a hint
    HardIncorrect = 2,
    /// Correct with significant difficulty
    HardCorrect = 3,
    /// Correct after some hesitation
    Good = 4,
    /// Immediate, perfect recall
    Perfect = 5,
}

impl RecallQuality {
    /// Lowest quality that counts as a successful recall
    pub const PASSING: u8 = 3;

    /// Map a raw score onto the scale, clamping to `[0, 5]`
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=0 => RecallQuality::Blackout,
            1 => RecallQuality::Incorrect,
            2 => RecallQuality::HardIncorrect,
            3 => RecallQuality::HardCorrect,
            4 => RecallQuality::Good,
            _ => RecallQuality::Perfect,
        }
    }

    /// Numeric value on the 0-5 scale
    #[inline]
    pub fn score(self) -> u8 {
        self as u8
    }

    /// Whether the rating is a successful recall
    #[inline]
    pub fn is_success(self) -> bool {
        self.score() >= Self::PASSING
    }
}

impl From<RecallQuality> for i32 {
    fn from(q: RecallQuality) -> Self {
        q.score() as i32
    }
}

// ============================================================================
// SCHEDULING STATE
// ============================================================================

/// Spaced-repetition state of one reviewable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    /// Days until the next review, as last computed
    pub interval_days: u32,
    /// Item-specific growth multiplier
    pub ease_factor: f64,
    /// Successful repetitions since creation or the last lapse
    pub repetition_number: u32,
    /// Lifecycle phase
    pub status: ReviewStatus,
    /// When the item is next due
    pub next_review_at: DateTime<Utc>,
    /// When the item was last reviewed
    #[serde(default)]
    pub last_review_at: Option<DateTime<Utc>>,
    /// Total reviews submitted
    #[serde(default)]
    pub review_count: u32,
    /// Total lapses
    #[serde(default)]
    pub lapse_count: u32,
    /// Time spent on timed reviews, in seconds
    #[serde(default)]
    pub total_time_seconds: u64,
    /// Quality of the last review (0-5)
    #[serde(default)]
    pub last_quality: Option<u8>,
    /// Flagged after too many lapses; never cleared by reviews
    #[serde(default)]
    pub is_leech: bool,
    /// Phase to restore when a suspended item is unsuspended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_from: Option<ReviewStatus>,
}

impl SchedulingState {
    /// A brand new item: learning, due immediately
    pub fn new(now: DateTime<Utc>, config: &SchedulerConfig) -> Self {
        Self {
            interval_days: config.initial_interval.clamp(config.min_interval, config.max_interval),
            ease_factor: config.default_ease,
            repetition_number: 0,
            status: ReviewStatus::Learning,
            next_review_at: now,
            last_review_at: None,
            review_count: 0,
            lapse_count: 0,
            total_time_seconds: 0,
            last_quality: None,
            is_leech: false,
            suspended_from: None,
        }
    }

    /// Due at or before `now` and not suspended
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status != ReviewStatus::Suspended && self.next_review_at <= now
    }

    /// Due at least one whole day ago and not suspended
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != ReviewStatus::Suspended && now - self.next_review_at >= Duration::days(1)
    }

    /// Has left the learning phase
    pub fn is_graduated(&self) -> bool {
        match self.status {
            ReviewStatus::Review => true,
            ReviewStatus::Learning => false,
            ReviewStatus::Suspended => self.suspended_from == Some(ReviewStatus::Review),
        }
    }

    /// Whether the item is currently suspended
    pub fn is_suspended(&self) -> bool {
        self.status == ReviewStatus::Suspended
    }
}

// ============================================================================
// TESTS
// ============================================================================
