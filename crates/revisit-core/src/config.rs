//! Engine configuration
//!
//! Every tunable constant lives here and is handed to the components at
//! construction. Each section deserializes with `#[serde(default)]`, so a TOML
//! file only needs to name the values it overrides:
//!
//! ```toml
//! [scheduler]
//! leech_threshold = 6
//!
//! [decay]
//! base_half_life_days = 10.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Floor for the ease factor
pub const MIN_EASE: f64 = 1.3;

/// Ease factor of a new item
pub const DEFAULT_EASE: f64 = 2.5;

/// Learning ladder in days, indexed by repetition number
pub const LEARNING_STEPS: [u32; 3] = [0, 1, 3];

/// Interval assigned on graduation and for the first review-phase repetition
pub const INITIAL_INTERVAL: u32 = 1;

/// Shortest interval the scheduler will produce
pub const MIN_INTERVAL: u32 = 1;

/// Longest interval the scheduler will produce
pub const MAX_INTERVAL: u32 = 365;

/// Lapses after which an item is flagged as a leech
pub const LEECH_THRESHOLD: u32 = 8;

/// Half-life of an item with stability 1.0
pub const BASE_HALF_LIFE_DAYS: f64 = 7.0;

/// Score at or below which an item counts as critical
pub const CRITICAL_THRESHOLD: u8 = 40;

/// Score below which reviews are recommended
pub const WARNING_THRESHOLD: u8 = 60;

/// Cap on the stability multiplier
pub const MAX_STABILITY: f64 = 5.0;

/// Stability added by the first review; later reviews add geometrically less
pub const REVIEW_STABILITY_BONUS: f64 = 0.3;

/// Ratio between the bonuses of consecutive reviews
pub const REVIEW_BONUS_FALLOFF: f64 = 0.8;

/// Estimated minutes spent per queued review
pub const MINUTES_PER_ITEM: u32 = 2;

// ============================================================================
// SECTIONS
// ============================================================================

/// Review scheduler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Floor for the ease factor
    pub min_ease: f64,
    /// Ease factor assigned to new items
    pub default_ease: f64,
    /// Learning ladder in days
    pub learning_steps: Vec<u32>,
    /// Interval on graduation
    pub initial_interval: u32,
    /// Lower interval bound
    pub min_interval: u32,
    /// Upper interval bound
    pub max_interval: u32,
    /// Lapse count that flags a leech
    pub leech_threshold: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease: MIN_EASE,
            default_ease: DEFAULT_EASE,
            learning_steps: LEARNING_STEPS.to_vec(),
            initial_interval: INITIAL_INTERVAL,
            min_interval: MIN_INTERVAL,
            max_interval: MAX_INTERVAL,
            leech_threshold: LEECH_THRESHOLD,
        }
    }
}

/// Decay model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Half-life in days at stability 1.0
    pub base_half_life_days: f64,
    /// Critical band boundary
    pub critical_threshold: u8,
    /// Warning band boundary
    pub warning_threshold: u8,
    /// Stability cap
    pub max_stability: f64,
    /// Bonus of the first review
    pub review_stability_bonus: f64,
    /// Geometric falloff of later review bonuses
    pub review_bonus_falloff: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            base_half_life_days: BASE_HALF_LIFE_DAYS,
            critical_threshold: CRITICAL_THRESHOLD,
            warning_threshold: WARNING_THRESHOLD,
            max_stability: MAX_STABILITY,
            review_stability_bonus: REVIEW_STABILITY_BONUS,
            review_bonus_falloff: REVIEW_BONUS_FALLOFF,
        }
    }
}

/// Weights of the priority score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    /// Points per whole day overdue
    pub overdue_per_day: f64,
    /// Points per point of lost retention
    pub decay: f64,
    /// Points per unit of ease below `ease_pivot`
    pub difficulty: f64,
    /// Ease factor that contributes zero difficulty points
    pub ease_pivot: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            overdue_per_day: 10.0,
            decay: 0.5,
            difficulty: 5.0,
            ease_pivot: 3.0,
        }
    }
}

/// Queue statistics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Estimated minutes per review
    pub minutes_per_item: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            minutes_per_item: MINUTES_PER_ITEM,
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Review scheduler
    pub scheduler: SchedulerConfig,
    /// Decay model
    pub decay: DecayConfig,
    /// Priority ranking
    pub priority: PriorityWeights,
    /// Queue statistics
    pub queue: QueueConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that the values describe a usable engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scheduler;
        if !(s.min_ease.is_finite() && s.min_ease > 0.0) {
            return Err(ConfigError::invalid("scheduler.min_ease", "must be positive"));
        }
        if !(s.default_ease.is_finite() && s.default_ease >= s.min_ease) {
            return Err(ConfigError::invalid(
                "scheduler.default_ease",
                format!("must be at least min_ease ({})", s.min_ease),
            ));
        }
        if s.learning_steps.is_empty() {
            return Err(ConfigError::invalid(
                "scheduler.learning_steps",
                "needs at least one step",
            ));
        }
        if s.min_interval == 0 {
            return Err(ConfigError::invalid("scheduler.min_interval", "must be at least 1"));
        }
        if s.max_interval < s.min_interval {
            return Err(ConfigError::invalid(
                "scheduler.max_interval",
                format!("must be at least min_interval ({})", s.min_interval),
            ));
        }
        if s.leech_threshold == 0 {
            return Err(ConfigError::invalid("scheduler.leech_threshold", "must be at least 1"));
        }

        let d = &self.decay;
        if !(d.base_half_life_days.is_finite() && d.base_half_life_days > 0.0) {
            return Err(ConfigError::invalid("decay.base_half_life_days", "must be positive"));
        }
        if d.critical_threshold == 0 {
            return Err(ConfigError::invalid("decay.critical_threshold", "must be at least 1"));
        }
        if d.warning_threshold <= d.critical_threshold || d.warning_threshold > 100 {
            return Err(ConfigError::invalid(
                "decay.warning_threshold",
                format!(
                    "must be above critical_threshold ({}) and at most 100",
                    d.critical_threshold
                ),
            ));
        }
        if !(d.max_stability.is_finite() && d.max_stability >= 1.0) {
            return Err(ConfigError::invalid("decay.max_stability", "must be at least 1.0"));
        }
        if !(d.review_stability_bonus.is_finite() && d.review_stability_bonus >= 0.0) {
            return Err(ConfigError::invalid(
                "decay.review_stability_bonus",
                "must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&d.review_bonus_falloff) {
            return Err(ConfigError::invalid(
                "decay.review_bonus_falloff",
                "must be within [0, 1]",
            ));
        }

        let p = &self.priority;
        for (field, value) in [
            ("priority.overdue_per_day", p.overdue_per_day),
            ("priority.decay", p.decay),
            ("priority.difficulty", p.difficulty),
            ("priority.ease_pivot", p.ease_pivot),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be finite"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
