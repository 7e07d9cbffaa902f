//! Decay Model Module
//!
//! Estimates how much of an item is still remembered:
//! - Exponential forgetting curve with a per-item half-life
//! - Half-life stretched by practice count and recall quality, shrunk by difficulty
//! - Status bands and days-until-threshold predictions
//! - Overview and alert views over many tracked items

mod alerts;
mod model;

pub use alerts::{DecayAlert, DecayOverview, Urgency, ALERT_CRITICAL_SCORE};
pub use model::{
    days_until_threshold, retention, DecayModel, DecayReport, DecayState, DecayStatus,
    DEFAULT_DIFFICULTY, DEFAULT_QUALITY,
};
