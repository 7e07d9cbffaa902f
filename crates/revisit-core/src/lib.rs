//! # Revisit Core
//!
//! Spaced-repetition and memory-decay engine for learning platforms:
//!
//! - **Review Scheduler**: SM-2 with a learning ladder, lapses, leeches and suspension
//! - **Decay Model**: Exponential forgetting curve with a per-item half-life
//! - **Priority Ranker**: One urgency score from overdue days, decay and difficulty
//! - **Practice Ledger**: Streaks and calendar heatmaps from practice dates
//!
//! Every operation is a pure function of its inputs and an explicit `now`.
//! Nothing is persisted here: callers load state, pass it in, and store what
//! comes back.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use revisit_core::{ItemKind, ItemRef, ReviewEngine, ReviewStatus};
//!
//! let engine = ReviewEngine::default();
//! let now = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
//!
//! let mut card = engine.track(ItemRef::new("u1", ItemKind::Flashcard, "42"), now, Some(50));
//! for day in [0, 1, 4] {
//!     card = engine.submit_review(&card, 4, now + Duration::days(day))?.item;
//! }
//! assert_eq!(card.schedule.status, ReviewStatus::Review);
//!
//! let queue = engine.build_queue(&[card], now + Duration::days(30), 20);
//! assert_eq!(queue.len(), 1);
//! # Ok::<(), revisit_core::EngineError>(())
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod item;
pub mod ledger;
pub mod priority;
pub mod scheduler;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Configuration
pub use config::{DecayConfig, EngineConfig, PriorityWeights, QueueConfig, SchedulerConfig};

// Errors
pub use error::{ConfigError, EngineError, Result};

// Item references
pub use item::{ItemKind, ItemRef};

// Scheduling
pub use scheduler::{
    feedback_message, next_ease, QueueStats, RecallQuality, ReviewScheduler, ReviewStatus,
    SchedulingState,
};

// Decay
pub use decay::{
    days_until_threshold, retention, DecayAlert, DecayModel, DecayOverview, DecayReport,
    DecayState, DecayStatus, Urgency,
};

// Ranking
pub use priority::{days_overdue, PriorityRanker, RankedItem, ReviewCandidate};

// Practice history
pub use ledger::{HeatmapDay, PracticeHeatmap, PracticeLedger};

// Engine
pub use engine::{QueueEntry, ReviewEngine, ReviewOutcome, TrackedItem};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        DecayModel, DecayReport, DecayState, DecayStatus, EngineConfig, EngineError, ItemKind,
        ItemRef, PracticeHeatmap, PracticeLedger, PriorityRanker, QueueEntry, RecallQuality,
        ReviewEngine, ReviewOutcome, ReviewScheduler, ReviewStatus, SchedulingState, TrackedItem,
    };
}
