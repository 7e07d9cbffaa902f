//! Review Scheduler Module
//!
//! SuperMemo-2 style spaced repetition:
//! - Learning ladder of fixed steps before an item graduates
//! - Ease factor adapted per item from recall quality
//! - Lapses send an item back to learning and count towards leech status
//! - Explicit suspension that removes an item from every queue

mod queue;
mod sm2;
mod state;

pub use queue::QueueStats;
pub use sm2::{feedback_message, next_ease, ReviewScheduler};
pub use state::{RecallQuality, ReviewStatus, SchedulingState};
