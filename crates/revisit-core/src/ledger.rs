//! Practice ledger: streaks and calendar heatmaps from practice dates

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Highest heatmap intensity level
pub const MAX_INTENSITY: u8 = 4;

/// Window length of the default dashboard heatmap
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Practice activity of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: u32,
    /// 0 for no practice, otherwise 1-4 relative to the busiest day
    pub intensity: u8,
}

/// Calendar view of practice over an inclusive date window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeHeatmap {
    /// One entry per day from `start_date` to `end_date`, ascending
    pub days: Vec<HeatmapDay>,
    pub total_days_practiced: u32,
    /// Run of practiced days ending at `end_date`
    pub current_streak: u32,
    pub longest_streak: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PracticeHeatmap {
    fn empty(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            days: Vec::new(),
            total_days_practiced: 0,
            current_streak: 0,
            longest_streak: 0,
            start_date,
            end_date,
        }
    }

    /// The busiest day in the window
    pub fn max_count(&self) -> u32 {
        self.days.iter().map(|d| d.count).max().unwrap_or(0)
    }
}

/// Builds heatmaps from practice dates
#[derive(Debug, Clone, Copy, Default)]
pub struct PracticeLedger;

impl PracticeLedger {
    pub fn new() -> Self {
        Self
    }

    /// Heatmap of `dates` over `[start, end]`
    ///
    /// Each date counts as one practice event. Dates outside the window are
    /// ignored; an inverted window yields no days.
    pub fn build_heatmap(
        &self,
        dates: impl IntoIterator<Item = NaiveDate>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PracticeHeatmap {
        if start > end {
            debug!(%start, %end, "Inverted heatmap window");
            return PracticeHeatmap::empty(start, end);
        }

        let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for date in dates {
            if date >= start && date <= end {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
        let max_count = counts.values().copied().max().unwrap_or(0);

        let days: Vec<HeatmapDay> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                let count = counts.get(&date).copied().unwrap_or(0);
                HeatmapDay {
                    date,
                    count,
                    intensity: intensity(count, max_count),
                }
            })
            .collect();

        let total_days_practiced = counts.len() as u32;
        let current_streak = days.iter().rev().take_while(|d| d.count > 0).count() as u32;
        let longest_streak = longest_run(&days);

        PracticeHeatmap {
            days,
            total_days_practiced,
            current_streak,
            longest_streak,
            start_date: start,
            end_date: end,
        }
    }

    /// Heatmap of practice timestamps, bucketed by UTC calendar date
    pub fn from_timestamps(
        &self,
        timestamps: impl IntoIterator<Item = DateTime<Utc>>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PracticeHeatmap {
        self.build_heatmap(timestamps.into_iter().map(|t| t.date_naive()), start, end)
    }

    /// `(end - days, end)`, the window of a dashboard heatmap ending today
    pub fn trailing_window(end: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
        let start = end
            .checked_sub_signed(Duration::days(days as i64))
            .unwrap_or(NaiveDate::MIN);
        (start, end)
    }
}

/// Intensity level of `count` given the window's busiest day
pub fn intensity(count: u32, max_count: u32) -> u8 {
    if count == 0 || max_count == 0 {
        return 0;
    }
    let level = (count as u64 * MAX_INTENSITY as u64 / max_count as u64) + 1;
    level.min(MAX_INTENSITY as u64) as u8
}

fn longest_run(days: &[HeatmapDay]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    for day in days {
        if day.count > 0 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

// ============================================================================
// TESTS
// ============================================================================
