//! Journey: practice history turned into streaks and a calendar heatmap

use chrono::{Duration, NaiveDate};
use revisit_core::{PracticeLedger, ReviewEngine};
use revisit_e2e_tests::TestDataFactory;

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

#[test]
fn test_streak_broken_then_restarted() {
    let ledger = PracticeLedger::new();

    let heatmap = ledger.build_heatmap([jan(1), jan(2), jan(3), jan(5)], jan(1), jan(5));
    assert_eq!(heatmap.current_streak, 1);
    assert_eq!(heatmap.longest_streak, 3);

    let heatmap = ledger.build_heatmap([jan(1), jan(2), jan(3)], jan(1), jan(5));
    assert_eq!(heatmap.current_streak, 0);
    assert_eq!(heatmap.longest_streak, 3);
}

#[test]
fn test_month_of_practice() {
    let ledger = PracticeLedger::new();
    let end = jan(31);
    let (start, end) = PracticeLedger::trailing_window(end, 29);

    // Weekdays only for two weeks, then every day for the last eleven
    let mut pattern = Vec::new();
    for _ in 0..2 {
        pattern.extend([true, true, true, true, true, false, false]);
    }
    pattern.extend([false; 5]);
    pattern.extend([true; 11]);
    assert_eq!(pattern.len(), 30);

    let dates = TestDataFactory::practice_dates(end, &pattern);
    let heatmap = ledger.build_heatmap(dates, start, end);

    assert_eq!(heatmap.days.len(), 30);
    assert_eq!(heatmap.total_days_practiced, 21);
    assert_eq!(heatmap.current_streak, 11);
    assert_eq!(heatmap.longest_streak, 11);
    assert!(heatmap.days.iter().all(|d| d.intensity <= 4));
}

#[test]
fn test_heatmap_from_review_history() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let start = TestDataFactory::epoch();

    let mut history = Vec::new();
    let mut item = TestDataFactory::new_item(&engine, &owner, start);
    for _ in 0..5 {
        let at = item.schedule.next_review_at;
        item = engine.submit_review(&item, 4, at).unwrap().item;
        history.extend(item.schedule.last_review_at);
    }
    // Two extra reviews of another item on the first day
    let mut other = TestDataFactory::new_item(&engine, &owner, start);
    for minutes in [10, 20] {
        other = engine
            .submit_review(&other, 3, start + Duration::minutes(minutes))
            .unwrap()
            .item;
        history.extend(other.schedule.last_review_at);
    }

    // Reviews at day 0, 1, 4, 5 and 8
    let first = start.date_naive();
    let end = first + Duration::days(8);
    let heatmap = engine.ledger().from_timestamps(history, first, end);

    let counts: Vec<u32> = heatmap.days.iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![3, 1, 0, 0, 1, 1, 0, 0, 1]);
    assert_eq!(heatmap.days[0].intensity, 4);
    assert_eq!(heatmap.days[1].intensity, 2);
    assert_eq!(heatmap.current_streak, 1);
    assert_eq!(heatmap.longest_streak, 2);
    assert_eq!(heatmap.total_days_practiced, 5);
}

#[test]
fn test_empty_history_and_inverted_window() {
    let ledger = PracticeLedger::new();

    let empty = ledger.build_heatmap(Vec::<NaiveDate>::new(), jan(1), jan(7));
    assert_eq!(empty.days.len(), 7);
    assert_eq!(empty.total_days_practiced, 0);
    assert!(empty.days.iter().all(|d| d.intensity == 0));

    let inverted = ledger.build_heatmap([jan(3)], jan(7), jan(1));
    assert!(inverted.days.is_empty());
    assert_eq!(inverted.longest_streak, 0);
}
