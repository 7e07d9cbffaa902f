//! Journey: one item from first sight through graduation, lapses and suspension

use chrono::Duration;
use revisit_core::{EngineError, ReviewEngine, ReviewStatus};
use revisit_e2e_tests::TestDataFactory;

#[test]
fn test_learning_ladder_to_graduation() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let start = TestDataFactory::epoch();

    let (item, graduated_at) = TestDataFactory::graduated_item(&engine, &owner, start);

    // Ladder [0, 1, 3]: reviewed at day 0, day 1 and day 4
    assert_eq!(graduated_at, start + Duration::days(4));
    assert_eq!(item.schedule.status, ReviewStatus::Review);
    assert_eq!(item.schedule.repetition_number, 3);
    assert_eq!(item.schedule.interval_days, 1);
    assert_eq!(item.schedule.review_count, 3);
    assert_eq!(item.schedule.next_review_at, graduated_at + Duration::days(1));

    let decay = item.decay.expect("decay tracking was requested");
    assert_eq!(decay.times_reviewed, 3);
    assert_eq!(decay.last_practiced_at, Some(graduated_at));
}

#[test]
fn test_review_intervals_grow_until_capped() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let (mut item, _) =
        TestDataFactory::graduated_item(&engine, &owner, TestDataFactory::epoch());

    let mut intervals = Vec::new();
    for _ in 0..7 {
        item = TestDataFactory::review_on_schedule(&engine, &item, &[4]);
        intervals.push(item.schedule.interval_days);
    }

    // Quality 4 keeps the ease at 2.5
    assert_eq!(intervals, vec![3, 8, 20, 50, 125, 313, 365]);
    assert_eq!(item.schedule.ease_factor, 2.5);
}

#[test]
fn test_lapse_and_relearn() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let (item, _) = TestDataFactory::graduated_item(&engine, &owner, TestDataFactory::epoch());
    let item = TestDataFactory::review_on_schedule(&engine, &item, &[5, 4]);
    assert_eq!(item.schedule.status, ReviewStatus::Review);

    let at = item.schedule.next_review_at;
    let lapse = engine.submit_review(&item, 1, at).unwrap();
    assert!(lapse.lapsed);
    assert_eq!(lapse.item.schedule.status, ReviewStatus::Learning);
    assert_eq!(lapse.item.schedule.repetition_number, 0);
    assert_eq!(lapse.item.schedule.interval_days, 1);
    assert_eq!(lapse.item.schedule.lapse_count, 1);
    let ease_after_lapse = lapse.item.schedule.ease_factor;
    assert!(ease_after_lapse < item.schedule.ease_factor);

    // Walk the ladder again
    let relearned = TestDataFactory::review_on_schedule(&engine, &lapse.item, &[4, 4]);
    assert_eq!(relearned.schedule.status, ReviewStatus::Learning);
    let back = engine
        .submit_review(&relearned, 4, relearned.schedule.next_review_at)
        .unwrap();
    assert!(back.graduated);
    assert_eq!(back.item.schedule.lapse_count, 1);
    assert!((back.item.schedule.ease_factor - ease_after_lapse).abs() < 1e-9);
}

#[test]
fn test_repeated_failure_makes_a_leech() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let mut item = TestDataFactory::new_item(&engine, &owner, TestDataFactory::epoch());

    let mut leech_reports = 0;
    for _ in 0..12 {
        let at = item.schedule.next_review_at;
        let outcome = engine.submit_review(&item, 0, at).unwrap();
        if outcome.became_leech {
            leech_reports += 1;
            assert_eq!(outcome.item.schedule.lapse_count, 8);
        }
        item = outcome.item;
    }

    assert_eq!(leech_reports, 1);
    assert!(item.schedule.is_leech);
    assert_eq!(item.schedule.ease_factor, 1.3);

    // A later success does not clear the flag
    let recovered = TestDataFactory::review_on_schedule(&engine, &item, &[5]);
    assert!(recovered.schedule.is_leech);
}

#[test]
fn test_suspension_round_trip() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let (item, at) = TestDataFactory::graduated_item(&engine, &owner, TestDataFactory::epoch());

    let suspended = engine.suspend(&item);
    let much_later = at + Duration::days(60);

    assert!(engine.build_queue(&[suspended.clone()], much_later, 10).is_empty());
    let err = engine.submit_review(&suspended, 5, much_later).unwrap_err();
    assert!(matches!(err, EngineError::Suspended(ref r) if *r == item.item));

    let resumed = engine.unsuspend(&suspended);
    assert_eq!(resumed.schedule.status, ReviewStatus::Review);
    assert_eq!(engine.build_queue(&[resumed], much_later, 10).len(), 1);
}

#[test]
fn test_state_survives_snapshots() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let (item, _) = TestDataFactory::graduated_item(&engine, &owner, TestDataFactory::epoch());
    let suspended = engine.suspend(&item);

    let restored = TestDataFactory::via_snapshot(&[item.clone(), suspended]);
    assert_eq!(restored[0].item, item.item);
    assert_eq!(restored[0].schedule, item.schedule);
    assert_eq!(restored[1].schedule.suspended_from, Some(ReviewStatus::Review));

    // Reviews continue from the restored copy exactly as from the original
    let a = TestDataFactory::review_on_schedule(&engine, &item, &[4]);
    let b = TestDataFactory::review_on_schedule(&engine, &restored[0], &[4]);
    assert_eq!(a.schedule, b.schedule);
}
