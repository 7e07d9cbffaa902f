//! Journey: a learner opens the app and works through today's queue

use chrono::Duration;
use revisit_core::{DecayStatus, ItemKind, ReviewEngine, Urgency};
use revisit_e2e_tests::{BatchConfig, TestDataFactory};

#[test]
fn test_most_overdue_first() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let now = TestDataFactory::epoch();
    let items = TestDataFactory::create_batch(&engine, &owner, now, BatchConfig::default());

    let queue = engine.build_queue(&items, now, 5);
    let expected: Vec<_> = [4, 9, 3, 8, 2].iter().map(|&i| items[i].item.clone()).collect();
    let got: Vec<_> = queue.iter().map(|e| e.item.clone()).collect();

    assert_eq!(got, expected);
    assert_eq!(queue[0].days_overdue, 4);
    assert_eq!(queue.last().map(|e| e.position), Some(5));
}

#[test]
fn test_queue_stats_for_the_day() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let now = TestDataFactory::epoch();
    let mut items = TestDataFactory::create_batch(&engine, &owner, now, BatchConfig::default());
    items.push(engine.track(
        TestDataFactory::item_ref(&owner, ItemKind::Concept),
        now + Duration::hours(6),
        None,
    ));

    let stats = engine.queue_stats(&items, now);
    assert_eq!(stats.due_now, 10);
    assert_eq!(stats.due_today, 11);
    // Everything due on an earlier calendar day
    assert_eq!(stats.overdue_count, 8);
    assert_eq!(stats.learning_count, 11);
    assert_eq!(stats.review_count, 0);
    assert_eq!(stats.estimated_minutes, 22);
}

#[test]
fn test_faded_items_jump_the_queue() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let now = TestDataFactory::epoch();

    let steady = TestDataFactory::new_item(&engine, &owner, now);
    let mut faded = TestDataFactory::new_item(&engine, &owner, now);
    faded.decay = faded
        .decay
        .map(|d| engine.decay_model().reset(&d, now - Duration::days(21), 3));

    let queue = engine.build_queue(&[steady.clone(), faded.clone()], now, 10);
    assert_eq!(queue[0].item, faded.item);
    assert!(queue[0].decay_score < 40);
    assert_eq!(queue[1].item, steady.item);
    assert_eq!(queue[1].decay_status, DecayStatus::Fresh);
}

#[test]
fn test_working_through_the_queue() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let now = TestDataFactory::epoch();
    let mut items = TestDataFactory::create_batch(
        &engine,
        &owner,
        now,
        BatchConfig {
            count: 6,
            kind: ItemKind::Pattern,
            ..Default::default()
        },
    );
    items[5] = engine.suspend(&items[5]);

    let mut reviewed = 0;
    let mut clock = now;
    while let Some(next) = engine.build_queue(&items, clock, 1).into_iter().next() {
        let idx = items.iter().position(|t| t.item == next.item).unwrap();
        items[idx] = engine.submit_review(&items[idx], 4, clock).unwrap().item;
        clock += Duration::minutes(2);
        reviewed += 1;
        assert!(reviewed <= 5, "queue did not drain");
    }

    // The first ladder step is due the next day
    assert_eq!(reviewed, 5);
    assert!(engine.build_queue(&items, now + Duration::hours(12), 10).is_empty());
    let tomorrow = now + Duration::days(1) + Duration::hours(1);
    assert_eq!(engine.build_queue(&items, tomorrow, 10).len(), 5);
}

#[test]
fn test_decay_dashboard() {
    let engine = ReviewEngine::default();
    let owner = TestDataFactory::owner();
    let now = TestDataFactory::epoch();

    let items: Vec<_> = [0, 3, 10, 14, 40]
        .iter()
        .map(|&days_ago| {
            let mut item = TestDataFactory::new_item(&engine, &owner, now);
            item.decay = item
                .decay
                .map(|d| engine.decay_model().reset(&d, now - Duration::days(days_ago), 4));
            item
        })
        .collect();

    let overview = engine.decay_overview(&items, now);
    assert_eq!(overview.total, 5);
    assert_eq!(overview.fresh, 1);
    assert_eq!(overview.stable, 1);
    assert_eq!(overview.decaying, 1);
    assert_eq!(overview.critical + overview.forgotten, 2);

    let alerts = engine.critical_alerts(&items, now, 10);
    assert_eq!(alerts.len(), 3);
    assert!(alerts.windows(2).all(|w| w[0].score <= w[1].score));
    assert_eq!(alerts[0].urgency, Urgency::Critical);
    assert_eq!(alerts[0].days_since_practice, Some(40));
}
