use std::sync::Arc;
use std::time::Duration;

use seatwatch::Error;
use seatwatch::FanOut;
use seatwatch::HealthReport;
use seatwatch::MemStore;
use seatwatch::Submission;

use crate::common::intervals;
use crate::common::snapshot;
use crate::common::start_engine;
use crate::common::test_config;
use crate::common::FetchStep;

const KEY: &str = "31452";

fn seats(n: i64) -> FetchStep {
    FetchStep::Snapshot(snapshot(&[(KEY, n), ("31453", 0)]))
}

fn submission(email: &str) -> Submission {
    Submission::new("Emmy", email, "555-0199", KEY)
}

/// Pollers exist exactly for keys that still have watches
fn assert_monitors_match_registry(engine: &seatwatch::WatchEngine) {
    let status = engine.status();
    let mut watched: Vec<String> = status.watches.iter().map(|w| w.key.clone()).collect();
    watched.sort();
    watched.dedup();
    assert_eq!(status.active_keys, watched);
}

#[tokio::test(start_paused = true)]
async fn test_availability_after_quiet_cycles_notifies_once() {
    let ctx = start_engine(test_config(), Arc::new(MemStore::new()), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();
    ctx.engine.submit(submission("olga@example.com")).await.unwrap();
    assert_monitors_match_registry(&ctx.engine);

    tokio::time::sleep(intervals(4)).await;
    assert_eq!(ctx.notifier.count(), 0);
    assert_monitors_match_registry(&ctx.engine);

    ctx.fetcher.set(seats(1));
    tokio::time::sleep(intervals(1)).await;
    tokio::time::sleep(intervals(5)).await;

    let sent = ctx.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "emmy@example.com");
    assert!(sent[0].1.contains("MATH 221 - Linear Algebra"));
    assert_eq!(
        ctx.engine.health(),
        HealthReport {
            watches: 0,
            keys: 0,
            active_pollers: 0
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_all_subscribers_fan_out() {
    let mut config = test_config();
    config.resolution.fan_out = FanOut::AllSubscribers;
    let ctx = start_engine(config, Arc::new(MemStore::new()), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();
    ctx.engine.submit(submission("olga@example.com")).await.unwrap();

    ctx.fetcher.set(seats(3));
    tokio::time::sleep(intervals(1)).await;

    let mut recipients: Vec<String> = ctx.notifier.sent().into_iter().map(|(to, _)| to).collect();
    recipients.sort();
    assert_eq!(recipients, vec!["emmy@example.com", "olga@example.com"]);
    assert!(ctx.engine.status().watches.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_never_adds_poller_or_watch() {
    let ctx = start_engine(test_config(), Arc::new(MemStore::new()), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();

    for _ in 0..3 {
        let result = ctx.engine.submit(submission("emmy@example.com ")).await;
        assert!(matches!(result, Err(Error::DuplicateWatch { .. })));
    }

    assert_eq!(
        ctx.engine.health(),
        HealthReport {
            watches: 1,
            keys: 1,
            active_pollers: 1
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_sole_watch_stops_poller_within_interval() {
    let ctx = start_engine(test_config(), Arc::new(MemStore::new()), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();
    tokio::time::sleep(intervals(1)).await;
    let fetches = ctx.fetcher.calls();

    assert!(ctx.engine.cancel(KEY, "emmy@example.com").unwrap());
    ctx.fetcher.set(seats(5));
    tokio::time::sleep(intervals(3)).await;

    assert_eq!(ctx.fetcher.calls(), fetches, "a cancelled poller fetches no more");
    assert_eq!(ctx.notifier.count(), 0);
    assert_monitors_match_registry(&ctx.engine);
    assert!(ctx.engine.status().watches.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_persistent_fetch_failure_keeps_polling() {
    let ctx = start_engine(test_config(), Arc::new(MemStore::new()), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();
    ctx.fetcher.set(FetchStep::Fail);

    tokio::time::sleep(intervals(12)).await;

    assert!(ctx.fetcher.calls() >= 12);
    assert_eq!(ctx.notifier.count(), 0);
    assert!(ctx.engine.is_monitoring(KEY));

    ctx.fetcher.set(seats(2));
    tokio::time::sleep(intervals(1)).await;
    assert_eq!(ctx.notifier.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delivery_failure_leaves_unpolled_watches() {
    let ctx = start_engine(test_config(), Arc::new(MemStore::new()), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();
    ctx.notifier.set_failing(true);

    ctx.fetcher.set(seats(1));
    tokio::time::sleep(intervals(1)).await;

    assert_eq!(ctx.engine.status().watches.len(), 1);
    assert!(!ctx.engine.is_monitoring(KEY));

    let fetches = ctx.fetcher.calls();
    tokio::time::sleep(intervals(2)).await;
    assert_eq!(ctx.fetcher.calls(), fetches);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_then_late_timer_does_nothing() {
    let store = Arc::new(MemStore::new());
    let ctx = start_engine(test_config(), store.clone(), seats(0));
    ctx.engine.submit(submission("emmy@example.com")).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let report = ctx.engine.shutdown().await;
    assert_eq!(report.joined, 1);

    ctx.fetcher.set(seats(4));
    tokio::time::sleep(intervals(2)).await;

    assert_eq!(ctx.notifier.count(), 0);
    assert_eq!(store.saved().len(), 1);
}
