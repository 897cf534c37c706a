//! Integration tests for gilt-toast.
//!
//! These drive the public API from outside the crate: a provider on a real
//! (paused) tokio clock, and the documented scenarios on the simulated one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gilt_toast::testing::ManualScheduler;
use gilt_toast::{
    CloseReason, Position, PromiseMessages, Status, ToastId, ToastOptions, ToastProvider, ToasterConfig,
};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ids(provider: &ToastProvider) -> Vec<String> {
    provider.toaster().toasts().iter().map(|t| t.id.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Simulated clock scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_limit_two_evicts_first() {
    init_tracing();
    let clock = ManualScheduler::new();
    let provider = ToastProvider::new(ToasterConfig::new().with_limit(2), clock.clone()).unwrap();
    let toaster = provider.toaster();

    let a1 = toaster.add(ToastOptions::titled("A"));
    let a2 = toaster.add(ToastOptions::titled("B"));
    let a3 = toaster.add(ToastOptions::titled("C"));

    assert_eq!(ids(&provider), vec![a3.to_string(), a2.to_string()]);
    assert!(!toaster.is_active(&a1));
    assert!(!clock.is_scheduled(&a1));
    assert_eq!(clock.pending(), 2);
}

#[test]
fn test_persistent_toast_outlives_ten_minutes() {
    init_tracing();
    let clock = ManualScheduler::new();
    let provider = ToastProvider::new(ToasterConfig::new(), clock.clone()).unwrap();
    let toaster = provider.toaster();

    toaster.add(ToastOptions::new().with_id("x").persistent());
    clock.advance(Duration::from_secs(600));
    assert!(toaster.is_active(&ToastId::from("x")));
}

#[test]
fn test_capacity_bound_holds_after_every_add() {
    let clock = ManualScheduler::new();
    let provider = ToastProvider::new(ToasterConfig::new().with_limit(4), clock.clone()).unwrap();
    let toaster = provider.toaster();

    let mut added = Vec::new();
    for i in 0..20u64 {
        let position = Position::ALL[(i % 6) as usize];
        added.push(toaster.add(ToastOptions::new().with_position(position)));
        assert!(toaster.toasts().len() <= 4);
        clock.advance_ms(100);
    }
    let expected: Vec<String> = added.iter().rev().take(4).map(ToString::to_string).collect();
    assert_eq!(ids(&provider), expected);
}

#[test]
fn test_upload_flow_from_config_file() {
    init_tracing();
    let config = ToasterConfig::from_toml_str(
        r#"
        limit = 3

        [defaults]
        position = "top-right"
        duration = 2000
        "#,
    )
    .unwrap();
    let clock = ManualScheduler::new();
    let provider = ToastProvider::new(config, clock.clone()).unwrap();
    let toaster = provider.toaster();

    let closes = Arc::new(AtomicUsize::new(0));
    let closes_c = closes.clone();
    let id = toaster.loading(
        ToastOptions::titled("Uploading")
            .with_id("upload")
            .persistent()
            .on_close(move |_, reason| {
                assert_eq!(reason, CloseReason::TimedOut);
                closes_c.fetch_add(1, Ordering::SeqCst);
            }),
    );
    clock.advance_ms(30_000);
    assert!(toaster.is_active(&id));

    toaster.update(
        &id,
        ToastOptions::titled("Uploaded")
            .with_status(Status::Success)
            .with_duration(Duration::from_millis(2000)),
    );
    let groups = toaster.position_groups();
    assert_eq!(groups.get(Position::TopRight).len(), 1);
    assert_eq!(groups.get(Position::TopRight)[0].status, Status::Success);

    clock.advance_ms(1999);
    assert!(toaster.is_active(&id));
    clock.advance_ms(1);
    assert!(!toaster.is_active(&id));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_groups_snapshot() {
    let clock = ManualScheduler::new();
    let provider = ToastProvider::new(ToasterConfig::new(), clock).unwrap();
    let toaster = provider.toaster();

    toaster.info(ToastOptions::new().with_id("a").with_position(Position::TopLeft));
    toaster.warning(ToastOptions::new().with_id("b"));
    toaster.error(ToastOptions::new().with_id("c").with_position(Position::TopLeft));
    toaster.remove(&ToastId::from("b"));

    insta::assert_snapshot!(toaster.position_groups().to_string(), @r"
    top: -
    top-left: c, a
    top-right: -
    bottom: -
    bottom-left: -
    bottom-right: -
    ");
}

// ---------------------------------------------------------------------------
// Providers sharing one scheduler
// ---------------------------------------------------------------------------

fn shared_pair(clock: &ManualScheduler) -> (ToastProvider, ToastProvider) {
    let a = ToastProvider::new(ToasterConfig::new(), clock.clone()).unwrap();
    let b = ToastProvider::new(ToasterConfig::new(), clock.clone()).unwrap();
    (a, b)
}

#[test]
fn test_remove_all_leaves_other_provider_timers() {
    init_tracing();
    let clock = ManualScheduler::new();
    let (a, b) = shared_pair(&clock);

    let id = b.toaster().add(ToastOptions::titled("B").with_duration(Duration::from_millis(1000)));
    a.toaster().add(ToastOptions::titled("A"));
    a.toaster().remove_all();

    clock.advance(Duration::from_secs(60));
    assert!(!b.toaster().is_active(&id));
}

#[test]
fn test_same_id_in_two_providers_keeps_separate_timers() {
    init_tracing();
    let clock = ManualScheduler::new();
    let (a, b) = shared_pair(&clock);

    let x = a.toaster().add(ToastOptions::titled("A").with_id("x").with_duration(Duration::from_millis(1000)));
    b.toaster().add(ToastOptions::titled("B").with_id("x").with_duration(Duration::from_millis(500)));
    b.toaster().remove(&x);
    assert!(clock.is_scheduled(&x));

    clock.advance(Duration::from_secs(60));
    assert!(!a.toaster().is_active(&x));
}

#[test]
fn test_provider_drop_leaves_other_provider_timers() {
    init_tracing();
    let clock = ManualScheduler::new();
    let (a, b) = shared_pair(&clock);
    let closes = Arc::new(AtomicUsize::new(0));
    let closes_c = closes.clone();

    let id = b.toaster().add(ToastOptions::new().on_close(move |_, _| {
        closes_c.fetch_add(1, Ordering::SeqCst);
    }));
    a.toaster().add(ToastOptions::new().with_id(id.clone()));
    drop(a);
    assert_eq!(clock.pending(), 1);

    clock.advance(Duration::from_secs(60));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert!(!b.toaster().is_active(&id));
}

// ---------------------------------------------------------------------------
// Tokio clock
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_tokio_auto_dismiss() {
    init_tracing();
    let provider = ToastProvider::with_tokio(ToasterConfig::new()).unwrap();
    let toaster = provider.toaster();

    let id = toaster.success(ToastOptions::titled("Saved").with_duration(Duration::from_millis(1000)));
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(toaster.is_active(&id));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!toaster.is_active(&id));
}

#[tokio::test(start_paused = true)]
async fn test_tokio_update_cancels_stale_timer() {
    let provider = ToastProvider::with_tokio(ToasterConfig::new()).unwrap();
    let toaster = provider.toaster();

    let id = toaster.add(ToastOptions::new().with_duration(Duration::from_millis(1000)));
    tokio::time::sleep(Duration::from_millis(500)).await;
    toaster.update(&id, ToastOptions::new().with_duration(Duration::from_millis(5000)));

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(toaster.is_active(&id));

    tokio::time::sleep(Duration::from_millis(4400)).await;
    assert!(!toaster.is_active(&id));
}

#[tokio::test(start_paused = true)]
async fn test_tokio_feed_reports_expiry() {
    let provider = ToastProvider::with_tokio(ToasterConfig::new()).unwrap();
    let toaster = provider.toaster();
    let mut feed = toaster.subscribe().unwrap();

    toaster.info(ToastOptions::new().with_duration(Duration::from_millis(250)));
    feed.changed().await.unwrap();
    assert_eq!(feed.borrow_and_update().len(), 1);

    feed.changed().await.unwrap();
    assert!(feed.borrow_and_update().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_tokio_promise() {
    let provider = ToastProvider::with_tokio(ToasterConfig::new()).unwrap();
    let toaster = provider.toaster();

    let value = toaster
        .promise(
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, ()>(42)
            },
            PromiseMessages::new("Working", "Done", "Failed"),
        )
        .await;
    assert_eq!(value, Ok(42));

    let toasts = toaster.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].status, Status::Success);
    let id = toasts[0].id.clone();

    tokio::time::sleep(Duration::from_millis(5001)).await;
    assert!(!toaster.is_active(&id));
}

#[tokio::test(start_paused = true)]
async fn test_tokio_provider_drop_cancels_timers() {
    let closes = Arc::new(AtomicUsize::new(0));
    let provider = ToastProvider::with_tokio(ToasterConfig::new()).unwrap();
    let toaster = provider.toaster();
    for _ in 0..3 {
        let closes = closes.clone();
        toaster.add(ToastOptions::new().on_close(move |_, _| {
            closes.fetch_add(1, Ordering::SeqCst);
        }));
    }
    drop(provider);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(closes.load(Ordering::SeqCst), 0);
    assert!(!toaster.is_attached());
}
