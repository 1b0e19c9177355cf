use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use tipdeck_core::{
    CarouselController, CarouselHandle, CarouselSettings, CarouselSnapshot, CoreError,
    DeclaredLengthProbe, MediaProbe,
};
use tipdeck_model::{Catalog, ContentItem};
use tokio::sync::watch;
use tokio::time::{Instant, sleep};

mock! {
    Probe {}

    #[async_trait]
    impl MediaProbe for Probe {
        async fn media_length(&self, item: &ContentItem) -> Option<Duration>;
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn tips(tags: &[&str]) -> Arc<Catalog> {
    let items = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| ContentItem::new(format!("tip {i}")).with_category(*tag))
        .collect();
    Arc::new(Catalog::new(items).expect("valid catalog"))
}

fn videos() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(vec![
            ContentItem::new("walkthrough")
                .with_category("Tip")
                .with_media("/tips/walkthrough.mp4"),
            ContentItem::new("demo")
                .with_category("Feature")
                .with_media("/tips/demo.webm"),
        ])
        .expect("valid catalog"),
    )
}

fn spawn(catalog: Arc<Catalog>, probe: Option<Arc<dyn MediaProbe>>) -> CarouselHandle {
    let controller =
        CarouselController::seeded(catalog, CarouselSettings::default(), 42, Instant::now());
    CarouselHandle::spawn(controller, probe)
}

async fn wait_for(
    rx: &mut watch::Receiver<CarouselSnapshot>,
    predicate: impl Fn(&CarouselSnapshot) -> bool,
) -> CarouselSnapshot {
    loop {
        let snapshot = *rx.borrow_and_update();
        if predicate(&snapshot) {
            return snapshot;
        }
        rx.changed().await.expect("carousel runtime still running");
    }
}

fn elapsed_ms(start: Instant) -> u128 {
    start.elapsed().as_millis()
}

#[tokio::test(start_paused = true)]
async fn auto_advance_fires_after_default_duration() {
    let start = Instant::now();
    let handle = spawn(tips(&["Tip", "Feature", "App Idea"]), None);
    let mut rx = handle.subscribe();
    let first = handle.snapshot();

    let advanced = wait_for(&mut rx, |s| s.ticket.epoch == 1).await;
    assert_eq!(elapsed_ms(start), 5_000);
    assert_eq!(advanced.exiting_index, Some(first.active_index));
    assert!(advanced.transitioning);
    assert_eq!(advanced.position, 1);

    let settled = wait_for(&mut rx, |s| !s.transitioning).await;
    assert_eq!(elapsed_ms(start), 6_200);
    assert_eq!(settled.exiting_index, None);

    wait_for(&mut rx, |s| s.ticket.epoch == 2).await;
    assert_eq!(elapsed_ms(start), 10_000);
}

#[tokio::test(start_paused = true)]
async fn probed_video_length_extends_auto_advance() {
    let mut probe = MockProbe::new();
    probe
        .expect_media_length()
        .returning(|_| Some(Duration::from_millis(9_000)));

    let start = Instant::now();
    let handle = spawn(videos(), Some(Arc::new(probe)));
    let mut rx = handle.subscribe();

    let extended = wait_for(&mut rx, |s| s.deadline > start + ms(5_000)).await;
    assert_eq!(extended.deadline, start + ms(8_200));
    assert_eq!(extended.ticket.epoch, 0);

    wait_for(&mut rx, |s| s.ticket.epoch == 1).await;
    assert_eq!(elapsed_ms(start), 8_200);
}

#[tokio::test(start_paused = true)]
async fn declared_video_length_extends_auto_advance() {
    let catalog = Arc::new(
        Catalog::new(vec![
            ContentItem::new("walkthrough")
                .with_category("Tip")
                .with_media("/tips/walkthrough.mp4")
                .with_media_length_ms(9_000),
            ContentItem::new("demo")
                .with_category("Feature")
                .with_media("/tips/demo.mp4")
                .with_media_length_ms(9_000),
        ])
        .expect("valid catalog"),
    );

    let start = Instant::now();
    let handle = spawn(catalog, Some(Arc::new(DeclaredLengthProbe)));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |s| s.ticket.epoch == 1).await;
    assert_eq!(elapsed_ms(start), 8_200);
}

#[tokio::test(start_paused = true)]
async fn probe_is_skipped_for_items_without_video() {
    let mut probe = MockProbe::new();
    probe.expect_media_length().never();

    let start = Instant::now();
    let handle = spawn(tips(&["Tip", "Feature"]), Some(Arc::new(probe)));
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |s| s.ticket.epoch == 1).await;
    assert_eq!(elapsed_ms(start), 5_000);
}

#[tokio::test(start_paused = true)]
async fn manual_steps_during_transition_are_dropped() {
    let handle = spawn(tips(&["Tip", "Feature", "App Idea", "Tip"]), None);
    let mut rx = handle.subscribe();

    handle.forward().await.expect("runtime running");
    handle.forward().await.expect("runtime running");
    handle.backward().await.expect("runtime running");
    sleep(ms(100)).await;

    let snapshot = wait_for(&mut rx, |s| s.ticket.epoch >= 1).await;
    assert_eq!(snapshot.ticket.epoch, 1);
    assert_eq!(snapshot.position, 1);
    assert!(snapshot.transitioning);
}

#[tokio::test(start_paused = true)]
async fn backward_from_first_item_wraps_inside_round() {
    let handle = spawn(tips(&["Tip", "Feature", "App Idea"]), None);
    let mut rx = handle.subscribe();

    handle.backward().await.expect("runtime running");
    let snapshot = wait_for(&mut rx, |s| s.ticket.epoch == 1).await;
    assert_eq!(snapshot.position, 2);
    assert_eq!(snapshot.rounds_built, 1);
}

#[tokio::test(start_paused = true)]
async fn reset_rearms_from_now() {
    let start = Instant::now();
    let handle = spawn(tips(&["Tip", "Feature"]), None);
    let mut rx = handle.subscribe();

    sleep(ms(3_000)).await;
    handle.reset_timer().await.expect("runtime running");

    wait_for(&mut rx, |s| s.ticket.epoch == 1).await;
    assert_eq!(elapsed_ms(start), 8_000);
}

#[tokio::test(start_paused = true)]
async fn stale_report_leaves_deadline_alone() {
    let handle = spawn(tips(&["Tip", "Feature"]), None);
    let mut rx = handle.subscribe();
    let old = handle.snapshot().ticket;

    handle.forward().await.expect("runtime running");
    let current = wait_for(&mut rx, |s| s.ticket.epoch == 1).await;

    handle
        .report_media_duration(old, ms(60_000))
        .await
        .expect("runtime running");
    sleep(ms(10)).await;
    assert_eq!(handle.snapshot().deadline, current.deadline);
}

#[tokio::test(start_paused = true)]
async fn commands_after_shutdown_are_rejected() {
    let mut handle = spawn(tips(&["Tip", "Feature"]), None);
    handle.shutdown().await.expect("clean shutdown");
    assert!(!handle.is_running());

    assert_eq!(handle.forward().await, Err(CoreError::RuntimeClosed));
    assert_eq!(handle.reset_timer().await, Err(CoreError::RuntimeClosed));
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_the_task() {
    let handle = spawn(tips(&["Tip", "Feature"]), None);
    let mut rx = handle.subscribe();
    drop(handle);

    // The task owns the only sender; once it exits the channel closes
    // without another auto-advance being published.
    assert!(rx.changed().await.is_err());
    assert_eq!(rx.borrow().ticket.epoch, 0);
}
