mod helpers;

use std::sync::Arc;
use std::time::Duration;

use brent::{
    DateRange, FetchCoordinator, FetchError, LoadOutcome, LoadState, Resource, SourceSet,
};
use brent_mock::{MockBehavior, MockSource, fixtures};
use helpers::{coordinator, d};

fn march() -> DateRange {
    DateRange::new(Some(d(2020, 3, 1)), Some(d(2020, 3, 31))).unwrap()
}

fn april() -> DateRange {
    DateRange::new(Some(d(2020, 4, 1)), Some(d(2020, 4, 30))).unwrap()
}

#[tokio::test]
async fn loaded_only_when_all_three_succeed() {
    let mock = Arc::new(MockSource::new());
    let coord = coordinator(&mock);
    assert_eq!(coord.state(), LoadState::Idle);

    let handle = coord.start_load(DateRange::unbounded());
    assert!(coord.state().is_loading());

    let LoadOutcome::Applied(LoadState::Loaded(ds)) = handle.wait().await else {
        panic!("expected loaded state");
    };
    assert_eq!(ds.prices, fixtures::prices());
    assert_eq!(ds.change_points, fixtures::change_points());
    assert_eq!(ds.events, fixtures::events());
    assert_eq!(coord.state().dataset(), Some(&ds));
}

#[tokio::test]
async fn failing_change_points_fail_the_whole_load() {
    let mock = Arc::new(MockSource::new());
    let err = FetchError::http_status(Resource::ChangePoints, 500, "model output missing");
    mock.fail(Resource::ChangePoints, err.clone());
    let coord = coordinator(&mock);

    let outcome = coord.start_load(march()).wait().await;
    assert_eq!(
        outcome,
        LoadOutcome::Applied(LoadState::Failed {
            range: march(),
            error: err.clone()
        })
    );
    assert_eq!(coord.state().error(), Some(&err));
    assert!(coord.state().dataset().is_none());
}

#[tokio::test]
async fn failure_clears_previous_data() {
    let mock = Arc::new(MockSource::new());
    let coord = coordinator(&mock);
    coord.start_load(march()).wait().await;
    assert!(coord.state().view().is_some());

    mock.fail(Resource::Prices, FetchError::transport(Resource::Prices, "connection reset"));
    coord.start_load(april()).wait().await;
    assert!(coord.state().view().is_none());
    assert_eq!(coord.state().error().map(FetchError::resource), Some(Resource::Prices));
}

#[tokio::test(start_paused = true)]
async fn later_load_wins_when_earlier_finishes_last() {
    let mock = Arc::new(MockSource::new());
    mock.queue_delay(Resource::Prices, Duration::from_secs(10));
    let coord = coordinator(&mock);

    let first = coord.start_load(march());
    tokio::task::yield_now().await;
    let second = coord.start_load(april());
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert!(second.generation() > first.generation());

    let LoadOutcome::Applied(LoadState::Loaded(ds)) = second.wait().await else {
        panic!("expected the second load to publish");
    };
    assert_eq!(ds.range, april());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(first.wait().await, LoadOutcome::Superseded);
    assert_eq!(coord.state().dataset().map(|ds| ds.range), Some(april()));
}

#[tokio::test(start_paused = true)]
async fn earlier_load_finishing_first_is_discarded() {
    let mock = Arc::new(MockSource::new());
    mock.queue_delay(Resource::Events, Duration::from_secs(1));
    mock.queue_delay(Resource::Events, Duration::from_secs(5));
    let coord = coordinator(&mock);

    let first = coord.start_load(march());
    tokio::task::yield_now().await;
    let second = coord.start_load(april());

    assert_eq!(first.wait().await, LoadOutcome::Superseded);
    assert_eq!(
        coord.state(),
        LoadState::Loading {
            range: april(),
            generation: second.generation()
        }
    );
    assert!(matches!(second.wait().await, LoadOutcome::Applied(LoadState::Loaded(_))));
}

#[tokio::test(start_paused = true)]
async fn superseded_failure_never_replaces_newer_data() {
    let mock = Arc::new(MockSource::new());
    mock.queue_delay(Resource::ChangePoints, Duration::from_secs(10));
    mock.fail(
        Resource::ChangePoints,
        FetchError::http_status(Resource::ChangePoints, 500, "model output missing"),
    );
    let coord = coordinator(&mock);

    let first = coord.start_load(march());
    tokio::task::yield_now().await;
    assert_eq!(mock.calls(Resource::ChangePoints), 1);

    // only the first generation's change point request fails
    mock.set_change_points(MockBehavior::Return(fixtures::change_points()));
    let second = coord.start_load(april());
    let LoadOutcome::Applied(LoadState::Loaded(ds)) = second.wait().await else {
        panic!("expected the second load to publish");
    };
    assert_eq!(ds.range, april());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(first.wait().await, LoadOutcome::Superseded);
    assert!(coord.state().error().is_none());
    assert_eq!(coord.state().dataset().map(|ds| ds.range), Some(april()));
}

#[tokio::test(start_paused = true)]
async fn cancelling_the_current_load_returns_to_idle() {
    let mock = Arc::new(MockSource::new());
    mock.set_delay(Resource::Prices, Duration::from_secs(10));
    let coord = coordinator(&mock);

    let handle = coord.start_load(march());
    assert!(handle.cancel());
    assert!(handle.is_cancelled());
    assert_eq!(coord.state(), LoadState::Idle);
    assert_eq!(handle.wait().await, LoadOutcome::Superseded);
    assert_eq!(coord.state(), LoadState::Idle);
}

#[tokio::test(start_paused = true)]
async fn cancelling_a_stale_handle_changes_nothing() {
    let mock = Arc::new(MockSource::new());
    let coord = coordinator(&mock);

    let stale = coord.start_load(march());
    let current = coord.start_load(april());
    assert!(!stale.cancel());
    assert!(!current.is_cancelled());
    assert!(matches!(current.wait().await, LoadOutcome::Applied(_)));
}

#[tokio::test(start_paused = true)]
async fn hung_sub_fetch_times_out() {
    let mock = Arc::new(MockSource::new());
    mock.set_events(MockBehavior::Hang);
    let coord = FetchCoordinator::new(
        SourceSet::from_source(Arc::clone(&mock)),
        Some(Duration::from_secs(30)),
    );

    let outcome = coord.start_load(DateRange::unbounded()).wait().await;
    let LoadOutcome::Applied(LoadState::Failed { error, .. }) = outcome else {
        panic!("expected timeout failure");
    };
    assert_eq!(error, FetchError::timeout(Resource::Events, Duration::from_secs(30)));
}

#[tokio::test]
async fn subscribers_observe_whole_transitions() {
    let mock = Arc::new(MockSource::new());
    let coord = coordinator(&mock);
    let mut rx = coord.subscribe();

    let handle = coord.start_load(march());
    assert!(rx.borrow_and_update().is_loading());
    handle.wait().await;
    rx.changed().await.ok();
    assert!(matches!(*rx.borrow(), LoadState::Loaded(_)));
}

#[tokio::test]
async fn price_request_carries_the_range() {
    let mock = Arc::new(MockSource::new());
    let coord = coordinator(&mock);
    let LoadOutcome::Applied(LoadState::Loaded(ds)) = coord.start_load(march()).wait().await
    else {
        panic!("expected loaded state");
    };
    assert_eq!(mock.price_requests(), vec![march()]);
    assert!(ds.prices.iter().all(|p| march().contains(p.date)));
    assert_eq!(mock.calls(Resource::ChangePoints), 1);
    assert_eq!(mock.calls(Resource::Events), 1);
}
