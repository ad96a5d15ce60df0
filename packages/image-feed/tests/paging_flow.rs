//! End-to-end paging behaviour against the in-memory source.

use std::sync::Arc;

use futures::StreamExt;
use image_feed::testing::MockImageSource;
use image_feed::{
    FeedConfig, FeedError, FeedRepository, GetImageByIdUseCase, GetImagesUseCase, LoadOutcome,
    LoadState, Pager,
};

fn repository(mock: &MockImageSource) -> Arc<FeedRepository> {
    Arc::new(FeedRepository::new(Arc::new(mock.clone()), FeedConfig::default()).unwrap())
}

fn pager(mock: &MockImageSource) -> Pager {
    GetImagesUseCase::new(repository(mock)).execute()
}

fn spawn_append(pager: &Pager) -> tokio::task::JoinHandle<LoadOutcome> {
    let pager = pager.clone();
    tokio::spawn(async move { pager.append().await })
}

#[tokio::test]
async fn append_while_in_flight_fetches_once() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);
    pager.start().await;

    mock.hold();
    let first = spawn_append(&pager);
    mock.wait_for_page_calls(2).await;

    let second = pager.append().await;
    assert!(matches!(second, LoadOutcome::Skipped));

    mock.release();
    assert!(first.await.unwrap().is_loaded());
    assert_eq!(mock.page_calls(), vec![(1, 10), (2, 10)]);
    assert_eq!(pager.snapshot().len(), 20);
}

#[tokio::test]
async fn failed_append_keeps_loaded_pages() {
    let mock = MockImageSource::with_total(100);
    mock.fail_page(3);
    let pager = pager(&mock);

    pager.start().await;
    assert!(pager.append().await.is_loaded());
    let outcome = pager.append().await;

    let LoadOutcome::Failed(err) = outcome else {
        panic!("expected failure, got {:?}", outcome);
    };
    assert!(matches!(*err, FeedError::Fetch(_)));

    let snapshot = pager.snapshot();
    assert_eq!(snapshot.len(), 20);
    assert!(snapshot.load_states.append.is_error());
    assert_eq!(snapshot.load_states.refresh, LoadState::INCOMPLETE);

    mock.clear_failures();
    let retried = pager.retry().await;
    assert_eq!(retried.len(), 1);
    assert!(retried[0].1.is_loaded());
    assert_eq!(pager.snapshot().len(), 30);
    assert!(!pager.snapshot().load_states.has_error());
}

#[tokio::test]
async fn end_of_data_completes_append() {
    let mock = MockImageSource::with_total(25);
    let pager = pager(&mock);

    pager.start().await;
    pager.append().await;
    pager.append().await;
    let last = pager.append().await;

    assert!(matches!(last, LoadOutcome::Loaded { items: 0 }));
    let snapshot = pager.snapshot();
    assert_eq!(snapshot.len(), 25);
    assert_eq!(snapshot.load_states.append, LoadState::COMPLETE);

    assert!(matches!(pager.append().await, LoadOutcome::Skipped));
    assert_eq!(mock.page_call_count(), 4);
}

#[tokio::test]
async fn close_discards_in_flight_result() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);
    pager.start().await;

    mock.hold();
    let pending = spawn_append(&pager);
    mock.wait_for_page_calls(2).await;
    let before = pager.snapshot();
    assert!(before.load_states.append.is_loading());

    pager.close();
    mock.release();

    assert!(matches!(pending.await.unwrap(), LoadOutcome::Cancelled));
    assert_eq!(pager.snapshot(), before);
    assert!(matches!(pager.append().await, LoadOutcome::Cancelled));
    assert!(matches!(pager.refresh().await, LoadOutcome::Cancelled));
    assert_eq!(mock.page_call_count(), 2);
}

#[tokio::test]
async fn refresh_supersedes_in_flight_append() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);
    pager.start().await;

    mock.hold();
    let stale = spawn_append(&pager);
    mock.wait_for_page_calls(2).await;

    let refreshing = {
        let pager = pager.clone();
        tokio::spawn(async move { pager.refresh().await })
    };
    // The superseded append gives up without its fetch completing.
    assert!(matches!(stale.await.unwrap(), LoadOutcome::Cancelled));

    mock.wait_for_page_calls(3).await;
    let during = pager.snapshot();
    assert!(during.load_states.refresh.is_loading());
    assert_eq!(during.len(), 10);

    mock.release();
    assert!(refreshing.await.unwrap().is_loaded());

    let snapshot = pager.snapshot();
    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.len(), 10);
    assert_eq!(snapshot.items[0].id, "0");
    assert_eq!(snapshot.load_states.append, LoadState::INCOMPLETE);
    assert_eq!(mock.page_calls(), vec![(1, 10), (2, 10), (1, 10)]);
}

fn ids(pager: &Pager) -> Vec<u32> {
    pager
        .snapshot()
        .items
        .iter()
        .map(|i| i.id.parse().unwrap())
        .collect()
}

#[tokio::test]
async fn eviction_discards_prepend_against_moved_boundary() {
    let mock = MockImageSource::with_total(100);
    let config = FeedConfig::default().with_max_cached_pages(2);
    let repository = FeedRepository::new(Arc::new(mock.clone()), config).unwrap();
    let pager = repository.paged_images();

    pager.start().await;
    pager.append().await;
    pager.append().await;
    // Pages 2 and 3 are cached.
    assert_eq!(ids(&pager), (10..30).collect::<Vec<_>>());

    mock.hold_page(1);
    mock.hold_page(4);
    let prepending = {
        let pager = pager.clone();
        tokio::spawn(async move { pager.prepend().await })
    };
    let appending = spawn_append(&pager);
    mock.wait_for_page_calls(5).await;

    // Page 4 lands first and evicts page 2, so page 1 no longer borders
    // the sequence.
    mock.release_page(4);
    assert!(appending.await.unwrap().is_loaded());
    assert_eq!(ids(&pager), (20..40).collect::<Vec<_>>());
    assert!(pager.load_states().prepend.is_loading());
    assert!(matches!(pager.prepend().await, LoadOutcome::Skipped));

    mock.release_page(1);
    assert!(matches!(prepending.await.unwrap(), LoadOutcome::Cancelled));
    assert_eq!(ids(&pager), (20..40).collect::<Vec<_>>());
    assert_eq!(pager.snapshot().load_states.prepend, LoadState::INCOMPLETE);

    // The real predecessor loads normally.
    assert!(pager.prepend().await.is_loaded());
    assert_eq!(ids(&pager), (10..30).collect::<Vec<_>>());
    assert_eq!(mock.page_call_count(), 6);
    assert_eq!(mock.page_calls().last(), Some(&(2, 10)));
}

#[tokio::test]
async fn refresh_without_anchor_restarts_at_first_page() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);

    pager.start().await;
    pager.append().await;
    pager.append().await;
    assert_eq!(pager.snapshot().len(), 30);

    assert!(pager.refresh().await.is_loaded());

    let snapshot = pager.snapshot();
    assert_eq!(snapshot.len(), 10);
    assert_eq!(snapshot.items[9].id, "9");
    assert_eq!(mock.page_calls().last(), Some(&(1, 10)));
}

#[tokio::test]
async fn observers_see_loading_then_items() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);
    let mut rx = pager.subscribe();

    mock.hold();
    let starting = {
        let pager = pager.clone();
        tokio::spawn(async move { pager.start().await })
    };

    let loading = rx
        .wait_for(|s| s.load_states.refresh.is_loading())
        .await
        .unwrap()
        .clone();
    assert!(loading.is_empty());

    mock.release();
    let loaded = rx.wait_for(|s| s.len() == 10).await.unwrap().clone();
    assert_eq!(loaded.load_states.refresh, LoadState::INCOMPLETE);
    assert!(starting.await.unwrap().is_loaded());
}

#[tokio::test]
async fn resubscribing_replays_without_fetching() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);
    pager.start().await;
    pager.append().await;

    let first = pager.stream().next().await.unwrap();
    let second = pager.stream().next().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 20);
    assert_eq!(mock.page_call_count(), 2);
}

#[tokio::test]
async fn access_near_end_prefetches_next_page() {
    let mock = MockImageSource::with_total(100);
    let pager = pager(&mock);
    pager.start().await;

    for load in pager.access(5) {
        assert!(tokio::spawn(load).await.unwrap().is_loaded());
    }

    assert_eq!(pager.snapshot().len(), 20);
    assert_eq!(pager.paging_state().anchor_position, Some(5));
}

#[tokio::test]
async fn missing_image_is_absent() {
    let mock = MockImageSource::with_total(10);
    let use_case = GetImageByIdUseCase::new(repository(&mock));

    assert!(use_case.execute("missing-id").await.unwrap().is_none());
    assert_eq!(use_case.execute("7").await.unwrap().unwrap().id, "7");
    assert!(matches!(
        use_case.execute("").await,
        Err(FeedError::InvalidId)
    ));
}
