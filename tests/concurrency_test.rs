use std::cell::Cell;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;

use review_kit::clock::ManualClock;
use review_kit::platform::func::FnReviewApi;
use review_kit::{Context, PlatformError, Query, ReviewFactory, ReviewStore};

type GatedApi = FnReviewApi<Vec<u32>, u32, u32>;

/// Searches block until the returned semaphore hands out a permit, then
/// answer with `vec![params]`. Adds fail immediately.
fn gated_api() -> (Arc<Semaphore>, GatedApi) {
    let gate = Arc::new(Semaphore::new(0));
    let search_gate = Arc::clone(&gate);
    let api = FnReviewApi::new(
        move |_ctx: Context, query: Query<u32>| {
            let gate = Arc::clone(&search_gate);
            async move {
                match gate.acquire().await {
                    Ok(permit) => {
                        permit.forget();
                        Ok(vec![query.params])
                    }
                    Err(e) => Err(PlatformError::other(e.to_string())),
                }
            }
            .boxed()
        },
        |_ctx: Context, _query: Query<u32>| {
            async { Err(PlatformError::other("not supported")) }.boxed()
        },
    );
    (gate, api)
}

async fn wait_until(cond: impl Fn() -> bool) {
    while !cond() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn loading_holds_until_last_overlapping_call_finishes() {
    let (gate, api) = gated_api();
    let store = Arc::new(ReviewStore::with_clock(Arc::new(ManualClock::new(0))));
    let factory = ReviewFactory::new(api, Context::new("shop"), store);
    let first = factory.use_review("p1", None).await;
    let second = factory.use_review("p1", None).await;

    let driver = async {
        wait_until(|| first.loading()).await;
        gate.add_permits(1);
        wait_until(|| first.reviews() == vec![1]).await;
        assert!(second.loading(), "second search is still in flight");

        gate.add_permits(1);
        wait_until(|| !first.loading()).await;
    };

    futures::join!(first.search(1u32, true), second.search(2u32, true), driver);

    assert_eq!(first.reviews(), vec![2], "last to complete wins");
    assert!(!second.loading());
    assert!(first.error().search.is_none());
}

#[tokio::test]
async fn failing_add_does_not_end_inflight_search() {
    let (gate, api) = gated_api();
    let factory = ReviewFactory::new(api, Context::default(), Arc::new(ReviewStore::new()));
    let reviews = factory.use_review("p1", None).await;

    let driver = async {
        wait_until(|| reviews.loading()).await;
        reviews.add_review(9u32).await;
        assert!(reviews.error().add_review.is_some());
        assert!(reviews.loading());
        gate.add_permits(1);
    };

    futures::join!(reviews.search(5u32, false), driver);

    assert!(!reviews.loading());
    assert_eq!(reviews.reviews(), vec![5]);
}

#[tokio::test]
async fn reset_does_not_end_inflight_search() {
    let (gate, api) = gated_api();
    let store = Arc::new(ReviewStore::with_clock(Arc::new(ManualClock::new(0))));
    let factory = ReviewFactory::new(api, Context::new("shop"), Arc::clone(&store));
    let first = factory.use_review("p1", None).await;
    let second = factory.use_review("p1", None).await;
    let reset_done = Cell::new(false);
    let second_started = Cell::new(false);

    let second_search = async {
        wait_until(|| reset_done.get()).await;
        second_started.set(true);
        second.search(2u32, true).await;
    };

    let driver = async {
        wait_until(|| first.loading()).await;
        assert!(store.reset("p1").await);
        assert!(first.loading(), "first search is still in flight");
        reset_done.set(true);

        wait_until(|| second_started.get()).await;
        gate.add_permits(1);
        wait_until(|| first.reviews() == vec![1]).await;
        assert!(first.loading(), "second search is still in flight");

        gate.add_permits(1);
        wait_until(|| !first.loading()).await;
    };

    futures::join!(first.search(1u32, true), second_search, driver);

    assert_eq!(first.reviews(), vec![2]);
    assert!(!second.loading());
}
