use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::cache::is_cache_valid;
use crate::config::ReviewConfig;
use crate::error::{Operation, PlatformError, ReviewErrors};
use crate::events::Event;
use crate::platform::{Context, Query, ReviewApi};
use crate::registry::{ReviewStore, SharedState};
use crate::state::ReviewSnapshot;

/// Hands out [`UseReview`] handles bound to one platform and one store.
pub struct ReviewFactory<A: ReviewApi> {
    api: Arc<A>,
    context: Arc<Context>,
    store: Arc<ReviewStore<A::Review>>,
}

impl<A: ReviewApi> ReviewFactory<A> {
    pub fn new(api: A, context: Context, store: Arc<ReviewStore<A::Review>>) -> Self {
        Self::from_shared(Arc::new(api), context, store)
    }

    pub fn from_shared(api: Arc<A>, context: Context, store: Arc<ReviewStore<A::Review>>) -> Self {
        Self {
            api,
            context: Arc::new(context),
            store,
        }
    }

    pub fn store(&self) -> &Arc<ReviewStore<A::Review>> {
        &self.store
    }

    /// Review state for `id`. Handles for the same id share state.
    /// `cache_ttl` of `None` means a populated cache never expires.
    pub async fn use_review(&self, id: &str, cache_ttl: Option<Duration>) -> UseReview<A> {
        UseReview {
            id: id.to_string(),
            cache_ttl,
            api: Arc::clone(&self.api),
            context: Arc::clone(&self.context),
            state: self.store.state(id).await,
            store: Arc::clone(&self.store),
        }
    }

    /// Like [`use_review`](Self::use_review), with the ttl taken from config.
    pub async fn use_review_configured(&self, id: &str, config: &ReviewConfig) -> UseReview<A> {
        self.use_review(id, config.ttl_for(id)).await
    }
}

/// Search and create reviews for one identifier.
///
/// Neither operation returns the platform's failure. Check
/// [`error`](Self::error) after the call completes.
pub struct UseReview<A: ReviewApi> {
    id: String,
    cache_ttl: Option<Duration>,
    api: Arc<A>,
    context: Arc<Context>,
    state: SharedState<A::Review>,
    store: Arc<ReviewStore<A::Review>>,
}

impl<A: ReviewApi> Clone for UseReview<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            cache_ttl: self.cache_ttl,
            api: Arc::clone(&self.api),
            context: Arc::clone(&self.context),
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
        }
    }
}

impl<A: ReviewApi> UseReview<A> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn reviews(&self) -> A::Review {
        self.state.lock().unwrap().reviews.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().unwrap().loading()
    }

    pub fn error(&self) -> ReviewErrors {
        self.state.lock().unwrap().errors.clone()
    }

    pub fn cache_timestamp(&self) -> u64 {
        self.state.lock().unwrap().cache_timestamp
    }

    pub fn snapshot(&self) -> ReviewSnapshot<A::Review> {
        self.state.lock().unwrap().snapshot()
    }

    /// Events for every id in the store; filter with [`Event::id`].
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.store.subscribe()
    }

    /// Refresh the review collection. Skips the platform call when the
    /// cache is still valid, unless `force` is set.
    pub async fn search(&self, query: impl Into<Query<A::SearchParams>>, force: bool) {
        let query = query.into();
        debug!(id = %self.id, ?query, force, "useReview/search");

        if !force {
            let now = self.store.now();
            let state = self.state.lock().unwrap();
            if is_cache_valid(&state.reviews, state.cache_timestamp, self.cache_ttl, now) {
                debug!(id = %self.id, "useReview/search served from cache");
                return;
            }
        }

        self.begin();
        let outcome = self.api.search_reviews(&self.context, query).await;
        let refreshed_at = self.store.now();
        self.complete(Operation::Search, outcome, Some(refreshed_at));
    }

    /// Create a review. The platform answers with the updated collection.
    /// The cache timestamp is left alone.
    pub async fn add_review(&self, query: impl Into<Query<A::AddParams>>) {
        let query = query.into();
        debug!(id = %self.id, ?query, "useReview/addReview");

        self.begin();
        let outcome = self.api.add_review(&self.context, query).await;
        self.complete(Operation::AddReview, outcome, None);
    }

    fn begin(&self) {
        let started = {
            let mut state = self.state.lock().unwrap();
            let was_loading = state.loading();
            state.begin();
            !was_loading
        };
        if started {
            self.emit_loading(true);
        }
    }

    fn complete(
        &self,
        op: Operation,
        outcome: Result<A::Review, PlatformError>,
        refreshed_at: Option<u64>,
    ) {
        let event = match &outcome {
            Ok(_) => Event::ReviewsUpdated {
                id: self.id.clone(),
                operation: op,
            },
            Err(err) => {
                error!(id = %self.id, operation = %op, error = %err, "useReview/{op} failed");
                Event::ErrorRecorded {
                    id: self.id.clone(),
                    operation: op,
                    error: err.clone(),
                }
            }
        };

        let stopped = {
            let mut state = self.state.lock().unwrap();
            state.record(op, outcome, refreshed_at);
            state.finish();
            !state.loading()
        };

        self.store.events().emit(event);
        if stopped {
            self.emit_loading(false);
        }
    }

    fn emit_loading(&self, loading: bool) {
        self.store.events().emit(Event::LoadingChanged {
            id: self.id.clone(),
            loading,
        });
    }
}
