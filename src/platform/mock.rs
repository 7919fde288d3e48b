use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Context, Query, ReviewApi};
use crate::cache::ReviewCollection;
use crate::error::PlatformError;

/// A scripted platform for tests. Returns pre-defined responses in order
/// and records every query it receives.
pub struct MockReviewApi<R> {
    search_responses: Mutex<VecDeque<Result<R, PlatformError>>>,
    add_responses: Mutex<VecDeque<Result<R, PlatformError>>>,
    search_calls: AtomicUsize,
    add_calls: AtomicUsize,
    queries: Mutex<Vec<Query<Value>>>,
}

impl<R> Default for MockReviewApi<R> {
    fn default() -> Self {
        Self {
            search_responses: Mutex::new(VecDeque::new()),
            add_responses: Mutex::new(VecDeque::new()),
            search_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl<R> MockReviewApi<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(self, response: Result<R, PlatformError>) -> Self {
        self.search_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_add(self, response: Result<R, PlatformError>) -> Self {
        self.add_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    /// Every query received so far, searches and adds interleaved.
    pub fn queries(&self) -> Vec<Query<Value>> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R: ReviewCollection> ReviewApi for MockReviewApi<R> {
    type Review = R;
    type SearchParams = Value;
    type AddParams = Value;

    async fn search_reviews(
        &self,
        _context: &Context,
        query: Query<Value>,
    ) -> Result<R, PlatformError> {
        let n = self.search_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.queries.lock().unwrap().push(query);
        self.search_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlatformError::other(format!(
                    "MockReviewApi: no more search responses (called {n} times)"
                )))
            })
    }

    async fn add_review(
        &self,
        _context: &Context,
        query: Query<Value>,
    ) -> Result<R, PlatformError> {
        let n = self.add_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.queries.lock().unwrap().push(query);
        self.add_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlatformError::other(format!(
                    "MockReviewApi: no more add responses (called {n} times)"
                )))
            })
    }
}
