use serde::Serialize;

use crate::error::{Operation, PlatformError, ReviewErrors};

/// Mutable state shared by every consumer of one identifier.
#[derive(Debug, Clone)]
pub struct ReviewState<R> {
    pub reviews: R,
    pub errors: ReviewErrors,
    pub cache_timestamp: u64,
    in_flight: usize,
}

impl<R: Default> ReviewState<R> {
    pub fn new(now: u64) -> Self {
        Self {
            reviews: R::default(),
            errors: ReviewErrors::default(),
            cache_timestamp: now,
            in_flight: 0,
        }
    }

    /// Back to the initial value. Operations still awaiting the platform
    /// keep counting towards `loading`.
    pub fn reset(&mut self, now: u64) {
        let in_flight = self.in_flight;
        *self = Self::new(now);
        self.in_flight = in_flight;
    }
}

impl<R> ReviewState<R> {
    /// True while at least one operation is awaiting its collaborator.
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin(&mut self) {
        self.in_flight += 1;
    }

    pub fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Apply a collaborator result. `refreshed_at` is set only for searches.
    pub fn record(
        &mut self,
        op: Operation,
        outcome: Result<R, PlatformError>,
        refreshed_at: Option<u64>,
    ) {
        match outcome {
            Ok(reviews) => {
                self.reviews = reviews;
                self.errors.set(op, None);
                if let Some(now) = refreshed_at {
                    self.cache_timestamp = now;
                }
            }
            Err(err) => self.errors.set(op, Some(err)),
        }
    }
}

impl<R: Clone> ReviewState<R> {
    pub fn snapshot(&self) -> ReviewSnapshot<R> {
        ReviewSnapshot {
            reviews: self.reviews.clone(),
            loading: self.loading(),
            error: self.errors.clone(),
            cache_timestamp: self.cache_timestamp,
        }
    }
}

/// Read-only copy of a [`ReviewState`] at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSnapshot<R> {
    pub reviews: R,
    pub loading: bool,
    pub error: ReviewErrors,
    pub cache_timestamp: u64,
}
