use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{RwLock, broadcast};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::events::{Event, EventBus};
use crate::state::{ReviewSnapshot, ReviewState};

pub type SharedState<R> = Arc<Mutex<ReviewState<R>>>;

/// Owns review state for every identifier. Consumers asking for the same
/// id get the same [`SharedState`]; ids never share anything.
///
/// State is created lazily and lives as long as the store.
pub struct ReviewStore<R> {
    states: RwLock<HashMap<String, SharedState<R>>>,
    clock: Arc<dyn Clock>,
    events: EventBus,
}

impl<R: Clone + Default> Default for ReviewStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + Default> ReviewStore<R> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            clock,
            events: EventBus::default(),
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Get the state for `id`, creating it on first access.
    pub async fn state(&self, id: &str) -> SharedState<R> {
        if let Some(state) = self.states.read().await.get(id) {
            return Arc::clone(state);
        }
        let mut states = self.states.write().await;
        let state = states
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ReviewState::new(self.clock.now_millis()))));
        Arc::clone(state)
    }

    pub async fn snapshot(&self, id: &str) -> Option<ReviewSnapshot<R>> {
        let states = self.states.read().await;
        states.get(id).map(|s| s.lock().unwrap().snapshot())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.states.read().await.contains_key(id)
    }

    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.states.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Put the state for `id` back to its initial value, in place, so
    /// existing handles see the reset. Returns false if `id` was never used.
    ///
    /// Operations already awaiting the platform still apply their result
    /// when they complete, and `loading` stays true until they do.
    pub async fn reset(&self, id: &str) -> bool {
        let states = self.states.read().await;
        let Some(state) = states.get(id) else {
            return false;
        };
        state.lock().unwrap().reset(self.clock.now_millis());
        info!(id, "review state reset");
        self.events.emit(Event::Reset { id: id.to_string() });
        true
    }

    pub async fn reset_all(&self) {
        let states = self.states.read().await;
        for (id, state) in states.iter() {
            state.lock().unwrap().reset(self.clock.now_millis());
            self.events.emit(Event::Reset { id: id.clone() });
        }
        info!(count = states.len(), "all review state reset");
    }
}
