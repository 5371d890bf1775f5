use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mystic_common::games::battle::{BattleOutcome, BattleSnapshot};
use ringbuffer::{AllocRingBuffer, RingBuffer};

pub const EVENT_LOG_SIZE: usize = 64;

/// What the battle task has published and the bot reads back.
#[derive(Default)]
struct ViewState {
    snapshot: Option<BattleSnapshot>,
    outcome: Option<BattleOutcome>,
}

#[derive(Clone)]
pub struct SharedState {
    view: Arc<Mutex<ViewState>>,
    event_log: Arc<Mutex<AllocRingBuffer<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState::default())),
            event_log: Arc::new(Mutex::new(AllocRingBuffer::new(EVENT_LOG_SIZE))),
        }
    }

    /// Forgets the previous battle; the event log carries over.
    pub fn reset_battle(&self) {
        *lock(&self.view) = ViewState::default();
    }

    pub fn update_snapshot(&self, snapshot: BattleSnapshot) {
        lock(&self.view).snapshot = Some(snapshot);
    }

    pub fn latest_snapshot(&self) -> Option<BattleSnapshot> {
        lock(&self.view).snapshot.clone()
    }

    pub fn set_outcome(&self, outcome: BattleOutcome) {
        lock(&self.view).outcome = Some(outcome);
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        lock(&self.view).outcome.clone()
    }

    pub fn push_event(&self, event: String) {
        lock(&self.event_log).enqueue(event);
    }

    /// Oldest first.
    pub fn recent_events(&self) -> Vec<String> {
        lock(&self.event_log).iter().cloned().collect()
    }
}
