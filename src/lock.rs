//! Single-flight guard for calls that present a blocking native surface.
//!
//! Two overlapping sheets are a bug, and queueing would stack them up behind
//! the user's back, so a contended call fails fast with [`Guarded::Locked`].
//! The lock releases when the call settles or when the safety window
//! elapses, whichever comes first.

use std::{
    future::Future,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use tokio::{runtime::Handle, task::AbortHandle};

use crate::{
    error::{BridgeError, Result},
    scope::lock,
};

/// Outcome of a guarded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Completed(T),
    /// Another call held the lock; nothing was sent.
    Locked,
}

impl<T> Guarded<T> {
    pub fn is_locked(&self) -> bool {
        matches!(self, Guarded::Locked)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Guarded::Completed(value) => Some(value),
            Guarded::Locked => None,
        }
    }
}

impl<T> Guarded<Result<T>> {
    /// Fold the lock outcome into the call's own result, reporting
    /// contention as [`BridgeError::Locked`].
    pub fn into_result(self, what: &'static str) -> Result<T> {
        match self {
            Guarded::Completed(result) => result,
            Guarded::Locked => Err(BridgeError::Locked(what)),
        }
    }
}

#[derive(Debug, Default)]
struct LockState {
    locked: bool,
    generation: u64,
    timer: Option<AbortHandle>,
}

/// Release the lock if it is still held by `generation`.
fn release(state: &Mutex<LockState>, generation: u64, from_timer: bool) -> bool {
    let mut state = lock(state);
    if !state.locked || state.generation != generation {
        return false;
    }
    state.locked = false;
    if let Some(timer) = state.timer.take() {
        if !from_timer {
            timer.abort();
        }
    }
    true
}

#[derive(Debug, Clone)]
pub struct SingleFlight {
    name: &'static str,
    window: Duration,
    state: Arc<Mutex<LockState>>,
}

impl SingleFlight {
    pub fn new(name: &'static str, window: Duration) -> Self {
        Self {
            name,
            window,
            state: Arc::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_locked(&self) -> bool {
        lock(&self.state).locked
    }

    /// Take the lock, arming the safety timer. `None` if already held.
    ///
    /// Outside a tokio runtime there is no safety timer; the guard alone
    /// releases the lock.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        let mut state = lock(&self.state);
        if state.locked {
            return None;
        }
        state.locked = true;
        state.generation += 1;
        let generation = state.generation;

        state.timer = Handle::try_current().ok().map(|handle| {
            let weak: Weak<Mutex<LockState>> = Arc::downgrade(&self.state);
            let window = self.window;
            let name = self.name;
            handle
                .spawn(async move {
                    tokio::time::sleep(window).await;
                    if let Some(state) = weak.upgrade() {
                        if release(&state, generation, true) {
                            tracing::debug!(lock = name, "single-flight lock released by safety timer");
                        }
                    }
                })
                .abort_handle()
        });

        Some(FlightGuard {
            state: Arc::clone(&self.state),
            generation,
        })
    }

    /// Run `call` under the lock. When the lock is held, `call` is dropped
    /// without being polled.
    pub async fn run<F>(&self, call: F) -> Guarded<F::Output>
    where
        F: Future,
    {
        let Some(guard) = self.try_acquire() else {
            tracing::debug!(lock = self.name, "single-flight call rejected, lock held");
            return Guarded::Locked;
        };
        let output = call.await;
        guard.release();
        Guarded::Completed(output)
    }
}

/// Held while a guarded call is in flight. Releases on [`FlightGuard::release`]
/// or drop; releasing twice, or after the safety timer, does nothing.
#[derive(Debug)]
pub struct FlightGuard {
    state: Arc<Mutex<LockState>>,
    generation: u64,
}

impl FlightGuard {
    pub fn release(self) {}
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        release(&self.state, self.generation, false);
    }
}
