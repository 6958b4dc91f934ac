//! Inbound dispatch: the entry point the host calls, and the listener
//! registry it fans out to.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use crate::{
    envelope::Envelope,
    error::{BridgeError, Result},
    scope::{lock, Deliver, GlobalScope},
};

pub type Listener = Arc<dyn Fn(&Envelope) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered set of active listeners.
#[derive(Default)]
pub struct Listeners {
    next: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener)>>,
}

impl Listeners {
    pub fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next.fetch_add(1, Ordering::Relaxed));
        lock(&self.entries).push((id, listener));
        id
    }

    /// Returns `false` if `id` was not (or no longer) registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener registered at the time of the call, in order.
    /// Listeners may (un)subscribe while running; that affects the next
    /// dispatch, not this one.
    pub fn dispatch(&self, envelope: &Envelope) {
        let snapshot: Vec<Listener> = lock(&self.entries)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(envelope);
        }
    }
}

/// The object installed at the scope's inbound entry point.
#[derive(Default)]
pub struct Hub {
    listeners: Arc<Listeners>,
    previous: Mutex<Option<Arc<dyn Deliver>>>,
    installed: AtomicBool,
}

impl Hub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn listeners(&self) -> &Arc<Listeners> {
        &self.listeners
    }

    /// Install this hub as `entry_point`, wrapping whatever the host (or an
    /// earlier bundle) left there. A hub installs at most once.
    pub fn install(self: &Arc<Self>, scope: &GlobalScope, entry_point: &str) {
        if self.installed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut previous = lock(&self.previous);
        let me: Arc<dyn Deliver> = self.clone();
        *previous = scope.replace_entry_point(entry_point, me);
        if previous.is_some() {
            tracing::debug!(entry_point, "chaining previous bridge entry point");
        }
    }
}

impl Deliver for Hub {
    fn deliver(&self, json: &str) -> Result<()> {
        let previous = lock(&self.previous).clone();
        if let Some(previous) = previous {
            previous.deliver(json)?;
        }

        tracing::debug!(message = json, "[WebView Bridge] RCVD");
        let envelope = Envelope::from_json(json).map_err(|source| BridgeError::MalformedMessage {
            raw: json.to_string(),
            source,
        })?;
        self.listeners.dispatch(&envelope);
        Ok(())
    }
}
