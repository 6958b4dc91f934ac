//! Host → page requests.
//!
//! The host can start a conversation too (native events, session renewals,
//! navigation bar icon clicks). A handler registered for a message type sees
//! every such message; whatever it replies goes back under the original id
//! and type, as if it were a response.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
};
use tokio::runtime::Handle;

use crate::{
    bridge::Bridge,
    config::BridgeConfig,
    envelope::Envelope,
    hub::{Listener, ListenerId, Listeners},
    scope::GlobalScope,
    transport::Transport,
};

type ReplyFuture = Pin<Box<dyn Future<Output = Option<Value>> + Send + 'static>>;

/// What a handler sends back to the host.
pub enum Reply {
    /// Fire-and-forget: no reply envelope.
    None,
    Payload(Value),
    /// Computed later; `None` from the future means no reply.
    Deferred(ReplyFuture),
}

impl Reply {
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Option<Value>> + Send + 'static,
    {
        Reply::Deferred(Box::pin(future))
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::None => f.write_str("Reply::None"),
            Reply::Payload(v) => f.debug_tuple("Reply::Payload").field(v).finish(),
            Reply::Deferred(_) => f.write_str("Reply::Deferred(..)"),
        }
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::None
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Payload(value)
    }
}

impl From<Option<Value>> for Reply {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Reply::None, Reply::Payload)
    }
}

/// Removes one handler. Calling it again is a no-op.
pub struct Unsubscribe {
    id: ListenerId,
    listeners: Weak<Listeners>,
    done: AtomicBool,
}

impl Unsubscribe {
    pub fn unsubscribe(&self) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.unsubscribe(self.id);
        }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("id", &self.id)
            .field("done", &self.done.load(Ordering::SeqCst))
            .finish()
    }
}

fn send_reply(scope: &GlobalScope, config: &BridgeConfig, kind: String, id: String, payload: Value) {
    let message = match Envelope::new(kind, id, Some(payload)).to_json() {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "could not serialize reply");
            return;
        }
    };
    tracing::debug!(message = %message, "[WebView Bridge] SEND");
    if !Transport::resolve(scope, config).post(&message) {
        tracing::debug!("no transport for reply, dropping it");
    }
}

impl Bridge {
    /// Handle every host-initiated message of type `kind`.
    ///
    /// The payload is decoded into `P` (messages whose payload does not fit
    /// are logged and skipped). The handler's [`Reply`] is sent back from a
    /// spawned task, reusing the message's id and type.
    pub fn listen_to_native_message<P, F, R>(&self, kind: &str, handler: F) -> Unsubscribe
    where
        P: DeserializeOwned + 'static,
        F: Fn(P) -> R + Send + Sync + 'static,
        R: Into<Reply> + 'static,
    {
        let kind = kind.to_string();
        let scope = Arc::downgrade(self.scope());
        let config = Arc::clone(self.shared_config());

        let listener: Listener = Arc::new(move |envelope: &Envelope| {
            if envelope.kind != kind {
                return;
            }
            let payload: P =
                match serde_json::from_value(envelope.payload.clone().unwrap_or(Value::Null)) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(
                            kind = %kind,
                            id = %envelope.id,
                            error = %e,
                            "ignoring native message with unexpected payload"
                        );
                        return;
                    }
                };

            let reply: Reply = handler(payload).into();
            if matches!(reply, Reply::None) {
                return;
            }

            let (scope, config) = (Weak::clone(&scope), Arc::clone(&config));
            let (kind, id) = (envelope.kind.clone(), envelope.id.clone());
            let task = async move {
                let payload = match reply {
                    Reply::None => None,
                    Reply::Payload(value) => Some(value),
                    Reply::Deferred(future) => future.await,
                };
                // The scope owns this listener; hold it weakly.
                if let (Some(payload), Some(scope)) = (payload, scope.upgrade()) {
                    send_reply(&scope, &config, kind, id, payload);
                }
            };

            match Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(task);
                }
                Err(_) => tracing::warn!("no tokio runtime, dropping reply"),
            }
        });

        let id = self.listeners().subscribe(listener);
        Unsubscribe {
            id,
            listeners: Arc::downgrade(self.listeners()),
            done: AtomicBool::new(false),
        }
    }
}
