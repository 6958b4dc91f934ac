//! Page → host requests and their correlated responses.
//!
//! A call registers a one-shot listener keyed by its id, hands the envelope
//! to the host on a separate task, and settles when the host answers with the
//! same id (or when the optional timeout fires first).
//!
//! A call made without a timeout that the host never answers keeps its
//! listener registered for the lifetime of the bridge.

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, Weak,
    },
    time::Duration,
};
use tokio::{sync::oneshot, task::AbortHandle};

use crate::{
    bridge::Bridge,
    envelope::{Envelope, Request, ERROR_TYPE},
    error::{BridgeError, NativeError, Result},
    hub::{Listener, ListenerId, Listeners},
    scope::lock,
};

/// One outstanding request.
struct Pending {
    id: String,
    expected: String,
    tx: Mutex<Option<oneshot::Sender<Result<Value>>>>,
    timed_out: AtomicBool,
    listener: OnceCell<ListenerId>,
    timer: Mutex<Option<AbortHandle>>,
    listeners: Weak<Listeners>,
}

impl Pending {
    fn on_envelope(&self, envelope: &Envelope) {
        if envelope.id != self.id || self.timed_out.load(Ordering::SeqCst) {
            return;
        }
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }

        let outcome = if envelope.kind == self.expected {
            Ok(envelope.payload.clone().unwrap_or(Value::Null))
        } else if envelope.is_error() {
            Err(native_error(envelope))
        } else {
            Err(BridgeError::BadType {
                actual: envelope.kind.clone(),
                expected: self.expected.clone(),
            })
        };
        self.unregister();
        self.settle(outcome);
    }

    fn expire(&self) {
        self.timed_out.store(true, Ordering::SeqCst);
        lock(&self.timer).take();
        self.unregister();
        if self.settle(Err(BridgeError::Timeout)) {
            tracing::debug!(id = %self.id, kind = %self.expected, "request timed out");
        }
    }

    /// First caller wins; returns whether this call settled the request.
    fn settle(&self, outcome: Result<Value>) -> bool {
        match lock(&self.tx).take() {
            Some(tx) => {
                // The caller may have stopped waiting; nothing to do then.
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    fn unregister(&self) {
        if let (Some(id), Some(listeners)) = (self.listener.get(), self.listeners.upgrade()) {
            listeners.unsubscribe(*id);
        }
    }
}

fn native_error(envelope: &Envelope) -> BridgeError {
    let payload = envelope.payload.clone().unwrap_or(Value::Null);
    match serde_json::from_value::<NativeError>(payload) {
        Ok(e) => BridgeError::Native(e),
        Err(source) => BridgeError::Payload {
            kind: ERROR_TYPE.to_string(),
            source,
        },
    }
}

impl Bridge {
    /// Send `request` to the host and wait for its response payload.
    ///
    /// - No transport: fails with [`BridgeError::Unavailable`] and registers nothing.
    /// - Response of the same type: the payload, decoded into `T` (a missing
    ///   payload decodes from `null`, so `()` fits void responses).
    /// - `ERROR` response: [`BridgeError::Native`] with the host's code and reason.
    /// - Any other type: [`BridgeError::BadType`].
    /// - `timeout` elapsed first: [`BridgeError::Timeout`]; a later response is ignored.
    ///
    /// A zero `timeout` means no timeout. Must run inside a tokio runtime.
    pub async fn post_message<T>(&self, request: Request, timeout: Option<Duration>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let kind = request.kind.clone();
        let value = self.post_message_value(request, timeout).await?;
        serde_json::from_value(value).map_err(|source| BridgeError::Payload { kind, source })
    }

    /// [`Bridge::post_message`] without decoding the payload.
    pub async fn post_message_value(
        &self,
        request: Request,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        let Request { kind, id, payload } = request;
        let id = id.unwrap_or_else(|| self.next_id());
        let message = Envelope::new(kind.as_str(), id.as_str(), payload).to_json()?;
        tracing::debug!(message = %message, "[WebView Bridge] SEND");

        let transport = self.transport();
        if !transport.is_present() {
            return Err(BridgeError::Unavailable);
        }

        let (tx, rx) = oneshot::channel();
        let pending = Arc::new(Pending {
            id,
            expected: kind,
            tx: Mutex::new(Some(tx)),
            timed_out: AtomicBool::new(false),
            listener: OnceCell::new(),
            timer: Mutex::new(None),
            listeners: Arc::downgrade(self.listeners()),
        });

        let listener: Listener = {
            let pending = Arc::clone(&pending);
            Arc::new(move |envelope: &Envelope| pending.on_envelope(envelope))
        };
        let listener_id = self.listeners().subscribe(listener);
        let _ = pending.listener.set(listener_id);

        // Never post from this call stack: the listener must already be in
        // place when the host answers.
        tokio::spawn(async move {
            transport.post(&message);
        });

        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            let expiring = Arc::clone(&pending);
            let timer = tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                expiring.expire();
            });
            *lock(&pending.timer) = Some(timer.abort_handle());
        }
        drop(pending);

        rx.await.unwrap_or(Err(BridgeError::Closed))
    }
}
