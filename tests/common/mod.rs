#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use webview_bridge::{Bridge, Envelope, GlobalScope, PostMessage};

/// Route test logs through the test writer; `RUST_LOG=debug` shows SEND/RCVD.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Android,
    WebKit,
}

/// Everything the page posted to the fake host.
pub struct Posted {
    log: Arc<Mutex<Vec<Envelope>>>,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Posted {
    pub fn count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Envelope> {
        self.log.lock().unwrap().clone()
    }

    /// Wait for the next posted envelope.
    pub async fn next(&mut self) -> Envelope {
        self.rx.recv().await.expect("fake host dropped")
    }
}

/// Install a fake host transport on the bridge's scope.
///
/// Every message the page posts is recorded, handed to `respond`, and
/// whatever `respond` returns is delivered back through the entry point, the
/// same way a native host would.
pub fn fake_host<R>(bridge: &Bridge, shape: Shape, respond: R) -> Posted
where
    R: Fn(&Envelope) -> Option<Envelope> + Send + Sync + 'static,
{
    let log = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = mpsc::unbounded_channel();

    let scope = Arc::downgrade(bridge.scope());
    let entry_point = bridge.config().entry_point.clone();
    let recorded = Arc::clone(&log);
    let transport: Arc<dyn PostMessage> = Arc::new(move |json: &str| {
        let message: Envelope = serde_json::from_str(json).expect("page sent invalid JSON");
        recorded.lock().unwrap().push(message.clone());
        let _ = tx.send(message.clone());
        if let (Some(response), Some(scope)) = (respond(&message), scope.upgrade()) {
            let json = serde_json::to_string(&response).unwrap();
            scope.deliver(&entry_point, &json).expect("deliver response");
        }
    });

    match shape {
        Shape::Android => bridge
            .scope()
            .set_android_object(&bridge.config().android_object, transport),
        Shape::WebKit => bridge
            .scope()
            .set_webkit_handler(&bridge.config().webkit_handler, transport),
    }

    Posted { log, rx }
}

/// Echo every request back unchanged.
pub fn echo_host(bridge: &Bridge, shape: Shape) -> Posted {
    fake_host(bridge, shape, |m| Some(m.clone()))
}

/// Record requests, never answer.
pub fn silent_host(bridge: &Bridge, shape: Shape) -> Posted {
    fake_host(bridge, shape, |_| None)
}

pub fn new_bridge() -> Bridge {
    init_tracing();
    Bridge::new(GlobalScope::new())
}

/// Let spawned sends and replies run.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
