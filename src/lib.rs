//! # webview_bridge
//!
//! The page side of a **webview bridge**: a page running inside a native app's
//! embedded browser view calls into the host (device info, dialogs, sheets,
//! session renewal, ...) and the host pushes events back.
//!
//! - Send a typed request and `await` the correlated response
//! - Optional per-call timeouts
//! - Handle host-initiated messages and reply to them
//! - One-at-a-time guard for calls that present blocking native UI
//!
//! ---
//!
//! ## The protocol
//!
//! Both directions exchange the same UTF-8 JSON **envelope**:
//!
//! ```json
//! {"type": "GET_APP_DOMAIN", "id": "web-3-1718000000000-1a2b3c4d", "payload": {}}
//! ```
//!
//! - `type` names the operation. A response echoes the request's type, or is
//!   `"ERROR"` with a `{code, reason}` payload.
//! - `id` correlates a response with its request. Page-side ids look like
//!   `web-{counter}-{salt}`.
//! - `payload` is optional and type-specific.
//!
//! Page → host goes through one of two objects the host injects:
//!
//! 1. Android: `window.tuentiWebView.postMessage(json)`
//! 2. iOS: `window.webkit.messageHandlers.tuentiWebView.postMessage(json)`
//!
//! Host → page goes through a single well-known entry point,
//! `window.__tuenti_webview_bridge.postMessage(json)`, installed by this crate.
//! The names live in the embedded `bridge.toml` ([`BridgeConfig`]).
//!
//! ### Gotchas
//!
//! - **Iframes are off by default:** a page loaded inside an iframe only sees the
//!   bridge when the `<iframe>` carries `data-enable-webview-bridge`.
//! - **No timeout means waiting forever:** a request without a timeout that the
//!   host never answers keeps its listener alive for the life of the page.
//! - **Malformed inbound JSON is an error**, returned from the entry point, not
//!   swallowed.
//! - **Runtime:** requests and replies are posted from spawned tasks, so calls
//!   must run inside a tokio runtime.
//!
//! ---
//!
//! ## Crate layout
//!
//! - [`scope`]: the page's global scope: host objects, embedding, entry point.
//! - [`transport`]: which host object (if any) to send through.
//! - [`hub`]: the inbound entry point and its listener registry.
//! - [`correlator`]: [`Bridge::post_message`].
//! - [`router`]: [`Bridge::listen_to_native_message`].
//! - [`lock`]: [`SingleFlight`], used by the bottom sheet.
//! - `features`: typed wrappers (default `wrappers` cargo feature).
//!
//! ---
//!
//! ## Quick start
//!
//! The scope is normally filled in by platform glue. Here a fake Android host
//! answers every request by echoing it back:
//!
//! ```rust
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//! use webview_bridge::{Bridge, GlobalScope, Request};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let scope = GlobalScope::new();
//!     let bridge = Bridge::new(scope.clone());
//!
//!     let host = Arc::downgrade(&scope);
//!     let entry_point = bridge.config().entry_point.clone();
//!     scope.set_android_object(
//!         &bridge.config().android_object,
//!         Arc::new(move |json: &str| {
//!             if let Some(scope) = host.upgrade() {
//!                 scope.deliver(&entry_point, json).unwrap();
//!             }
//!         }),
//!     );
//!
//!     let request = Request::new("GET_APP_DOMAIN").with_payload(json!({"domain": "example.com"}));
//!     let response: Value = bridge.post_message(request, None).await.unwrap();
//!     assert_eq!(response["domain"], "example.com");
//!     assert_eq!(bridge.listener_count(), 0);
//! }
//! ```
//!
//! ## Host-initiated messages
//!
//! ```no_run
//! use serde::Deserialize;
//! use serde_json::json;
//! use webview_bridge::{Bridge, GlobalScope};
//!
//! #[derive(Deserialize)]
//! struct NativeEvent { event: String }
//!
//! let bridge = Bridge::new(GlobalScope::new());
//! let subscription = bridge.listen_to_native_message("NATIVE_EVENT", |e: NativeEvent| {
//!     eprintln!("host event: {}", e.event);
//!     json!({"action": "default"})
//! });
//! // ...
//! subscription.unsubscribe();
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`BridgeError`] with a protocol view
//! ([`BridgeError::code`], [`BridgeError::reason`]):
//!
//! | case | code |
//! |------|------|
//! | no host transport | 500 |
//! | response of the wrong type | 500 |
//! | host `ERROR` envelope | host's code |
//! | timeout | 408 |
//! | single-flight lock held | 423 (via [`Guarded::into_result`]) |

pub mod bridge;
pub mod config;
pub mod correlator;
pub mod envelope;
pub mod error;
pub mod hub;
pub mod lock;
pub mod message_id;
pub mod router;
pub mod scope;
pub mod transport;

#[cfg(feature = "wrappers")]
pub mod features;

// -------- Re-exports --------

#[doc(inline)]
pub use bridge::Bridge;
#[doc(inline)]
pub use config::BridgeConfig;
#[doc(inline)]
pub use envelope::{Envelope, Request, ERROR_TYPE};
#[doc(inline)]
pub use error::{BridgeError, ErrorCode, NativeError, Result};
#[doc(inline)]
pub use lock::{Guarded, SingleFlight};
#[doc(inline)]
pub use message_id::next_id;
#[doc(inline)]
pub use router::{Reply, Unsubscribe};
#[doc(inline)]
pub use scope::{BrowserDialogs, Deliver, Embedding, GlobalScope, PostMessage};
#[doc(inline)]
pub use transport::{is_bridge_available, Transport};
