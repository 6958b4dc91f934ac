//! Typed call sites on top of [`Bridge::post_message`](crate::Bridge::post_message)
//! and [`Bridge::listen_to_native_message`](crate::Bridge::listen_to_native_message).
//!
//! Each wrapper only builds a request and decodes the response. Best-effort
//! fallbacks (no bridge, legacy hosts that never answer) are decided here,
//! not in the core.

pub mod device;
pub mod dialogs;
pub mod events;
pub mod navigation;
pub mod session;
pub mod sheet;
