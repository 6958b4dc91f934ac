use std::{fmt, sync::Arc};

use crate::{
    config::BridgeConfig,
    scope::{GlobalScope, PostMessage},
};

/// The host delivery primitive found in the scope, if any.
///
/// Resolved on every call: hosts may inject (or withdraw) their objects at
/// any point in the page lifetime.
#[derive(Clone)]
pub enum Transport {
    None,
    /// `window.<android_object>.postMessage`
    Android(Arc<dyn PostMessage>),
    /// `window.webkit.messageHandlers.<webkit_handler>.postMessage`
    WebKit(Arc<dyn PostMessage>),
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::None => "Transport::None",
            Transport::Android(_) => "Transport::Android",
            Transport::WebKit(_) => "Transport::WebKit",
        })
    }
}

impl Transport {
    /// Android first, then WebKit.
    pub fn resolve(scope: &GlobalScope, config: &BridgeConfig) -> Self {
        if let Some(object) = scope.android_object(&config.android_object) {
            return Transport::Android(object);
        }
        if let Some(handler) = scope.webkit_handler(&config.webkit_handler) {
            return Transport::WebKit(handler);
        }
        Transport::None
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Transport::None)
    }

    /// Hand one serialized envelope to the host. Returns `false` when there
    /// is nothing to send through.
    pub fn post(&self, json: &str) -> bool {
        match self {
            Transport::None => false,
            Transport::Android(object) => {
                object.post_message(json);
                true
            }
            Transport::WebKit(handler) => {
                handler.post_message(json);
                true
            }
        }
    }
}

/// Framed content only gets the bridge when its `<iframe>` opts in.
fn is_disabled_from_iframe(scope: &GlobalScope, config: &BridgeConfig) -> bool {
    let embedding = scope.embedding();
    embedding.is_in_iframe() && !embedding.frame_has_attribute(&config.iframe_opt_in_attribute)
}

/// True when a host transport is present and not suppressed by iframe policy.
pub fn is_bridge_available(scope: &GlobalScope, config: &BridgeConfig) -> bool {
    !is_disabled_from_iframe(scope, config) && Transport::resolve(scope, config).is_present()
}
