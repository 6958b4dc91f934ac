use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{router::Unsubscribe, Bridge};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeEvent {
    pub event: String,
}

/// What the page wants the host to do after an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventResponse {
    /// Empty means `"default"`.
    #[serde(default)]
    pub action: String,
}

/// Answer every `NATIVE_EVENT` with the handler's action.
pub fn on_native_event<F>(bridge: &Bridge, handler: F) -> Unsubscribe
where
    F: Fn(NativeEvent) -> EventResponse + Send + Sync + 'static,
{
    bridge.listen_to_native_message("NATIVE_EVENT", move |event: NativeEvent| {
        let response = handler(event);
        let action = if response.action.is_empty() {
            "default".to_string()
        } else {
            response.action
        };
        json!({ "action": action })
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconClicked {
    pub id: String,
}

/// Navigation bar icon taps; no reply is sent.
pub fn on_navigation_bar_icon_clicked<F>(bridge: &Bridge, handler: F) -> Unsubscribe
where
    F: Fn(IconClicked) + Send + Sync + 'static,
{
    bridge.listen_to_native_message("NAVIGATION_BAR_ICON_CLICKED", handler)
}
