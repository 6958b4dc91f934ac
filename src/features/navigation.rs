use serde::Serialize;

use crate::{envelope::Request, error::Result, Bridge};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationBar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_back_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_reload_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Update the host's top bar. Outside a webview only the title applies, to
/// the document.
pub async fn update_navigation_bar(bridge: &Bridge, bar: NavigationBar) -> Result<()> {
    if !bridge.is_available() {
        if let Some(title) = &bar.title {
            bridge.scope().set_title(title);
        }
        return Ok(());
    }
    let request = Request::new("NAVIGATION_BAR").with_payload(serde_json::to_value(&bar)?);
    bridge.post_message_value(request, None).await.map(drop)
}

pub async fn notify_page_loaded(bridge: &Bridge) -> Result<()> {
    bridge
        .post_message_value(Request::new("PAGE_LOADED"), None)
        .await
        .map(drop)
}

pub async fn notify_bridge_ready(bridge: &Bridge) -> Result<()> {
    bridge
        .post_message_value(Request::new("BRIDGE_READY"), None)
        .await
        .map(drop)
}
