use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::{envelope::Request, error::Result, router::Unsubscribe, Bridge};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResult {
    pub success: bool,
}

/// Ask the host for a fresh session after a 401, passing the stale token.
pub async fn renew_session(
    bridge: &Bridge,
    old_access_token: Option<&str>,
    timeout: Option<Duration>,
) -> Result<String> {
    let request = Request::new("RENEW_SESSION").with_payload(json!({ "accessToken": old_access_token }));
    let renewed: AccessToken = bridge.post_message(request, timeout).await?;
    Ok(renewed.access_token)
}

/// Called whenever the host renews the session on its own.
pub fn on_session_renewed<F>(bridge: &Bridge, handler: F) -> Unsubscribe
where
    F: Fn(String) + Send + Sync + 'static,
{
    bridge.listen_to_native_message("SESSION_RENEWED", move |renewed: AccessToken| {
        handler(renewed.access_token)
    })
}

pub async fn logout(bridge: &Bridge) -> Result<LogoutResult> {
    bridge.post_message(Request::new("LOG_OUT"), None).await
}
