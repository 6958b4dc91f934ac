use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{envelope::Request, error::Result, Bridge};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirm {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub accept_text: String,
    pub cancel_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destructive: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub button_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnackbarType {
    Informative,
    Critical,
    Success,
}

/// Snackbar ("message") options.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snackbar {
    pub message: String,
    /// `"PERSISTENT"` keeps it until the user acts; otherwise the host picks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_accessibility_label: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SnackbarType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_dismiss: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnackbarAction {
    Dismiss,
    Button,
    Timeout,
    Consecutive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnackbarResponse {
    pub action: SnackbarAction,
}

#[derive(Deserialize)]
struct ConfirmResult {
    result: bool,
}

/// Native confirm dialog. Without a bridge, falls back to the browser's
/// `confirm` (or `false` when there is none).
pub async fn native_confirm(bridge: &Bridge, confirm: Confirm) -> Result<bool> {
    if !bridge.is_available() {
        return Ok(bridge
            .scope()
            .dialogs()
            .map(|d| d.confirm(&confirm.message))
            .unwrap_or(false));
    }
    let request = Request::new("CONFIRM").with_payload(serde_json::to_value(&confirm)?);
    let response: ConfirmResult = bridge.post_message(request, None).await?;
    Ok(response.result)
}

/// Native alert. Without a bridge, falls back to the browser's `alert`.
pub async fn native_alert(bridge: &Bridge, alert: Alert) -> Result<()> {
    if !bridge.is_available() {
        if let Some(dialogs) = bridge.scope().dialogs() {
            dialogs.alert(&alert.message);
        }
        return Ok(());
    }
    let request = Request::new("ALERT").with_payload(serde_json::to_value(&alert)?);
    bridge.post_message_value(request, None).await.map(drop)
}

/// Native snackbar. Old hosts answer without an action (or without a
/// payload at all); that reads as a dismissal.
pub async fn native_message(bridge: &Bridge, snackbar: Snackbar) -> Result<SnackbarResponse> {
    let dismissed = SnackbarResponse {
        action: SnackbarAction::Dismiss,
    };
    if !bridge.is_available() {
        if let Some(dialogs) = bridge.scope().dialogs() {
            dialogs.alert(&snackbar.message);
        }
        return Ok(dismissed);
    }
    let request = Request::new("MESSAGE").with_payload(serde_json::to_value(&snackbar)?);
    let response: Value = bridge.post_message(request, None).await?;
    Ok(serde_json::from_value(response).unwrap_or(dismissed))
}
