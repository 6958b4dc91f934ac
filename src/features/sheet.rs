//! Native bottom sheets. Only one can be on screen: calls go through the
//! bridge's sheet lock.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{envelope::Request, error::Result, lock::Guarded, Bridge};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SheetUi {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lists and bottom actions, as the host expects them.
    pub content: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetIcon {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_dark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRowItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<SheetIcon>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetAction {
    Submit,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetListResult {
    pub id: String,
    pub selected_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetResponse {
    pub action: SheetAction,
    pub result: Vec<SheetListResult>,
}

/// Present a sheet. While another one is in flight (or within the lock's
/// safety window) this returns [`Guarded::Locked`] without contacting the host.
pub async fn bottom_sheet(bridge: &Bridge, ui: SheetUi) -> Guarded<Result<SheetResponse>> {
    bridge
        .sheet_lock()
        .run(async {
            let request = Request::new("SHEET").with_payload(serde_json::to_value(&ui)?);
            bridge.post_message::<SheetResponse>(request, None).await
        })
        .await
}

#[derive(Debug, Clone, Default)]
pub struct SingleSelector {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub selected_id: Option<String>,
    pub items: Vec<SheetRowItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSelection {
    pub action: SheetAction,
    pub selected_id: Option<String>,
}

/// A one-list sheet that submits as soon as a row is picked.
pub async fn bottom_sheet_single_selector(
    bridge: &Bridge,
    selector: SingleSelector,
) -> Guarded<Result<SingleSelection>> {
    let SingleSelector {
        title,
        subtitle,
        description,
        selected_id,
        items,
    } = selector;

    let list = json!({
        "id": "list-0",
        "type": "LIST",
        "listType": "SINGLE_SELECTION",
        "autoSubmit": true,
        "selectedIds": selected_id.into_iter().collect::<Vec<_>>(),
        "items": items,
    });
    let ui = SheetUi {
        title,
        subtitle,
        description,
        content: vec![list],
    };

    match bottom_sheet(bridge, ui).await {
        Guarded::Locked => Guarded::Locked,
        Guarded::Completed(result) => Guarded::Completed(result.map(|response| SingleSelection {
            action: response.action,
            selected_id: response
                .result
                .first()
                .and_then(|list| list.selected_ids.first().cloned()),
        })),
    }
}
