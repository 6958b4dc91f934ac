#![cfg(feature = "wrappers")]

mod common;

use common::{fake_host, new_bridge, settle, silent_host, Shape};
use serde_json::json;
use std::sync::{Arc, Mutex};
use webview_bridge::features::{
    device, dialogs, events, navigation, session,
    sheet::{self, SheetAction, SheetRowItem, SheetUi, SingleSelection, SingleSelector},
};
use webview_bridge::{BrowserDialogs, Envelope, Guarded, ERROR_TYPE};

/// Answer every request of the same type with `payload`.
fn reply_with(kind: &'static str, payload: serde_json::Value) -> impl Fn(&Envelope) -> Option<Envelope> {
    move |m: &Envelope| Some(Envelope::new(kind, m.id.as_str(), Some(payload.clone())))
}

#[derive(Default)]
struct FakeDialogs {
    alerts: Mutex<Vec<String>>,
}

impl BrowserDialogs for FakeDialogs {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        message.ends_with('?')
    }
}

#[tokio::test]
async fn single_selector_builds_one_auto_submitting_list() {
    let bridge = new_bridge();
    let posted = fake_host(
        &bridge,
        Shape::Android,
        reply_with(
            "SHEET",
            json!({"action": "SUBMIT", "result": [{"id": "list-0", "selectedIds": ["b"]}]}),
        ),
    );

    let selection = sheet::bottom_sheet_single_selector(
        &bridge,
        SingleSelector {
            title: Some("Pick one".into()),
            selected_id: Some("a".into()),
            items: vec![
                SheetRowItem {
                    id: "a".into(),
                    title: Some("A".into()),
                    description: None,
                    icon: None,
                },
                SheetRowItem {
                    id: "b".into(),
                    title: Some("B".into()),
                    description: None,
                    icon: None,
                },
            ],
            ..Default::default()
        },
    )
    .await;

    match selection {
        Guarded::Completed(Ok(selection)) => assert_eq!(
            selection,
            SingleSelection {
                action: SheetAction::Submit,
                selected_id: Some("b".into()),
            }
        ),
        other => panic!("unexpected {other:?}"),
    }

    let request = &posted.all()[0];
    assert_eq!(request.kind, "SHEET");
    assert_eq!(
        request.payload,
        Some(json!({
            "title": "Pick one",
            "content": [{
                "id": "list-0",
                "type": "LIST",
                "listType": "SINGLE_SELECTION",
                "autoSubmit": true,
                "selectedIds": ["a"],
                "items": [{"id": "a", "title": "A"}, {"id": "b", "title": "B"}],
            }],
        }))
    );
}

#[tokio::test]
async fn second_sheet_is_locked_until_the_first_settles() {
    let bridge = new_bridge();
    let mut posted = silent_host(&bridge, Shape::WebKit);
    let ui = || SheetUi {
        title: Some("Actions".into()),
        ..Default::default()
    };

    let (first, ()) = tokio::join!(sheet::bottom_sheet(&bridge, ui()), async {
        let request = posted.next().await;

        let second = sheet::bottom_sheet(&bridge, ui()).await;
        assert!(second.is_locked());
        settle().await;
        assert_eq!(posted.count(), 1, "a locked sheet never reaches the host");

        let response = Envelope::new(
            "SHEET",
            request.id.as_str(),
            Some(json!({"action": "DISMISS", "result": []})),
        );
        bridge.deliver(&response.to_json().unwrap()).unwrap();
    });

    match first {
        Guarded::Completed(Ok(response)) => assert_eq!(response.action, SheetAction::Dismiss),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!bridge.sheet_lock().is_locked());
}

#[tokio::test]
async fn confirm_goes_to_the_host_when_available() {
    let bridge = new_bridge();
    let posted = fake_host(&bridge, Shape::Android, reply_with("CONFIRM", json!({"result": true})));

    let accepted = dialogs::native_confirm(
        &bridge,
        dialogs::Confirm {
            message: "Delete?".into(),
            accept_text: "Yes".into(),
            cancel_text: "No".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(accepted);
    assert_eq!(
        posted.all()[0].payload,
        Some(json!({"message": "Delete?", "acceptText": "Yes", "cancelText": "No"}))
    );
}

#[tokio::test]
async fn dialogs_fall_back_to_the_browser() {
    let bridge = new_bridge();
    let browser = Arc::new(FakeDialogs::default());
    bridge.scope().set_dialogs(browser.clone());

    let confirm = |message: &str| dialogs::Confirm {
        message: message.into(),
        ..Default::default()
    };
    assert!(dialogs::native_confirm(&bridge, confirm("Sure?")).await.unwrap());
    assert!(!dialogs::native_confirm(&bridge, confirm("Sure.")).await.unwrap());

    dialogs::native_alert(
        &bridge,
        dialogs::Alert {
            message: "Saved".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(*browser.alerts.lock().unwrap(), vec!["Saved".to_string()]);
}

#[tokio::test]
async fn confirm_without_bridge_or_browser_is_false() {
    let bridge = new_bridge();
    let accepted = dialogs::native_confirm(&bridge, dialogs::Confirm::default())
        .await
        .unwrap();
    assert!(!accepted);
}

#[tokio::test]
async fn snackbar_from_an_old_host_reads_as_dismissed() {
    let bridge = new_bridge();
    let _posted = fake_host(&bridge, Shape::Android, |m| {
        Some(Envelope::new("MESSAGE", m.id.as_str(), None))
    });

    let response = dialogs::native_message(
        &bridge,
        dialogs::Snackbar {
            message: "Copied".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(response.action, dialogs::SnackbarAction::Dismiss);
}

#[tokio::test]
async fn snackbar_action_comes_through() {
    let bridge = new_bridge();
    let _posted = fake_host(&bridge, Shape::WebKit, reply_with("MESSAGE", json!({"action": "BUTTON"})));

    let response = dialogs::native_message(&bridge, dialogs::Snackbar::default())
        .await
        .unwrap();
    assert_eq!(response.action, dialogs::SnackbarAction::Button);
}

#[tokio::test(start_paused = true)]
async fn legacy_imei_gives_up_quietly() {
    let bridge = new_bridge();
    let posted = silent_host(&bridge, Shape::Android);

    assert_eq!(device::request_device_imei(&bridge).await, None);
    assert_eq!(posted.count(), 1);
    assert_eq!(bridge.listener_count(), 0);
}

#[tokio::test]
async fn legacy_imei_value() {
    let bridge = new_bridge();
    let _posted = fake_host(&bridge, Shape::Android, reply_with("IMEI", json!({"imei": "490154203237518"})));

    assert_eq!(
        device::request_device_imei(&bridge).await.as_deref(),
        Some("490154203237518")
    );
}

#[tokio::test]
async fn esim_info_defaults_when_unsupported() {
    let bridge = new_bridge();
    let _posted = fake_host(&bridge, Shape::Android, |m| {
        Some(Envelope::new(
            ERROR_TYPE,
            m.id.as_str(),
            Some(json!({"code": 500, "reason": "unknown message"})),
        ))
    });

    let info = device::get_esim_info(&bridge).await;
    assert_eq!(info, device::EsimInfo::default());
}

#[tokio::test]
async fn renew_session_sends_the_stale_token() {
    let bridge = new_bridge();
    let posted = fake_host(
        &bridge,
        Shape::WebKit,
        reply_with("RENEW_SESSION", json!({"accessToken": "fresh"})),
    );

    let token = session::renew_session(&bridge, Some("stale"), None)
        .await
        .unwrap();
    assert_eq!(token, "fresh");
    assert_eq!(posted.all()[0].payload, Some(json!({"accessToken": "stale"})));
}

#[tokio::test]
async fn session_renewed_notifications_reach_the_handler() {
    let bridge = new_bridge();
    let posted = silent_host(&bridge, Shape::Android);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let sub = session::on_session_renewed(&bridge, move |token| sink.lock().unwrap().push(token));
    bridge
        .deliver(r#"{"type":"SESSION_RENEWED","id":"n-1","payload":{"accessToken":"t2"}}"#)
        .unwrap();
    settle().await;

    assert_eq!(*seen.lock().unwrap(), vec!["t2".to_string()]);
    assert_eq!(posted.count(), 0);
    sub.unsubscribe();
}

#[tokio::test]
async fn navigation_title_falls_back_to_the_document() {
    let bridge = new_bridge();
    navigation::update_navigation_bar(
        &bridge,
        navigation::NavigationBar {
            title: Some("Invoices".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(bridge.scope().title().as_deref(), Some("Invoices"));
}

#[tokio::test]
async fn navigation_bar_goes_to_the_host() {
    let bridge = new_bridge();
    let posted = fake_host(&bridge, Shape::Android, |m| Some(m.clone()));
    navigation::update_navigation_bar(
        &bridge,
        navigation::NavigationBar {
            title: Some("Invoices".into()),
            show_back_button: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(bridge.scope().title(), None);
    assert_eq!(
        posted.all()[0].payload,
        Some(json!({"title": "Invoices", "showBackButton": true}))
    );
}

#[tokio::test]
async fn native_events_default_action() {
    let bridge = new_bridge();
    let mut posted = silent_host(&bridge, Shape::Android);

    let _sub = events::on_native_event(&bridge, |event| {
        assert_eq!(event.event, "tab-focused");
        events::EventResponse::default()
    });
    bridge
        .deliver(r#"{"type":"NATIVE_EVENT","id":"e-1","payload":{"event":"tab-focused"}}"#)
        .unwrap();

    let reply = posted.next().await;
    assert_eq!(reply.id, "e-1");
    assert_eq!(reply.payload, Some(json!({"action": "default"})));
}

#[tokio::test]
async fn icon_clicks_reach_the_handler_without_a_reply() {
    let bridge = new_bridge();
    let posted = silent_host(&bridge, Shape::WebKit);
    let clicked = Arc::new(Mutex::new(None));

    let sink = Arc::clone(&clicked);
    let _sub = events::on_navigation_bar_icon_clicked(&bridge, move |icon| {
        *sink.lock().unwrap() = Some(icon.id);
    });
    bridge
        .deliver(r#"{"type":"NAVIGATION_BAR_ICON_CLICKED","id":"i-1","payload":{"id":"search"}}"#)
        .unwrap();
    settle().await;

    assert_eq!(clicked.lock().unwrap().as_deref(), Some("search"));
    assert_eq!(posted.count(), 0);
}

#[tokio::test]
async fn lifecycle_notifications_accept_empty_responses() {
    let bridge = new_bridge();
    let posted = fake_host(&bridge, Shape::Android, |m| {
        Some(Envelope::new(m.kind.as_str(), m.id.as_str(), None))
    });

    navigation::notify_page_loaded(&bridge).await.unwrap();
    navigation::notify_bridge_ready(&bridge).await.unwrap();

    let kinds: Vec<String> = posted.all().into_iter().map(|m| m.kind).collect();
    assert_eq!(kinds, ["PAGE_LOADED", "BRIDGE_READY"]);
}

#[tokio::test]
async fn device_queries() {
    let bridge = new_bridge();
    let _posted = fake_host(&bridge, Shape::Android, |m| {
        let payload = match m.kind.as_str() {
            "MODEL" => json!({"model": "Pixel 8"}),
            "GET_BATTERY_INFO" => json!({"batteryLevel": 0.5, "isPowerSafeMode": false}),
            "SIM_ICC" => json!({"icc": "8934071100000000000"}),
            "LOG_OUT" => json!({"success": true}),
            _ => return None,
        };
        Some(Envelope::new(m.kind.as_str(), m.id.as_str(), Some(payload)))
    });

    assert_eq!(
        device::get_device_model(&bridge).await.map(|m| m.model).as_deref(),
        Some("Pixel 8")
    );
    let battery = device::get_battery_info(&bridge).await.unwrap();
    assert_eq!(battery.battery_level, Some(0.5));
    assert!(!battery.is_power_safe_mode);
    assert_eq!(
        device::request_sim_icc(&bridge).await.as_deref(),
        Some("8934071100000000000")
    );
    assert!(session::logout(&bridge).await.unwrap().success);
}
