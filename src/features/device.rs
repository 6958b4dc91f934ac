use serde::{Deserialize, Serialize};

use crate::{envelope::Request, error::Result, Bridge};

#[derive(Deserialize)]
struct Imei {
    imei: String,
}

#[derive(Deserialize)]
struct Icc {
    icc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceModel {
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsimInfo {
    pub supports_esim: bool,
    #[serde(default)]
    pub eid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    pub battery_level: Option<f64>,
    pub is_power_safe_mode: bool,
}

/// Legacy call: hosts that don't implement it never answer, so it gives up
/// after the configured legacy timeout and any failure reads as `None`.
pub async fn request_device_imei(bridge: &Bridge) -> Option<String> {
    let timeout = bridge.config().legacy_timeout();
    bridge
        .post_message::<Imei>(Request::new("IMEI"), Some(timeout))
        .await
        .map(|r| r.imei)
        .ok()
}

/// Same contract as [`request_device_imei`].
pub async fn request_sim_icc(bridge: &Bridge) -> Option<String> {
    let timeout = bridge.config().legacy_timeout();
    bridge
        .post_message::<Icc>(Request::new("SIM_ICC"), Some(timeout))
        .await
        .map(|r| r.icc)
        .ok()
}

pub async fn get_device_model(bridge: &Bridge) -> Option<DeviceModel> {
    bridge.post_message(Request::new("MODEL"), None).await.ok()
}

/// Hosts without eSIM support answer with an error; that means "no eSIM".
pub async fn get_esim_info(bridge: &Bridge) -> EsimInfo {
    bridge
        .post_message(Request::new("GET_ESIM_INFO"), None)
        .await
        .unwrap_or_default()
}

pub async fn get_battery_info(bridge: &Bridge) -> Result<BatteryInfo> {
    bridge.post_message(Request::new("GET_BATTERY_INFO"), None).await
}
