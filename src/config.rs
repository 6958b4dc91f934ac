use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::error::BridgeError;

/// Embedded default configuration (`src/bridge.toml`).
const EMBEDDED_CONFIG: &str = include_str!("bridge.toml");

static DEFAULT_CONFIG: Lazy<BridgeConfig> = Lazy::new(|| {
    // Covered by `embedded_config_matches_builtin`.
    BridgeConfig::from_toml_str(EMBEDDED_CONFIG).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded bridge.toml is invalid, using built-in values");
        BridgeConfig::builtin()
    })
});

/// Names and timings shared by the page and the native host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Global name of the inbound entry point the host calls.
    pub entry_point: String,
    /// Global name of the Android-style object exposing `postMessage`.
    pub android_object: String,
    /// Name under `webkit.messageHandlers` exposing `postMessage`.
    pub webkit_handler: String,
    /// Attribute that re-enables the bridge inside an iframe.
    pub iframe_opt_in_attribute: String,
    /// Prefix of page-generated correlation ids.
    pub id_prefix: String,
    /// Safety window of the bottom sheet lock, in milliseconds.
    pub sheet_lock_ms: u64,
    /// Timeout for legacy best-effort calls, in milliseconds.
    pub legacy_timeout_ms: u64,
}

impl BridgeConfig {
    fn builtin() -> Self {
        Self {
            entry_point: "__tuenti_webview_bridge".to_string(),
            android_object: "tuentiWebView".to_string(),
            webkit_handler: "tuentiWebView".to_string(),
            iframe_opt_in_attribute: "data-enable-webview-bridge".to_string(),
            id_prefix: "web".to_string(),
            sheet_lock_ms: 1000,
            legacy_timeout_ms: 200,
        }
    }

    /// Parse a full configuration from TOML text.
    ///
    /// ```rust
    /// use webview_bridge::BridgeConfig;
    ///
    /// let mut text = BridgeConfig::default().to_toml_string().unwrap();
    /// text = text.replace("tuentiWebView", "myHost");
    /// let cfg = BridgeConfig::from_toml_str(&text).unwrap();
    /// assert_eq!(cfg.android_object, "myHost");
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, BridgeError> {
        toml::from_str(text).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let text = fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, BridgeError> {
        toml::to_string(self).map_err(|e| BridgeError::Config(e.to_string()))
    }

    pub fn sheet_lock_window(&self) -> Duration {
        Duration::from_millis(self.sheet_lock_ms)
    }

    pub fn legacy_timeout(&self) -> Duration {
        Duration::from_millis(self.legacy_timeout_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

/// The embedded configuration as a shared reference.
pub fn default_config() -> &'static BridgeConfig {
    &DEFAULT_CONFIG
}
