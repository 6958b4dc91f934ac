use std::sync::Arc;

use crate::{
    config::BridgeConfig,
    error::Result,
    hub::{Hub, Listeners},
    lock::SingleFlight,
    message_id::{self, IdGenerator},
    scope::GlobalScope,
    transport::{self, Transport},
};

/// One bridge per page: owns the listener registry, the hub installed at the
/// scope's entry point, and the bottom sheet lock.
///
/// Outbound calls live in [`Bridge::post_message`]; host-initiated requests
/// in [`Bridge::listen_to_native_message`].
pub struct Bridge {
    scope: Arc<GlobalScope>,
    config: Arc<BridgeConfig>,
    hub: Arc<Hub>,
    ids: Arc<IdGenerator>,
    sheet_lock: SingleFlight,
}

impl Bridge {
    /// Build a bridge with the embedded configuration and install its hub.
    pub fn new(scope: Arc<GlobalScope>) -> Self {
        Self::build(scope, BridgeConfig::default(), message_id::global())
    }

    /// Same as [`Bridge::new`] with explicit names and timings. Ids come from
    /// a generator of their own so a custom prefix is honoured.
    pub fn with_config(scope: Arc<GlobalScope>, config: BridgeConfig) -> Self {
        let ids = Arc::new(IdGenerator::new(&config.id_prefix));
        Self::build(scope, config, ids)
    }

    fn build(scope: Arc<GlobalScope>, config: BridgeConfig, ids: Arc<IdGenerator>) -> Self {
        let hub = Hub::new();
        hub.install(&scope, &config.entry_point);
        let sheet_lock = SingleFlight::new("bottom sheet", config.sheet_lock_window());
        Self {
            scope,
            config: Arc::new(config),
            hub,
            ids,
            sheet_lock,
        }
    }

    pub fn scope(&self) -> &Arc<GlobalScope> {
        &self.scope
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub(crate) fn shared_config(&self) -> &Arc<BridgeConfig> {
        &self.config
    }

    pub(crate) fn listeners(&self) -> &Arc<Listeners> {
        self.hub.listeners()
    }

    /// Number of live response/request listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    /// Transport currently injected by the host (not cached).
    pub fn transport(&self) -> Transport {
        Transport::resolve(&self.scope, &self.config)
    }

    /// Whether a host transport is present and not disabled by iframe policy.
    pub fn is_available(&self) -> bool {
        transport::is_bridge_available(&self.scope, &self.config)
    }

    pub fn sheet_lock(&self) -> &SingleFlight {
        &self.sheet_lock
    }

    /// Deliver a message the way the host does, through the scope's entry
    /// point (which may be chained ahead of this bridge's hub).
    pub fn deliver(&self, json: &str) -> Result<()> {
        self.scope.deliver(&self.config.entry_point, json)
    }
}
