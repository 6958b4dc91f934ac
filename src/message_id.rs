use once_cell::sync::Lazy;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};
use uuid::Uuid;

use crate::config::default_config;

static GLOBAL_IDS: Lazy<Arc<IdGenerator>> =
    Lazy::new(|| Arc::new(IdGenerator::new(&default_config().id_prefix)));

/// Correlation id generator.
///
/// Ids look like `web-{counter}-{salt}`. The prefix marks ids minted on the
/// page side. The salt is a millisecond timestamp plus a random suffix, fixed
/// for the lifetime of the generator, so two webviews opened in the same
/// millisecond still diverge.
#[derive(Debug)]
pub struct IdGenerator {
    prefix: String,
    salt: String,
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new(prefix: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let random = Uuid::new_v4().simple().to_string();
        Self {
            prefix: prefix.to_string(),
            salt: format!("{millis}-{}", &random[..8]),
            counter: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}-{}", self.prefix, self.salt)
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }
}

/// Next id from the process-wide generator.
///
/// ```rust
/// let a = webview_bridge::next_id();
/// let b = webview_bridge::next_id();
/// assert!(a.starts_with("web-"));
/// assert_ne!(a, b);
/// ```
pub fn next_id() -> String {
    GLOBAL_IDS.next_id()
}

/// The process-wide generator behind [`next_id`].
pub fn global() -> Arc<IdGenerator> {
    Arc::clone(&GLOBAL_IDS)
}
