//! The page's global scope, as seen by the bridge.
//!
//! In a browser the bridge would poke at `window`. Here the same slots are
//! explicit: host-injected objects, the embedding context, and the inbound
//! entry point the host calls. Platform glue fills them in; tests use fakes.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::error::{BridgeError, Result};

/// A host object exposing `postMessage(json)`.
pub trait PostMessage: Send + Sync {
    fn post_message(&self, json: &str);
}

impl<F> PostMessage for F
where
    F: Fn(&str) + Send + Sync,
{
    fn post_message(&self, json: &str) {
        self(json)
    }
}

/// Something installed at the inbound entry point.
pub trait Deliver: Send + Sync {
    fn deliver(&self, json: &str) -> Result<()>;
}

impl<F> Deliver for F
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    fn deliver(&self, json: &str) -> Result<()> {
        self(json)
    }
}

/// Plain browser dialogs, used by wrappers when no bridge is present.
pub trait BrowserDialogs: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Where the page is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Embedding {
    #[default]
    TopLevel,
    /// Same-origin iframe; the attributes of the embedding `<iframe>` are visible.
    Frame { attributes: BTreeSet<String> },
    /// Cross-origin iframe: `top` cannot be inspected and there is no frame element.
    CrossOriginFrame,
}

impl Embedding {
    pub fn frame<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Embedding::Frame {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_in_iframe(&self) -> bool {
        !matches!(self, Embedding::TopLevel)
    }

    /// Whether the embedding frame element carries `attribute`.
    pub fn frame_has_attribute(&self, attribute: &str) -> bool {
        match self {
            Embedding::Frame { attributes } => attributes.contains(attribute),
            _ => false,
        }
    }
}

#[derive(Default)]
pub struct GlobalScope {
    objects: RwLock<HashMap<String, Arc<dyn PostMessage>>>,
    webkit_handlers: RwLock<HashMap<String, Arc<dyn PostMessage>>>,
    entry_points: RwLock<HashMap<String, Arc<dyn Deliver>>>,
    embedding: RwLock<Embedding>,
    title: RwLock<Option<String>>,
    dialogs: RwLock<Option<Arc<dyn BrowserDialogs>>>,
}

impl fmt::Debug for GlobalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalScope")
            .field("objects", &read(&self.objects).keys().collect::<Vec<_>>())
            .field(
                "webkit_handlers",
                &read(&self.webkit_handlers).keys().collect::<Vec<_>>(),
            )
            .field("entry_points", &read(&self.entry_points).keys().collect::<Vec<_>>())
            .field("embedding", &*read(&self.embedding))
            .finish()
    }
}

impl GlobalScope {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // -------- Android: window.<name>.postMessage --------

    pub fn set_android_object(&self, name: &str, object: Arc<dyn PostMessage>) {
        write(&self.objects).insert(name.to_string(), object);
    }

    pub fn remove_android_object(&self, name: &str) {
        write(&self.objects).remove(name);
    }

    pub fn android_object(&self, name: &str) -> Option<Arc<dyn PostMessage>> {
        read(&self.objects).get(name).cloned()
    }

    // -------- iOS: window.webkit.messageHandlers.<name>.postMessage --------

    pub fn set_webkit_handler(&self, name: &str, handler: Arc<dyn PostMessage>) {
        write(&self.webkit_handlers).insert(name.to_string(), handler);
    }

    pub fn remove_webkit_handler(&self, name: &str) {
        write(&self.webkit_handlers).remove(name);
    }

    pub fn webkit_handler(&self, name: &str) -> Option<Arc<dyn PostMessage>> {
        read(&self.webkit_handlers).get(name).cloned()
    }

    // -------- Inbound entry point --------

    pub fn entry_point(&self, name: &str) -> Option<Arc<dyn Deliver>> {
        read(&self.entry_points).get(name).cloned()
    }

    /// Install `entry`, returning whatever was there before.
    pub fn replace_entry_point(
        &self,
        name: &str,
        entry: Arc<dyn Deliver>,
    ) -> Option<Arc<dyn Deliver>> {
        write(&self.entry_points).insert(name.to_string(), entry)
    }

    /// What the host does: call the entry point with one JSON message.
    pub fn deliver(&self, entry_point: &str, json: &str) -> Result<()> {
        // Clone out of the lock; the entry point may re-enter the scope.
        let entry = self.entry_point(entry_point).ok_or(BridgeError::Unavailable)?;
        entry.deliver(json)
    }

    // -------- Embedding --------

    pub fn set_embedding(&self, embedding: Embedding) {
        *write(&self.embedding) = embedding;
    }

    pub fn embedding(&self) -> Embedding {
        read(&self.embedding).clone()
    }

    // -------- Document fallbacks --------

    pub fn set_title(&self, title: &str) {
        *write(&self.title) = Some(title.to_string());
    }

    pub fn title(&self) -> Option<String> {
        read(&self.title).clone()
    }

    pub fn set_dialogs(&self, dialogs: Arc<dyn BrowserDialogs>) {
        *write(&self.dialogs) = Some(dialogs);
    }

    pub fn dialogs(&self) -> Option<Arc<dyn BrowserDialogs>> {
        read(&self.dialogs).clone()
    }
}

// Poisoning only means a listener panicked mid-call; the data is still usable.

pub(crate) fn read<T: ?Sized>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T: ?Sized>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
