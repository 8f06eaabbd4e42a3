//! Configuration store interface and the in-memory implementation

use super::settings::{Setting, SettingKey, SettingsChanged, StoredSettings};
use crossbeam::channel::{Receiver, Sender};
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by a configuration store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted record could not be parsed
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// The record could not be serialized or persisted
    #[error("Failed to save settings: {0}")]
    Save(String),

    /// Internal lock poisoned by a panicking writer
    #[error("Settings store lock poisoned")]
    Poisoned,

    /// The file watcher could not be started
    #[error("Failed to watch settings file: {0}")]
    Watch(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable mapping of setting name to value with change notification
pub trait ConfigStore: Send + Sync {
    /// Read the current record, `None` on fresh install
    fn read(&self) -> StoreResult<Option<StoredSettings>>;

    /// Apply a batch of assignments and notify subscribers of changed keys
    fn write(&self, changes: &[Setting]) -> StoreResult<()>;

    /// Subscribe to change notifications, delivered in write order
    fn subscribe(&self) -> Receiver<SettingsChanged>;

    /// Read the current record, falling back to defaults on fresh install
    fn snapshot(&self) -> StoreResult<StoredSettings> {
        Ok(self.read()?.unwrap_or_default())
    }
}

/// Apply a batch to an optional record, returning the new record and the
/// keys that changed
///
/// A batch applied to a fresh store reports every key it mentions.
pub(crate) fn apply_batch(
    current: Option<&StoredSettings>,
    changes: &[Setting],
) -> (StoredSettings, Vec<SettingKey>) {
    let fresh = current.is_none();
    let mut next = current.cloned().unwrap_or_default();
    let mut keys: Vec<SettingKey> = Vec::new();

    for change in changes {
        let changed = next.apply(change);
        if (changed || fresh) && !keys.contains(&change.key()) {
            keys.push(change.key());
        }
    }

    (next, keys)
}

/// Fan-out of change notifications to every live subscriber
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<SettingsChanged>>>,
}

impl ChangeNotifier {
    pub(crate) fn subscribe(&self) -> Receiver<SettingsChanged> {
        let (tx, rx) = crossbeam::channel::unbounded();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    /// Publish to all subscribers, dropping those that hung up
    pub(crate) fn publish(&self, keys: Vec<SettingKey>) {
        if keys.is_empty() {
            return;
        }
        let event = SettingsChanged { keys };
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    settings: Mutex<Option<StoredSettings>>,
    notifier: ChangeNotifier,
}

impl MemoryStore {
    /// Create an empty store (fresh install)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an existing record
    pub fn with_settings(settings: StoredSettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
            notifier: ChangeNotifier::default(),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self) -> StoreResult<Option<StoredSettings>> {
        let guard = self.settings.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, changes: &[Setting]) -> StoreResult<()> {
        let keys = {
            let mut guard = self.settings.lock().map_err(|_| StoreError::Poisoned)?;
            let (next, keys) = apply_batch(guard.as_ref(), changes);
            *guard = Some(next);
            keys
        };
        self.notifier.publish(keys);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<SettingsChanged> {
        self.notifier.subscribe()
    }
}
