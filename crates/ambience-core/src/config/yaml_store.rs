//! YAML-file backed configuration store
//!
//! The file is the durable copy; an in-memory cache holds the last record
//! this process read or wrote. [`YamlStore::watch`] uses `notify` to pick up
//! edits made by other processes (the settings UI) and publishes only the
//! keys that actually differ from the cache, so this store's own writes do
//! not echo back as notifications.

use super::io::save_config;
use super::settings::{Setting, SettingsChanged, StoredSettings};
use super::store::{apply_batch, ChangeNotifier, ConfigStore, StoreError, StoreResult};
use crossbeam::channel::Receiver;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

/// Store persisting settings to a YAML file
pub struct YamlStore {
    path: PathBuf,
    cache: Mutex<Option<StoredSettings>>,
    notifier: ChangeNotifier,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl YamlStore {
    /// Open the store at `path`
    ///
    /// A missing file is a fresh install. A file that exists but does not
    /// parse is an error; it is never silently replaced by defaults.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let cache = read_file(path)?;
        log::info!(
            "Settings store at {:?} ({})",
            path,
            if cache.is_some() { "existing" } else { "fresh install" }
        );

        Ok(Self {
            path: path.to_path_buf(),
            cache: Mutex::new(cache),
            notifier: ChangeNotifier::default(),
            watcher: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start watching the file for external edits
    ///
    /// The parent directory is watched rather than the file itself so that
    /// editors which save by rename are still observed.
    pub fn watch(self: &Arc<Self>) -> StoreResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)?;

        let store: Weak<YamlStore> = Arc::downgrade(self);
        let file_name = self.path.file_name().map(|n| n.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let Ok(event) = res else { return };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            let touches_file = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if !touches_file {
                return;
            }
            if let Some(store) = store.upgrade() {
                store.reload();
            }
        })
        .map_err(|e| StoreError::Watch(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| StoreError::Watch(e.to_string()))?;

        if let Ok(mut slot) = self.watcher.lock() {
            *slot = Some(watcher);
        }
        log::info!("Watching {:?} for external settings edits", self.path);
        Ok(())
    }

    /// Re-read the file and publish keys that differ from the cache
    ///
    /// Only a complete record is adopted. A file that is empty, does not
    /// parse or lacks any core field is taken to be mid-write by another
    /// process and ignored; the finished write produces another event. The
    /// read and the cache swap happen under the cache lock, so a reload
    /// never overtakes one of this store's own writes.
    pub fn reload(&self) {
        let keys = {
            let Ok(mut cache) = self.cache.lock() else {
                return;
            };
            let on_disk = match read_complete(&self.path) {
                Ok(settings) => settings,
                Err(e) => {
                    log::debug!("Ignoring settings file: {}", e);
                    return;
                }
            };
            let keys = match cache.as_ref() {
                Some(current) => current.diff(&on_disk),
                None => on_disk.diff(&StoredSettings::default()),
            };
            *cache = Some(on_disk);
            keys
        };

        if !keys.is_empty() {
            log::info!("Settings changed externally: {:?}", keys);
        }
        self.notifier.publish(keys);
    }
}

/// Read the file as it is at open time
///
/// Records missing fields are accepted here (older versions wrote fewer
/// of them). An empty file is treated like a missing one.
fn read_file(path: &Path) -> StoreResult<Option<StoredSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|e| StoreError::Parse(e.to_string()))
}

/// Fields every record written by a current store carries
const RECORD_FIELDS: [&str; 4] = ["enabled", "volume", "track", "schema_version"];

fn read_complete(path: &Path) -> StoreResult<StoredSettings> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))?;
    let mapping = value
        .as_mapping()
        .ok_or_else(|| StoreError::Parse("settings record is not a mapping".into()))?;
    if let Some(missing) = RECORD_FIELDS.iter().find(|f| !mapping.contains_key(**f)) {
        return Err(StoreError::Parse(format!("settings record lacks `{}`", missing)));
    }
    serde_yaml::from_value(value).map_err(|e| StoreError::Parse(e.to_string()))
}

impl ConfigStore for YamlStore {
    fn read(&self) -> StoreResult<Option<StoredSettings>> {
        let guard = self.cache.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, changes: &[Setting]) -> StoreResult<()> {
        let keys = {
            let mut guard = self.cache.lock().map_err(|_| StoreError::Poisoned)?;
            let (next, keys) = apply_batch(guard.as_ref(), changes);
            if keys.is_empty() && guard.is_some() {
                return Ok(());
            }
            // Saved while holding the lock so a concurrent reload reads
            // either the previous record or this one
            save_config(&next, &self.path).map_err(|e| StoreError::Save(format!("{:#}", e)))?;
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
