//! Persisted playback settings
//!
//! The settings record is a flat mapping of named fields. Changes are
//! expressed as [`Setting`] assignments so stores can report exactly which
//! keys moved.

use super::store::{ConfigStore, StoreResult};
use crate::types::{PageId, TrackRef, Volume};
use serde::{Deserialize, Serialize};

/// Schema version written by this build
///
/// Version 1 records carried track paths under the legacy prefix.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Records written before versioning was introduced count as version 1
fn legacy_schema_version() -> u32 {
    1
}

/// The persisted settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    /// Master switch for ambient playback
    pub enabled: bool,
    /// Playback volume (0-100)
    pub volume: Volume,
    /// Selected track
    pub track: TrackRef,
    /// Mirror of the in-process active page set
    ///
    /// Advisory display data only. It is cleared on every startup and never
    /// restored into the tracker.
    #[serde(rename = "activeTabs", alias = "active_pages")]
    pub active_pages: Vec<PageId>,
    /// Migration marker
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: Volume::default(),
            track: TrackRef::default(),
            active_pages: Vec::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

impl StoredSettings {
    /// Apply one assignment, returning true if the value changed
    pub fn apply(&mut self, setting: &Setting) -> bool {
        match setting {
            Setting::Enabled(v) => replace_if_changed(&mut self.enabled, v),
            Setting::Volume(v) => replace_if_changed(&mut self.volume, v),
            Setting::Track(v) => replace_if_changed(&mut self.track, v),
            Setting::ActivePages(v) => replace_if_changed(&mut self.active_pages, v),
            Setting::SchemaVersion(v) => replace_if_changed(&mut self.schema_version, v),
        }
    }

    /// Keys whose values differ between two records
    pub fn diff(&self, other: &StoredSettings) -> Vec<SettingKey> {
        let mut keys = Vec::new();
        if self.enabled != other.enabled {
            keys.push(SettingKey::Enabled);
        }
        if self.volume != other.volume {
            keys.push(SettingKey::Volume);
        }
        if self.track != other.track {
            keys.push(SettingKey::Track);
        }
        if self.active_pages != other.active_pages {
            keys.push(SettingKey::ActivePages);
        }
        if self.schema_version != other.schema_version {
            keys.push(SettingKey::SchemaVersion);
        }
        keys
    }

    /// Every field as an assignment, in declaration order
    pub fn to_settings(&self) -> Vec<Setting> {
        vec![
            Setting::Enabled(self.enabled),
            Setting::Volume(self.volume),
            Setting::Track(self.track.clone()),
            Setting::ActivePages(self.active_pages.clone()),
            Setting::SchemaVersion(self.schema_version),
        ]
    }
}

fn replace_if_changed<T: PartialEq + Clone>(slot: &mut T, value: &T) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.clone();
    true
}

/// A single field assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Enabled(bool),
    Volume(Volume),
    Track(TrackRef),
    ActivePages(Vec<PageId>),
    SchemaVersion(u32),
}

impl Setting {
    pub fn key(&self) -> SettingKey {
        match self {
            Setting::Enabled(_) => SettingKey::Enabled,
            Setting::Volume(_) => SettingKey::Volume,
            Setting::Track(_) => SettingKey::Track,
            Setting::ActivePages(_) => SettingKey::ActivePages,
            Setting::SchemaVersion(_) => SettingKey::SchemaVersion,
        }
    }
}

/// Name of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Enabled,
    Volume,
    Track,
    ActivePages,
    SchemaVersion,
}

impl SettingKey {
    /// Whether a change to this key can alter the playback directive
    pub fn affects_playback(self) -> bool {
        matches!(self, SettingKey::Enabled | SettingKey::Volume | SettingKey::Track)
    }
}

/// Change notification published by a store after a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    pub keys: Vec<SettingKey>,
}

impl SettingsChanged {
    pub fn affects_playback(&self) -> bool {
        self.keys.iter().any(|k| k.affects_playback())
    }
}

/// Populate every default on fresh install
///
/// Returns true when defaults were written. Existing settings are left
/// untouched.
pub fn install_defaults(store: &dyn ConfigStore) -> StoreResult<bool> {
    if store.read()?.is_some() {
        return Ok(false);
    }

    log::info!("Fresh install, writing default settings");
    store.write(&StoredSettings::default().to_settings())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::types::DEFAULT_TRACK;

    #[test]
    fn test_defaults() {
        let settings = StoredSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.volume.get(), 50);
        assert_eq!(settings.track.as_str(), DEFAULT_TRACK);
        assert!(settings.active_pages.is_empty());
    }

    #[test]
    fn test_apply_reports_change() {
        let mut settings = StoredSettings::default();
        assert!(!settings.apply(&Setting::Volume(Volume::new(50))));
        assert!(settings.apply(&Setting::Volume(Volume::new(80))));
        assert_eq!(settings.volume.get(), 80);
    }

    #[test]
    fn test_missing_schema_version_is_legacy() {
        let settings: StoredSettings =
            serde_yaml::from_str("enabled: true\nvolume: 30\ntrack: audio/old.webm\n").unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.volume.get(), 30);
        assert!(settings.active_pages.is_empty());
    }

    #[test]
    fn test_install_defaults_only_once() {
        let store = MemoryStore::new();
        assert!(install_defaults(&store).unwrap());

        store.write(&[Setting::Volume(Volume::new(10))]).unwrap();
        assert!(!install_defaults(&store).unwrap());
        assert_eq!(store.read().unwrap().unwrap().volume.get(), 10);
    }

    #[test]
    fn test_affects_playback() {
        let changed = SettingsChanged {
            keys: vec![SettingKey::ActivePages],
        };
        assert!(!changed.affects_playback());

        let changed = SettingsChanged {
            keys: vec![SettingKey::ActivePages, SettingKey::Volume],
        };
        assert!(changed.affects_playback());
    }
}
