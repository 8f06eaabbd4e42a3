//! Configuration store and settings lifecycle
//!
//! Every mutation of the persisted settings goes through a [`ConfigStore`]:
//! the settings UI, the install step and the one-time track migration all
//! write through the same `read`/`write`/`subscribe` interface, and every
//! consumer re-reads the latest snapshot instead of caching one.
//!
//! # Usage
//!
//! ```ignore
//! use ambience_core::config::{install_defaults, run_migrations, YamlStore};
//!
//! let store = YamlStore::open(&default_settings_path())?;
//! install_defaults(&store)?;
//! run_migrations(&store)?;
//! ```

mod io;
mod migration;
mod paths;
mod settings;
mod store;
mod yaml_store;

pub use io::{load_config, save_config};
pub use migration::{migrate_track, run_migrations, LEGACY_TRACK_PREFIX, TRACK_PREFIX};
pub use paths::{default_config_dir, default_config_path, default_settings_path};
pub use settings::{
    install_defaults, Setting, SettingKey, SettingsChanged, StoredSettings,
    CURRENT_SCHEMA_VERSION,
};
pub use store::{ConfigStore, MemoryStore, StoreError, StoreResult};
pub use yaml_store::YamlStore;
