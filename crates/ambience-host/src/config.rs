//! Host configuration for ambience-host
//!
//! Stored as YAML next to the settings file.
//! Default location: ~/.config/ambience/host.yaml

use ambience_core::config::{default_config_path, default_settings_path};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Where playback settings are persisted
    pub settings_path: PathBuf,
    /// Directory that track references are resolved against
    pub asset_root: String,
    /// Sites whose pages keep playback alive (see `SitePattern`)
    pub qualifying_hosts: Vec<String>,
    /// Watch the settings file for edits from other processes
    pub watch_settings: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            asset_root: ".".to_string(),
            qualifying_hosts: vec!["amazon".to_string()],
            watch_settings: true,
        }
    }
}

/// Get the default host config path
pub fn default_host_config_path() -> PathBuf {
    default_config_path("host.yaml")
}
