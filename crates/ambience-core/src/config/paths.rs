//! Standard locations for Ambience configuration files

use std::path::PathBuf;

/// Get the Ambience configuration directory
///
/// Returns: `~/.config/ambience` (platform config dir), falling back to the
/// home directory and finally the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ambience")
}

/// Get the path of a named file in the configuration directory
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

/// Get the path of the persisted playback settings
pub fn default_settings_path() -> PathBuf {
    default_config_path("settings.yaml")
}
