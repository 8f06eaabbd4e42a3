//! YAML file helpers shared by the settings store and the host config

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Load a YAML file, or the default when it is missing or unusable
///
/// Unusable files are logged, never rewritten.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match read_yaml(path) {
        Ok(Some(config)) => {
            log::info!("Loaded config from {:?}", path);
            config
        }
        Ok(None) => {
            log::info!("No config at {:?}, using defaults", path);
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring config at {:?}: {:#}", path, e);
            T::default()
        }
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_yaml::from_str(&contents)
        .map(Some)
        .with_context(|| format!("Malformed YAML in {:?}", path))
}

/// Serialize `config` and replace the file at `path` in one step
///
/// The YAML is staged in a temporary file next to the target and renamed
/// over it, so a concurrent reader sees the old record or the new one and
/// never a partial write.
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config directory: {:?}", dir))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage config in {:?}", dir))?;
    staged
        .write_all(yaml.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .context("Failed to write staged config")?;
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace config file: {:?}", path))?;

    log::debug!("Saved {:?}", path);
    Ok(())
}
