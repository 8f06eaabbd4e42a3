//! One-time settings migrations
//!
//! Version 1 stored bundled tracks under `audio/`. They now live under
//! `assets/`. The rewrite is idempotent on its own and is additionally gated
//! on the stored schema version so it runs exactly once per install.

use super::settings::{Setting, CURRENT_SCHEMA_VERSION};
use super::store::{ConfigStore, StoreResult};
use crate::types::TrackRef;

/// Track path prefix used by schema version 1
pub const LEGACY_TRACK_PREFIX: &str = "audio/";

/// Track path prefix used by the current schema
pub const TRACK_PREFIX: &str = "assets/";

/// Rewrite a legacy track path to the current prefix
///
/// Paths that already carry the current prefix, or neither prefix, are
/// returned unchanged.
pub fn migrate_track(track: &TrackRef) -> TrackRef {
    let path = track.as_str();
    if path.starts_with(TRACK_PREFIX) {
        return track.clone();
    }
    match path.strip_prefix(LEGACY_TRACK_PREFIX) {
        Some(rest) => TrackRef::new(format!("{}{}", TRACK_PREFIX, rest)),
        None => track.clone(),
    }
}

/// Bring stored settings up to [`CURRENT_SCHEMA_VERSION`]
///
/// Returns true if anything was rewritten. A fresh store has nothing to
/// migrate.
pub fn run_migrations(store: &dyn ConfigStore) -> StoreResult<bool> {
    let Some(settings) = store.read()? else {
        return Ok(false);
    };

    if settings.schema_version >= CURRENT_SCHEMA_VERSION {
        log::debug!("Settings already at schema v{}", settings.schema_version);
        return Ok(false);
    }

    let migrated = migrate_track(&settings.track);
    if migrated != settings.track {
        log::info!("Migrating track path {} -> {}", settings.track, migrated);
    }

    store.write(&[
        Setting::Track(migrated),
        Setting::SchemaVersion(CURRENT_SCHEMA_VERSION),
    ])?;
    log::info!(
        "Settings migrated from schema v{} to v{}",
        settings.schema_version,
        CURRENT_SCHEMA_VERSION
    );
    Ok(true)
}
