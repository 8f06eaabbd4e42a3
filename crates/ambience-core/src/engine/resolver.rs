//! Playback state resolution

use crate::config::StoredSettings;
use crate::types::Directive;

/// Whether audio should play
///
/// A disabled configuration always wins over any number of active pages.
pub fn should_play(enabled: bool, active_count: usize) -> bool {
    enabled && active_count > 0
}

/// Derive the directive from a settings snapshot and the active page count
///
/// Track and volume pass through unchanged; the surface converts volume to
/// its native level and reports unloadable tracks.
pub fn resolve(settings: &StoredSettings, active_count: usize) -> Directive {
    Directive {
        should_play: should_play(settings.enabled, active_count),
        track: settings.track.clone(),
        volume: settings.volume,
    }
}
