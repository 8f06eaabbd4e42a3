//! Common types for Ambience
//!
//! Value types shared by the coordination engine, the configuration store
//! and the audio surface: page handles, volume, track references and the
//! resolved playback directive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum volume value (inclusive)
pub const MAX_VOLUME: u8 = 100;

/// Volume used on fresh install
pub const DEFAULT_VOLUME: u8 = 50;

/// Track bundled with the application, used on fresh install
pub const DEFAULT_TRACK: &str = "assets/black_market.webm";

/// Opaque handle for a page instance
///
/// Handles are only meaningful inside the process incarnation that received
/// them from the host; they are never restored across a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Playback volume on a 0-100 integer scale
///
/// Out-of-range input is clamped, including values read back from a
/// hand-edited settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Volume(u8);

impl Volume {
    /// Create a volume, clamping to 0-100
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_VOLUME))
    }

    /// Raw 0-100 value
    pub fn get(self) -> u8 {
        self.0
    }

    /// Native playback level (0.0 - 1.0)
    ///
    /// Only the audio surface converts to this scale.
    pub fn level(self) -> f32 {
        self.0 as f32 / MAX_VOLUME as f32
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

impl From<i64> for Volume {
    fn from(value: i64) -> Self {
        Self(value.clamp(0, MAX_VOLUME as i64) as u8)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Identifier of a playable resource, relative to the asset root
///
/// No validation happens here. An empty or unknown reference still flows
/// through the engine and surfaces as a load failure in the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRef(String);

impl TrackRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Resolve against an asset root into a loadable location
    ///
    /// Absolute references (containing a scheme, or starting with `/`) are
    /// returned as-is.
    pub fn resolve(&self, asset_root: &str) -> String {
        if self.0.contains("://") || self.0.starts_with('/') || asset_root.is_empty() {
            return self.0.clone();
        }
        format!(
            "{}/{}",
            asset_root.trim_end_matches('/'),
            self.0.trim_start_matches('/')
        )
    }
}

impl Default for TrackRef {
    fn default() -> Self {
        Self(DEFAULT_TRACK.to_string())
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully resolved playback state at a point in time
///
/// Derived from the latest settings snapshot and the active page count,
/// never persisted. On the wire `should_play` travels as `enabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    #[serde(rename = "enabled")]
    pub should_play: bool,
    pub track: TrackRef,
    pub volume: Volume,
}

impl Directive {
    /// Directive that stops playback with the given settings
    pub fn stopped(track: TrackRef, volume: Volume) -> Self {
        Self {
            should_play: false,
            track,
            volume,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {}",
            if self.should_play { "play" } else { "pause" },
            self.track,
            self.volume
        )
    }
}
