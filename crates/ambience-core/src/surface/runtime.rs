//! Audio surface runtime
//!
//! Applies directives to a playback primitive. The runtime remembers which
//! track is loaded so that volume-only updates do not reload the resource
//! (an audible glitch). Playback failures are logged and kept as
//! `last_error`; nothing retries on a timer, the next directive simply tries
//! again.

use super::error::{PlaybackError, PlaybackResult};
use crate::types::{Directive, TrackRef};

/// Load/play/pause/seek primitive hosted by the surface
pub trait PlaybackPrimitive: Send {
    /// Replace the loaded resource
    fn load(&mut self, source: &str) -> PlaybackResult<()>;

    /// Start or resume playback
    fn play(&mut self) -> PlaybackResult<()>;

    fn pause(&mut self);

    /// Seek to a position in seconds
    fn seek(&mut self, position_secs: f64);

    /// Set output level on the native 0.0 - 1.0 scale
    fn set_level(&mut self, level: f32);
}

impl<P: PlaybackPrimitive + ?Sized> PlaybackPrimitive for Box<P> {
    fn load(&mut self, source: &str) -> PlaybackResult<()> {
        (**self).load(source)
    }

    fn play(&mut self) -> PlaybackResult<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, position_secs: f64) {
        (**self).seek(position_secs)
    }

    fn set_level(&mut self, level: f32) {
        (**self).set_level(level)
    }
}

/// Play/pause status as last requested of the primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayStatus {
    #[default]
    Paused,
    Playing,
}

/// Directive applier wrapping a playback primitive
pub struct SurfaceRuntime<P: PlaybackPrimitive> {
    primitive: P,
    asset_root: String,
    current_track: Option<TrackRef>,
    status: PlayStatus,
    last_error: Option<PlaybackError>,
}

impl<P: PlaybackPrimitive> SurfaceRuntime<P> {
    /// Create a runtime resolving tracks against `asset_root`
    pub fn new(primitive: P, asset_root: impl Into<String>) -> Self {
        Self {
            primitive,
            asset_root: asset_root.into(),
            current_track: None,
            status: PlayStatus::Paused,
            last_error: None,
        }
    }

    /// Apply a directive
    ///
    /// Reloads only when the track differs from the loaded one, always sets
    /// the level, then plays or pauses.
    pub fn apply_directive(&mut self, directive: &Directive) {
        let mut loaded = true;
        if self.current_track.as_ref() != Some(&directive.track) {
            match self.load(&directive.track) {
                Ok(()) => self.current_track = Some(directive.track.clone()),
                Err(e) => {
                    self.report(e);
                    loaded = false;
                }
            }
        }

        self.primitive.set_level(directive.volume.level());

        if directive.should_play && loaded {
            match self.primitive.play() {
                Ok(()) => {
                    self.status = PlayStatus::Playing;
                    self.last_error = None;
                }
                Err(e) => {
                    self.status = PlayStatus::Paused;
                    self.report(e);
                }
            }
        } else {
            self.primitive.pause();
            self.status = PlayStatus::Paused;
        }
    }

    /// Seek to the start and resume, regardless of the last directive
    pub fn restart(&mut self) {
        self.primitive.seek(0.0);
        match self.primitive.play() {
            Ok(()) => {
                self.status = PlayStatus::Playing;
                self.last_error = None;
            }
            Err(e) => {
                log::error!("Restart failed: {}", e);
                self.status = PlayStatus::Paused;
                self.last_error = Some(e);
            }
        }
    }

    fn load(&mut self, track: &TrackRef) -> PlaybackResult<()> {
        if track.is_empty() {
            return Err(PlaybackError::Load {
                source_path: String::new(),
                reason: "no track selected".to_string(),
            });
        }
        let source = track.resolve(&self.asset_root);
        log::info!("Loading track {}", source);
        self.primitive.load(&source)
    }

    fn report(&mut self, error: PlaybackError) {
        log::error!("Playback failed: {}", error);
        self.last_error = Some(error);
    }

    pub fn current_track(&self) -> Option<&TrackRef> {
        self.current_track.as_ref()
    }

    pub fn status(&self) -> PlayStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    pub fn primitive_mut(&mut self) -> &mut P {
        &mut self.primitive
    }
}
