//! Host-side seams for the audio surface
//!
//! The host owns the surface singleton: it can be asked whether a surface
//! exists, to create one, or to close it. Messages travel over a separate
//! best-effort channel where an absent receiver is an ordinary outcome.

use super::error::{DeliveryError, HostResult};
use crate::services::SurfaceMessage;

/// Creation parameters passed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    /// Entry point the host loads into the new surface
    pub url: String,
    /// Reason tag required by hosts that gate isolated contexts
    pub reason: String,
    /// Human-readable justification
    pub justification: String,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            url: "surface/surface.html".to_string(),
            reason: "AUDIO_PLAYBACK".to_string(),
            justification: "Play ambient music while a qualifying page is open.".to_string(),
        }
    }
}

/// Host primitives for the surface singleton
pub trait SurfaceHost: Send + Sync {
    /// Whether a surface currently exists
    fn has_surface(&self) -> HostResult<bool>;

    /// Create the surface; `AlreadyExists` if one is present or in flight
    fn create_surface(&self, spec: &SurfaceSpec) -> HostResult<()>;

    /// Close the surface; `NotFound` if none exists
    fn close_surface(&self) -> HostResult<()>;
}

/// Fire-and-forget channel to whatever surface is listening
pub trait SurfaceChannel: Send + Sync {
    fn send(&self, message: SurfaceMessage) -> Result<(), DeliveryError>;
}
