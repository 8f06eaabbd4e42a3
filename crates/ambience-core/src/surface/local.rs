//! In-process surface host
//!
//! Plays the host's part for a single process: enforces the one-surface
//! rule, runs each surface on its own thread and delivers messages to it as
//! JSON envelopes. A send while no surface exists reports `NoReceiver`.

use super::error::{DeliveryError, HostError, HostResult};
use super::host::{SurfaceChannel, SurfaceHost, SurfaceSpec};
use super::runtime::{PlaybackPrimitive, SurfaceRuntime};
use super::service::{AudioSurfaceService, SettingsSource};
use crate::services::{ServiceHandle, SurfaceMessage};
use std::sync::{Arc, Mutex};

/// Builds a fresh playback primitive for each new surface
pub type PrimitiveFactory = Box<dyn Fn() -> Box<dyn PlaybackPrimitive> + Send + Sync>;

pub struct LocalSurfaceHost {
    factory: PrimitiveFactory,
    asset_root: String,
    settings: Mutex<Option<Arc<dyn SettingsSource>>>,
    surface: Mutex<Option<ServiceHandle<String>>>,
}

impl LocalSurfaceHost {
    pub fn new(factory: PrimitiveFactory, asset_root: impl Into<String>) -> Self {
        Self {
            factory,
            asset_root: asset_root.into(),
            settings: Mutex::new(None),
            surface: Mutex::new(None),
        }
    }

    /// Set where new surfaces send GET_SETTINGS
    ///
    /// The engine is usually spawned after the host, so this is wired late.
    pub fn connect_settings(&self, source: Arc<dyn SettingsSource>) {
        if let Ok(mut slot) = self.settings.lock() {
            *slot = Some(source);
        }
    }

    fn lock_surface(&self) -> HostResult<std::sync::MutexGuard<'_, Option<ServiceHandle<String>>>> {
        self.surface
            .lock()
            .map_err(|_| HostError::Other("surface lock poisoned".into()))
    }
}

impl SurfaceHost for LocalSurfaceHost {
    fn has_surface(&self) -> HostResult<bool> {
        let mut surface = self.lock_surface()?;
        // A surface whose thread has exited is gone
        if surface.as_ref().is_some_and(|h| !h.is_running()) {
            log::warn!("Audio surface exited on its own");
            *surface = None;
        }
        Ok(surface.is_some())
    }

    fn create_surface(&self, spec: &SurfaceSpec) -> HostResult<()> {
        let mut surface = self.lock_surface()?;
        if surface.is_some() {
            return Err(HostError::AlreadyExists);
        }

        log::debug!(
            "Creating surface {} (reason: {}, {})",
            spec.url,
            spec.reason,
            spec.justification
        );
        let runtime = SurfaceRuntime::new((self.factory)(), self.asset_root.clone());
        let settings = self.settings.lock().ok().and_then(|s| s.clone());
        let handle = AudioSurfaceService::spawn(runtime, settings).map_err(HostError::Other)?;
        *surface = Some(handle);
        Ok(())
    }

    fn close_surface(&self) -> HostResult<()> {
        let handle = self.lock_surface()?.take().ok_or(HostError::NotFound)?;

        // Not joined: a starting surface may be blocked on GET_SETTINGS,
        // which the calling engine thread has yet to answer.
        let envelope = SurfaceMessage::Shutdown
            .to_json()
            .map_err(|e| HostError::Other(e.to_string()))?;
        if handle.send(envelope).is_err() {
            log::debug!("Audio surface already stopped");
        }
        Ok(())
    }
}

impl SurfaceChannel for LocalSurfaceHost {
    fn send(&self, message: SurfaceMessage) -> Result<(), DeliveryError> {
        let surface = self
            .surface
            .lock()
            .map_err(|_| DeliveryError::Disconnected("surface lock poisoned".into()))?;
        let handle = surface.as_ref().ok_or(DeliveryError::NoReceiver)?;

        let envelope = message
            .to_json()
            .map_err(|e| DeliveryError::Disconnected(e.to_string()))?;
        handle
            .send(envelope)
            .map_err(|e| DeliveryError::Disconnected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPrimitive;
    use crate::types::{Directive, TrackRef, Volume};

    fn host() -> LocalSurfaceHost {
        LocalSurfaceHost::new(
            Box::new(|| Box::new(RecordingPrimitive::default()) as Box<dyn PlaybackPrimitive>),
            "",
        )
    }

    #[test]
    fn test_singleton_enforced() {
        let host = host();
        assert!(!host.has_surface().unwrap());

        host.create_surface(&SurfaceSpec::default()).unwrap();
        assert!(host.has_surface().unwrap());
        assert_eq!(
            host.create_surface(&SurfaceSpec::default()),
            Err(HostError::AlreadyExists)
        );

        host.close_surface().unwrap();
        assert!(!host.has_surface().unwrap());
        assert_eq!(host.close_surface(), Err(HostError::NotFound));
    }

    #[test]
    fn test_send_without_surface_is_no_receiver() {
        let host = host();
        assert_eq!(
            host.send(SurfaceMessage::Restart),
            Err(DeliveryError::NoReceiver)
        );
    }

    #[test]
    fn test_send_to_live_surface() {
        let host = host();
        host.create_surface(&SurfaceSpec::default()).unwrap();

        let msg = SurfaceMessage::SyncDirective {
            settings: Directive {
                should_play: true,
                track: TrackRef::default(),
                volume: Volume::new(60),
            },
        };
        assert!(host.send(msg).is_ok());
        host.close_surface().unwrap();
    }
}
