//! Surface lifecycle management
//!
//! Two states, `Absent` and `Present`. The host enforces the singleton; this
//! manager only checks existence before acting and treats "already exists"
//! and "doesn't exist" outcomes as no-ops, since another event source may
//! have raced it. Other creation failures are logged and leave the state
//! `Absent` until the next qualifying event tries again.

use crate::surface::{HostError, SurfaceHost, SurfaceSpec};
use std::sync::Arc;

/// Believed existence of the audio surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Absent,
    Present,
}

pub struct SurfaceLifecycle {
    host: Arc<dyn SurfaceHost>,
    spec: SurfaceSpec,
    state: SurfaceState,
}

impl SurfaceLifecycle {
    pub fn new(host: Arc<dyn SurfaceHost>, spec: SurfaceSpec) -> Self {
        Self {
            host,
            spec,
            state: SurfaceState::Absent,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Re-check the believed state against the host
    ///
    /// A surface the host no longer reports (it crashed or was torn down
    /// from outside) flips the state back to `Absent`.
    pub fn refresh(&mut self) -> SurfaceState {
        match self.host.has_surface() {
            Ok(present) => {
                if self.state == SurfaceState::Present && !present {
                    log::warn!("Audio surface disappeared");
                }
                self.state = if present {
                    SurfaceState::Present
                } else {
                    SurfaceState::Absent
                };
            }
            Err(e) => log::error!("Failed to query audio surface: {}", e),
        }
        self.state
    }

    /// Make sure a surface exists (`Absent -> Present`)
    pub fn ensure_present(&mut self) -> SurfaceState {
        match self.host.has_surface() {
            Ok(true) => {
                self.state = SurfaceState::Present;
                return self.state;
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to query audio surface: {}", e);
                return self.state;
            }
        }

        match self.host.create_surface(&self.spec) {
            Ok(()) => {
                log::info!("Audio surface created");
                self.state = SurfaceState::Present;
            }
            Err(HostError::AlreadyExists) => {
                log::debug!("Audio surface already exists, nothing to create");
                self.state = SurfaceState::Present;
            }
            Err(e) => {
                log::error!("Failed to create audio surface: {}", e);
                self.state = SurfaceState::Absent;
            }
        }
        self.state
    }

    /// Make sure no surface exists (`Present -> Absent`)
    pub fn ensure_absent(&mut self) -> SurfaceState {
        match self.host.has_surface() {
            Ok(false) => {
                self.state = SurfaceState::Absent;
                return self.state;
            }
            Ok(true) => {}
            Err(e) => {
                log::error!("Failed to query audio surface: {}", e);
                return self.state;
            }
        }

        match self.host.close_surface() {
            Ok(()) => {
                log::info!("Audio surface closed");
                self.state = SurfaceState::Absent;
            }
            Err(HostError::NotFound) => {
                log::debug!("Audio surface already gone");
                self.state = SurfaceState::Absent;
            }
            Err(e) => {
                log::error!("Failed to close audio surface: {}", e);
            }
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSurface;

    fn manager(host: &Arc<FakeSurface>) -> SurfaceLifecycle {
        SurfaceLifecycle::new(host.clone(), SurfaceSpec::default())
    }

    #[test]
    fn test_create_twice_yields_one_surface() {
        let host = Arc::new(FakeSurface::default());
        let mut lifecycle = manager(&host);

        assert_eq!(lifecycle.ensure_present(), SurfaceState::Present);
        assert_eq!(lifecycle.ensure_present(), SurfaceState::Present);
        assert_eq!(host.creates(), 1);
        assert!(host.is_present());
    }

    #[test]
    fn test_destroy_twice_is_quiet() {
        let host = Arc::new(FakeSurface::default());
        let mut lifecycle = manager(&host);
        lifecycle.ensure_present();

        assert_eq!(lifecycle.ensure_absent(), SurfaceState::Absent);
        assert_eq!(lifecycle.ensure_absent(), SurfaceState::Absent);
        assert_eq!(host.closes(), 1);
        assert!(!host.is_present());
    }

    #[test]
    fn test_racing_create_is_swallowed() {
        // Query says absent, but another actor wins the create
        let host = Arc::new(FakeSurface::default());
        host.race_next_create();
        let mut lifecycle = manager(&host);

        assert_eq!(lifecycle.ensure_present(), SurfaceState::Present);
        assert!(host.is_present());
    }

    #[test]
    fn test_racing_close_is_swallowed() {
        let host = Arc::new(FakeSurface::default());
        let mut lifecycle = manager(&host);
        lifecycle.ensure_present();
        host.race_next_close();

        assert_eq!(lifecycle.ensure_absent(), SurfaceState::Absent);
    }

    #[test]
    fn test_creation_failure_stays_absent_and_retries() {
        let host = Arc::new(FakeSurface::default());
        host.fail_next_creates(1);
        let mut lifecycle = manager(&host);

        assert_eq!(lifecycle.ensure_present(), SurfaceState::Absent);
        assert!(!host.is_present());

        assert_eq!(lifecycle.ensure_present(), SurfaceState::Present);
        assert_eq!(host.creates(), 1);
    }

    #[test]
    fn test_externally_closed_surface_is_recreated() {
        let host = Arc::new(FakeSurface::default());
        let mut lifecycle = manager(&host);
        lifecycle.ensure_present();

        host.close_surface().unwrap();
        assert_eq!(lifecycle.ensure_present(), SurfaceState::Present);
        assert_eq!(host.creates(), 2);
    }

    #[test]
    fn test_refresh_notices_vanished_surface() {
        let host = Arc::new(FakeSurface::default());
        let mut lifecycle = manager(&host);
        lifecycle.ensure_present();

        host.close_surface().unwrap();
        assert_eq!(lifecycle.refresh(), SurfaceState::Absent);
        assert_eq!(lifecycle.state(), SurfaceState::Absent);
        assert_eq!(host.creates(), 1);
    }
}
