//! Playback coordinator
//!
//! Converges page lifecycle events and settings changes onto one decision.
//! The two event streams have no relative ordering, so every decision is
//! recomputed from the latest settings snapshot and the current active
//! count; nothing is patched incrementally from a previous directive.

use super::dispatch::SyncDispatcher;
use super::lifecycle::{SurfaceLifecycle, SurfaceState};
use super::resolver::resolve;
use super::tracker::{PageActivityTracker, Transition};
use crate::config::{
    install_defaults, run_migrations, ConfigStore, SettingsChanged, StoreResult, StoredSettings,
};
use crate::services::EngineStatus;
use crate::surface::{SurfaceChannel, SurfaceHost, SurfaceSpec};
use crate::types::{Directive, PageId};
use std::sync::Arc;

pub struct Coordinator {
    store: Arc<dyn ConfigStore>,
    tracker: PageActivityTracker,
    lifecycle: SurfaceLifecycle,
    dispatcher: SyncDispatcher,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        host: Arc<dyn SurfaceHost>,
        channel: Arc<dyn SurfaceChannel>,
    ) -> Self {
        Self {
            tracker: PageActivityTracker::new(store.clone()),
            lifecycle: SurfaceLifecycle::new(host, SurfaceSpec::default()),
            dispatcher: SyncDispatcher::new(channel),
            store,
        }
    }

    /// Startup sequence for a new process incarnation
    ///
    /// Installs defaults on a fresh store, runs pending migrations and
    /// discards page membership from any previous incarnation. The surface
    /// is left alone.
    pub fn bootstrap(&mut self) -> StoreResult<()> {
        install_defaults(self.store.as_ref())?;
        run_migrations(self.store.as_ref())?;
        self.tracker.reset();
        log::info!("Coordinator bootstrapped with an empty active page set");
        Ok(())
    }

    pub fn page_qualified(&mut self, page: PageId) {
        let transition = self.tracker.on_page_qualified(page);
        // A surface that failed to come up, or has since died, is retried on
        // any qualifying event
        if transition == Transition::BecameActive
            || self.lifecycle.refresh() != SurfaceState::Present
        {
            self.reconcile();
        }
    }

    pub fn page_closed(&mut self, page: PageId) {
        if self.tracker.on_page_closed(page) == Transition::BecameIdle {
            self.reconcile();
        }
    }

    pub fn settings_changed(&mut self, change: &SettingsChanged) {
        if change.affects_playback() {
            self.reconcile();
        }
    }

    /// Forward a replay request; dropped if no surface is listening
    pub fn restart(&mut self) {
        self.dispatcher.restart();
    }

    /// Directive computed from the latest snapshot
    ///
    /// If the store cannot be read the answer is "don't play".
    pub fn current_directive(&self) -> Directive {
        match self.store.snapshot() {
            Ok(settings) => resolve(&settings, self.tracker.active_count()),
            Err(e) => {
                log::error!("Failed to read settings: {}", e);
                let defaults = StoredSettings::default();
                Directive::stopped(defaults.track, defaults.volume)
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            active_pages: self.tracker.set().to_vec(),
            surface: self.lifecycle.state(),
            last_directive: self.dispatcher.last_directive().cloned(),
        }
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.lifecycle.state()
    }

    pub fn active_count(&self) -> usize {
        self.tracker.active_count()
    }

    /// Drive the surface toward the directive derived from fresh inputs
    fn reconcile(&mut self) {
        let settings = match self.store.snapshot() {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Skipping reconcile, settings unreadable: {}", e);
                return;
            }
        };
        let directive = resolve(&settings, self.tracker.active_count());
        log::info!(
            "Reconciling: {} ({} active pages)",
            directive,
            self.tracker.active_count()
        );

        if directive.should_play {
            self.lifecycle.ensure_present();
            self.dispatcher.dispatch(directive);
        } else {
            self.dispatcher.dispatch(directive);
            self.lifecycle.ensure_absent();
        }
    }
}
