//! PlaybackService - runs the coordinator on a background thread
//!
//! The service multiplexes two independent streams: commands from the page
//! host and change notifications from the configuration store. Neither is
//! ordered relative to the other; the coordinator re-reads its inputs on
//! every decision.

use super::messages::{EngineCommand, EngineStatus, ServiceHandle};
use crate::config::{ConfigStore, SettingsChanged};
use crate::engine::Coordinator;
use crate::surface::{SettingsSource, SurfaceChannel, SurfaceHost};
use crate::types::{Directive, PageId};
use crossbeam::channel::Receiver;
use std::sync::Arc;
use std::thread;

pub struct PlaybackService {
    coordinator: Coordinator,
    command_rx: Receiver<EngineCommand>,
    changes_rx: Receiver<SettingsChanged>,
}

impl PlaybackService {
    /// Bootstrap the coordinator and spawn it in a background thread
    pub fn spawn(
        store: Arc<dyn ConfigStore>,
        host: Arc<dyn SurfaceHost>,
        channel: Arc<dyn SurfaceChannel>,
    ) -> Result<ServiceHandle<EngineCommand>, String> {
        let mut coordinator = Coordinator::new(store.clone(), host, channel);
        coordinator
            .bootstrap()
            .map_err(|e| format!("Failed to bootstrap playback coordinator: {}", e))?;

        // Subscribed after bootstrap so install/migration writes don't
        // trigger a reconcile against an empty page set
        let changes_rx = store.subscribe();
        let (command_tx, command_rx) = crossbeam::channel::unbounded();

        let service = PlaybackService {
            coordinator,
            command_rx,
            changes_rx,
        };

        let handle = thread::Builder::new()
            .name("playback-service".into())
            .spawn(move || {
                service.run();
            })
            .map_err(|e| format!("Failed to spawn playback service thread: {}", e))?;

        Ok(ServiceHandle {
            command_tx,
            thread_handle: Some(handle),
        })
    }

    /// Main service loop
    fn run(mut self) {
        log::info!("PlaybackService started");

        let command_rx = self.command_rx.clone();
        let mut changes_rx = self.changes_rx.clone();
        loop {
            let mut changes_closed = false;
            crossbeam::select! {
                recv(command_rx) -> cmd => {
                    match cmd {
                        Ok(EngineCommand::Shutdown) => {
                            log::info!("PlaybackService shutting down");
                            break;
                        }
                        Ok(cmd) => self.handle_command(cmd),
                        Err(_) => {
                            log::info!("Command channel closed, shutting down");
                            break;
                        }
                    }
                }
                recv(changes_rx) -> change => {
                    match change {
                        Ok(change) => self.coordinator.settings_changed(&change),
                        Err(_) => changes_closed = true,
                    }
                }
            }
            if changes_closed {
                log::warn!("Settings change stream closed");
                changes_rx = crossbeam::channel::never();
            }
        }

        log::info!("PlaybackService stopped");
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::PageQualified { page } => self.coordinator.page_qualified(page),
            EngineCommand::PageClosed { page } => self.coordinator.page_closed(page),
            EngineCommand::GetSettings { reply } => {
                let _ = reply.send(self.coordinator.current_directive());
            }
            EngineCommand::Restart => self.coordinator.restart(),
            EngineCommand::Status { reply } => {
                let _ = reply.send(self.coordinator.status());
            }
            EngineCommand::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Client for interacting with the PlaybackService
#[derive(Clone)]
pub struct EngineClient {
    command_tx: crossbeam::channel::Sender<EngineCommand>,
}

impl EngineClient {
    /// Create a new client from a service handle
    pub fn new(handle: &ServiceHandle<EngineCommand>) -> Self {
        Self {
            command_tx: handle.command_tx.clone(),
        }
    }

    /// Report a qualifying page (PAGE_QUALIFIED)
    pub fn page_qualified(&self, page: PageId) -> Result<(), String> {
        self.send(EngineCommand::PageQualified { page })
    }

    /// Report a page that closed or stopped qualifying
    pub fn page_closed(&self, page: PageId) -> Result<(), String> {
        self.send(EngineCommand::PageClosed { page })
    }

    /// Request a replay from the start (RESTART)
    pub fn restart(&self) -> Result<(), String> {
        self.send(EngineCommand::Restart)
    }

    /// Current directive (GET_SETTINGS, blocking)
    pub fn get_settings(&self) -> Result<Directive, String> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.send(EngineCommand::GetSettings { reply: tx })?;
        rx.blocking_recv().map_err(|e| e.to_string())
    }

    /// Engine state snapshot (blocking)
    pub fn status(&self) -> Result<EngineStatus, String> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.send(EngineCommand::Status { reply: tx })?;
        rx.blocking_recv().map_err(|e| e.to_string())
    }

    /// Shutdown the service
    pub fn shutdown(&self) -> Result<(), String> {
        self.send(EngineCommand::Shutdown)
    }

    fn send(&self, cmd: EngineCommand) -> Result<(), String> {
        self.command_tx.send(cmd).map_err(|e| e.to_string())
    }
}

impl SettingsSource for EngineClient {
    fn request_settings(&self) -> Result<Directive, String> {
        self.get_settings()
    }
}
