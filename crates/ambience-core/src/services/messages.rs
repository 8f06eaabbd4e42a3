//! Message types for service communication
//!
//! Engine commands are in-process requests, with oneshot replies where the
//! caller needs an answer. Surface messages cross the boundary between the
//! engine and the audio surface, so they have a JSON envelope tagged by
//! `type`.

use crate::engine::SurfaceState;
use crate::types::{Directive, PageId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Engine Commands
// ============================================================================

/// Commands sent to the PlaybackService
pub enum EngineCommand {
    /// A page started matching the qualifying predicate
    PageQualified { page: PageId },

    /// A page was removed or navigated away from a qualifying site
    PageClosed { page: PageId },

    /// The surface asks for the current directive on startup
    GetSettings {
        reply: tokio::sync::oneshot::Sender<Directive>,
    },

    /// Forward a replay request to the surface
    Restart,

    /// Snapshot of engine state for diagnostics
    Status {
        reply: tokio::sync::oneshot::Sender<EngineStatus>,
    },

    /// Shutdown the service
    Shutdown,
}

/// Engine state reported by [`EngineCommand::Status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    pub active_pages: Vec<PageId>,
    pub surface: SurfaceState,
    pub last_directive: Option<Directive>,
}

// ============================================================================
// Surface Messages
// ============================================================================

/// Messages delivered to the audio surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceMessage {
    /// Apply an updated directive
    SyncDirective { settings: Directive },

    /// Seek to zero and play
    Restart,

    /// Stop the surface's message loop
    Shutdown,
}

impl SurfaceMessage {
    /// Encode the wire envelope
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a wire envelope
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Service Handle
// ============================================================================

/// Handle for communicating with a background service
pub struct ServiceHandle<Cmd> {
    /// Channel for sending commands to the service
    pub command_tx: crossbeam::channel::Sender<Cmd>,
    /// Thread handle for the service
    pub thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl<Cmd> ServiceHandle<Cmd> {
    /// Send a command to the service
    pub fn send(&self, cmd: Cmd) -> Result<(), crossbeam::channel::SendError<Cmd>> {
        self.command_tx.send(cmd)
    }

    /// Check if the service is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the service thread to exit
    pub fn join(mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("Service thread panicked");
            }
        }
    }
}
