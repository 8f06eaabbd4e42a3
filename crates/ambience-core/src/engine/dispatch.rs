//! Best-effort directive delivery
//!
//! A send with nobody listening is the normal state while playback is
//! stopped, so `NoReceiver` is dropped without a trace above debug level.
//! Any other delivery failure is logged as a warning and otherwise ignored.

use crate::services::SurfaceMessage;
use crate::surface::{DeliveryError, SurfaceChannel};
use crate::types::Directive;
use std::sync::Arc;

/// Result of a dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NoReceiver,
    Failed,
}

pub struct SyncDispatcher {
    channel: Arc<dyn SurfaceChannel>,
    last_directive: Option<Directive>,
}

impl SyncDispatcher {
    pub fn new(channel: Arc<dyn SurfaceChannel>) -> Self {
        Self {
            channel,
            last_directive: None,
        }
    }

    /// Push a directive to the surface, fire-and-forget
    pub fn dispatch(&mut self, directive: Directive) -> Delivery {
        log::debug!("Dispatching directive: {}", directive);
        self.last_directive = Some(directive.clone());
        self.send(SurfaceMessage::SyncDirective {
            settings: directive,
        })
    }

    /// Ask the surface to replay from the start
    pub fn restart(&mut self) -> Delivery {
        self.send(SurfaceMessage::Restart)
    }

    /// Most recently dispatched directive, delivered or not
    pub fn last_directive(&self) -> Option<&Directive> {
        self.last_directive.as_ref()
    }

    fn send(&self, message: SurfaceMessage) -> Delivery {
        match self.channel.send(message) {
            Ok(()) => Delivery::Delivered,
            Err(DeliveryError::NoReceiver) => {
                log::debug!("No audio surface listening, message dropped");
                Delivery::NoReceiver
            }
            Err(e) => {
                log::warn!("Failed to deliver message to audio surface: {}", e);
                Delivery::Failed
            }
        }
    }
}
