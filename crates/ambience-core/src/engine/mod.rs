//! Playback coordination engine
//!
//! Leaf-first: [`tracker`] keeps the active page set, [`resolver`] turns
//! settings plus the active count into a [`Directive`](crate::Directive),
//! [`lifecycle`] keeps the audio surface in step with that directive and
//! [`dispatch`] pushes it to whichever surface is listening.
//! [`Coordinator`] wires them to the configuration store.

pub mod coordinator;
pub mod dispatch;
pub mod lifecycle;
pub mod resolver;
pub mod tracker;

pub use coordinator::Coordinator;
pub use dispatch::{Delivery, SyncDispatcher};
pub use lifecycle::{SurfaceLifecycle, SurfaceState};
pub use resolver::{resolve, should_play};
pub use tracker::{ActivePageSet, PageActivityTracker, Transition};
