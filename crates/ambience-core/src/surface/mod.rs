//! Audio surface: the isolated context hosting the playback primitive
//!
//! The engine only ever talks to the surface through [`SurfaceHost`]
//! (create/close/query) and [`SurfaceChannel`] (best-effort messages).
//! [`LocalSurfaceHost`] implements both in-process, running the
//! [`SurfaceRuntime`] on its own thread behind a JSON message boundary.

mod error;
mod host;
mod local;
mod runtime;
mod service;

pub use error::{DeliveryError, HostError, HostResult, PlaybackError, PlaybackResult};
pub use host::{SurfaceChannel, SurfaceHost, SurfaceSpec};
pub use local::{LocalSurfaceHost, PrimitiveFactory};
pub use runtime::{PlayStatus, PlaybackPrimitive, SurfaceRuntime};
pub use service::{AudioSurfaceService, SettingsSource};
