//! Background services for ambience-core
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   EngineCommand   ┌─────────────────┐   SurfaceMessage   ┌────────────────┐
//! │ Page host /  │ ────────────────► │ PlaybackService │ ─────────────────► │ Audio surface  │
//! │ settings UI  │                   │  (Coordinator)  │   (best effort)    │   (runtime)    │
//! └──────────────┘                   └─────────────────┘ ◄───────────────── └────────────────┘
//!        │                                    ▲              GET_SETTINGS
//!        │ write                              │ SettingsChanged
//!        ▼                                    │
//! ┌─────────────────────────────────────────────────┐
//! │                  ConfigStore                     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use ambience_core::config::{ConfigStore, MemoryStore};
//! use ambience_core::services::{EngineClient, PlaybackService};
//! use ambience_core::surface::{LocalSurfaceHost, PlaybackPrimitive, SettingsSource};
//! use ambience_core::PageId;
//!
//! # fn primitive() -> Box<dyn PlaybackPrimitive> { unimplemented!() }
//! let store: Arc<dyn ConfigStore> = Arc::new(MemoryStore::new());
//! let host = Arc::new(LocalSurfaceHost::new(Box::new(primitive), "/opt/ambience"));
//!
//! let handle = PlaybackService::spawn(store, host.clone(), host.clone()).unwrap();
//! let client = EngineClient::new(&handle);
//! host.connect_settings(Arc::new(client.clone()) as Arc<dyn SettingsSource>);
//!
//! client.page_qualified(PageId(1)).unwrap();
//! client.shutdown().unwrap();
//! ```

pub mod messages;
pub mod playback;

pub use messages::{EngineCommand, EngineStatus, ServiceHandle, SurfaceMessage};
pub use playback::{EngineClient, PlaybackService};
