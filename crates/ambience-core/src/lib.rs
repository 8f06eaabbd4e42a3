//! Ambience Core - playback coordination for page-driven ambient audio
//!
//! Keeps an ambient track playing while at least one qualifying page is
//! open, and keeps enabled/volume/track in sync between the settings store,
//! the tracked pages and an isolated audio surface.

pub mod config;
pub mod engine;
pub mod pages;
pub mod services;
pub mod surface;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use types::*;
