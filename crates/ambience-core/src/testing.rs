//! Recording fakes shared by unit tests

use crate::services::SurfaceMessage;
use crate::surface::{
    DeliveryError, HostError, HostResult, PlaybackError, PlaybackPrimitive, PlaybackResult,
    SurfaceChannel, SurfaceHost, SurfaceSpec,
};
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    present: bool,
    disconnected: bool,
    creates: usize,
    closes: usize,
    fail_creates: usize,
    race_create: bool,
    race_close: bool,
    delivered: Vec<SurfaceMessage>,
}

/// Host and channel in one: messages are delivered only while present
#[derive(Default)]
pub struct FakeSurface {
    state: Mutex<FakeState>,
}

impl FakeSurface {
    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn is_present(&self) -> bool {
        self.with(|s| s.present)
    }

    /// Successful creations
    pub fn creates(&self) -> usize {
        self.with(|s| s.creates)
    }

    /// Successful closes
    pub fn closes(&self) -> usize {
        self.with(|s| s.closes)
    }

    pub fn delivered(&self) -> Vec<SurfaceMessage> {
        self.with(|s| s.delivered.clone())
    }

    /// Fail the next `n` creations with a non-benign error
    pub fn fail_next_creates(&self, n: usize) {
        self.with(|s| s.fail_creates = n);
    }

    /// Another actor creates the surface between query and create
    pub fn race_next_create(&self) {
        self.with(|s| s.race_create = true);
    }

    /// Another actor closes the surface between query and close
    pub fn race_next_close(&self) {
        self.with(|s| s.race_close = true);
    }

    /// Keep the surface but break its channel
    pub fn disconnect(&self) {
        self.with(|s| s.disconnected = true);
    }
}

impl SurfaceHost for FakeSurface {
    fn has_surface(&self) -> HostResult<bool> {
        Ok(self.is_present())
    }

    fn create_surface(&self, _spec: &SurfaceSpec) -> HostResult<()> {
        self.with(|s| {
            if s.fail_creates > 0 {
                s.fail_creates -= 1;
                return Err(HostError::Other("creation refused".into()));
            }
            if s.race_create {
                s.race_create = false;
                s.present = true;
                return Err(HostError::AlreadyExists);
            }
            if s.present {
                return Err(HostError::AlreadyExists);
            }
            s.present = true;
            s.disconnected = false;
            s.creates += 1;
            Ok(())
        })
    }

    fn close_surface(&self) -> HostResult<()> {
        self.with(|s| {
            if s.race_close {
                s.race_close = false;
                s.present = false;
                return Err(HostError::NotFound);
            }
            if !s.present {
                return Err(HostError::NotFound);
            }
            s.present = false;
            s.closes += 1;
            Ok(())
        })
    }
}

impl SurfaceChannel for FakeSurface {
    fn send(&self, message: SurfaceMessage) -> Result<(), DeliveryError> {
        self.with(|s| {
            if !s.present {
                return Err(DeliveryError::NoReceiver);
            }
            if s.disconnected {
                return Err(DeliveryError::Disconnected("fake channel closed".into()));
            }
            s.delivered.push(message);
            Ok(())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveCall {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetLevel(f32),
}

/// Playback primitive that records every call
#[derive(Default)]
pub struct RecordingPrimitive {
    calls: Vec<PrimitiveCall>,
    fail_play: bool,
}

impl RecordingPrimitive {
    /// Primitive whose `play` always fails, like an autoplay restriction
    pub fn failing_play() -> Self {
        Self {
            calls: Vec::new(),
            fail_play: true,
        }
    }

    pub fn calls(&self) -> Vec<PrimitiveCall> {
        self.calls.clone()
    }
}

impl PlaybackPrimitive for RecordingPrimitive {
    fn load(&mut self, source: &str) -> PlaybackResult<()> {
        self.calls.push(PrimitiveCall::Load(source.to_string()));
        Ok(())
    }

    fn play(&mut self) -> PlaybackResult<()> {
        self.calls.push(PrimitiveCall::Play);
        if self.fail_play {
            return Err(PlaybackError::Play("autoplay blocked".into()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(PrimitiveCall::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        self.calls.push(PrimitiveCall::Seek(position_secs));
    }

    fn set_level(&mut self, level: f32) {
        self.calls.push(PrimitiveCall::SetLevel(level));
    }
}
