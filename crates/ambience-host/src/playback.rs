//! File-checking playback primitive
//!
//! Decoding is out of scope for the host; this primitive validates that the
//! resolved resource exists and logs what a real player would do with it.

use ambience_core::surface::{PlaybackError, PlaybackPrimitive, PlaybackResult};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct FilePlayback {
    source: Option<PathBuf>,
    playing: bool,
    level: f32,
}

impl FilePlayback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackPrimitive for FilePlayback {
    fn load(&mut self, source: &str) -> PlaybackResult<()> {
        let path = PathBuf::from(source.strip_prefix("file://").unwrap_or(source));
        if !path.is_file() {
            self.source = None;
            self.playing = false;
            return Err(PlaybackError::Load {
                source_path: source.to_string(),
                reason: "resource not found".to_string(),
            });
        }
        log::info!("[player] loaded {}", path.display());
        self.source = Some(path);
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> PlaybackResult<()> {
        let Some(source) = &self.source else {
            return Err(PlaybackError::Play("nothing loaded".to_string()));
        };
        if !self.playing {
            log::info!("[player] playing {} at {:.2}", source.display(), self.level);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            log::info!("[player] paused");
        }
        self.playing = false;
    }

    fn seek(&mut self, position_secs: f64) {
        log::info!("[player] seek to {:.1}s", position_secs);
    }

    fn set_level(&mut self, level: f32) {
        if (self.level - level).abs() > f32::EPSILON {
            log::info!("[player] level {:.2}", level);
        }
        self.level = level;
    }
}
