//! AudioSurfaceService - the surface's message loop
//!
//! Runs a [`SurfaceRuntime`] on its own thread. Messages arrive as JSON
//! envelopes, the same form they would take crossing a process boundary.
//! On startup the service asks the engine for the current directive
//! (GET_SETTINGS) and applies it only if it says play and no newer
//! directive queued up in the meantime.

use super::runtime::{PlaybackPrimitive, SurfaceRuntime};
use crate::services::{ServiceHandle, SurfaceMessage};
use crate::types::Directive;
use crossbeam::channel::Receiver;
use std::sync::Arc;
use std::thread;

/// Answers GET_SETTINGS for a starting surface
pub trait SettingsSource: Send + Sync {
    fn request_settings(&self) -> Result<Directive, String>;
}

pub struct AudioSurfaceService<P: PlaybackPrimitive> {
    runtime: SurfaceRuntime<P>,
    inbox: Receiver<String>,
    settings: Option<Arc<dyn SettingsSource>>,
}

impl<P: PlaybackPrimitive + 'static> AudioSurfaceService<P> {
    /// Spawn the surface in a background thread
    pub fn spawn(
        runtime: SurfaceRuntime<P>,
        settings: Option<Arc<dyn SettingsSource>>,
    ) -> Result<ServiceHandle<String>, String> {
        let (command_tx, inbox) = crossbeam::channel::unbounded();

        let service = AudioSurfaceService {
            runtime,
            inbox,
            settings,
        };

        let handle = thread::Builder::new()
            .name("audio-surface".into())
            .spawn(move || {
                service.run();
            })
            .map_err(|e| format!("Failed to spawn audio surface thread: {}", e))?;

        Ok(ServiceHandle {
            command_tx,
            thread_handle: Some(handle),
        })
    }

    /// Main service loop
    fn run(mut self) {
        log::info!("AudioSurfaceService started");

        if self.start() {
            while let Ok(envelope) = self.inbox.recv() {
                let Some(msg) = decode(&envelope) else { continue };
                if !self.handle(msg) {
                    break;
                }
            }
        }

        self.runtime.primitive_mut().pause();
        log::info!("AudioSurfaceService stopped");
    }

    /// Ask for the current directive, then settle the backlog that queued
    /// up while waiting
    ///
    /// The newest queued directive is never older than the reply, so when
    /// one is queued it wins and every earlier one is skipped. The reply is
    /// applied only when nothing is queued and it says play. Returns false
    /// if the backlog held a shutdown.
    fn start(&mut self) -> bool {
        let Some(source) = self.settings.take() else {
            return true;
        };
        let reply = source
            .request_settings()
            .map_err(|e| log::warn!("GET_SETTINGS failed: {}", e))
            .ok();

        let backlog: Vec<SurfaceMessage> =
            self.inbox.try_iter().filter_map(|e| decode(&e)).collect();
        let newest = backlog
            .iter()
            .rposition(|m| matches!(m, SurfaceMessage::SyncDirective { .. }));

        match reply {
            Some(directive) if newest.is_none() && directive.should_play => {
                self.runtime.apply_directive(&directive)
            }
            Some(_) if newest.is_some() => {
                log::debug!("Queued directive supersedes initial settings")
            }
            Some(_) => log::debug!("Initial settings say pause, waiting for a directive"),
            None => {}
        }

        for (i, msg) in backlog.into_iter().enumerate() {
            if matches!(msg, SurfaceMessage::SyncDirective { .. }) && Some(i) != newest {
                continue;
            }
            if !self.handle(msg) {
                return false;
            }
        }
        true
    }

    /// Apply one message; false once the surface should stop
    fn handle(&mut self, msg: SurfaceMessage) -> bool {
        match msg {
            SurfaceMessage::SyncDirective { settings } => self.runtime.apply_directive(&settings),
            SurfaceMessage::Restart => self.runtime.restart(),
            SurfaceMessage::Shutdown => {
                log::info!("AudioSurfaceService shutting down");
                return false;
            }
        }
        true
    }
}

fn decode(envelope: &str) -> Option<SurfaceMessage> {
    SurfaceMessage::from_json(envelope)
        .map_err(|e| log::warn!("Ignoring malformed surface message: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TrackRef, Volume};
    use crossbeam::channel::Sender;
    use std::sync::Mutex;

    struct FixedSource(Directive);

    impl SettingsSource for FixedSource {
        fn request_settings(&self) -> Result<Directive, String> {
            Ok(self.0.clone())
        }
    }

    /// Primitive that shares its call log with the test thread
    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<String>>>);

    impl PlaybackPrimitive for SharedLog {
        fn load(&mut self, source: &str) -> crate::surface::PlaybackResult<()> {
            self.0.lock().unwrap().push(format!("load {}", source));
            Ok(())
        }
        fn play(&mut self) -> crate::surface::PlaybackResult<()> {
            self.0.lock().unwrap().push("play".into());
            Ok(())
        }
        fn pause(&mut self) {
            self.0.lock().unwrap().push("pause".into());
        }
        fn seek(&mut self, position_secs: f64) {
            self.0.lock().unwrap().push(format!("seek {}", position_secs));
        }
        fn set_level(&mut self, level: f32) {
            self.0.lock().unwrap().push(format!("level {}", level));
        }
    }

    fn directive(should_play: bool, volume: u8) -> Directive {
        Directive {
            should_play,
            track: TrackRef::new("assets/a.webm"),
            volume: Volume::new(volume),
        }
    }

    #[test]
    fn test_startup_applies_playing_settings() {
        let log = SharedLog::default();
        let source: Arc<dyn SettingsSource> = Arc::new(FixedSource(directive(true, 50)));
        let handle =
            AudioSurfaceService::spawn(SurfaceRuntime::new(log.clone(), ""), Some(source)).unwrap();

        handle
            .send(SurfaceMessage::Shutdown.to_json().unwrap())
            .unwrap();
        handle.join();

        let calls = log.0.lock().unwrap().clone();
        assert_eq!(calls, vec!["load assets/a.webm", "level 0.5", "play", "pause"]);
    }

    #[test]
    fn test_startup_ignores_paused_settings() {
        let log = SharedLog::default();
        let source: Arc<dyn SettingsSource> = Arc::new(FixedSource(directive(false, 50)));
        let handle =
            AudioSurfaceService::spawn(SurfaceRuntime::new(log.clone(), ""), Some(source)).unwrap();

        handle
            .send(SurfaceMessage::Shutdown.to_json().unwrap())
            .unwrap();
        handle.join();

        assert_eq!(log.0.lock().unwrap().clone(), vec!["pause"]);
    }

    #[test]
    fn test_messages_applied_in_order() {
        let log = SharedLog::default();
        let handle = AudioSurfaceService::spawn(SurfaceRuntime::new(log.clone(), ""), None).unwrap();

        let envelopes = [
            SurfaceMessage::SyncDirective {
                settings: directive(true, 40),
            }
            .to_json()
            .unwrap(),
            "not json".to_string(),
            SurfaceMessage::Restart.to_json().unwrap(),
            SurfaceMessage::Shutdown.to_json().unwrap(),
        ];
        for envelope in envelopes {
            handle.send(envelope).unwrap();
        }
        handle.join();

        let calls = log.0.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec!["load assets/a.webm", "level 0.4", "play", "seek 0", "play", "pause"]
        );
    }

    /// Source that answers only once the test opens the gate
    struct GatedSource {
        gate: Receiver<()>,
        reply: Directive,
    }

    impl SettingsSource for GatedSource {
        fn request_settings(&self) -> Result<Directive, String> {
            self.gate.recv().map_err(|e| e.to_string())?;
            Ok(self.reply.clone())
        }
    }

    fn spawn_gated(log: &SharedLog, reply: Directive) -> (ServiceHandle<String>, Sender<()>) {
        let (open, gate) = crossbeam::channel::bounded(1);
        let source: Arc<dyn SettingsSource> = Arc::new(GatedSource { gate, reply });
        let handle =
            AudioSurfaceService::spawn(SurfaceRuntime::new(log.clone(), ""), Some(source)).unwrap();
        (handle, open)
    }

    fn sync(should_play: bool, volume: u8) -> String {
        SurfaceMessage::SyncDirective {
            settings: directive(should_play, volume),
        }
        .to_json()
        .unwrap()
    }

    #[test]
    fn test_superseded_backlog_never_plays() {
        // Playback enabled then quickly disabled while the surface starts
        let log = SharedLog::default();
        let (handle, open) = spawn_gated(&log, directive(false, 50));
        handle.send(sync(true, 50)).unwrap();
        handle.send(sync(false, 50)).unwrap();
        open.send(()).unwrap();

        handle
            .send(SurfaceMessage::Shutdown.to_json().unwrap())
            .unwrap();
        handle.join();

        let calls = log.0.lock().unwrap().clone();
        assert!(!calls.contains(&"play".to_string()), "{:?}", calls);
        assert_eq!(calls.last().map(String::as_str), Some("pause"));
    }

    #[test]
    fn test_newest_backlog_directive_wins_over_reply() {
        let log = SharedLog::default();
        let (handle, open) = spawn_gated(&log, directive(true, 50));
        handle.send(sync(true, 30)).unwrap();
        handle.send(sync(true, 70)).unwrap();
        open.send(()).unwrap();

        handle
            .send(SurfaceMessage::Shutdown.to_json().unwrap())
            .unwrap();
        handle.join();

        let calls = log.0.lock().unwrap().clone();
        assert_eq!(calls, vec!["load assets/a.webm", "level 0.7", "play", "pause"]);
    }

    #[test]
    fn test_close_during_startup_never_plays() {
        // Engine order when playback stops: pause, then close
        let log = SharedLog::default();
        let (handle, open) = spawn_gated(&log, directive(true, 50));
        handle.send(sync(true, 50)).unwrap();
        handle.send(sync(false, 50)).unwrap();
        handle
            .send(SurfaceMessage::Shutdown.to_json().unwrap())
            .unwrap();
        open.send(()).unwrap();
        handle.join();

        let calls = log.0.lock().unwrap().clone();
        assert_eq!(calls, vec!["load assets/a.webm", "level 0.5", "pause", "pause"]);
    }
}
