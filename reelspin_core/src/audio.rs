//! Sound cue triggers.
//!
//! The controller owns a single [`SoundFx`] handle. Cues are fire-and-forget:
//! they do nothing while sound is disabled or the output has not been
//! initialised, and a sink failure never reaches the caller.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AudioError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    /// Spin requested.
    Click,
    /// One reel settled.
    ReelStop,
    /// Spin cycle complete.
    Win,
}

/// An audio output.
pub trait CueSink {
    /// Acquires the output. Called on the first user gesture and again on
    /// later gestures until it succeeds.
    fn init(&mut self) -> Result<(), AudioError>;

    fn play(&mut self, cue: AudioCue);
}

pub struct SoundFx {
    sink: Box<dyn CueSink>,
    enabled: bool,
    ready: bool,
}

impl SoundFx {
    pub fn new(sink: Box<dyn CueSink>, enabled: bool) -> Self {
        Self {
            sink,
            enabled,
            ready: false,
        }
    }

    /// Handle with no output at all.
    pub fn silent() -> Self {
        Self::new(Box::new(NullSink), false)
    }

    /// Lazily initialises the output. Safe to call on every user gesture.
    pub fn init(&mut self) {
        if self.ready {
            return;
        }
        match self.sink.init() {
            Ok(()) => {
                debug!("audio output ready");
                self.ready = true;
            }
            Err(e) => warn!(error = %e, "audio disabled"),
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Plays `cue` if sound is on and the output is ready. Returns whether it
    /// reached the sink.
    pub fn play(&mut self, cue: AudioCue) -> bool {
        if !self.enabled || !self.ready {
            return false;
        }
        self.sink.play(cue);
        true
    }
}

impl std::fmt::Debug for SoundFx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundFx")
            .field("enabled", &self.enabled)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CueSink for NullSink {
    fn init(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, _cue: AudioCue) {}
}

/// Keeps every cue it receives. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<AudioCue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<AudioCue> {
        self.log.borrow().clone()
    }

    pub fn count(&self, cue: AudioCue) -> usize {
        self.log.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl CueSink for RecordingSink {
    fn init(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, cue: AudioCue) {
        self.log.borrow_mut().push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable {
        attempts: Rc<RefCell<u32>>,
    }

    impl CueSink for Unavailable {
        fn init(&mut self) -> Result<(), AudioError> {
            *self.attempts.borrow_mut() += 1;
            Err(AudioError::Unavailable("no device".into()))
        }

        fn play(&mut self, _cue: AudioCue) {
            panic!("play on an uninitialised sink");
        }
    }

    #[test]
    fn test_uninitialised_is_silent() {
        let rec = RecordingSink::new();
        let mut fx = SoundFx::new(Box::new(rec.clone()), true);
        assert!(!fx.play(AudioCue::Click));
        fx.init();
        assert!(fx.play(AudioCue::Click));
        assert_eq!(rec.cues(), vec![AudioCue::Click]);
    }

    #[test]
    fn test_disabled_is_silent() {
        let rec = RecordingSink::new();
        let mut fx = SoundFx::new(Box::new(rec.clone()), true);
        fx.init();
        assert!(!fx.toggle());
        assert!(!fx.play(AudioCue::Win));
        assert!(fx.toggle());
        assert!(fx.play(AudioCue::Win));
        assert_eq!(rec.count(AudioCue::Win), 1);
    }

    #[test]
    fn test_failed_init_degrades_and_retries() {
        let attempts = Rc::new(RefCell::new(0));
        let mut fx = SoundFx::new(
            Box::new(Unavailable {
                attempts: attempts.clone(),
            }),
            true,
        );
        fx.init();
        fx.init();
        assert!(!fx.is_ready());
        assert!(!fx.play(AudioCue::ReelStop));
        assert_eq!(*attempts.borrow(), 2);
    }
}
