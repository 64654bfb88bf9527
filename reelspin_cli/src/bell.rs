use std::io::{self, IsTerminal, Write};

use reelspin_core::{AudioCue, AudioError, CueSink};

/// Rings the terminal bell for each cue.
#[derive(Debug, Default)]
pub struct BellSink;

impl CueSink for BellSink {
    fn init(&mut self) -> Result<(), AudioError> {
        if io::stdout().is_terminal() {
            Ok(())
        } else {
            Err(AudioError::Unavailable("stdout is not a terminal".into()))
        }
    }

    fn play(&mut self, cue: AudioCue) {
        // A reel stop is a single ring, a win rings twice.
        let rings: &[u8] = match cue {
            AudioCue::Click | AudioCue::ReelStop => b"\x07",
            AudioCue::Win => b"\x07\x07",
        };
        let mut out = io::stdout();
        let _ = out.write_all(rings).and_then(|()| out.flush());
    }
}
