use std::io::Write;

use reelspin_core::{Millis, SpinController, SpinCycle};
use serde::Serialize;

#[derive(Serialize)]
struct SpinStarted<'a> {
    event: &'static str,
    spin: u32,
    #[serde(flatten)]
    cycle: &'a SpinCycle,
}

/// Runs `spins` back-to-back cycles on the virtual clock and writes every
/// event as one JSON line.
pub fn run(ctl: &mut SpinController, spins: u32, out: &mut impl Write) -> anyhow::Result<()> {
    let mut now: Millis = 0;
    for spin in 1..=spins {
        let cycle = ctl.request_spin(now)?;
        let completes_at = cycle.completes_at;
        let started = SpinStarted {
            event: "spin_started",
            spin,
            cycle,
        };
        writeln!(out, "{}", serde_json::to_string(&started)?)?;

        // Step from timer to timer so each event is stamped at its due time.
        while let Some(due) = ctl.next_due() {
            for ev in ctl.advance(due) {
                writeln!(out, "{}", serde_json::to_string(&ev)?)?;
            }
        }
        now = completes_at.max(ctl.now());
    }
    out.flush()?;
    Ok(())
}
