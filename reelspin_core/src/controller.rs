use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    audio::{AudioCue, SoundFx},
    error::{SettingsError, SpinError, TimingError},
    reel::{ReelState, ReelStopped, ReelUnit},
    rng::DigitSource,
    scheduler::{Scheduler, TaskId},
    timing::{Millis, TimingConfig},
    DEFAULT_DIGITS, MAX_DIGITS, MIN_DIGITS,
};

/// Work the controller's scheduler can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Timer {
    ReelSettle(usize),
    CycleComplete,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub digit_count: usize,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            digit_count: DEFAULT_DIGITS,
            sound_enabled: true,
        }
    }
}

/// One spin, from request until the completion timer fires.
#[derive(Debug, Clone, Serialize)]
pub struct SpinCycle {
    pub target_values: Vec<u8>,
    pub started_at: Millis,
    pub expected_settle_at: Vec<Millis>,
    pub completes_at: Millis,
    #[serde(skip)]
    completion: TaskId,
}

impl SpinCycle {
    pub fn reel_count(&self) -> usize {
        self.target_values.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WidgetEvent {
    ReelStopped { position: usize, value: u8, at: Millis },
    CycleComplete { at: Millis, values: Vec<u8> },
}

impl From<ReelStopped> for WidgetEvent {
    fn from(ev: ReelStopped) -> Self {
        WidgetEvent::ReelStopped {
            position: ev.position,
            value: ev.value,
            at: ev.at,
        }
    }
}

/// Owns the reels, the spin-active flag and every pending timer.
///
/// Time is supplied by the caller: `request_spin(now)` starts a cycle and
/// `advance(now)` runs whatever has come due since the last call. The
/// completion timer alone ends a cycle; reel settles only drive their own
/// state and the per-reel cue.
#[derive(Debug)]
pub struct SpinController {
    timing: TimingConfig,
    reels: Vec<ReelUnit>,
    cycle: Option<SpinCycle>,
    timers: Scheduler<Timer>,
    digits: Box<dyn DigitSource>,
    sound: SoundFx,
    now: Millis,
    torn_down: bool,
}

impl SpinController {
    /// Builds the widget with `settings.digit_count` idle reels at 0. The
    /// digit count is clamped into range.
    pub fn new(
        settings: Settings,
        timing: TimingConfig,
        digits: Box<dyn DigitSource>,
        mut sound: SoundFx,
    ) -> Result<Self, TimingError> {
        let timing = timing.validate()?;
        let count = settings.digit_count.clamp(MIN_DIGITS, MAX_DIGITS);
        sound.set_enabled(settings.sound_enabled);
        Ok(Self {
            timing,
            reels: (0..count).map(ReelUnit::new).collect(),
            cycle: None,
            timers: Scheduler::new(),
            digits,
            sound,
            now: 0,
            torn_down: false,
        })
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn settings(&self) -> Settings {
        Settings {
            digit_count: self.reels.len(),
            sound_enabled: self.sound.is_enabled(),
        }
    }

    pub fn reels(&self) -> &[ReelUnit] {
        &self.reels
    }

    pub fn reel_states(&self) -> Vec<ReelState> {
        self.reels.iter().map(ReelUnit::state).collect()
    }

    pub fn values(&self) -> Vec<u8> {
        self.reels.iter().map(ReelUnit::value).collect()
    }

    pub fn is_spinning(&self) -> bool {
        self.cycle.is_some()
    }

    pub fn cycle(&self) -> Option<&SpinCycle> {
        self.cycle.as_ref()
    }

    pub fn sound(&self) -> &SoundFx {
        &self.sound
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Latest instant seen by `request_spin` or `advance`.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// When the next pending timer is due.
    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Starts a spin cycle at `now`.
    ///
    /// Rejected without touching any state while a cycle is active.
    pub fn request_spin(&mut self, now: Millis) -> Result<&SpinCycle, SpinError> {
        if self.torn_down {
            return Err(SpinError::TornDown);
        }
        if self.cycle.is_some() {
            debug!("spin ignored: cycle active");
            return Err(SpinError::AlreadySpinning);
        }
        // A stale timestamp must not start the cycle in the past.
        self.now = self.now.max(now);
        let now = self.now;

        // First user gesture unlocks the audio output.
        self.sound.init();
        self.sound.play(AudioCue::Click);

        let reel_count = self.reels.len();
        self.digits.begin_spin(reel_count);
        let target_values: Vec<u8> = (0..reel_count)
            .map(|_| self.digits.next_digit() % 10)
            .collect();

        let mut expected_settle_at = Vec::with_capacity(reel_count);
        for (reel, &target) in self.reels.iter_mut().zip(&target_values) {
            let spin_ms = self.timing.settle_offset(reel.position());
            expected_settle_at.push(reel.start(target, spin_ms, now, &mut self.timers));
        }

        let completes_at = now + self.timing.completion_offset(reel_count);
        let completion = self.timers.schedule(completes_at, Timer::CycleComplete);
        info!(?target_values, started_at = now, completes_at, "spin started");

        Ok(&*self.cycle.insert(SpinCycle {
            target_values,
            started_at: now,
            expected_settle_at,
            completes_at,
            completion,
        }))
    }

    /// Runs every timer due at or before `now`, in due order, and refreshes
    /// reel phases. Returns the events produced.
    pub fn advance(&mut self, now: Millis) -> Vec<WidgetEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }
        self.now = self.now.max(now);

        while let Some((_, due, timer)) = self.timers.pop_due(self.now) {
            match timer {
                Timer::ReelSettle(position) => {
                    let Some(reel) = self.reels.get_mut(position) else {
                        continue;
                    };
                    if let Some(stopped) = reel.settle(due) {
                        self.sound.play(AudioCue::ReelStop);
                        reel.acknowledge();
                        events.push(stopped.into());
                    }
                }
                Timer::CycleComplete => {
                    if let Some(ev) = self.complete_cycle(due) {
                        events.push(ev);
                    }
                }
            }
        }

        let decelerate = self.timing.decelerate_ms;
        for reel in &mut self.reels {
            reel.tick(self.now, decelerate);
        }
        events
    }

    fn complete_cycle(&mut self, at: Millis) -> Option<WidgetEvent> {
        let cycle = self.cycle.take()?;
        if let Some(reel) = self.reels.iter().find(|r| r.phase().is_moving()) {
            // Unreachable with validated timing: completion trails the last settle.
            warn!(position = reel.position(), "cycle completed before reel settled");
        }
        self.sound.play(AudioCue::Win);
        let values = self.values();
        info!(?values, at, started_at = cycle.started_at, "spin complete");
        Some(WidgetEvent::CycleComplete { at, values })
    }

    /// Resizes the reel row to `n` reels.
    ///
    /// Growth appends idle reels at 0, shrinking drops reels from the end.
    pub fn set_digit_count(&mut self, n: usize) -> Result<(), SettingsError> {
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&n) {
            return Err(SettingsError::DigitCountOutOfRange(n));
        }
        if self.cycle.is_some() {
            return Err(SettingsError::SpinActive);
        }
        let current = self.reels.len();
        if n > current {
            self.reels.extend((current..n).map(ReelUnit::new));
        } else {
            self.reels.truncate(n);
        }
        debug!(from = current, to = n, "digit count changed");
        Ok(())
    }

    /// Flips sound on/off and returns the new state.
    pub fn toggle_sound(&mut self) -> bool {
        let on = self.sound.toggle();
        debug!(sound = on, "sound toggled");
        on
    }

    /// Cancels every pending timer. Nothing fires after this returns.
    ///
    /// Returns the number of timers cancelled.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        let mut total = 0;
        for reel in &mut self.reels {
            total += usize::from(reel.cancel(&mut self.timers));
        }
        if let Some(cycle) = self.cycle.take() {
            total += usize::from(self.timers.cancel(cycle.completion).is_some());
        }
        total += self.timers.cancel_all();
        self.torn_down = true;
        info!(cancelled = total, "widget torn down");
        total
    }
}
