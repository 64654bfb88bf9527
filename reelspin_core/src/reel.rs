use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::Timer;
use crate::scheduler::{Scheduler, TaskId};
use crate::timing::Millis;

/// Digit strip advance interval at full speed.
pub const SPIN_FRAME_MS: Millis = 20;
/// Digit strip advance interval while decelerating.
pub const SETTLE_FRAME_MS: Millis = 75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReelPhase {
    #[default]
    Idle,
    Spinning,
    Settling,
    Settled,
}

impl ReelPhase {
    pub fn is_moving(self) -> bool {
        matches!(self, ReelPhase::Spinning | ReelPhase::Settling)
    }
}

/// What the presentation layer renders for one position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReelState {
    pub position: usize,
    pub value: u8,
    pub phase: ReelPhase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReelStopped {
    pub position: usize,
    pub value: u8,
    pub at: Millis,
}

#[derive(Debug, Clone, Copy)]
struct ReelRun {
    target: u8,
    started_at: Millis,
    settle_at: Millis,
    task: TaskId,
}

/// One digit position. Holds at most one pending settle task.
#[derive(Debug, Clone)]
pub struct ReelUnit {
    position: usize,
    value: u8,
    phase: ReelPhase,
    run: Option<ReelRun>,
}

impl ReelUnit {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            value: 0,
            phase: ReelPhase::Idle,
            run: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn state(&self) -> ReelState {
        ReelState {
            position: self.position,
            value: self.value,
            phase: self.phase,
        }
    }

    /// Instant the pending settle is due, if the reel is moving.
    pub fn settle_at(&self) -> Option<Millis> {
        self.run.map(|r| r.settle_at)
    }

    /// Starts spinning toward `target`, settling `spin_ms` after `now`.
    ///
    /// Any settle still pending from an earlier command is cancelled first.
    pub(crate) fn start(
        &mut self,
        target: u8,
        spin_ms: Millis,
        now: Millis,
        timers: &mut Scheduler<Timer>,
    ) -> Millis {
        if self.cancel(timers) {
            debug!(position = self.position, "replaced pending settle");
        }
        let settle_at = now + spin_ms;
        let task = timers.schedule(settle_at, Timer::ReelSettle(self.position));
        self.run = Some(ReelRun {
            target: target % 10,
            started_at: now,
            settle_at,
            task,
        });
        self.phase = ReelPhase::Spinning;
        debug!(position = self.position, target, settle_at, "reel spinning");
        settle_at
    }

    /// Enters `Settling` once `now` is inside the deceleration window.
    pub(crate) fn tick(&mut self, now: Millis, decelerate_ms: Millis) {
        if let (ReelPhase::Spinning, Some(run)) = (self.phase, self.run) {
            if now + decelerate_ms >= run.settle_at {
                self.phase = ReelPhase::Settling;
            }
        }
    }

    /// Fixes the target value. Called when the settle task fires.
    pub(crate) fn settle(&mut self, now: Millis) -> Option<ReelStopped> {
        let run = self.run.take()?;
        self.value = run.target;
        self.phase = ReelPhase::Settled;
        debug!(position = self.position, value = self.value, at = now, "reel settled");
        Some(ReelStopped {
            position: self.position,
            value: self.value,
            at: now,
        })
    }

    /// Returns a settled reel to `Idle`, keeping its value.
    pub(crate) fn acknowledge(&mut self) {
        if self.phase == ReelPhase::Settled {
            self.phase = ReelPhase::Idle;
        }
    }

    /// Drops the pending settle task. The reel keeps its previous value.
    pub(crate) fn cancel(&mut self, timers: &mut Scheduler<Timer>) -> bool {
        match self.run.take() {
            Some(run) => {
                timers.cancel(run.task);
                self.phase = ReelPhase::Idle;
                true
            }
            None => false,
        }
    }

    /// Digit shown at `now`.
    ///
    /// Spinning cycles the strip at full speed; settling slows down and lands
    /// exactly on the target at the settle instant.
    pub fn display_digit(&self, now: Millis) -> u8 {
        let Some(run) = self.run else {
            return self.value;
        };
        match self.phase {
            ReelPhase::Spinning => {
                let frames = now.saturating_sub(run.started_at) / SPIN_FRAME_MS;
                ((self.value as Millis + frames) % 10) as u8
            }
            ReelPhase::Settling => {
                let frames_left = run.settle_at.saturating_sub(now).div_ceil(SETTLE_FRAME_MS);
                ((run.target as Millis + 10 - frames_left % 10) % 10) as u8
            }
            ReelPhase::Idle | ReelPhase::Settled => self.value,
        }
    }
}
