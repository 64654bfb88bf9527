//! Spin timing configuration and the offsets derived from it.

use serde::{Deserialize, Serialize};

use crate::error::TimingError;

/// Milliseconds on the widget's monotonic clock.
pub type Millis = u64;

pub const BASE_SPIN_MS: Millis = 1000;
pub const STAGGER_MS: Millis = 150;
pub const COMPLETION_BUFFER_MS: Millis = 500;
pub const DECELERATE_MS: Millis = 300;

/// Named timing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimingProfile {
    #[default]
    Normal,
    Turbo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Time every reel spins before its stagger delay is added.
    pub base_spin_ms: Millis,
    /// Extra spin time per reel position.
    pub stagger_ms: Millis,
    /// Slack between the slowest reel's settle and cycle completion.
    pub completion_buffer_ms: Millis,
    /// Window before a reel's settle instant in which it reads as `Settling`.
    pub decelerate_ms: Millis,
}

impl TimingConfig {
    pub fn normal() -> Self {
        Self {
            base_spin_ms: BASE_SPIN_MS,
            stagger_ms: STAGGER_MS,
            completion_buffer_ms: COMPLETION_BUFFER_MS,
            decelerate_ms: DECELERATE_MS,
        }
    }

    pub fn turbo() -> Self {
        Self {
            base_spin_ms: 400,
            stagger_ms: 60,
            completion_buffer_ms: 200,
            decelerate_ms: 120,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
        }
    }

    /// Checks the invariants the cycle scheduling relies on.
    ///
    /// A zero stagger would let neighbouring reels settle at the same instant,
    /// and a deceleration window longer than the base spin would start a reel
    /// in `Settling`.
    pub fn validate(self) -> Result<Self, TimingError> {
        if self.stagger_ms == 0 {
            return Err(TimingError::ZeroStagger);
        }
        if self.decelerate_ms > self.base_spin_ms {
            return Err(TimingError::DecelerateTooLong {
                decelerate_ms: self.decelerate_ms,
                base_spin_ms: self.base_spin_ms,
            });
        }
        Ok(self)
    }

    /// Delay handed to the reel at `position`.
    pub fn stagger_delay(&self, position: usize) -> Millis {
        position as Millis * self.stagger_ms
    }

    /// Offset from spin start at which the reel at `position` settles.
    pub fn settle_offset(&self, position: usize) -> Millis {
        self.base_spin_ms + self.stagger_delay(position)
    }

    /// Offset from spin start at which a cycle over `reel_count` reels completes.
    ///
    /// The max delay is `reel_count * stagger`, one stagger step past the last
    /// reel's own delay, so completion always lands after the final settle.
    pub fn completion_offset(&self, reel_count: usize) -> Millis {
        self.base_spin_ms + self.stagger_delay(reel_count) + self.completion_buffer_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}
