//! Reel animation and spin lifecycle for a decorative digit slot widget.
//!
//! ```text
//! SpinController ──(target, delay)──▶ ReelUnit × N
//!       ▲                                  │
//!       └──────────(reel stopped)──────────┘
//! ```
//!
//! Everything runs on a caller-driven millisecond clock, so the same code
//! backs the interactive terminal widget and deterministic tests.

pub mod audio;
pub mod controller;
pub mod error;
pub mod reel;
pub mod rng;
pub mod scheduler;
pub mod timing;

pub const MIN_DIGITS: usize = 1;
pub const MAX_DIGITS: usize = 10;
pub const DEFAULT_DIGITS: usize = 4;

pub use crate::audio::{AudioCue, CueSink, NullSink, RecordingSink, SoundFx};
pub use crate::controller::{Settings, SpinController, SpinCycle, WidgetEvent};
pub use crate::error::{AudioError, SettingsError, SpinError, TimingError};
pub use crate::reel::{ReelPhase, ReelState, ReelStopped, ReelUnit};
pub use crate::rng::{derive_floats, derive_hash_hex, DigitSource, RandDigits, SeededDigits};
pub use crate::scheduler::{Scheduler, TaskId};
pub use crate::timing::{Millis, TimingConfig, TimingProfile};
