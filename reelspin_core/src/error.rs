use crate::timing::Millis;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingError {
    #[error("stagger must be at least 1ms")]
    ZeroStagger,
    #[error("deceleration window ({decelerate_ms}ms) exceeds base spin ({base_spin_ms}ms)")]
    DecelerateTooLong {
        decelerate_ms: Millis,
        base_spin_ms: Millis,
    },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    #[error("a spin is already in progress")]
    AlreadySpinning,
    #[error("widget has been torn down")]
    TornDown,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    #[error("digit count {0} outside {min}..={max}", min = crate::MIN_DIGITS, max = crate::MAX_DIGITS)]
    DigitCountOutOfRange(usize),
    #[error("cannot resize reels while a spin is in progress")]
    SpinActive,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}
