use thiserror::Error;

/// A rejected configuration mutation. Surfaced straight back to the
/// caller (command feedback), never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sweep interval must be between {min} and {max} seconds, got {got}")]
    IntervalOutOfRange { got: u64, min: u64, max: u64 },

    #[error("warning threshold must be greater than zero")]
    ZeroThreshold,

    #[error("warning threshold {0} is already configured")]
    DuplicateThreshold(u64),

    #[error("no such warning threshold: {0}")]
    UnknownThreshold(u64),

    #[error("at least one warning threshold must remain")]
    LastThreshold,

    #[error("entity filter entry must not be blank")]
    BlankFilterEntry,

    #[error("entity filter already contains \"{0}\"")]
    DuplicateFilterEntry(String),

    #[error("no such entity filter entry: \"{0}\"")]
    UnknownFilterEntry(String),

    #[error("at least one entity filter entry must remain")]
    LastFilterEntry,

    #[error("manual sweep delay must be greater than zero")]
    ZeroManualDelay,

    #[error("manual sweep expiry must be greater than zero")]
    ZeroManualExpiry,

    #[error("notification duration must be greater than zero")]
    ZeroNotificationDuration,

    #[error("long countdown threshold must exceed the short one")]
    FormatThresholdOrder,
}

/// A rejected manual-sweep request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualRunError {
    #[error("a manual sweep is already scheduled")]
    AlreadyScheduled,
}
