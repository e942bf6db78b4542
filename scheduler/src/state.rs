//! Internal engine state: the two countdown tracks.
//!
//! Owned exclusively by `SweepEngine` behind a single mutex; nothing else
//! reads or writes it.

/// One countdown: an absolute deadline plus the warning already fired.
///
/// `last_warned_secs` is per track. Automatic and manual countdowns keep
/// independent warning bookkeeping, so one crossing a threshold never
/// suppresses the other's warning for the same threshold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackState {
    /// Absolute execution time in ms; absent = nothing scheduled.
    pub deadline_ms: Option<u64>,

    /// The threshold (in seconds) whose warning already went out this
    /// countdown; reset whenever the track is re-armed or executes.
    pub last_warned_secs: Option<u64>,
}

impl TrackState {
    /// Set a fresh deadline, discarding warning state.
    pub fn arm(&mut self, deadline_ms: u64) {
        self.deadline_ms = Some(deadline_ms);
        self.last_warned_secs = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whole seconds until the deadline, if one is set. Floors toward
    /// zero; zero means "due on this tick or already past".
    pub fn remaining_secs(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms) / 1_000)
    }

    /// Deadline set and reached.
    pub fn is_due(&self, now_ms: u64) -> bool {
        matches!(self.deadline_ms, Some(d) if now_ms >= d)
    }

    /// Deadline set and still in the future.
    pub fn is_pending(&self, now_ms: u64) -> bool {
        matches!(self.deadline_ms, Some(d) if now_ms < d)
    }
}

/// Full scheduler state: both tracks plus the manual safety valve.
#[derive(Debug, Default)]
pub struct SweepState {
    pub auto: TrackState,
    pub manual: TrackState,

    /// Set when a manual run is requested, cleared when it executes.
    /// If it survives past `manual_expiry_ms` the run is considered stuck
    /// and a new request may reclaim the track.
    pub manual_in_flight: bool,
    pub manual_expiry_ms: u64,
}

impl SweepState {
    pub fn new() -> Self {
        Self::default()
    }
}
