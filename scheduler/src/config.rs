//! Validated operating parameters for the sweep engine.
//!
//! Mutations go through explicit setters that enforce range and floor
//! invariants and return a typed error on violation. The engine wraps the
//! setters so every accepted change is persisted and re-arms the
//! automatic countdown.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use prefs::model::Channel;

/// Bounds on the automatic sweep interval.
pub const MIN_INTERVAL_SECS: u64 = 300;
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Parameters for rendering human-readable remaining-time strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// How long the host should keep a notification on screen.
    pub notification_duration_secs: u64,

    /// When true, warnings show the actual remaining seconds; when false,
    /// the crossed threshold value.
    pub dynamic_countdown: bool,

    /// At or above this many remaining seconds, render whole minutes.
    pub long_threshold_secs: u64,

    /// Above this (and below long), render seconds rounded to fives;
    /// at or below, exact seconds.
    pub short_threshold_secs: u64,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            notification_duration_secs: 5,
            dynamic_countdown: true,
            long_threshold_secs: 120,
            short_threshold_secs: 15,
        }
    }
}

/// Central sweep configuration.
///
/// Fields are private so the floor invariants (non-empty thresholds,
/// non-empty entity filter) cannot be bypassed; deserialized values go
/// through `validate()` before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    auto_enabled: bool,
    interval_secs: u64,
    thresholds: BTreeSet<u64>,
    entity_filter: BTreeSet<String>,
    manual_delay_secs: u64,
    manual_expiry_secs: u64,
    default_channel: Channel,
    format: FormatConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            auto_enabled: true,
            interval_secs: 1_800,
            thresholds: BTreeSet::from([60, 30, 10, 5]),
            entity_filter: BTreeSet::from(["item".to_string()]),
            manual_delay_secs: 60,
            manual_expiry_secs: 5,
            default_channel: Channel::Detailed,
            format: FormatConfig::default(),
        }
    }
}

impl SweepConfig {
    pub fn auto_enabled(&self) -> bool {
        self.auto_enabled
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn manual_delay_secs(&self) -> u64 {
        self.manual_delay_secs
    }

    pub fn manual_expiry_secs(&self) -> u64 {
        self.manual_expiry_secs
    }

    pub fn default_channel(&self) -> Channel {
        self.default_channel
    }

    pub fn format(&self) -> &FormatConfig {
        &self.format
    }

    pub fn entity_filter(&self) -> &BTreeSet<String> {
        &self.entity_filter
    }

    /// Warning thresholds, largest first. The warning check walks this
    /// order; recomputed on demand so it can never go stale.
    pub fn thresholds_desc(&self) -> Vec<u64> {
        self.thresholds.iter().rev().copied().collect()
    }

    /// Human-readable combination of the filter entries.
    pub fn filter_description(&self) -> String {
        self.entity_filter
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn set_auto_enabled(&mut self, enabled: bool) {
        self.auto_enabled = enabled;
    }

    pub fn set_interval_secs(&mut self, secs: u64) -> Result<(), ConfigError> {
        if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
            return Err(ConfigError::IntervalOutOfRange {
                got: secs,
                min: MIN_INTERVAL_SECS,
                max: MAX_INTERVAL_SECS,
            });
        }
        self.interval_secs = secs;
        Ok(())
    }

    pub fn add_threshold(&mut self, secs: u64) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if !self.thresholds.insert(secs) {
            return Err(ConfigError::DuplicateThreshold(secs));
        }
        Ok(())
    }

    pub fn remove_threshold(&mut self, secs: u64) -> Result<(), ConfigError> {
        if !self.thresholds.contains(&secs) {
            return Err(ConfigError::UnknownThreshold(secs));
        }
        if self.thresholds.len() == 1 {
            return Err(ConfigError::LastThreshold);
        }
        self.thresholds.remove(&secs);
        Ok(())
    }

    pub fn add_filter_entry(&mut self, entry: &str) -> Result<(), ConfigError> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(ConfigError::BlankFilterEntry);
        }
        if !self.entity_filter.insert(entry.to_string()) {
            return Err(ConfigError::DuplicateFilterEntry(entry.to_string()));
        }
        Ok(())
    }

    pub fn remove_filter_entry(&mut self, entry: &str) -> Result<(), ConfigError> {
        if !self.entity_filter.contains(entry) {
            return Err(ConfigError::UnknownFilterEntry(entry.to_string()));
        }
        if self.entity_filter.len() == 1 {
            return Err(ConfigError::LastFilterEntry);
        }
        self.entity_filter.remove(entry);
        Ok(())
    }

    pub fn set_manual_delay_secs(&mut self, secs: u64) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ZeroManualDelay);
        }
        self.manual_delay_secs = secs;
        Ok(())
    }

    pub fn set_manual_expiry_secs(&mut self, secs: u64) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ZeroManualExpiry);
        }
        self.manual_expiry_secs = secs;
        Ok(())
    }

    pub fn set_default_channel(&mut self, channel: Channel) {
        self.default_channel = channel;
    }

    pub fn set_format(&mut self, format: FormatConfig) -> Result<(), ConfigError> {
        if format.notification_duration_secs == 0 {
            return Err(ConfigError::ZeroNotificationDuration);
        }
        if format.long_threshold_secs <= format.short_threshold_secs {
            return Err(ConfigError::FormatThresholdOrder);
        }
        self.format = format;
        Ok(())
    }

    /// Full-struct check for configs that bypassed the setters, i.e. ones
    /// deserialized from the durable store.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&self.interval_secs) {
            return Err(ConfigError::IntervalOutOfRange {
                got: self.interval_secs,
                min: MIN_INTERVAL_SECS,
                max: MAX_INTERVAL_SECS,
            });
        }
        if self.thresholds.is_empty() {
            return Err(ConfigError::LastThreshold);
        }
        if self.thresholds.contains(&0) {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.entity_filter.is_empty() {
            return Err(ConfigError::LastFilterEntry);
        }
        if self.entity_filter.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::BlankFilterEntry);
        }
        if self.manual_delay_secs == 0 {
            return Err(ConfigError::ZeroManualDelay);
        }
        if self.manual_expiry_secs == 0 {
            return Err(ConfigError::ZeroManualExpiry);
        }
        if self.format.notification_duration_secs == 0 {
            return Err(ConfigError::ZeroNotificationDuration);
        }
        if self.format.long_threshold_secs <= self.format.short_threshold_secs {
            return Err(ConfigError::FormatThresholdOrder);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SweepConfig::default().validate(), Ok(()));
    }

    #[test]
    fn interval_range_is_enforced() {
        let mut cfg = SweepConfig::default();

        assert!(matches!(
            cfg.set_interval_secs(299),
            Err(ConfigError::IntervalOutOfRange { got: 299, .. })
        ));
        assert!(cfg.set_interval_secs(86_401).is_err());

        cfg.set_interval_secs(300).unwrap();
        assert_eq!(cfg.interval_secs(), 300);
        cfg.set_interval_secs(86_400).unwrap();
        assert_eq!(cfg.interval_secs(), 86_400);
    }

    #[test]
    fn thresholds_come_out_descending() {
        let mut cfg = SweepConfig::default();
        cfg.add_threshold(120).unwrap();
        cfg.add_threshold(3).unwrap();

        let desc = cfg.thresholds_desc();
        assert_eq!(desc, vec![120, 60, 30, 10, 5, 3]);
    }

    #[test]
    fn zero_and_duplicate_thresholds_are_rejected() {
        let mut cfg = SweepConfig::default();

        assert_eq!(cfg.add_threshold(0), Err(ConfigError::ZeroThreshold));
        assert_eq!(
            cfg.add_threshold(60),
            Err(ConfigError::DuplicateThreshold(60))
        );
    }

    #[test]
    fn last_threshold_cannot_be_removed() {
        let mut cfg = SweepConfig::default();
        for t in [60, 30, 10] {
            cfg.remove_threshold(t).unwrap();
        }

        assert_eq!(cfg.remove_threshold(5), Err(ConfigError::LastThreshold));
        assert_eq!(cfg.thresholds_desc(), vec![5]);
    }

    #[test]
    fn removing_unknown_threshold_fails() {
        let mut cfg = SweepConfig::default();
        assert_eq!(
            cfg.remove_threshold(42),
            Err(ConfigError::UnknownThreshold(42))
        );
    }

    #[test]
    fn last_filter_entry_cannot_be_removed() {
        let mut cfg = SweepConfig::default();

        let err = cfg.remove_filter_entry("item");
        assert_eq!(err, Err(ConfigError::LastFilterEntry));

        // Filter unchanged after the rejection.
        assert_eq!(cfg.filter_description(), "item");
    }

    #[test]
    fn filter_entries_are_trimmed_and_deduplicated() {
        let mut cfg = SweepConfig::default();

        cfg.add_filter_entry("  arrow ").unwrap();
        assert_eq!(
            cfg.add_filter_entry("arrow"),
            Err(ConfigError::DuplicateFilterEntry("arrow".into()))
        );
        assert_eq!(cfg.add_filter_entry("   "), Err(ConfigError::BlankFilterEntry));

        assert_eq!(cfg.filter_description(), "arrow, item");
    }

    #[test]
    fn removing_unknown_filter_entry_fails() {
        let mut cfg = SweepConfig::default();
        assert_eq!(
            cfg.remove_filter_entry("boat"),
            Err(ConfigError::UnknownFilterEntry("boat".into()))
        );
    }

    #[test]
    fn validate_catches_hand_edited_configs() {
        let mut cfg = SweepConfig::default();
        cfg.interval_secs = 10;
        assert!(cfg.validate().is_err());

        let mut cfg = SweepConfig::default();
        cfg.entity_filter.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::LastFilterEntry));

        let mut cfg = SweepConfig::default();
        cfg.format.long_threshold_secs = cfg.format.short_threshold_secs;
        assert_eq!(cfg.validate(), Err(ConfigError::FormatThresholdOrder));
    }

    #[test]
    fn serde_roundtrip_preserves_config() {
        let mut cfg = SweepConfig::default();
        cfg.set_interval_secs(600).unwrap();
        cfg.add_threshold(90).unwrap();
        cfg.add_filter_entry("projectile").unwrap();

        let json = serde_json::to_string(&cfg).unwrap();
        let back: SweepConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back, cfg);
        assert_eq!(back.validate(), Ok(()));
    }
}
