//! The sweep engine.
//!
//! Two countdown tracks share one state machine:
//!   - automatic: recurring, re-armed from the interval after every run
//!   - manual: one-off, armed on admin request with a fixed delay
//!
//! A fixed-cadence driver calls `on_tick(now_ms)`. Each tick either fires
//! the execution for a due track or evaluates its countdown warnings.
//! All timestamps arrive as explicit `now_ms` arguments; the engine never
//! reads a clock.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::SweepConfig;
use crate::error::{ConfigError, ManualRunError};
use crate::format::format_remaining;
use crate::state::{SweepState, TrackState};
use crate::store::ConfigStore;
use crate::types::{CleanupExecutor, Notification, NotificationDispatcher, RecipientRegistry, Track};
use crate::warning::next_warning;
use prefs::manager::PreferenceManager;
use prefs::model::Channel;
use prefs::store::PreferenceStore;

pub struct SweepEngine<S: PreferenceStore> {
    cfg: Mutex<SweepConfig>,
    state: Mutex<SweepState>,
    executor: Arc<dyn CleanupExecutor>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    recipients: Arc<dyn RecipientRegistry>,
    preferences: Arc<PreferenceManager<S>>,
    config_store: Arc<dyn ConfigStore>,
}

impl<S: PreferenceStore> SweepEngine<S> {
    pub fn new(
        cfg: SweepConfig,
        executor: Arc<dyn CleanupExecutor>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        recipients: Arc<dyn RecipientRegistry>,
        preferences: Arc<PreferenceManager<S>>,
        config_store: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            cfg: Mutex::new(cfg),
            state: Mutex::new(SweepState::new()),
            executor,
            dispatcher,
            recipients,
            preferences,
            config_store,
        }
    }

    /// Snapshot of the current configuration (command surface display).
    pub async fn config(&self) -> SweepConfig {
        self.cfg.lock().await.clone()
    }

    /// Arm (or disarm) the automatic track from the current config.
    ///
    /// Called at startup, after every automatic execution, and after every
    /// accepted config mutation. Arming discards the track's unfired
    /// warning state; the manual track is never touched.
    pub async fn rearm_automatic(&self, now_ms: u64) {
        let cfg = self.cfg.lock().await.clone();
        let mut state = self.state.lock().await;
        Self::rearm_auto_track(&mut state, &cfg, now_ms);
    }

    fn rearm_auto_track(state: &mut SweepState, cfg: &SweepConfig, now_ms: u64) {
        if cfg.auto_enabled() {
            state.auto.arm(now_ms + cfg.interval_secs() * 1_000);
        } else {
            state.auto.clear();
        }
    }

    /// Drive both tracks one step.
    ///
    /// Safe to call unconditionally every tick: internal failures are
    /// logged, never propagated, and a missed tick only means a warning is
    /// detected late, not lost.
    pub async fn on_tick(&self, now_ms: u64) {
        let cfg = self.cfg.lock().await.clone();
        let mut state = self.state.lock().await;

        // Automatic track: execute on a passed deadline (and skip warning
        // evaluation for this tick), otherwise check the countdown.
        if state.auto.is_due(now_ms) {
            self.run_sweep(Track::Automatic, &cfg).await;
            Self::rearm_auto_track(&mut state, &cfg, now_ms);
        } else if let Some(remaining) = state.auto.remaining_secs(now_ms) {
            self.evaluate_warnings(&mut state.auto, remaining, &cfg).await;
        }

        // Manual track: same pattern, but a completed run clears the track
        // instead of re-arming it.
        if state.manual.is_due(now_ms) {
            self.run_sweep(Track::Manual, &cfg).await;
            state.manual.clear();
            state.manual_in_flight = false;
        } else if let Some(remaining) = state.manual.remaining_secs(now_ms) {
            self.evaluate_warnings(&mut state.manual, remaining, &cfg).await;
        }
    }

    /// Schedule a one-off sweep after the configured delay.
    ///
    /// Rejected while another manual run is pending or in flight; a stuck
    /// run whose expiry has passed is reclaimed first.
    pub async fn request_manual_run(&self, now_ms: u64) -> Result<(), ManualRunError> {
        let cfg = self.cfg.lock().await.clone();

        {
            let mut state = self.state.lock().await;
            if !Self::reclaim_or_reject_manual(&mut state, now_ms) {
                return Err(ManualRunError::AlreadyScheduled);
            }

            state.manual.arm(now_ms + cfg.manual_delay_secs() * 1_000);
            state.manual_in_flight = true;
            state.manual_expiry_ms = now_ms + cfg.manual_expiry_secs() * 1_000;
        }

        info!(delay_secs = cfg.manual_delay_secs(), "manual sweep scheduled");

        let body = format!(
            "Entity sweep starting in {}",
            format_remaining(cfg.manual_delay_secs(), cfg.format())
        );
        self.broadcast(&self.notification(body, &cfg)).await;

        Ok(())
    }

    /// True when a new manual run may start. Clears stale in-flight state
    /// (deadline passed, execution never completed, expiry elapsed) as a
    /// side effect.
    fn reclaim_or_reject_manual(state: &mut SweepState, now_ms: u64) -> bool {
        if state.manual.is_pending(now_ms) {
            return false;
        }

        if state.manual_in_flight {
            if now_ms >= state.manual_expiry_ms {
                warn!("reclaiming stuck manual sweep");
                state.manual.clear();
                state.manual_in_flight = false;
                return true;
            }
            return false;
        }

        true
    }

    /// Seconds until the next sweep: the manual deadline when one is
    /// pending (manual wins for display), else the automatic one, else
    /// `None`. "Nothing scheduled" is distinct from zero seconds left.
    pub async fn time_until_next_run(&self, now_ms: u64) -> Option<u64> {
        let state = self.state.lock().await;

        if state.manual.is_pending(now_ms) {
            return state.manual.remaining_secs(now_ms);
        }
        state.auto.remaining_secs(now_ms)
    }

    async fn evaluate_warnings(
        &self,
        track: &mut TrackState,
        remaining_secs: u64,
        cfg: &SweepConfig,
    ) {
        let thresholds = cfg.thresholds_desc();
        let Some(threshold) = next_warning(remaining_secs, &thresholds, track.last_warned_secs)
        else {
            return;
        };

        let shown = if cfg.format().dynamic_countdown {
            remaining_secs
        } else {
            threshold
        };
        let body = format!("Entity sweep in {}", format_remaining(shown, cfg.format()));
        self.broadcast(&self.notification(body, cfg)).await;

        track.last_warned_secs = Some(threshold);
    }

    async fn run_sweep(&self, track: Track, cfg: &SweepConfig) {
        info!(track = track.label(), filter = %cfg.filter_description(), "running entity sweep");

        let removed = match self.executor.execute(cfg.entity_filter()).await {
            Ok(n) => n,
            Err(e) => {
                // The deadline still counts as honored; retry-looping on a
                // broken executor would starve every subsequent run.
                error!(track = track.label(), error = ?e, "entity sweep failed");
                return;
            }
        };

        info!(track = track.label(), removed, "entity sweep finished");

        let body = if removed == 1 {
            "Swept 1 entity".to_string()
        } else {
            format!("Swept {removed} entities")
        };
        self.broadcast(&self.notification(body, cfg)).await;
    }

    /// Deliver one notification to every connected user on their own
    /// channel. Per-recipient delivery failures are logged and skipped.
    async fn broadcast(&self, note: &Notification) {
        for user_id in self.recipients.list_recipients().await {
            let channel = self.preferences.get(user_id).await;
            if let Err(e) = self.dispatcher.deliver(user_id, note, channel).await {
                warn!(user = %user_id, error = ?e, "notification delivery failed");
            }
        }
    }

    fn notification(&self, body: String, cfg: &SweepConfig) -> Notification {
        Notification {
            body,
            display_secs: cfg.format().notification_duration_secs,
        }
    }

    // =========================
    // Config mutation surface
    // =========================
    //
    // Each wrapper validates through the config's own setter, persists the
    // accepted value, then re-arms the automatic track. An in-flight
    // manual run is never disturbed.

    pub async fn set_auto_enabled(&self, now_ms: u64, enabled: bool) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| {
            c.set_auto_enabled(enabled);
            Ok(())
        })
        .await
    }

    pub async fn set_interval_secs(&self, now_ms: u64, secs: u64) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.set_interval_secs(secs)).await
    }

    pub async fn add_threshold(&self, now_ms: u64, secs: u64) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.add_threshold(secs)).await
    }

    pub async fn remove_threshold(&self, now_ms: u64, secs: u64) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.remove_threshold(secs)).await
    }

    pub async fn add_filter_entry(&self, now_ms: u64, entry: &str) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.add_filter_entry(entry)).await
    }

    pub async fn remove_filter_entry(&self, now_ms: u64, entry: &str) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.remove_filter_entry(entry))
            .await
    }

    pub async fn set_manual_delay_secs(&self, now_ms: u64, secs: u64) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.set_manual_delay_secs(secs))
            .await
    }

    pub async fn set_manual_expiry_secs(&self, now_ms: u64, secs: u64) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| c.set_manual_expiry_secs(secs))
            .await
    }

    /// Change the default channel; also re-points every non-overridden
    /// user via the preference manager.
    pub async fn set_default_channel(&self, now_ms: u64, channel: Channel) -> anyhow::Result<()> {
        self.mutate_config(now_ms, |c| {
            c.set_default_channel(channel);
            Ok(())
        })
        .await?;

        self.preferences.set_default(channel).await;
        Ok(())
    }

    async fn mutate_config<F>(&self, now_ms: u64, apply: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut SweepConfig) -> Result<(), ConfigError>,
    {
        let snapshot = {
            let mut cfg = self.cfg.lock().await;
            apply(&mut *cfg)?;
            self.config_store.save(&cfg).await?;
            cfg.clone()
        };

        let mut state = self.state.lock().await;
        Self::rearm_auto_track(&mut state, &snapshot, now_ms);

        Ok(())
    }
}
