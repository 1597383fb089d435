use serde::{Deserialize, Serialize};
use tickstat_alerts::DEFAULT_VOLUME_SPIKE_MULTIPLIER;
use tickstat_core::Interval;

use crate::signals::SignalThresholds;
use crate::AnalyticsError;

/// Settings for one analysis pass.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Bar width used for resampling.
    pub interval: Interval,
    /// Rolling window, in bars, for z-scores, volatility and correlation.
    pub window: usize,
    /// Absolute spread z-score that opens a position.
    pub entry_threshold: f64,
    /// Absolute spread z-score below which a position closes.
    pub exit_threshold: f64,
    /// Annual risk-free rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
    pub volume_spike_multiplier: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            interval: Interval::OneMinute,
            window: 20,
            entry_threshold: 2.0,
            exit_threshold: 0.5,
            risk_free_rate: 0.0,
            volume_spike_multiplier: DEFAULT_VOLUME_SPIKE_MULTIPLIER,
        }
    }
}

impl AnalyticsConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, AnalyticsError> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| AnalyticsError::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.window < 2 {
            return Err(AnalyticsError::invalid_config(format!(
                "window {} must be at least 2",
                self.window
            )));
        }
        self.thresholds()?;
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::invalid_config("risk-free rate must be finite"));
        }
        if !self.volume_spike_multiplier.is_finite() || self.volume_spike_multiplier <= 0.0 {
            return Err(AnalyticsError::invalid_config(format!(
                "volume spike multiplier {} must be positive",
                self.volume_spike_multiplier
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Result<SignalThresholds, AnalyticsError> {
        SignalThresholds::new(self.entry_threshold, self.exit_threshold)
    }
}
