//! Hysteresis mean-reversion signal over a z-score series.

use serde::{Deserialize, Serialize};

use crate::AnalyticsError;

/// Position held at one index of a signal series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Long,
    Short,
    #[default]
    Flat,
}

impl Position {
    /// `1` long, `-1` short, `0` flat.
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Long => 1,
            Self::Short => -1,
            Self::Flat => 0,
        }
    }

    /// Next position given the current z-score. An undefined z-score holds.
    pub fn next(self, zscore: Option<f64>, thresholds: SignalThresholds) -> Self {
        let Some(z) = zscore.filter(|z| !z.is_nan()) else {
            return self;
        };
        match self {
            Self::Flat if z > thresholds.entry => Self::Short,
            Self::Flat if z < -thresholds.entry => Self::Long,
            Self::Flat => Self::Flat,
            Self::Long | Self::Short if z.abs() < thresholds.exit => Self::Flat,
            held => held,
        }
    }
}

/// Entry/exit band. Validated so that `entry > exit >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalThresholds {
    entry: f64,
    exit: f64,
}

impl SignalThresholds {
    pub fn new(entry: f64, exit: f64) -> Result<Self, AnalyticsError> {
        if !entry.is_finite() || !exit.is_finite() {
            return Err(AnalyticsError::invalid_config("signal thresholds must be finite"));
        }
        if exit < 0.0 {
            return Err(AnalyticsError::invalid_config(format!(
                "exit threshold {exit} must be non-negative"
            )));
        }
        if entry <= exit {
            return Err(AnalyticsError::invalid_config(format!(
                "entry threshold {entry} must exceed exit threshold {exit}"
            )));
        }
        Ok(Self { entry, exit })
    }

    pub fn entry(&self) -> f64 {
        self.entry
    }

    pub fn exit(&self) -> f64 {
        self.exit
    }
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            entry: 2.0,
            exit: 0.5,
        }
    }
}

/// Left-to-right scan starting flat; each position depends on the previous
/// one and the current z-score.
pub fn generate_signals(zscore: &[Option<f64>], thresholds: SignalThresholds) -> Vec<Position> {
    zscore
        .iter()
        .scan(Position::Flat, |position, z| {
            *position = position.next(*z, thresholds);
            Some(*position)
        })
        .collect()
}
