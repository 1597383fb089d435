use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PredicateError, Snapshot};

/// Rows of history a volume spike compares against, excluding the current row.
pub const VOLUME_SPIKE_LOOKBACK: usize = 9;

/// Default multiplier for [`AlertCondition::VolumeSpike`].
pub const DEFAULT_VOLUME_SPIKE_MULTIPLIER: f64 = 2.0;

/// Constructor for a registered condition kind.
pub type ConditionFactory = fn(f64) -> AlertCondition;

/// Predicate evaluated against the latest row of a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertCondition {
    #[serde(rename = "zscore_above")]
    ZScoreAbove { threshold: f64 },
    #[serde(rename = "zscore_below")]
    ZScoreBelow { threshold: f64 },
    PriceAbove { threshold: f64 },
    PriceBelow { threshold: f64 },
    VolumeSpike { multiplier: f64 },
}

impl AlertCondition {
    /// Registered condition kinds and their single-parameter constructors.
    pub const KINDS: [(&'static str, ConditionFactory); 5] = [
        ("zscore_above", Self::zscore_above),
        ("zscore_below", Self::zscore_below),
        ("price_above", Self::price_above),
        ("price_below", Self::price_below),
        ("volume_spike", Self::volume_spike),
    ];

    pub fn zscore_above(threshold: f64) -> Self {
        Self::ZScoreAbove { threshold }
    }

    /// Fires when the latest z-score is strictly below `threshold` as given.
    pub fn zscore_below(threshold: f64) -> Self {
        Self::ZScoreBelow { threshold }
    }

    /// Lower band of a symmetric z-score alert: stores `-magnitude`, so a
    /// magnitude of 2.0 fires once the z-score drops below -2.0.
    pub fn zscore_lower_band(magnitude: f64) -> Self {
        Self::zscore_below(-magnitude)
    }

    pub fn price_above(threshold: f64) -> Self {
        Self::PriceAbove { threshold }
    }

    pub fn price_below(threshold: f64) -> Self {
        Self::PriceBelow { threshold }
    }

    pub fn volume_spike(multiplier: f64) -> Self {
        Self::VolumeSpike { multiplier }
    }

    /// Look up a registered kind by name and build it with `parameter`.
    pub fn from_kind(kind: &str, parameter: f64) -> Result<Self, PredicateError> {
        if !parameter.is_finite() {
            return Err(PredicateError::NonFiniteParameter { value: parameter });
        }

        let normalized = kind.trim().to_ascii_lowercase();
        Self::KINDS
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, factory)| factory(parameter))
            .ok_or_else(|| PredicateError::UnknownKind {
                kind: kind.to_owned(),
            })
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ZScoreAbove { .. } => "zscore_above",
            Self::ZScoreBelow { .. } => "zscore_below",
            Self::PriceAbove { .. } => "price_above",
            Self::PriceBelow { .. } => "price_below",
            Self::VolumeSpike { .. } => "volume_spike",
        }
    }

    /// Evaluate against the latest snapshot row.
    ///
    /// A missing or empty column yields `Ok(false)`, as does a latest z-score
    /// that is still undefined. A non-finite latest price or volume is an error.
    pub fn evaluate(&self, snapshot: &Snapshot) -> Result<bool, PredicateError> {
        match *self {
            Self::ZScoreAbove { threshold } => {
                Ok(latest_zscore(snapshot).is_some_and(|z| z > threshold))
            }
            Self::ZScoreBelow { threshold } => {
                Ok(latest_zscore(snapshot).is_some_and(|z| z < threshold))
            }
            Self::PriceAbove { threshold } => {
                Ok(latest_price(snapshot)?.is_some_and(|price| price > threshold))
            }
            Self::PriceBelow { threshold } => {
                Ok(latest_price(snapshot)?.is_some_and(|price| price < threshold))
            }
            Self::VolumeSpike { multiplier } => volume_spike(snapshot, multiplier),
        }
    }
}

/// An undefined latest z-score means the window has not filled yet.
fn latest_zscore(snapshot: &Snapshot) -> Option<f64> {
    match snapshot.zscore().and_then(<[Option<f64>]>::last) {
        Some(Some(z)) if z.is_finite() => Some(*z),
        Some(_) => {
            debug!("latest zscore undefined, condition not met");
            None
        }
        None => None,
    }
}

fn latest_price(snapshot: &Snapshot) -> Result<Option<f64>, PredicateError> {
    match snapshot.price().and_then(<[f64]>::last) {
        None => Ok(None),
        Some(price) if price.is_finite() => Ok(Some(*price)),
        Some(_) => Err(PredicateError::UndefinedValue { column: "price" }),
    }
}

fn volume_spike(snapshot: &Snapshot, multiplier: f64) -> Result<bool, PredicateError> {
    let Some(volume) = snapshot.volume() else {
        return Ok(false);
    };
    if volume.len() <= VOLUME_SPIKE_LOOKBACK {
        return Ok(false);
    }

    let current_at = volume.len() - 1;
    let current = volume[current_at];
    let history = &volume[current_at - VOLUME_SPIKE_LOOKBACK..current_at];
    if !current.is_finite() || history.iter().any(|value| !value.is_finite()) {
        return Err(PredicateError::UndefinedValue { column: "volume" });
    }

    let average = history.iter().sum::<f64>() / VOLUME_SPIKE_LOOKBACK as f64;
    Ok(current > average * multiplier)
}
