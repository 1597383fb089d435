//! Pairs analysis: hedge ratio, spread, spread z-score, stationarity.
//!
//! The analyzer owns a [`SpreadModel`] whose pieces are derived lazily and
//! strictly in order: hedge ratio, then spread, then z-score. Once estimated
//! the hedge ratio is reused until [`PairsAnalyzer::recompute_hedge_ratio`]
//! is called.

use serde::{Deserialize, Serialize};
use tickstat_core::{TimeSeries, UtcDateTime};
use tracing::warn;

use crate::adf::{adf_test, AdfResult};
use crate::regression::linear_fit;
use crate::stats;
use crate::AnalyticsError;

/// Hedge ratio used when the regression cannot be fit.
pub const FALLBACK_HEDGE_RATIO: f64 = 1.0;

/// How a hedge ratio was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HedgeEstimate {
    /// OLS slope of `y ~ 1 + x`.
    Fitted { intercept: f64, observations: usize },
    /// Fewer than two paired observations, or no variation in `x`.
    Fallback { observations: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeRatio {
    pub value: f64,
    pub estimate: HedgeEstimate,
}

/// Cached derivations for one pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadModel {
    hedge_ratio: Option<HedgeRatio>,
    spread: Option<Vec<Option<f64>>>,
    zscore: Option<(usize, Vec<Option<f64>>)>,
}

impl SpreadModel {
    pub fn hedge_ratio(&self) -> Option<HedgeRatio> {
        self.hedge_ratio
    }

    pub fn spread(&self) -> Option<&[Option<f64>]> {
        self.spread.as_deref()
    }

    pub fn zscore(&self) -> Option<&[Option<f64>]> {
        self.zscore.as_ref().map(|(_, zscore)| zscore.as_slice())
    }

    /// Window of the cached z-score.
    pub fn zscore_window(&self) -> Option<usize> {
        self.zscore.as_ref().map(|(window, _)| *window)
    }
}

/// One aligned row of [`PairsFrame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsRow {
    pub timestamp: UtcDateTime,
    pub price_y: Option<f64>,
    pub price_x: Option<f64>,
    pub spread: Option<f64>,
    pub zscore: Option<f64>,
    pub correlation: Option<f64>,
}

/// Table produced by [`PairsAnalyzer::compute_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsFrame {
    pub hedge_ratio: HedgeRatio,
    pub window: usize,
    pub rows: Vec<PairsRow>,
}

impl PairsFrame {
    pub fn zscores(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.zscore).collect()
    }

    pub fn spreads(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.spread).collect()
    }

    pub fn latest(&self) -> Option<&PairsRow> {
        self.rows.last()
    }
}

/// Analyzer over two price series aligned on their common timestamps.
#[derive(Debug, Clone)]
pub struct PairsAnalyzer {
    index: Vec<UtcDateTime>,
    price_y: Vec<Option<f64>>,
    price_x: Vec<Option<f64>>,
    model: SpreadModel,
}

impl PairsAnalyzer {
    /// `price_y` is the dependent leg, `price_x` the hedge leg.
    pub fn new(price_y: &TimeSeries, price_x: &TimeSeries) -> Result<Self, AnalyticsError> {
        Self::named("price_y", price_y, "price_x", price_x)
    }

    /// Like [`PairsAnalyzer::new`], naming the legs in alignment errors.
    pub fn named(
        y_name: &str,
        price_y: &TimeSeries,
        x_name: &str,
        price_x: &TimeSeries,
    ) -> Result<Self, AnalyticsError> {
        let (index, price_y, price_x) = inner_join(price_y, price_x);
        if index.is_empty() {
            return Err(AnalyticsError::Alignment {
                y: y_name.to_owned(),
                x: x_name.to_owned(),
            });
        }

        Ok(Self {
            index,
            price_y,
            price_x,
            model: SpreadModel::default(),
        })
    }

    pub fn index(&self) -> &[UtcDateTime] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn price_y(&self) -> &[Option<f64>] {
        &self.price_y
    }

    pub fn price_x(&self) -> &[Option<f64>] {
        &self.price_x
    }

    pub fn model(&self) -> &SpreadModel {
        &self.model
    }

    /// Cached hedge ratio, estimating it on first use.
    pub fn hedge_ratio(&mut self) -> HedgeRatio {
        match self.model.hedge_ratio {
            Some(hedge) => hedge,
            None => self.recompute_hedge_ratio(),
        }
    }

    /// Re-run the regression and drop the spread and z-score derived from
    /// the previous estimate.
    pub fn recompute_hedge_ratio(&mut self) -> HedgeRatio {
        let (x, y): (Vec<f64>, Vec<f64>) = self
            .price_x
            .iter()
            .zip(&self.price_y)
            .filter_map(|(x, y)| Some((finite(*x)?, finite(*y)?)))
            .unzip();
        let observations = x.len();

        let hedge = match linear_fit(&x, &y) {
            Some((slope, intercept)) => HedgeRatio {
                value: slope,
                estimate: HedgeEstimate::Fitted {
                    intercept,
                    observations,
                },
            },
            None => {
                warn!(observations, "hedge ratio regression not possible, using fallback");
                HedgeRatio {
                    value: FALLBACK_HEDGE_RATIO,
                    estimate: HedgeEstimate::Fallback { observations },
                }
            }
        };

        self.model = SpreadModel {
            hedge_ratio: Some(hedge),
            spread: None,
            zscore: None,
        };
        hedge
    }

    /// `y - hedge_ratio * x`, undefined where either leg is.
    pub fn spread(&mut self) -> &[Option<f64>] {
        let beta = self.hedge_ratio().value;
        let (y, x) = (&self.price_y, &self.price_x);
        self.model.spread.get_or_insert_with(|| {
            y.iter()
                .zip(x)
                .map(|(y, x)| Some(finite(*y)? - beta * finite(*x)?))
                .collect()
        })
    }

    /// Rolling z-score of the spread over `window` rows.
    pub fn spread_zscore(&mut self, window: usize) -> Result<&[Option<f64>], AnalyticsError> {
        if self.model.zscore_window() != Some(window) {
            let zscore = stats::zscore(self.spread(), Some(window))?;
            self.model.zscore = Some((window, zscore));
        }
        Ok(self.model.zscore().unwrap_or_default())
    }

    /// Rolling correlation of the two legs.
    pub fn rolling_correlation(&self, window: usize) -> Result<Vec<Option<f64>>, AnalyticsError> {
        stats::rolling_correlation(&self.price_y, &self.price_x, window)
    }

    /// ADF stationarity test on the spread.
    pub fn adf_test(&mut self) -> AdfResult {
        adf_test(self.spread())
    }

    /// Re-estimate everything and return one aligned table.
    pub fn compute_all(&mut self, window: usize) -> Result<PairsFrame, AnalyticsError> {
        let hedge_ratio = self.recompute_hedge_ratio();
        let zscore = self.spread_zscore(window)?.to_vec();
        let correlation = self.rolling_correlation(window)?;
        let spread = self.spread().to_vec();

        let rows = self
            .index
            .iter()
            .enumerate()
            .map(|(i, timestamp)| PairsRow {
                timestamp: *timestamp,
                price_y: self.price_y[i],
                price_x: self.price_x[i],
                spread: spread[i],
                zscore: zscore[i],
                correlation: correlation[i],
            })
            .collect();

        Ok(PairsFrame {
            hedge_ratio,
            window,
            rows,
        })
    }
}

/// Plain difference of two equally long series.
pub fn simple_spread(
    left: &[Option<f64>],
    right: &[Option<f64>],
) -> Result<Vec<Option<f64>>, AnalyticsError> {
    if left.len() != right.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(left
        .iter()
        .zip(right)
        .map(|(a, b)| Some(finite(*a)? - finite(*b)?))
        .collect())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Merge-join two strictly increasing indices.
fn inner_join(
    y: &TimeSeries,
    x: &TimeSeries,
) -> (Vec<UtcDateTime>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let (y_index, y_values) = (y.index(), y.values());
    let (x_index, x_values) = (x.index(), x.values());
    let capacity = y_index.len().min(x_index.len());
    let mut joined = (
        Vec::with_capacity(capacity),
        Vec::with_capacity(capacity),
        Vec::with_capacity(capacity),
    );

    let (mut i, mut j) = (0, 0);
    while i < y_index.len() && j < x_index.len() {
        match y_index[i].cmp(&x_index[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                joined.0.push(y_index[i]);
                joined.1.push(y_values[i]);
                joined.2.push(x_values[j]);
                i += 1;
                j += 1;
            }
        }
    }
    joined
}
