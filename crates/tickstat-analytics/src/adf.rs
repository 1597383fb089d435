//! Augmented Dickey-Fuller unit-root test (constant term, maximum lag 1).
//!
//! The lag order is chosen by AIC among `0..=ADF_MAX_LAG` on a common
//! sample, then the chosen regression is refit on all usable observations:
//!
//! `Δx[t+1] = α + γ·x[t] + β·Δx[t] + ε`
//!
//! The statistic is the t-value of `γ`. P-values use MacKinnon's (1994)
//! regression-surface approximation and critical values MacKinnon's (2010)
//! response surfaces, both for the constant-only case.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::regression::{ols, OlsFit};

/// Highest lag of `Δx` considered.
pub const ADF_MAX_LAG: usize = 1;

/// Significance level for the stationarity verdict.
pub const ADF_SIGNIFICANCE: f64 = 0.05;

/// Clean observations needed before the test is run at all.
pub const ADF_MIN_OBSERVATIONS: usize = 10;

// MacKinnon (1994), one integrated variable, constant term.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) response surfaces: 1%, 5%, 10%.
const CRITICAL_SURFACES: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

impl CriticalValues {
    /// Finite-sample critical values for `nobs` regression observations.
    pub fn for_observations(nobs: usize) -> Self {
        let inv = 1.0 / nobs as f64;
        let surface = |coefficients: &[f64; 4]| polyval(coefficients, inv);
        Self {
            one_percent: surface(&CRITICAL_SURFACES[0]),
            five_percent: surface(&CRITICAL_SURFACES[1]),
            ten_percent: surface(&CRITICAL_SURFACES[2]),
        }
    }
}

/// Completed test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfReport {
    pub test_statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    pub nobs: usize,
    pub critical_values: CriticalValues,
    pub is_stationary: bool,
}

/// Outcome of a stationarity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdfResult {
    /// Fewer than [`ADF_MIN_OBSERVATIONS`] clean samples; the test was not run.
    InsufficientData { observations: usize },
    /// The regression had no residual variance or a singular design
    /// (e.g. a constant or perfectly linear series).
    Degenerate { observations: usize },
    Completed(AdfReport),
}

impl AdfResult {
    pub fn is_stationary(&self) -> bool {
        matches!(self, Self::Completed(report) if report.is_stationary)
    }

    pub fn test_statistic(&self) -> Option<f64> {
        self.report().map(|report| report.test_statistic)
    }

    pub fn p_value(&self) -> Option<f64> {
        self.report().map(|report| report.p_value)
    }

    pub fn report(&self) -> Option<&AdfReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "Insufficient data for ADF test",
            Self::Degenerate { .. } => "Degenerate series for ADF test",
            Self::Completed(report) if report.is_stationary => "Stationary",
            Self::Completed(_) => "Non-stationary",
        }
    }
}

/// Run the ADF test on `series` after dropping undefined values.
pub fn adf_test(series: &[Option<f64>]) -> AdfResult {
    let clean: Vec<f64> = series
        .iter()
        .filter_map(|value| value.filter(|v| v.is_finite()))
        .collect();
    adf_test_clean(&clean)
}

/// Run the ADF test on a series without gaps.
pub fn adf_test_clean(series: &[f64]) -> AdfResult {
    let observations = series.len();
    if observations < ADF_MIN_OBSERVATIONS {
        return AdfResult::InsufficientData { observations };
    }

    let diff: Vec<f64> = series.windows(2).map(|pair| pair[1] - pair[0]).collect();

    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=ADF_MAX_LAG {
        let Some(fit) = fit_lagged(series, &diff, lag, ADF_MAX_LAG) else {
            continue;
        };
        let aic = fit.aic();
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let Some((aic, used_lag)) = best else {
        return AdfResult::Degenerate { observations };
    };
    debug!(used_lag, aic, "adf lag selected");

    let Some(fit) = fit_lagged(series, &diff, used_lag, used_lag) else {
        return AdfResult::Degenerate { observations };
    };
    let Some(test_statistic) = fit.t_value(1) else {
        return AdfResult::Degenerate { observations };
    };

    let p_value = mackinnon_p_value(test_statistic);
    AdfResult::Completed(AdfReport {
        test_statistic,
        p_value,
        used_lag,
        nobs: fit.nobs,
        critical_values: CriticalValues::for_observations(fit.nobs),
        is_stationary: p_value < ADF_SIGNIFICANCE,
    })
}

/// Regress `Δx[t]` on `[1, x[t], Δx[t-1], .., Δx[t-lag]]` for `t >= start`.
fn fit_lagged(levels: &[f64], diff: &[f64], lag: usize, start: usize) -> Option<OlsFit> {
    let mut design = Vec::with_capacity(diff.len().saturating_sub(start));
    let mut response = Vec::with_capacity(design.capacity());
    for t in start..diff.len() {
        let mut row = Vec::with_capacity(lag + 2);
        row.push(1.0);
        row.push(levels[t]);
        row.extend((1..=lag).map(|j| diff[t - j]));
        design.push(row);
        response.push(diff[t]);
    }
    ols(&design, &response)
}

/// Approximate p-value of an ADF statistic (constant, one variable).
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let polynomial = if statistic <= TAU_STAR {
        polyval(&TAU_SMALL_P, statistic)
    } else {
        polyval(&TAU_LARGE_P, statistic)
    };
    normal_cdf(polynomial)
}

/// `c[0] + c[1]·x + c[2]·x² + ..`
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function (Chebyshev fit, fractional error < 1.2e-7).
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let value = t * poly.exp();
    if x >= 0.0 {
        value
    } else {
        2.0 - value
    }
}
