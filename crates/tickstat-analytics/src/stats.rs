//! Rolling and summary statistics over series with gaps.
//!
//! Series are `&[Option<f64>]`; `None` (and non-finite values) mark missing
//! samples. Reductions over a whole series skip missing samples. Rolling
//! windows yield `None` whenever the trailing window is not yet full or
//! contains a missing sample. Standard deviations are sample deviations
//! (n - 1 denominator).

use serde::{Deserialize, Serialize};

use crate::AnalyticsError;

/// Periods per year used to annualize volatility and Sharpe ratio.
pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

/// Second moments below this are treated as zero by skew/kurtosis.
const MOMENT_EPSILON: f64 = 1e-14;

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn clean(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().filter_map(|value| defined(*value)).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    // Exact zero for flat samples; the summed mean can be off by an ulp.
    if values.iter().all(|v| *v == values[0]) {
        return Some(0.0);
    }
    let mean = mean(values)?;
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn validate_window(window: usize) -> Result<(), AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::invalid_config("rolling window must be at least 1"));
    }
    Ok(())
}

/// Apply `reduce` to each full trailing window without missing samples.
fn rolling<F>(
    series: &[Option<f64>],
    window: usize,
    mut reduce: F,
) -> Result<Vec<Option<f64>>, AnalyticsError>
where
    F: FnMut(&[f64]) -> Option<f64>,
{
    validate_window(window)?;
    let mut scratch = Vec::with_capacity(window.min(series.len()));

    Ok((0..series.len())
        .map(|end| {
            if end + 1 < window {
                return None;
            }
            scratch.clear();
            for value in &series[end + 1 - window..=end] {
                scratch.push(defined(*value)?);
            }
            reduce(&scratch)
        })
        .collect())
}

pub fn rolling_mean(series: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>, AnalyticsError> {
    rolling(series, window, mean)
}

pub fn rolling_std(series: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>, AnalyticsError> {
    rolling(series, window, sample_std)
}

/// Z-score of each sample.
///
/// With a window, each sample is scored against the trailing window that ends
/// on it. Without one, every sample is scored against the whole series; a zero
/// deviation makes every position `None`.
pub fn zscore(
    series: &[Option<f64>],
    window: Option<usize>,
) -> Result<Vec<Option<f64>>, AnalyticsError> {
    match window {
        Some(window) => rolling(series, window, |values| {
            let std = sample_std(values)?;
            if std == 0.0 {
                return None;
            }
            let current = *values.last()?;
            Some((current - mean(values)?) / std)
        }),
        None => {
            let values = clean(series);
            let (Some(mean), Some(std)) = (mean(&values), sample_std(&values)) else {
                return Ok(vec![None; series.len()]);
            };
            if std == 0.0 {
                return Ok(vec![None; series.len()]);
            }
            Ok(series
                .iter()
                .map(|value| defined(*value).map(|v| (v - mean) / std))
                .collect())
        }
    }
}

/// Pearson correlation over trailing windows of two equally long series.
pub fn rolling_correlation(
    left: &[Option<f64>],
    right: &[Option<f64>],
    window: usize,
) -> Result<Vec<Option<f64>>, AnalyticsError> {
    if left.len() != right.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    validate_window(window)?;

    Ok((0..left.len())
        .map(|end| {
            if end + 1 < window {
                return None;
            }
            let start = end + 1 - window;
            let mut pairs = Vec::with_capacity(window);
            for (a, b) in left[start..=end].iter().zip(&right[start..=end]) {
                pairs.push((defined(*a)?, defined(*b)?));
            }
            correlation(&pairs)
        })
        .collect())
}

fn correlation(pairs: &[(f64, f64)]) -> Option<f64> {
    let (first_a, first_b) = *pairs.first()?;
    if pairs.len() < 2
        || pairs.iter().all(|(a, _)| *a == first_a)
        || pairs.iter().all(|(_, b)| *b == first_b)
    {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (a, b) in pairs {
        let (da, db) = (a - mean_a, b - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    Some(cov / (var_a * var_b).sqrt())
}

/// Log returns `ln(p[t] / p[t-1])`; the first sample has no return.
pub fn returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    consecutive(prices, |previous, current| {
        (previous > 0.0 && current > 0.0).then(|| (current / previous).ln())
    })
}

/// Simple returns `p[t] / p[t-1] - 1`.
pub fn pct_change(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    consecutive(prices, |previous, current| {
        (previous != 0.0).then(|| current / previous - 1.0)
    })
}

fn consecutive<F>(series: &[Option<f64>], change: F) -> Vec<Option<f64>>
where
    F: Fn(f64, f64) -> Option<f64>,
{
    let mut out = Vec::with_capacity(series.len());
    out.extend(series.first().map(|_| None));
    out.extend(series.windows(2).map(|pair| {
        let (previous, current) = (defined(pair[0])?, defined(pair[1])?);
        change(previous, current)
    }));
    out
}

/// Annualized rolling volatility of a return series.
pub fn volatility(returns: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>, AnalyticsError> {
    let annualization = TRADING_PERIODS_PER_YEAR.sqrt();
    Ok(rolling_std(returns, window)?
        .into_iter()
        .map(|std| std.map(|s| s * annualization))
        .collect())
}

/// Annualized Sharpe ratio. `risk_free_rate` is an annual rate.
///
/// `None` with fewer than two returns or a zero deviation.
pub fn sharpe_ratio(returns: &[Option<f64>], risk_free_rate: f64) -> Option<f64> {
    let per_period = risk_free_rate / TRADING_PERIODS_PER_YEAR;
    let excess: Vec<f64> = clean(returns).into_iter().map(|r| r - per_period).collect();
    let std = sample_std(&excess)?;
    if std == 0.0 {
        return None;
    }
    Some(mean(&excess)? / std * TRADING_PERIODS_PER_YEAR.sqrt())
}

/// Worst peak-to-trough decline of the compounded price path (always <= 0).
///
/// The running peak starts at the first compounded value, matching a
/// cumulative product of `1 + pct_change` that skips missing changes.
pub fn max_drawdown(prices: &[Option<f64>]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak: Option<f64> = None;
    let mut worst: f64 = 0.0;

    for change in pct_change(prices).into_iter().flatten() {
        cumulative *= 1.0 + change;
        let running_peak = peak.map_or(cumulative, |p| p.max(cumulative));
        peak = Some(running_peak);
        if running_peak != 0.0 {
            worst = worst.min(cumulative / running_peak - 1.0);
        }
    }
    worst
}

/// Descriptive statistics over the defined samples of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    /// Adjusted Fisher-Pearson skewness; needs 3 samples.
    pub skew: Option<f64>,
    /// Bias-corrected excess kurtosis; needs 4 samples.
    pub kurtosis: Option<f64>,
}

pub fn summary_stats(series: &[Option<f64>]) -> SummaryStats {
    let values = clean(series);
    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    SummaryStats {
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        median: median(&sorted),
        skew: skew(&values),
        kurtosis: kurtosis(&values),
    }
}

fn median(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Central moment sums (second, third, fourth).
fn moment_sums(values: &[f64]) -> Option<(f64, f64, f64)> {
    let mean = mean(values)?;
    let mut sums = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        sums.0 += d2;
        sums.1 += d2 * d;
        sums.2 += d2 * d2;
    }
    if sums.0 < MOMENT_EPSILON {
        sums.0 = 0.0;
    }
    Some(sums)
}

fn skew(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let n = values.len() as f64;
    let (m2, m3, _) = moment_sums(values)?;
    if m2 == 0.0 {
        return None;
    }
    Some(n * (n - 1.0).sqrt() / (n - 2.0) * (m3 / m2.powf(1.5)))
}

fn kurtosis(values: &[f64]) -> Option<f64> {
    if values.len() < 4 {
        return None;
    }
    let n = values.len() as f64;
    let (m2, _, m4) = moment_sums(values)?;
    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
    if denominator == 0.0 {
        return None;
    }
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Some(numerator / denominator - adjustment)
}
