//! Time-bucketed resampling of ticks into bars.
//!
//! Bucket key: `floor(timestamp / interval) * interval`. Each bar carries the
//! price of the chronologically last tick in its bucket and the summed
//! quantity. Buckets without ticks are omitted, so the output index may have
//! gaps.

use std::str::FromStr;

use tickstat_core::{Bar, BarSeries, Interval, Symbol, Tick, UtcDateTime};
use tracing::debug;

use crate::AnalyticsError;

/// Parse a resample label (`1s`, `1m`, `5m`).
pub fn parse_interval(label: &str) -> Result<Interval, AnalyticsError> {
    Interval::from_str(label).map_err(|err| AnalyticsError::invalid_config(err.to_string()))
}

/// Resample ticks into bars at `interval`.
///
/// Ticks are stably sorted by timestamp first; among equal timestamps the
/// last one received sets the bar price.
pub fn resample(ticks: &[Tick], interval: Interval) -> Result<Vec<Bar>, AnalyticsError> {
    let mut ordered: Vec<(UtcDateTime, f64, f64)> = ticks
        .iter()
        .map(|tick| (tick.timestamp, tick.price, tick.quantity))
        .collect();
    ordered.sort_by_key(|(timestamp, _, _)| *timestamp);

    let bars = bucket(ordered, interval)?;
    debug!(
        ticks = ticks.len(),
        bars = bars.len(),
        interval = %interval,
        "resampled ticks"
    );
    Ok(bars)
}

/// Resample with an interval label; unsupported labels are a configuration error.
pub fn resample_str(ticks: &[Tick], label: &str) -> Result<Vec<Bar>, AnalyticsError> {
    resample(ticks, parse_interval(label)?)
}

/// Resample only the ticks of `symbol` into a [`BarSeries`].
pub fn resample_series(
    symbol: &Symbol,
    ticks: &[Tick],
    interval: Interval,
) -> Result<BarSeries, AnalyticsError> {
    let own: Vec<Tick> = ticks
        .iter()
        .filter(|tick| &tick.symbol == symbol)
        .cloned()
        .collect();
    Ok(BarSeries::new(symbol.clone(), interval, resample(&own, interval)?))
}

/// Re-bucket existing bars: last price, summed volume.
pub fn resample_bars(bars: &[Bar], interval: Interval) -> Result<Vec<Bar>, AnalyticsError> {
    let mut ordered: Vec<(UtcDateTime, f64, f64)> = bars
        .iter()
        .map(|bar| (bar.bucket_start, bar.price, bar.volume))
        .collect();
    ordered.sort_by_key(|(timestamp, _, _)| *timestamp);
    bucket(ordered, interval)
}

fn bucket_start(timestamp: UtcDateTime, interval: Interval) -> Result<UtcDateTime, AnalyticsError> {
    let width = interval.as_nanos();
    let start = timestamp.unix_nanos().div_euclid(width) * width;
    Ok(UtcDateTime::from_unix_nanos(start)?)
}

fn bucket(
    ordered: Vec<(UtcDateTime, f64, f64)>,
    interval: Interval,
) -> Result<Vec<Bar>, AnalyticsError> {
    let mut bars: Vec<Bar> = Vec::new();
    for (timestamp, price, quantity) in ordered {
        let start = bucket_start(timestamp, interval)?;
        match bars.last_mut() {
            Some(bar) if bar.bucket_start == start => {
                bar.price = price;
                bar.volume += quantity;
            }
            _ => bars.push(Bar::new(start, price, quantity)?),
        }
    }
    Ok(bars)
}
