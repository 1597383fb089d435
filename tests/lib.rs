// Shared fixtures for the behavior tests
pub use tickstat_alerts::{AlertCondition, AlertEngine, Snapshot, TriggeredAlertEvent};
pub use tickstat_analytics::{AnalysisPipeline, AnalyticsConfig, AnalyticsError};
pub use tickstat_core::{Bar, Interval, Symbol, Tick, TickBuffer, TimeSeries, UtcDateTime};

pub fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("fixture symbol must be valid")
}

pub fn at(seconds: i64) -> UtcDateTime {
    UtcDateTime::from_unix_seconds(seconds).expect("fixture timestamp must be valid")
}

pub fn at_millis(millis: i64) -> UtcDateTime {
    UtcDateTime::from_unix_millis(millis).expect("fixture timestamp must be valid")
}

pub fn tick(seconds: i64, symbol_name: &str, price: f64, quantity: f64) -> Tick {
    Tick::new(at(seconds), symbol(symbol_name), price, quantity).expect("fixture tick must be valid")
}

/// Series on a one-minute grid starting at `start_seconds`.
pub fn minute_series(start_seconds: i64, values: &[f64]) -> TimeSeries {
    TimeSeries::from_sorted(
        values
            .iter()
            .enumerate()
            .map(|(i, value)| (at(start_seconds + i as i64 * 60), Some(*value))),
    )
}

/// Deterministic uniform noise in [-1, 1).
pub fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
        })
        .collect()
}
