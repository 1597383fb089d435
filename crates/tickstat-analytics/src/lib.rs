//! # Tickstat Analytics
//!
//! Streaming analytics over tick snapshots: bar resampling, rolling
//! statistics, pairs analysis and the per-pass pipeline that ties them to
//! the alert engine.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`resample`] | Tick to bar bucketing |
//! | [`stats`] | Rolling mean/std/z-score/correlation, returns, Sharpe, drawdown |
//! | [`regression`] | Small-design OLS |
//! | [`adf`] | Augmented Dickey-Fuller stationarity test |
//! | [`pairs`] | Hedge ratio, spread and spread z-score |
//! | [`signals`] | Hysteresis position signal |
//! | [`config`] | Pass configuration |
//! | [`pipeline`] | Buffer snapshot to report |
//!
//! Undefined samples are `None` throughout. A short history is never an
//! error: it shows up as leading `None` values or as
//! [`AdfResult::InsufficientData`].
//!
//! ```rust
//! use tickstat_analytics::{generate_signals, stats, Position, SignalThresholds};
//!
//! let z = stats::zscore(&[Some(1.0), Some(1.0), Some(1.0)], None).expect("zscore");
//! assert!(z.iter().all(Option::is_none));
//!
//! let positions = generate_signals(&[Some(2.5), Some(0.1)], SignalThresholds::default());
//! assert_eq!(positions, vec![Position::Short, Position::Flat]);
//! ```

pub mod adf;
pub mod config;
pub mod error;
pub mod pairs;
pub mod pipeline;
pub mod regression;
pub mod resample;
pub mod signals;
pub mod stats;

pub use adf::{adf_test, AdfReport, AdfResult, CriticalValues, ADF_MAX_LAG, ADF_SIGNIFICANCE};
pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use pairs::{
    simple_spread, HedgeEstimate, HedgeRatio, PairsAnalyzer, PairsFrame, PairsRow, SpreadModel,
    FALLBACK_HEDGE_RATIO,
};
pub use pipeline::{AnalysisPipeline, AnalysisReport, InstrumentAnalytics, PairAnalytics};
pub use resample::{parse_interval, resample, resample_bars, resample_series, resample_str};
pub use signals::{generate_signals, Position, SignalThresholds};
pub use stats::SummaryStats;
