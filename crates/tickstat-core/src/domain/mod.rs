//! # Domain Models
//!
//! Canonical domain types for tickstat market data.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tick`] | Single trade: timestamp, symbol, price, quantity |
//! | [`Bar`] | Time bucket with last price and summed volume |
//! | [`BarSeries`] | Bars for a symbol/interval |
//! | [`TimeSeries`] | Timestamp-indexed numeric series with gaps |
//! | [`Symbol`] | Validated instrument symbol |
//! | [`Interval`] | Resample granularity (1s, 1m, 5m) |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! ## Validation
//!
//! Constructors validate their invariants:
//!
//! ```rust
//! use tickstat_core::{Bar, UtcDateTime, ValidationError};
//!
//! let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap();
//! assert!(Bar::new(ts, 42_000.0, 1.25).is_ok());
//! assert!(matches!(
//!     Bar::new(ts, f64::INFINITY, 1.0),
//!     Err(ValidationError::NonFiniteValue { field: "price" })
//! ));
//! ```

mod interval;
mod models;
mod series;
mod symbol;
mod timestamp;

pub use interval::Interval;
pub use models::{Bar, BarSeries, Tick};
pub use series::TimeSeries;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
