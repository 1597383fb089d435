//! # Tickstat Core
//!
//! Core contracts and domain types for the tickstat analytics toolkit.
//!
//! ## Overview
//!
//! This crate provides the foundational components shared by the analytics
//! and alert crates:
//!
//! - **Canonical domain models** for ticks, bars, and indexed series
//! - **Validated identifiers** for symbols, intervals, and UTC timestamps
//! - **Tick buffer** shared between an ingestion task and analysis passes
//! - **Structured errors** for validation failures
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`buffer`] | Append-only tick buffer with snapshot reads |
//! | [`domain`] | Domain models (Tick, Bar, BarSeries, TimeSeries) |
//! | [`error`] | Core error types |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Ingestion       │  (external collaborator)
//! └────────┬────────┘
//!          │ push / extend
//!          ▼
//! ┌─────────────────┐
//! │  TickBuffer     │
//! └────────┬────────┘
//!          │ snapshot
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Bar Aggregator  │────▶│ Statistics/Pairs │
//! └─────────────────┘     └────────┬─────────┘
//!                                  │
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │  Alert Engine    │
//!                         └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use tickstat_core::{Symbol, ValidationError};
//!
//! match Symbol::parse("") {
//!     Err(ValidationError::EmptySymbol) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod buffer;
pub mod domain;
pub mod error;

pub use buffer::TickBuffer;

pub use domain::{Bar, BarSeries, Interval, Symbol, Tick, TimeSeries, UtcDateTime};

pub use error::{CoreError, ValidationError};
