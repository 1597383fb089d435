//! # Tickstat Alerts
//!
//! Named, one-shot threshold alerts evaluated against the most recent row of
//! an analytics [`Snapshot`].
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`condition`] | Tagged predicate variants and the kind table |
//! | [`engine`] | Alert registry, evaluation, and event log |
//! | [`snapshot`] | Column view handed to conditions |
//! | [`error`] | Predicate errors |
//!
//! ```rust
//! use tickstat_alerts::{AlertCondition, AlertEngine, Snapshot};
//!
//! let engine = AlertEngine::new();
//! engine.add("z_high", AlertCondition::zscore_above(2.0), "spread stretched");
//!
//! let snapshot = Snapshot::new().with_zscore(vec![Some(1.2), Some(2.4)]);
//! assert_eq!(engine.check(&snapshot).len(), 1);
//! assert!(engine.check(&snapshot).is_empty());
//! ```

pub mod condition;
pub mod engine;
pub mod error;
pub mod snapshot;

pub use condition::{
    AlertCondition, ConditionFactory, DEFAULT_VOLUME_SPIKE_MULTIPLIER, VOLUME_SPIKE_LOOKBACK,
};
pub use engine::{Alert, AlertEngine, TriggeredAlertEvent};
pub use error::PredicateError;
pub use snapshot::Snapshot;
