//! One analysis pass over a [`TickBuffer`] snapshot.
//!
//! The pass resamples each configured symbol, derives its statistics, checks
//! alerts against the instrument's snapshot and, when at least two symbols
//! are configured, runs the pairs analyzer on the first two.

use std::collections::HashSet;

use serde::Serialize;
use tickstat_alerts::{AlertCondition, AlertEngine, Snapshot, TriggeredAlertEvent};
use tickstat_core::{BarSeries, Symbol, Tick, TickBuffer};
use tracing::debug;

use crate::adf::AdfResult;
use crate::config::AnalyticsConfig;
use crate::pairs::{PairsAnalyzer, PairsFrame};
use crate::resample::resample_series;
use crate::signals::{generate_signals, Position};
use crate::stats::{self, SummaryStats};
use crate::AnalyticsError;

/// Derived series and summary figures for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentAnalytics {
    pub bars: BarSeries,
    pub returns: Vec<Option<f64>>,
    pub zscore: Vec<Option<f64>>,
    pub volatility: Vec<Option<f64>>,
    pub summary: SummaryStats,
    pub sharpe: Option<f64>,
    pub max_drawdown: f64,
    /// Alerts fired against this instrument's snapshot during the pass.
    pub alerts: Vec<TriggeredAlertEvent>,
}

impl InstrumentAnalytics {
    fn compute(bars: BarSeries, config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let prices = bars.prices();
        let returns = stats::returns(&prices);
        let zscore = stats::zscore(&prices, Some(config.window))?;
        let volatility = stats::volatility(&returns, config.window)?;

        Ok(Self {
            summary: stats::summary_stats(&prices),
            sharpe: stats::sharpe_ratio(&returns, config.risk_free_rate),
            max_drawdown: stats::max_drawdown(&prices),
            bars,
            returns,
            zscore,
            volatility,
            alerts: Vec::new(),
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.bars.symbol
    }

    /// Price, volume and price z-score columns for alert evaluation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_bars(&self.bars.bars).with_zscore(self.zscore.clone())
    }
}

/// Pairs output for the first two configured symbols.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAnalytics {
    pub y: Symbol,
    pub x: Symbol,
    pub frame: PairsFrame,
    pub adf: AdfResult,
    pub signals: Vec<Position>,
}

impl PairAnalytics {
    pub fn latest_signal(&self) -> Position {
        self.signals.last().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Ticks in the buffer snapshot the pass ran on.
    pub ticks: usize,
    pub instruments: Vec<InstrumentAnalytics>,
    pub pair: Option<PairAnalytics>,
}

impl AnalysisReport {
    pub fn instrument(&self, symbol: &Symbol) -> Option<&InstrumentAnalytics> {
        self.instruments.iter().find(|item| item.symbol() == symbol)
    }

    /// Every alert fired during the pass, in instrument order.
    pub fn alerts(&self) -> impl Iterator<Item = &TriggeredAlertEvent> + '_ {
        self.instruments.iter().flat_map(|item| item.alerts.iter())
    }
}

/// Validated symbol set and configuration for repeated passes.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    symbols: Vec<Symbol>,
    config: AnalyticsConfig,
}

impl AnalysisPipeline {
    pub fn new(symbols: Vec<Symbol>, config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        if symbols.is_empty() {
            return Err(AnalyticsError::invalid_config("at least one symbol is required"));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(duplicate) = symbols.iter().find(|symbol| !seen.insert(*symbol)) {
            return Err(AnalyticsError::invalid_config(format!(
                "symbol {duplicate} is listed more than once"
            )));
        }
        config.validate()?;
        Ok(Self { symbols, config })
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Register z-score band and volume spike alerts derived from the config.
    pub fn register_default_alerts(&self, engine: &AlertEngine) {
        let entry = self.config.entry_threshold;
        engine.add(
            "zscore_high",
            AlertCondition::zscore_above(entry),
            format!("z-score above {entry}"),
        );
        engine.add(
            "zscore_low",
            AlertCondition::zscore_lower_band(entry),
            format!("z-score below -{entry}"),
        );
        engine.add(
            "volume_spike",
            AlertCondition::volume_spike(self.config.volume_spike_multiplier),
            format!(
                "volume above {}x the recent average",
                self.config.volume_spike_multiplier
            ),
        );
    }

    pub fn run(
        &self,
        buffer: &TickBuffer,
        engine: &AlertEngine,
    ) -> Result<AnalysisReport, AnalyticsError> {
        let ticks = buffer.snapshot();
        self.run_on(&ticks, engine)
    }

    /// Same pass as [`AnalysisPipeline::run`] over an explicit tick slice.
    pub fn run_on(
        &self,
        ticks: &[Tick],
        engine: &AlertEngine,
    ) -> Result<AnalysisReport, AnalyticsError> {
        let mut instruments = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let bars = resample_series(symbol, ticks, self.config.interval)?;
            let mut analytics = InstrumentAnalytics::compute(bars, &self.config)?;
            analytics.alerts = engine.check(&analytics.snapshot());
            instruments.push(analytics);
        }

        let pair = match instruments.as_slice() {
            [y, x, ..] => self.pair(y, x)?,
            _ => None,
        };

        debug!(
            ticks = ticks.len(),
            symbols = self.symbols.len(),
            pair = pair.is_some(),
            "analysis pass complete"
        );

        Ok(AnalysisReport {
            ticks: ticks.len(),
            instruments,
            pair,
        })
    }

    fn pair(
        &self,
        y: &InstrumentAnalytics,
        x: &InstrumentAnalytics,
    ) -> Result<Option<PairAnalytics>, AnalyticsError> {
        if y.bars.is_empty() || x.bars.is_empty() {
            return Ok(None);
        }

        let mut analyzer = PairsAnalyzer::named(
            y.symbol().as_str(),
            &y.bars.price_series(),
            x.symbol().as_str(),
            &x.bars.price_series(),
        )?;
        let frame = analyzer.compute_all(self.config.window)?;
        let adf = analyzer.adf_test();
        let signals = generate_signals(&frame.zscores(), self.config.thresholds()?);

        Ok(Some(PairAnalytics {
            y: y.symbol().clone(),
            x: x.symbol().clone(),
            frame,
            adf,
            signals,
        }))
    }
}
