//! Behavior-driven tests for pairs analysis
//!
//! These tests verify hedge ratio estimation and caching, spread
//! construction, the ADF guard and the hysteresis signal.

use tickstat_analytics::{
    adf_test, generate_signals, AdfResult, HedgeEstimate, PairsAnalyzer, Position,
    SignalThresholds,
};
use tickstat_tests::{minute_series, noise, AnalyticsError};

// =============================================================================
// Pairs: Hedge ratio
// =============================================================================

#[test]
fn when_fewer_than_two_observations_pair_then_hedge_ratio_is_exactly_one() {
    // Given: Two legs that overlap on a single timestamp
    let y = minute_series(0, &[10.0, 11.0]);
    let x = minute_series(60, &[20.0, 21.0]);
    let mut analyzer = PairsAnalyzer::new(&y, &x).expect("one common timestamp");

    // When: The hedge ratio is requested
    let hedge = analyzer.hedge_ratio();

    // Then: The fallback ratio is used and the spread is a plain difference
    assert_eq!(hedge.value, 1.0);
    assert_eq!(hedge.estimate, HedgeEstimate::Fallback { observations: 1 });
    assert_eq!(analyzer.spread(), &[Some(11.0 - 20.0)]);
}

#[test]
fn when_hedge_leg_is_flat_then_fallback_ratio_is_used() {
    let y = minute_series(0, &[1.0, 2.0, 3.0]);
    let x = minute_series(0, &[5.0, 5.0, 5.0]);
    let mut analyzer = PairsAnalyzer::new(&y, &x).expect("aligned");

    assert_eq!(analyzer.hedge_ratio().value, 1.0);
}

#[test]
fn when_legs_share_no_timestamp_then_alignment_error_names_both() {
    // Given: Legs on disjoint grids
    let y = minute_series(0, &[1.0, 2.0]);
    let x = minute_series(30, &[1.0, 2.0]);

    // When: An analyzer is built
    let result = PairsAnalyzer::named("ETHUSDT", &y, "BTCUSDT", &x);

    // Then: The caller sees which pair failed
    assert_eq!(
        result.expect_err("must not align").to_string(),
        "series 'ETHUSDT' and 'BTCUSDT' share no common timestamps"
    );
}

#[test]
fn when_hedge_ratio_was_estimated_then_it_is_reused_until_recomputed() {
    // Given: A cointegrated pair y = 0.5 x + noise
    let x: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .zip(noise(30, 3))
        .map(|(x, e)| 0.5 * x + 0.1 * e)
        .collect();
    let mut analyzer =
        PairsAnalyzer::new(&minute_series(0, &y), &minute_series(0, &x)).expect("aligned");

    // When: The spread z-score is computed
    analyzer.spread_zscore(5).expect("window is valid");
    let first = analyzer.model().hedge_ratio().expect("estimated on demand");

    // Then: The estimate is close to 0.5 and cached
    assert!((first.value - 0.5).abs() < 0.01);
    assert_eq!(analyzer.hedge_ratio(), first);
    assert!(analyzer.model().zscore().is_some());

    // When: Recomputed explicitly
    analyzer.recompute_hedge_ratio();

    // Then: Derived series are cleared until asked for again
    assert!(analyzer.model().spread().is_none());
    assert!(analyzer.model().zscore().is_none());
}

#[test]
fn when_compute_all_runs_then_rows_align_with_common_index() {
    // Given: Overlapping legs of different lengths
    let y = minute_series(0, &[50.0, 50.4, 51.1, 50.8, 51.5, 52.0, 51.7]);
    let x = minute_series(60, &[100.0, 101.5, 101.0, 102.6, 103.5, 103.2, 104.0]);
    let mut analyzer = PairsAnalyzer::new(&y, &x).expect("aligned");

    // When: Everything is computed with a window of 3
    let frame = analyzer.compute_all(3).expect("window is valid");

    // Then: Six common rows, warm-up rows undefined
    assert_eq!(frame.rows.len(), 6);
    assert_eq!(frame.rows[0].price_y, Some(50.4));
    assert_eq!(frame.rows[0].price_x, Some(100.0));
    assert!(frame.rows[..2].iter().all(|row| row.zscore.is_none()));
    assert!(frame.rows[2..].iter().all(|row| row.spread.is_some()));
    assert_eq!(frame.latest().map(|row| row.timestamp), analyzer.index().last().copied());
}

#[test]
fn when_window_is_zero_then_compute_all_refuses() {
    let mut analyzer =
        PairsAnalyzer::new(&minute_series(0, &[1.0, 2.0]), &minute_series(0, &[1.0, 3.0]))
            .expect("aligned");
    assert!(matches!(
        analyzer.compute_all(0),
        Err(AnalyticsError::InvalidConfiguration { .. })
    ));
}

// =============================================================================
// Pairs: Stationarity
// =============================================================================

#[test]
fn when_spread_has_five_values_then_adf_reports_insufficient_data() {
    // Given: A spread with five defined values among gaps
    let spread = vec![Some(0.1), None, Some(-0.2), Some(0.05), None, Some(0.3), Some(-0.1)];

    // When: The ADF test is requested
    let result = adf_test(&spread);

    // Then: Not stationary, no statistic
    assert_eq!(result, AdfResult::InsufficientData { observations: 5 });
    assert!(!result.is_stationary());
    assert_eq!(result.test_statistic(), None);
    assert_eq!(result.p_value(), None);
}

#[test]
fn when_spread_is_mean_reverting_then_adf_reports_stationary() {
    // Given: y = 2x + white noise, with x a random walk
    let x: Vec<f64> = noise(150, 21)
        .into_iter()
        .scan(100.0, |level, step| {
            *level += step;
            Some(*level)
        })
        .collect();
    let y: Vec<f64> = x
        .iter()
        .zip(noise(150, 5))
        .map(|(x, e)| 2.0 * x + e)
        .collect();
    let mut analyzer =
        PairsAnalyzer::new(&minute_series(0, &y), &minute_series(0, &x)).expect("aligned");

    // When: The spread is tested
    let result = analyzer.adf_test();

    // Then: The residual spread is stationary at 5%
    let report = result.report().expect("test must run");
    assert!(result.is_stationary());
    assert!(report.p_value < 0.05);
    assert_eq!(result.label(), "Stationary");
}

// =============================================================================
// Pairs: Signals
// =============================================================================

#[test]
fn when_zscore_crosses_bands_then_signal_follows_hysteresis() {
    // Given: The reference z-score path with entry 2.0 and exit 0.5
    let z = [0.0, 2.5, 1.0, 0.3, -2.6, 0.1].map(Some);
    let thresholds = SignalThresholds::new(2.0, 0.5).expect("valid band");

    // When: Signals are generated
    let signals = generate_signals(&z, thresholds);

    // Then: Short on the upper breach, flat inside the exit band, long on the lower breach
    assert_eq!(
        signals,
        vec![
            Position::Flat,
            Position::Short,
            Position::Short,
            Position::Flat,
            Position::Long,
            Position::Flat,
        ]
    );
}

#[test]
fn when_zscore_is_undefined_at_the_start_then_signal_stays_flat() {
    let z = [None, None, Some(1.5), Some(2.1)];
    let signals = generate_signals(&z, SignalThresholds::default());
    assert_eq!(
        signals,
        vec![Position::Flat, Position::Flat, Position::Flat, Position::Short]
    );
}
