//! Behavior-driven tests for rolling statistics
//!
//! These tests verify how derived series keep the source length, stay
//! undefined until enough history exists, and handle flat data.

use tickstat_analytics::stats::{
    max_drawdown, returns, rolling_correlation, rolling_mean, rolling_std, sharpe_ratio,
    summary_stats, volatility, zscore,
};
use tickstat_tests::AnalyticsError;

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

// =============================================================================
// Rolling windows
// =============================================================================

#[test]
fn when_history_is_shorter_than_window_then_leading_values_are_undefined() {
    // Given: Four prices and a window of three
    let prices = defined(&[1.0, 2.0, 3.0, 4.0]);

    // When: Rolling mean and std are computed
    let mean = rolling_mean(&prices, 3).expect("window is valid");
    let std = rolling_std(&prices, 3).expect("window is valid");

    // Then: Output length matches input and the first two positions are undefined
    assert_eq!(mean, vec![None, None, Some(2.0), Some(3.0)]);
    assert_eq!(std.len(), 4);
    assert!(std[..2].iter().all(Option::is_none));
    assert!((std[3].expect("defined") - 1.0).abs() < 1e-12);
}

#[test]
fn when_window_is_zero_then_configuration_error_is_returned() {
    let result = rolling_mean(&defined(&[1.0]), 0);
    assert!(matches!(result, Err(AnalyticsError::InvalidConfiguration { .. })));
}

#[test]
fn when_series_is_constant_then_windowless_zscore_is_entirely_undefined() {
    // Given: A flat price series
    let prices = defined(&[42.0; 8]);

    // When: A window-less z-score is computed
    let z = zscore(&prices, None).expect("zscore should not fail");

    // Then: Every position is undefined instead of an error or infinity
    assert_eq!(z.len(), 8);
    assert!(z.iter().all(Option::is_none));
}

#[test]
fn when_window_is_flat_then_rolling_zscore_is_undefined_there() {
    // Given: Flat start followed by a move
    let prices = defined(&[5.0, 5.0, 5.0, 8.0]);

    // When: A rolling z-score with window 3
    let z = zscore(&prices, Some(3)).expect("zscore should not fail");

    // Then: The flat window is undefined and the moving one is defined
    assert_eq!(&z[..3], &[None, None, None]);
    assert!(z[3].expect("defined") > 0.0);
}

#[test]
fn when_legs_move_together_then_rolling_correlation_is_one() {
    let a = defined(&[1.0, 2.0, 3.0, 5.0, 8.0]);
    let b = defined(&[2.0, 4.0, 6.0, 10.0, 16.0]);

    let corr = rolling_correlation(&a, &b, 3).expect("lengths match");

    assert_eq!(&corr[..2], &[None, None]);
    assert!(corr[2..]
        .iter()
        .all(|c| (c.expect("defined") - 1.0).abs() < 1e-12));
}

#[test]
fn when_correlation_inputs_differ_in_length_then_mismatch_is_reported() {
    let result = rolling_correlation(&defined(&[1.0, 2.0]), &defined(&[1.0]), 2);
    assert_eq!(result, Err(AnalyticsError::LengthMismatch { left: 2, right: 1 }));
}

// =============================================================================
// Returns and performance figures
// =============================================================================

#[test]
fn when_prices_double_then_log_return_is_ln_two() {
    let r = returns(&defined(&[10.0, 20.0]));
    assert_eq!(r[0], None);
    assert!((r[1].expect("defined") - std::f64::consts::LN_2).abs() < 1e-12);
}

#[test]
fn when_price_path_dips_then_max_drawdown_reports_the_worst_decline() {
    // Given: A run-up to 120, a fall to 90, then recovery
    let prices = defined(&[100.0, 120.0, 90.0, 130.0]);

    // When: Max drawdown is computed
    let drawdown = max_drawdown(&prices);

    // Then: It is the 120 -> 90 decline
    assert!((drawdown - (-0.25)).abs() < 1e-12);
    assert_eq!(max_drawdown(&defined(&[1.0, 2.0, 3.0])), 0.0);
}

#[test]
fn when_returns_are_flat_then_sharpe_is_undefined() {
    assert_eq!(sharpe_ratio(&defined(&[0.01; 5]), 0.0), None);
    assert_eq!(sharpe_ratio(&defined(&[0.01]), 0.0), None);
}

#[test]
fn when_returns_vary_then_volatility_is_annualized() {
    let r = defined(&[0.01, -0.01, 0.02, -0.02]);
    let vol = volatility(&r, 4).expect("window is valid");
    let raw = rolling_std(&r, 4).expect("window is valid");
    let ratio = vol[3].expect("defined") / raw[3].expect("defined");
    assert!((ratio - 252.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn when_summary_is_requested_then_undefined_samples_are_skipped() {
    // Given: A series with a gap
    let series = vec![Some(3.0), None, Some(1.0), Some(2.0), Some(6.0)];

    // When: Summary statistics are computed
    let summary = summary_stats(&series);

    // Then: Only the four defined samples count
    assert_eq!(summary.count, 4);
    assert_eq!(summary.mean, Some(3.0));
    assert_eq!(summary.median, Some(2.5));
    assert_eq!(summary.min, Some(1.0));
    assert_eq!(summary.max, Some(6.0));
    assert!(summary.skew.expect("defined") > 0.0);
    assert!(summary.kurtosis.is_some());
}
