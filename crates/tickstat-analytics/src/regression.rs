//! Ordinary least squares for small designs (a handful of regressors).

use std::f64::consts::PI;

/// Fitted OLS model.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    pub nobs: usize,
}

impl OlsFit {
    pub fn t_value(&self, column: usize) -> Option<f64> {
        let coefficient = *self.coefficients.get(column)?;
        let std_error = *self.std_errors.get(column)?;
        (std_error > 0.0).then(|| coefficient / std_error)
    }

    /// Gaussian log-likelihood at the fitted parameters.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion, counting every column (constant included).
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.coefficients.len() as f64
    }
}

/// Fit `response ~ design` where each design row holds the regressors.
///
/// Returns `None` when there are no residual degrees of freedom, the design
/// is singular, or the fit is exact (zero residual variance).
pub fn ols(design: &[Vec<f64>], response: &[f64]) -> Option<OlsFit> {
    let nobs = response.len();
    let k = design.first()?.len();
    if k == 0 || design.len() != nobs || nobs <= k || design.iter().any(|row| row.len() != k) {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, y) in design.iter().zip(response) {
        for i in 0..k {
            xty[i] += row[i] * y;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let inverse = invert(xtx)?;
    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum())
        .collect();

    let ssr: f64 = design
        .iter()
        .zip(response)
        .map(|(row, y)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (y - fitted).powi(2)
        })
        .sum();
    let response_ss: f64 = response.iter().map(|y| y * y).sum();
    if !ssr.is_finite() || ssr <= response_ss * f64::EPSILON {
        return None;
    }

    let sigma2 = ssr / (nobs - k) as f64;
    let std_errors = (0..k).map(|i| (sigma2 * inverse[i][i]).max(0.0).sqrt()).collect();

    Some(OlsFit {
        coefficients,
        std_errors,
        ssr,
        nobs,
    })
}

/// Slope and intercept of `y ~ 1 + x`. `None` with fewer than two points or
/// no variation in `x`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    if x.iter().all(|v| *v == x[0]) {
        return None;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        sxy += (xi - mean_x) * (yi - mean_y);
        sxx += (xi - mean_x).powi(2);
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Gauss-Jordan inversion with partial pivoting.
fn invert(mut matrix: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let scale = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tolerance = scale * f64::EPSILON * n as f64;

    let mut inverse: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))?;
        if matrix[pivot_row][col].abs() <= tolerance {
            return None;
        }
        matrix.swap(col, pivot_row);
        inverse.swap(col, pivot_row);

        let pivot = matrix[col][col];
        for j in 0..n {
            matrix[col][j] /= pivot;
            inverse[col][j] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = matrix[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                matrix[row][j] -= factor * matrix[col][j];
                inverse[row][j] -= factor * inverse[col][j];
            }
        }
    }
    Some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fit_recovers_slope_and_intercept() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let (slope, intercept) = linear_fit(&x, &y).expect("fit");
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_needs_variation() {
        assert_eq!(linear_fit(&[1.0], &[2.0]), None);
        assert_eq!(linear_fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn ols_matches_closed_form_with_noise() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.2, 7.8, 10.1];
        let design: Vec<Vec<f64>> = x.iter().map(|v| vec![1.0, *v]).collect();
        let fit = ols(&design, &y).expect("fit");
        let (slope, intercept) = linear_fit(&x, &y).expect("fit");

        assert!((fit.coefficients[1] - slope).abs() < 1e-10);
        assert!((fit.coefficients[0] - intercept).abs() < 1e-10);
        assert_eq!(fit.nobs, 5);
        assert!(fit.t_value(1).expect("t") > 10.0);
    }

    #[test]
    fn ols_rejects_singular_design() {
        let design = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, 2.0]];
        assert_eq!(ols(&design, &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn ols_rejects_exact_fit() {
        let design: Vec<Vec<f64>> = (0..4).map(|v| vec![1.0, v as f64]).collect();
        assert_eq!(ols(&design, &[1.0, 3.0, 5.0, 7.0]), None);
    }
}
