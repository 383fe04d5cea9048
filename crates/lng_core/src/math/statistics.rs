//! Sample statistics.
//!
//! Small, allocation-light helpers shared by covariance estimation and the
//! Monte Carlo risk metrics.

use crate::types::NumericalError;

const RANK_TOLERANCE: f64 = 1e-9;

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the n-1 denominator.
///
/// Returns 0.0 when fewer than two observations are available.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Sample covariance of two equally long series (n-1 denominator).
///
/// # Errors
///
/// Returns `NumericalError::DimensionMismatch` if the lengths differ and
/// `NumericalError::InsufficientData` for fewer than two observations.
pub fn sample_covariance(x: &[f64], y: &[f64]) -> Result<f64, NumericalError> {
    if x.len() != y.len() {
        return Err(NumericalError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(NumericalError::InsufficientData {
            got: x.len(),
            need: 2,
        });
    }
    let mx = mean(x);
    let my = mean(y);
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(sum / (x.len() - 1) as f64)
}

/// Empirical quantile of an ascending-sorted sample by the nearest-rank rule.
///
/// The index is `ceil(p * n) - 1`, clamped to the sample. Returns `None` for
/// an empty sample.
///
/// # Examples
///
/// ```
/// use lng_core::math::statistics::quantile_sorted;
///
/// let sorted: Vec<f64> = (1..=100).map(|v| v as f64).collect();
/// assert_eq!(quantile_sorted(&sorted, 0.05), Some(5.0));
/// assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
/// ```
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let p = p.clamp(0.0, 1.0);
    // 1.0 - 0.95 is not exactly 0.05; absorb the rounding before ceil
    let rank = (p * n as f64 - RANK_TOLERANCE).ceil() as usize;
    let idx = rank.saturating_sub(1).min(n - 1);
    Some(sorted[idx])
}

/// Returns an ascending-sorted copy of `values` (NaN sorts last).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Log returns `ln(x_t / x_{t-1})` of a strictly positive price series.
///
/// # Errors
///
/// Returns `NumericalError::InvalidInput` if any observation is not a
/// positive finite number.
pub fn log_returns(series: &[f64]) -> Result<Vec<f64>, NumericalError> {
    if let Some(bad) = series.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(NumericalError::InvalidInput {
            name: "price series",
            reason: format!("observation {} is not a positive finite price", bad),
        });
    }
    Ok(series.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Clips observations to `mean ± k * std` in place.
///
/// Used to cap outliers in historical returns before covariance estimation.
pub fn winsorise(values: &mut [f64], k: f64) {
    let m = mean(values);
    let s = sample_std_dev(values);
    if s == 0.0 {
        return;
    }
    let (lo, hi) = (m - k * s, m + k * s);
    for v in values.iter_mut() {
        *v = v.clamp(lo, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&v), 5.0);
        // population std is 2, sample std is sqrt(32/7)
        assert_relative_eq!(sample_std_dev(&v), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_samples() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_std_dev(&[3.0]), 0.0);
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_nearest_rank() {
        let s = sorted(&[5.0, 1.0, 3.0, 2.0, 4.0]);
        assert_eq!(quantile_sorted(&s, 0.2), Some(1.0));
        assert_eq!(quantile_sorted(&s, 0.21), Some(2.0));
        assert_eq!(quantile_sorted(&s, 1.0), Some(5.0));
    }

    #[test]
    fn test_covariance_mismatch() {
        assert!(matches!(
            sample_covariance(&[1.0, 2.0], &[1.0]),
            Err(NumericalError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_log_returns_rejects_non_positive() {
        assert!(log_returns(&[1.0, 0.0, 2.0]).is_err());
        let r = log_returns(&[1.0, std::f64::consts::E]).unwrap();
        assert_relative_eq!(r[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_winsorise_caps_outlier() {
        let mut v = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0];
        winsorise(&mut v, 1.0);
        assert!(v[9] < 10.0);
        assert_eq!(v[0], 0.0);
    }
}
