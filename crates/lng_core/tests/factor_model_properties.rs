//! Property tests for the factor-model numerics and month arithmetic.

use approx::assert_relative_eq;
use lng_core::math::linalg::{CovarianceMatrix, DEFAULT_EIGEN_FLOOR};
use lng_core::math::statistics::{quantile_sorted, sorted};
use lng_core::types::DeliveryMonth;
use proptest::prelude::*;

/// Symmetric 4x4 matrix with unit diagonal and off-diagonals in [-0.99, 0.99].
/// Not necessarily positive semi-definite.
fn pseudo_correlation() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.99_f64..0.99, 6).prop_map(|off| {
        let mut m = vec![0.0; 16];
        let mut k = 0;
        for i in 0..4 {
            m[i * 4 + i] = 1.0;
            for j in (i + 1)..4 {
                m[i * 4 + j] = off[k];
                m[j * 4 + i] = off[k];
                k += 1;
            }
        }
        m
    })
}

fn vols() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.05_f64..1.2, 4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_repaired_matrix_factorises_and_keeps_variances(
        corr in pseudo_correlation(),
        vols in vols(),
    ) {
        let cov = CovarianceMatrix::from_correlation(&corr, &vols).unwrap();
        let repaired = cov.nearest_psd(DEFAULT_EIGEN_FLOOR).unwrap();

        prop_assert!(repaired.is_psd(1e-10));
        for i in 0..4 {
            prop_assert!((repaired.get(i, i) - cov.get(i, i)).abs() < 1e-9);
            for j in 0..4 {
                prop_assert!((repaired.get(i, j) - repaired.get(j, i)).abs() < 1e-12);
            }
        }

        let chol = repaired.cholesky().unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let llt: f64 = (0..4).map(|k| chol.get(i, k) * chol.get(j, k)).sum();
                prop_assert!((llt - repaired.get(i, j)).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_eigenvalues_sum_to_trace(corr in pseudo_correlation(), vols in vols()) {
        let cov = CovarianceMatrix::from_correlation(&corr, &vols).unwrap();
        let trace: f64 = (0..4).map(|i| cov.get(i, i)).sum();
        let sum: f64 = cov.eigenvalues().iter().sum();
        prop_assert!((trace - sum).abs() < 1e-9);
    }

    #[test]
    fn test_add_months_inverts_months_since(
        year in 2000_i32..2100,
        month in 1_u32..=12,
        offset in -240_i32..240,
    ) {
        let start = DeliveryMonth::new(year, month).unwrap();
        let shifted = start.add_months(offset);
        prop_assert_eq!(shifted.months_since(&start), offset);
        prop_assert!((1..=12).contains(&shifted.month()));
    }

    #[test]
    fn test_quantile_lies_in_sample(
        values in prop::collection::vec(-1.0e6_f64..1.0e6, 1..200),
        p in 0.0_f64..1.0,
    ) {
        let s = sorted(&values);
        let q = quantile_sorted(&s, p).unwrap();
        prop_assert!(q >= s[0] && q <= s[s.len() - 1]);
    }
}

#[test]
fn test_reference_factor_model_is_positive_definite() {
    let corr = [
        1.00, 0.35, 0.25, 0.10, //
        0.35, 1.00, 0.55, 0.30, //
        0.25, 0.55, 1.00, 0.20, //
        0.10, 0.30, 0.20, 1.00,
    ];
    let cov = CovarianceMatrix::from_correlation(&corr, &[0.55, 0.45, 0.30, 0.60]).unwrap();
    assert!(cov.min_eigenvalue() > 0.0);
    let chol = cov.cholesky().unwrap();
    assert_relative_eq!(chol.get(0, 0), 0.55, epsilon = 1e-12);
}
