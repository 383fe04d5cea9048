//! Dense symmetric linear algebra for the factor model.
//!
//! ## Mathematical Background
//!
//! Correlated log-shocks are generated from independent normals `Z` as
//!
//! ```text
//! W = L * Z,    Σ = L * L^T
//! ```
//!
//! where `Σ` is the annualised covariance of the stochastic factors. Historical
//! estimation with clipped series, or a hand-edited correlation table, can
//! leave `Σ` slightly indefinite. [`CovarianceMatrix::nearest_psd`] repairs it
//! by eigenvalue clipping (nalgebra symmetric eigen-decomposition), reconstruction and a
//! diagonal rescale that restores the original variances.
//!
//! ## Usage
//!
//! ```
//! use lng_core::math::linalg::CovarianceMatrix;
//!
//! let cov = CovarianceMatrix::from_correlation(
//!     &[1.0, 0.6, 0.6, 1.0],
//!     &[0.5, 0.2],
//! )
//! .unwrap();
//!
//! let chol = cov.cholesky().unwrap();
//! let w = chol.transform(&[1.0, 0.0]);
//! assert!((w[0] - 0.5).abs() < 1e-12);
//! assert!((w[1] - 0.12).abs() < 1e-12);
//! ```

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use super::statistics::{log_returns, sample_covariance, winsorise};
use crate::types::NumericalError;

/// Default eigenvalue floor used by the nearest-PSD repair.
pub const DEFAULT_EIGEN_FLOOR: f64 = 1e-10;

const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Symmetric covariance matrix stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct CovarianceMatrix {
    /// Matrix elements in row-major order
    data: Vec<f64>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl CovarianceMatrix {
    /// Create a covariance matrix from a flat row-major array.
    ///
    /// # Arguments
    ///
    /// * `data` - Matrix elements in row-major order (n*n elements)
    /// * `dim` - Matrix dimension (n)
    ///
    /// # Validation
    ///
    /// - Must have exactly dim*dim finite elements
    /// - Diagonal (variances) must be non-negative
    /// - Must be symmetric within 1e-10
    ///
    /// Positive semi-definiteness is not checked here; see [`Self::nearest_psd`].
    pub fn new(data: &[f64], dim: usize) -> Result<Self, NumericalError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(NumericalError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(NumericalError::InvalidInput {
                name: "covariance",
                reason: "contains non-finite entries".to_string(),
            });
        }
        for i in 0..dim {
            if data[i * dim + i] < 0.0 {
                return Err(NumericalError::InvalidInput {
                    name: "covariance",
                    reason: format!("negative variance at index {}", i),
                });
            }
            for j in (i + 1)..dim {
                if (data[i * dim + j] - data[j * dim + i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(NumericalError::NotSymmetric { row: i, col: j });
                }
            }
        }
        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Build `Σ_ij = ρ_ij σ_i σ_j` from a correlation matrix and annualised
    /// volatilities.
    ///
    /// # Arguments
    ///
    /// * `correlation` - Row-major correlation matrix (n*n elements)
    /// * `volatilities` - Annualised volatility per factor (n elements)
    pub fn from_correlation(
        correlation: &[f64],
        volatilities: &[f64],
    ) -> Result<Self, NumericalError> {
        let dim = volatilities.len();
        if correlation.len() != dim * dim {
            return Err(NumericalError::DimensionMismatch {
                expected: dim * dim,
                got: correlation.len(),
            });
        }
        if let Some(v) = volatilities.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(NumericalError::InvalidInput {
                name: "volatility",
                reason: format!("{} is not a non-negative finite number", v),
            });
        }
        for i in 0..dim {
            let diag = correlation[i * dim + i];
            if (diag - 1.0).abs() > SYMMETRY_TOLERANCE {
                return Err(NumericalError::InvalidInput {
                    name: "correlation",
                    reason: format!("diagonal element {} is {}, expected 1", i, diag),
                });
            }
            for j in 0..dim {
                let rho = correlation[i * dim + j];
                if !(-1.0..=1.0).contains(&rho) {
                    return Err(NumericalError::InvalidInput {
                        name: "correlation",
                        reason: format!("entry ({}, {}) = {} outside [-1, 1]", i, j, rho),
                    });
                }
            }
        }

        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            for j in 0..dim {
                data[i * dim + j] = correlation[i * dim + j] * volatilities[i] * volatilities[j];
            }
        }
        Self::new(&data, dim)
    }

    /// Estimate an annualised covariance from overlapping price histories.
    ///
    /// Series are aligned on their most recent observations and truncated to
    /// the shortest one. Covariance is computed on log returns and scaled by
    /// `periods_per_year` (12 for monthly data). When `clip` is set, each
    /// return series is winsorised to `mean ± clip * std` first.
    ///
    /// # Errors
    ///
    /// `InsufficientData` when fewer than three overlapping prices exist,
    /// `InvalidInput` for non-positive prices.
    pub fn estimate(
        series: &[&[f64]],
        periods_per_year: f64,
        clip: Option<f64>,
    ) -> Result<Self, NumericalError> {
        let dim = series.len();
        let overlap = series.iter().map(|s| s.len()).min().unwrap_or(0);
        if dim == 0 || overlap < 3 {
            return Err(NumericalError::InsufficientData {
                got: overlap,
                need: 3,
            });
        }

        let mut returns = Vec::with_capacity(dim);
        for s in series {
            let tail = &s[s.len() - overlap..];
            let mut r = log_returns(tail)?;
            if let Some(k) = clip {
                winsorise(&mut r, k);
            }
            returns.push(r);
        }

        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            for j in i..dim {
                let c = sample_covariance(&returns[i], &returns[j])? * periods_per_year;
                data[i * dim + j] = c;
                data[j * dim + i] = c;
            }
        }
        Self::new(&data, dim)
    }

    /// Get matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Volatility (square root of the variance) of factor `i`.
    #[inline]
    pub fn volatility(&self, i: usize) -> f64 {
        self.get(i, i).sqrt()
    }

    /// Row-major view of the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.dim, self.dim, &self.data)
    }

    /// Eigenvalues, unordered.
    pub fn eigenvalues(&self) -> Vec<f64> {
        if self.dim == 0 {
            return Vec::new();
        }
        SymmetricEigen::new(self.to_dmatrix())
            .eigenvalues
            .iter()
            .copied()
            .collect()
    }

    /// Smallest eigenvalue; `+inf` for an empty matrix.
    pub fn min_eigenvalue(&self) -> f64 {
        self.eigenvalues()
            .into_iter()
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns whether every eigenvalue is at least `-tolerance`.
    pub fn is_psd(&self, tolerance: f64) -> bool {
        self.min_eigenvalue() >= -tolerance
    }

    /// Nearest positive semi-definite matrix by eigenvalue clipping.
    ///
    /// Eigenvalues below `floor` are raised to `floor`, the matrix is rebuilt
    /// as `V Λ V^T`, symmetrised, and rescaled by a diagonal matrix so every
    /// variance equals its original value. A matrix already satisfying the
    /// floor is returned unchanged.
    ///
    /// # Errors
    ///
    /// `NotPositiveSemiDefinite` if the repaired matrix still has a negative
    /// eigenvalue beyond rounding.
    pub fn nearest_psd(&self, floor: f64) -> Result<Self, NumericalError> {
        let n = self.dim;
        if n == 0 {
            return Ok(self.clone());
        }
        let eig = SymmetricEigen::new(self.to_dmatrix());
        if eig.eigenvalues.iter().all(|&l| l >= floor) {
            return Ok(self.clone());
        }

        let clipped = DVector::from_iterator(n, eig.eigenvalues.iter().map(|l| l.max(floor)));
        let rebuilt =
            &eig.eigenvectors * DMatrix::from_diagonal(&clipped) * eig.eigenvectors.transpose();
        let rebuilt = 0.5 * (&rebuilt + rebuilt.transpose());

        let scale: Vec<f64> = (0..n)
            .map(|i| {
                let target = self.get(i, i);
                let current = rebuilt[(i, i)];
                if current > 0.0 {
                    (target / current).sqrt()
                } else {
                    0.0
                }
            })
            .collect();
        let data: Vec<f64> = (0..n * n)
            .map(|k| {
                let (i, j) = (k / n, k % n);
                rebuilt[(i, j)] * scale[i] * scale[j]
            })
            .collect();

        let repaired = Self { data, dim: n };
        let min_eigenvalue = repaired.min_eigenvalue();
        let tolerance = 1e-12 * self.max_variance().max(1.0);
        if min_eigenvalue < -tolerance {
            return Err(NumericalError::NotPositiveSemiDefinite { min_eigenvalue });
        }
        Ok(repaired)
    }

    /// Cholesky factorisation `Σ = L L^T`.
    ///
    /// Zero pivots within rounding of a PSD matrix are accepted and produce a
    /// zero column, so degenerate factors (zero volatility, perfect
    /// correlation) still factorise.
    ///
    /// # Errors
    ///
    /// `CholeskyFailed` at the first pivot that is negative beyond tolerance.
    pub fn cholesky(&self) -> Result<CholeskyFactor, NumericalError> {
        let n = self.dim;
        let tol = 1e-12 * self.max_variance().max(f64::MIN_POSITIVE);
        let mut lower = vec![0.0; n * n];

        for j in 0..n {
            let sum: f64 = (0..j).map(|k| lower[j * n + k] * lower[j * n + k]).sum();
            let diag = self.get(j, j) - sum;
            if diag < -tol {
                return Err(NumericalError::CholeskyFailed { pivot: j });
            }
            if diag <= tol {
                continue;
            }
            let l_jj = diag.sqrt();
            lower[j * n + j] = l_jj;
            for i in (j + 1)..n {
                let sum: f64 = (0..j).map(|k| lower[i * n + k] * lower[j * n + k]).sum();
                lower[i * n + j] = (self.get(i, j) - sum) / l_jj;
            }
        }

        Ok(CholeskyFactor { data: lower, dim: n })
    }

    fn max_variance(&self) -> f64 {
        (0..self.dim).map(|i| self.get(i, i)).fold(0.0, f64::max)
    }
}

/// Lower triangular Cholesky factor of a covariance matrix.
///
/// Used to transform independent standard normals into correlated shocks.
#[derive(Clone, Debug)]
pub struct CholeskyFactor {
    /// Lower triangular matrix elements (row-major)
    data: Vec<f64>,
    /// Matrix dimension
    dim: usize,
}

impl CholeskyFactor {
    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j). Returns zero above the diagonal.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Transform independent standard normals into correlated shocks `L z`.
    ///
    /// Only the first `dim` entries of `z` are read; missing entries are
    /// treated as zero.
    pub fn transform(&self, z: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.dim];
        self.transform_into(z, &mut out);
        out
    }

    /// Transform into a caller-provided buffer of length at least `dim`.
    pub fn transform_into(&self, z: &[f64], out: &mut [f64]) {
        let n = self.dim;
        for i in 0..n.min(out.len()) {
            out[i] = (0..=i)
                .map(|j| self.data[i * n + j] * z.get(j).copied().unwrap_or(0.0))
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ================================================================
    // Construction
    // ================================================================

    #[test]
    fn test_new_rejects_asymmetric() {
        let result = CovarianceMatrix::new(&[1.0, 0.2, 0.3, 1.0], 2);
        assert!(matches!(
            result,
            Err(NumericalError::NotSymmetric { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(matches!(
            CovarianceMatrix::new(&[1.0, 0.0, 0.0], 2),
            Err(NumericalError::DimensionMismatch { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn test_from_correlation_scales_by_vols() {
        let cov = CovarianceMatrix::from_correlation(&[1.0, -0.3, -0.3, 1.0], &[0.2, 0.5]).unwrap();
        assert_relative_eq!(cov.get(0, 0), 0.04, epsilon = 1e-15);
        assert_relative_eq!(cov.get(0, 1), -0.03, epsilon = 1e-15);
        assert_relative_eq!(cov.volatility(1), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_from_correlation_rejects_out_of_range() {
        let result = CovarianceMatrix::from_correlation(&[1.0, 1.5, 1.5, 1.0], &[0.2, 0.2]);
        assert!(matches!(result, Err(NumericalError::InvalidInput { .. })));
    }

    #[test]
    fn test_estimate_constant_growth_has_zero_variance() {
        let a: Vec<f64> = (0..24).map(|i| 100.0 * (0.01 * i as f64).exp()).collect();
        let b: Vec<f64> = (0..24).map(|i| 50.0 * (0.02 * i as f64).exp()).collect();
        let cov = CovarianceMatrix::estimate(&[&a, &b], 12.0, None).unwrap();
        // constant returns have zero variance
        assert_relative_eq!(cov.get(0, 0), 0.0, epsilon = 1e-20);
    }

    #[test]
    fn test_estimate_aligns_on_tail() {
        let long = [1.0, 5.0, 1.0, 2.0, 1.0, 2.0];
        let short = [1.0, 2.0, 1.0, 2.0];
        let cov = CovarianceMatrix::estimate(&[&long, &short], 1.0, None).unwrap();
        assert_relative_eq!(cov.get(0, 0), cov.get(1, 1), epsilon = 1e-12);
        assert_relative_eq!(cov.get(0, 1), cov.get(0, 0), epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_requires_overlap() {
        let a = [1.0, 2.0];
        assert!(matches!(
            CovarianceMatrix::estimate(&[&a], 12.0, None),
            Err(NumericalError::InsufficientData { got: 2, need: 3 })
        ));
    }

    // ================================================================
    // Eigenvalues / repair
    // ================================================================

    #[test]
    fn test_eigenvalues_sum_to_trace() {
        let cov = CovarianceMatrix::new(&[4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0], 3).unwrap();
        let values = cov.eigenvalues();
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values.iter().sum::<f64>(), 9.0, epsilon = 1e-10);
        assert!(values.iter().all(|&l| l > 0.0));
    }

    #[test]
    fn test_eigenvalues_of_2x2() {
        let cov = CovarianceMatrix::new(&[2.0, 1.0, 1.0, 2.0], 2).unwrap();
        let mut values = cov.eigenvalues();
        values.sort_by(|a, b| a.total_cmp(b));
        assert_relative_eq!(values[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_min_eigenvalue_of_empty_matrix_is_infinite() {
        let cov = CovarianceMatrix::new(&[], 0).unwrap();
        assert!(cov.min_eigenvalue().is_infinite());
        assert!(cov.is_psd(0.0));
    }

    #[test]
    fn test_nearest_psd_of_singular_correlation_factorises() {
        // perfectly correlated pair: one eigenvalue is exactly zero
        let cov = CovarianceMatrix::from_correlation(&[1.0, 1.0, 1.0, 1.0], &[0.3, 0.3]).unwrap();
        let repaired = cov.nearest_psd(DEFAULT_EIGEN_FLOOR).unwrap();
        assert!(repaired.is_psd(1e-12));
        assert_relative_eq!(repaired.get(0, 0), 0.09, epsilon = 1e-12);
        assert!(repaired.cholesky().is_ok());
    }

    #[test]
    fn test_nearest_psd_repairs_indefinite_correlation() {
        // pairwise plausible, jointly inconsistent
        let corr = [1.0, 0.9, -0.9, 0.9, 1.0, 0.9, -0.9, 0.9, 1.0];
        let cov = CovarianceMatrix::from_correlation(&corr, &[0.3, 0.4, 0.5]).unwrap();
        assert!(cov.min_eigenvalue() < 0.0);

        let repaired = cov.nearest_psd(DEFAULT_EIGEN_FLOOR).unwrap();
        assert!(repaired.is_psd(1e-12));
        for i in 0..3 {
            assert_relative_eq!(repaired.get(i, i), cov.get(i, i), epsilon = 1e-12);
        }
        assert!(repaired.cholesky().is_ok());
    }

    #[test]
    fn test_nearest_psd_keeps_valid_matrix() {
        let cov = CovarianceMatrix::from_correlation(&[1.0, 0.5, 0.5, 1.0], &[0.3, 0.3]).unwrap();
        assert_eq!(cov.nearest_psd(DEFAULT_EIGEN_FLOOR).unwrap(), cov);
    }

    // ================================================================
    // Cholesky
    // ================================================================

    #[test]
    fn test_cholesky_reproduces_matrix() {
        let cov = CovarianceMatrix::new(&[4.0, 2.0, 2.0, 5.0], 2).unwrap();
        let l = cov.cholesky().unwrap();
        assert_relative_eq!(l.get(0, 0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(l.get(1, 0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(l.get(1, 1), 2.0, epsilon = 1e-12);
        assert_eq!(l.get(0, 1), 0.0);
    }

    #[test]
    fn test_cholesky_accepts_zero_volatility_factor() {
        let cov = CovarianceMatrix::from_correlation(&[1.0, 0.0, 0.0, 1.0], &[0.3, 0.0]).unwrap();
        let l = cov.cholesky().unwrap();
        let w = l.transform(&[1.0, 1.0]);
        assert_relative_eq!(w[0], 0.3, epsilon = 1e-12);
        assert_eq!(w[1], 0.0);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let cov = CovarianceMatrix::new(&[1.0, 2.0, 2.0, 1.0], 2).unwrap();
        assert!(matches!(
            cov.cholesky(),
            Err(NumericalError::CholeskyFailed { pivot: 1 })
        ));
    }
}
