//! Factor model: repaired covariance and its Cholesky factor.

use crate::market::FactorModelSpec;
use lng_core::math::linalg::{CholeskyFactor, CovarianceMatrix, DEFAULT_EIGEN_FLOOR};
use lng_core::types::{NumericalError, PriceFactor};
use tracing::{debug, warn};

/// Number of simulated factors.
pub const N_FACTORS: usize = PriceFactor::STOCHASTIC.len();

const MONTHS_PER_YEAR: f64 = 12.0;

/// Covariance over Henry Hub, JKM, Brent and freight, ready for simulation.
#[derive(Clone, Debug)]
pub struct FactorModel {
    covariance: CovarianceMatrix,
    cholesky: CholeskyFactor,
    repaired: bool,
}

impl FactorModel {
    /// Builds the model from a specification.
    ///
    /// The covariance is repaired to the nearest PSD matrix when needed and
    /// then factorised.
    ///
    /// # Errors
    ///
    /// Any `NumericalError` from construction, repair or factorisation. The
    /// caller treats this as "Monte Carlo unavailable".
    pub fn from_spec(spec: &FactorModelSpec) -> Result<Self, NumericalError> {
        let covariance = match spec {
            FactorModelSpec::Parametric {
                correlation,
                volatilities,
            } => {
                if volatilities.len() != N_FACTORS {
                    return Err(NumericalError::DimensionMismatch {
                        expected: N_FACTORS,
                        got: volatilities.len(),
                    });
                }
                CovarianceMatrix::from_correlation(correlation, volatilities)?
            }
            FactorModelSpec::Historical { history } => CovarianceMatrix::estimate(
                &[
                    history.henry_hub.as_slice(),
                    history.jkm.as_slice(),
                    history.brent.as_slice(),
                    history.freight.as_slice(),
                ],
                MONTHS_PER_YEAR,
                history.clip_std,
            )?,
        };
        Self::from_covariance(covariance)
    }

    /// Builds the model from an annualised covariance.
    pub fn from_covariance(covariance: CovarianceMatrix) -> Result<Self, NumericalError> {
        if covariance.dim() != N_FACTORS {
            return Err(NumericalError::DimensionMismatch {
                expected: N_FACTORS,
                got: covariance.dim(),
            });
        }
        let fixed = covariance.nearest_psd(DEFAULT_EIGEN_FLOOR)?;
        let repaired = fixed != covariance;
        if repaired {
            warn!(
                min_eigenvalue = covariance.min_eigenvalue(),
                "covariance not positive semi-definite; repaired to nearest PSD matrix"
            );
        }
        let cholesky = fixed.cholesky()?;
        debug!(repaired, "factor model ready");
        Ok(Self {
            covariance: fixed,
            cholesky,
            repaired,
        })
    }

    /// The (repaired) annualised covariance.
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }

    /// Lower Cholesky factor of the covariance.
    pub fn cholesky(&self) -> &CholeskyFactor {
        &self.cholesky
    }

    /// Returns whether the input needed PSD repair.
    pub fn was_repaired(&self) -> bool {
        self.repaired
    }

    /// Annualised variance of a simulated factor.
    pub fn variance(&self, factor: PriceFactor) -> Option<f64> {
        factor
            .stochastic_index()
            .map(|i| self.covariance.get(i, i))
    }
}
