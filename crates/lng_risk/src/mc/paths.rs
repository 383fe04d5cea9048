//! Correlated log-shock paths.
//!
//! ## Dynamics
//!
//! With `dt = 1/12` and `L` the Cholesky factor of the annualised covariance
//! `Σ`, each monthly step draws `z ~ N(0, I)` and updates
//!
//! ```text
//! X_f(t) = X_f(t-1) + sqrt(dt) * (L z)_f - 0.5 * Σ_ff * dt,   X_f(0) = 0
//! ```
//!
//! so `E[exp(X_f(t))] = 1` and the simulated price `forecast * exp(X_f(t))`
//! is unbiased against the forecast.
//!
//! ## Reproducibility
//!
//! Path `p` owns a `StdRng` seeded from `(seed, p)`; a path's draws do not
//! depend on which thread generates it or on how many other paths run.

use lng_core::types::PriceFactor;
use lng_pricing::{FactorModel, PriceInputs, N_FACTORS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Month step as a fraction of a year.
pub const DT: f64 = 1.0 / 12.0;

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed of path `p` under base seed `seed`.
#[inline]
pub fn path_seed(seed: u64, path: usize) -> u64 {
    seed ^ (path as u64).wrapping_mul(SEED_MIX)
}

/// Cumulative log-shocks of one path, steps `1..=n_steps`.
#[derive(Clone, Debug, PartialEq)]
pub struct FactorPath {
    shocks: Vec<[f64; N_FACTORS]>,
}

impl FactorPath {
    /// Number of monthly steps.
    pub fn n_steps(&self) -> usize {
        self.shocks.len()
    }

    /// Cumulative log-shock of `factor` at `step`.
    ///
    /// Zero for `step <= 0` and for FX, which is held at forecast.
    pub fn log_shock(&self, step: i64, factor: PriceFactor) -> f64 {
        let Some(i) = factor.stochastic_index() else {
            return 0.0;
        };
        if step <= 0 {
            return 0.0;
        }
        self.shocks
            .get(step as usize - 1)
            .map_or(0.0, |x| x[i])
    }

    /// Forecast inputs moved onto this path at `step`.
    ///
    /// The JKM shock of the step also moves the JKM M+1 settlement price.
    pub fn inputs(&self, step: i64, forecast: &PriceInputs) -> PriceInputs {
        PriceFactor::STOCHASTIC
            .iter()
            .fold(*forecast, |acc, &factor| {
                let g = self.log_shock(step, factor).exp();
                acc.map(factor, |v| v * g)
            })
    }
}

/// Generates [`FactorPath`]s from a factor model.
#[derive(Clone, Debug)]
pub struct PathGenerator<'a> {
    model: &'a FactorModel,
    n_steps: usize,
    seed: u64,
    drift: [f64; N_FACTORS],
}

impl<'a> PathGenerator<'a> {
    /// Creates a generator over `n_steps` monthly steps.
    pub fn new(model: &'a FactorModel, n_steps: usize, seed: u64) -> Self {
        let mut drift = [0.0; N_FACTORS];
        for (i, d) in drift.iter_mut().enumerate() {
            *d = -0.5 * model.covariance().get(i, i) * DT;
        }
        Self {
            model,
            n_steps,
            seed,
            drift,
        }
    }

    /// Path `p`.
    pub fn path(&self, p: usize) -> FactorPath {
        let mut rng = StdRng::seed_from_u64(path_seed(self.seed, p));
        let chol = self.model.cholesky();
        let sqrt_dt = DT.sqrt();

        let mut z = [0.0; N_FACTORS];
        let mut lz = [0.0; N_FACTORS];
        let mut x = [0.0; N_FACTORS];
        let mut shocks = Vec::with_capacity(self.n_steps);
        for _ in 0..self.n_steps {
            for zi in z.iter_mut() {
                *zi = StandardNormal.sample(&mut rng);
            }
            chol.transform_into(&z, &mut lz);
            for f in 0..N_FACTORS {
                x[f] += sqrt_dt * lz[f] + self.drift[f];
            }
            shocks.push(x);
        }
        FactorPath { shocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lng_pricing::reference_market;

    fn model() -> FactorModel {
        FactorModel::from_spec(&reference_market().factor_model).unwrap()
    }

    #[test]
    fn test_same_seed_same_path() {
        let model = model();
        let a = PathGenerator::new(&model, 6, 42);
        let b = PathGenerator::new(&model, 6, 42);
        assert_eq!(a.path(17), b.path(17));
        assert_ne!(a.path(17), a.path(18));
    }

    #[test]
    fn test_zero_step_and_fx_are_unshocked() {
        let model = model();
        let path = PathGenerator::new(&model, 3, 1).path(0);
        assert_eq!(path.n_steps(), 3);
        assert_eq!(path.log_shock(0, PriceFactor::Brent), 0.0);
        assert_eq!(path.log_shock(-2, PriceFactor::Jkm), 0.0);
        assert_eq!(path.log_shock(2, PriceFactor::Fx), 0.0);
        assert_ne!(path.log_shock(2, PriceFactor::Brent), 0.0);
    }

    #[test]
    fn test_simulated_price_is_unbiased() {
        let model = model();
        let gen = PathGenerator::new(&model, 6, 2024);
        let n = 20_000;
        let mean: f64 = (0..n)
            .map(|p| gen.path(p).log_shock(6, PriceFactor::HenryHub).exp())
            .sum::<f64>()
            / n as f64;
        // 6-month HH vol ~0.39, so the standard error is ~0.003
        assert_relative_eq!(mean, 1.0, epsilon = 0.02);
    }

    #[test]
    fn test_inputs_move_jkm_next_month_with_jkm() {
        let model = model();
        let path = PathGenerator::new(&model, 2, 5).path(3);
        let forecast = PriceInputs {
            henry_hub: 4.0,
            jkm: 12.0,
            jkm_next_month: Some(12.0),
            brent: 80.0,
            freight_rate: 70_000.0,
            fx: 150.0,
        };
        let shocked = path.inputs(1, &forecast);
        assert_eq!(shocked.jkm_next_month, Some(shocked.jkm));
        assert_eq!(shocked.fx, 150.0);
        assert_relative_eq!(
            shocked.brent,
            80.0 * path.log_shock(1, PriceFactor::Brent).exp(),
            epsilon = 1e-12
        );
    }
}
