//! Numerical building blocks.
//!
//! This module provides:
//! - `linalg`: Dense symmetric matrices for the factor model, with Cholesky
//!   factorisation, symmetric eigen-decomposition (nalgebra) and nearest-PSD repair
//! - `statistics`: Sample moments, empirical quantiles and return helpers

pub mod linalg;
pub mod statistics;
