use thiserror::Error;

/// Configuration for Newton's method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    residual_tol: f64,
    max_halvings: usize,
}

/// Errors that can occur when validating a Newton config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("residual_tol must be finite and non-negative")]
    ResidualTol,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(50, 1e-10).unwrap()
    }
}

impl Config {
    /// Creates a config with an iteration limit and a residual tolerance.
    ///
    /// The solve converges once the largest absolute residual is at or
    /// below `residual_tol`. Backtracking defaults to eight halvings.
    ///
    /// # Errors
    ///
    /// Returns an error if `residual_tol` is negative or non-finite.
    pub fn new(max_iters: usize, residual_tol: f64) -> Result<Self, ConfigError> {
        if !residual_tol.is_finite() || residual_tol < 0.0 {
            return Err(ConfigError::ResidualTol);
        }

        Ok(Self {
            max_iters,
            residual_tol,
            max_halvings: 8,
        })
    }

    /// Sets how many times a step may be halved while searching for a lower
    /// residual norm. Zero takes every full Newton step.
    #[must_use]
    pub fn with_max_halvings(mut self, max_halvings: usize) -> Self {
        self.max_halvings = max_halvings;
        self
    }

    /// Returns the maximum number of Newton iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the tolerance on the largest absolute residual.
    #[must_use]
    pub fn residual_tol(&self) -> f64 {
        self.residual_tol
    }

    /// Returns the backtracking limit.
    #[must_use]
    pub fn max_halvings(&self) -> usize {
        self.max_halvings
    }
}
