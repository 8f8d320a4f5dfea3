use thiserror::Error;

/// Configuration for a tradespace sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    feasibility_tol: f64,
}

/// Errors that can occur when validating a sweep config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("feasibility_tol must be finite and non-negative")]
    FeasibilityTol,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-6).unwrap()
    }
}

impl Config {
    /// Creates a config where a point is feasible if its largest constraint
    /// violation is at most `feasibility_tol`.
    ///
    /// # Errors
    ///
    /// Returns an error if `feasibility_tol` is negative or non-finite.
    pub fn new(feasibility_tol: f64) -> Result<Self, ConfigError> {
        if !feasibility_tol.is_finite() || feasibility_tol < 0.0 {
            return Err(ConfigError::FeasibilityTol);
        }
        Ok(Self { feasibility_tol })
    }

    #[must_use]
    pub fn feasibility_tol(&self) -> f64 {
        self.feasibility_tol
    }
}
