use thiserror::Error;

/// Configuration for the L-BFGS augmented Lagrangian driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    max_outer: usize,
    grad_tol: f64,
    constraint_tol: f64,
    stationarity_tol: f64,
    history: usize,
    penalty_init: f64,
    penalty_factor: f64,
    penalty_max: f64,
}

/// Errors that can occur when validating an L-BFGS driver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("max_outer must be at least 1")]
    MaxOuter,

    #[error("grad_tol must be finite and non-negative")]
    GradTol,

    #[error("constraint_tol must be finite and non-negative")]
    ConstraintTol,

    #[error("stationarity_tol must be finite and positive")]
    StationarityTol,

    #[error("history must be at least 1")]
    History,

    #[error("penalty must start positive, grow by a factor above 1, and cap at or above its start")]
    Penalty,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(200, 20, 1e-6, 1e-4).unwrap()
    }
}

impl Config {
    /// Creates a config with validated limits and tolerances.
    ///
    /// - `max_iters` caps each inner L-BFGS run.
    /// - `max_outer` caps the augmented Lagrangian updates.
    /// - `grad_tol` is the inner gradient-norm tolerance.
    /// - `constraint_tol` is the largest constraint violation accepted as
    ///   feasible.
    ///
    /// The L-BFGS history defaults to 10 pairs, the stationarity tolerance
    /// to `1e-3`, and the penalty starts at 10, grows by 5, and caps at 1e8.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is zero or a tolerance is negative or
    /// non-finite.
    pub fn new(
        max_iters: usize,
        max_outer: usize,
        grad_tol: f64,
        constraint_tol: f64,
    ) -> Result<Self, ConfigError> {
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        if max_outer == 0 {
            return Err(ConfigError::MaxOuter);
        }
        if !grad_tol.is_finite() || grad_tol < 0.0 {
            return Err(ConfigError::GradTol);
        }
        if !constraint_tol.is_finite() || constraint_tol < 0.0 {
            return Err(ConfigError::ConstraintTol);
        }

        Ok(Self {
            max_iters,
            max_outer,
            grad_tol,
            constraint_tol,
            stationarity_tol: 1e-3,
            history: 10,
            penalty_init: 10.0,
            penalty_factor: 5.0,
            penalty_max: 1e8,
        })
    }

    /// Sets the tolerance on the projected gradient in design space.
    ///
    /// `grad_tol` stops argmin in the unconstrained parameters, where a
    /// saturated bound map also flattens the gradient. An inner run only
    /// counts as converged once the step `P(x - ∇L) - x` onto the bounds is
    /// at most `tol · max(1, |L|)` in every component.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is not finite and positive.
    pub fn with_stationarity_tol(mut self, tol: f64) -> Result<Self, ConfigError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ConfigError::StationarityTol);
        }
        self.stationarity_tol = tol;
        Ok(self)
    }

    /// Sets the number of correction pairs L-BFGS keeps.
    ///
    /// # Errors
    ///
    /// Returns an error if `history` is zero.
    pub fn with_history(mut self, history: usize) -> Result<Self, ConfigError> {
        if history == 0 {
            return Err(ConfigError::History);
        }
        self.history = history;
        Ok(self)
    }

    /// Sets the penalty schedule: starting weight, growth factor, and cap.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < init <= max`, `factor > 1`, and all
    /// three are finite.
    pub fn with_penalty(mut self, init: f64, factor: f64, max: f64) -> Result<Self, ConfigError> {
        let finite = init.is_finite() && factor.is_finite() && max.is_finite();
        if !finite || init <= 0.0 || factor <= 1.0 || max < init {
            return Err(ConfigError::Penalty);
        }
        self.penalty_init = init;
        self.penalty_factor = factor;
        self.penalty_max = max;
        Ok(self)
    }

    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[must_use]
    pub fn max_outer(&self) -> usize {
        self.max_outer
    }

    #[must_use]
    pub fn grad_tol(&self) -> f64 {
        self.grad_tol
    }

    #[must_use]
    pub fn constraint_tol(&self) -> f64 {
        self.constraint_tol
    }

    #[must_use]
    pub fn stationarity_tol(&self) -> f64 {
        self.stationarity_tol
    }

    #[must_use]
    pub fn history(&self) -> usize {
        self.history
    }

    #[must_use]
    pub fn penalty_init(&self) -> f64 {
        self.penalty_init
    }

    #[must_use]
    pub fn penalty_factor(&self) -> f64 {
        self.penalty_factor
    }

    #[must_use]
    pub fn penalty_max(&self) -> f64 {
        self.penalty_max
    }
}
