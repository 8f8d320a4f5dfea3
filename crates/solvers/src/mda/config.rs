use thiserror::Error;

use crate::equation::newton;

/// How cyclic blocks are driven to their fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Evaluate each member in order, feeding each the latest values, and
    /// repeat until the change between sweeps is within tolerance.
    #[default]
    GaussSeidel,

    /// Solve the block's residuals `y - f(y)` (explicit members) and `R(y)`
    /// (implicit members) jointly with Newton's method.
    Newton,
}

/// Configuration for a coupled analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    method: Method,
    max_sweeps: usize,
    abs_tol: f64,
    rel_tol: f64,
    warm_start: bool,
    require_convergence: bool,
    newton: newton::Config,
}

/// Errors that can occur when validating an analysis config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_sweeps must be at least 1")]
    MaxSweeps,

    #[error("abs_tol must be finite and non-negative")]
    AbsTol,

    #[error("rel_tol must be finite and non-negative")]
    RelTol,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(100, 1e-10, 1e-10).unwrap()
    }
}

impl Config {
    /// Creates a Gauss–Seidel config with validated limits.
    ///
    /// A sweep converges when every owned coupling variable `y` changed by
    /// at most `abs_tol + rel_tol * |y|`.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_sweeps` is zero or a tolerance is negative or
    /// non-finite.
    pub fn new(max_sweeps: usize, abs_tol: f64, rel_tol: f64) -> Result<Self, ConfigError> {
        if max_sweeps == 0 {
            return Err(ConfigError::MaxSweeps);
        }
        if !abs_tol.is_finite() || abs_tol < 0.0 {
            return Err(ConfigError::AbsTol);
        }
        if !rel_tol.is_finite() || rel_tol < 0.0 {
            return Err(ConfigError::RelTol);
        }

        Ok(Self {
            method: Method::GaussSeidel,
            max_sweeps,
            abs_tol,
            rel_tol,
            warm_start: true,
            require_convergence: true,
            newton: newton::Config::default(),
        })
    }

    /// Selects how cyclic blocks are solved.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Enables or disables starting each solve from the last converged state.
    #[must_use]
    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    /// Chooses whether an unconverged solve is an error when the analysis is
    /// called as a [`Model`](mdo_core::Model).
    ///
    /// When disabled, the output carries `converged: false` instead.
    #[must_use]
    pub fn with_require_convergence(mut self, require: bool) -> Self {
        self.require_convergence = require;
        self
    }

    /// Sets the Newton settings used for implicit disciplines and, with
    /// [`Method::Newton`], for whole blocks.
    #[must_use]
    pub fn with_newton(mut self, newton: newton::Config) -> Self {
        self.newton = newton;
        self
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the sweep budget per cyclic block.
    #[must_use]
    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }

    /// Returns the absolute tolerance on the change between sweeps.
    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Returns the relative tolerance on the change between sweeps.
    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    #[must_use]
    pub fn warm_start(&self) -> bool {
        self.warm_start
    }

    #[must_use]
    pub fn require_convergence(&self) -> bool {
        self.require_convergence
    }

    #[must_use]
    pub fn newton(&self) -> &newton::Config {
        &self.newton
    }

    /// Returns `true` if a change of `delta` in a value now equal to `value`
    /// is within tolerance.
    pub(crate) fn is_settled(&self, delta: f64, value: f64) -> bool {
        delta <= self.abs_tol + self.rel_tol * value.abs()
    }
}
