//! Disciplines: the analysis blocks a coupled system is assembled from.
//!
//! A discipline maps design variables `D` and the current coupling variables
//! `C` to new values for the coupling variables it owns. Two forms exist:
//!
//! - [`ExplicitDiscipline`] computes its owned values directly.
//! - [`ImplicitDiscipline`] exposes residuals over its owned values and
//!   leaves solving them to the analysis.
//!
//! Both declare, through [`Discipline`], the slots they read and write. Those
//! declarations define the coupling graph and single ownership. They are
//! checked once when an analysis is assembled.
//!
//! Inputs that fall outside a discipline's mathematical domain (a negative
//! argument to a square root, say) are routed through a [`DomainGuard`],
//! which applies the requested [`DomainPolicy`] and records every correction.

use std::error::Error as StdError;

use thiserror::Error;

use crate::CouplingVars;

/// Identity and ports shared by every discipline.
pub trait Discipline {
    /// A short name used in errors, logs, and events.
    fn name(&self) -> &str;

    /// Coupling slots this discipline reads.
    fn reads(&self) -> &[&'static str];

    /// Coupling slots this discipline owns.
    ///
    /// For an implicit discipline this is also the order of its residuals.
    fn writes(&self) -> &[&'static str];
}

/// A discipline that computes its owned coupling variables in closed form.
pub trait ExplicitDiscipline<D, C: CouplingVars>: Discipline {
    /// Overwrites the slots this discipline owns.
    ///
    /// Writing any other slot is an ownership violation, rejected by the
    /// analysis.
    ///
    /// # Errors
    ///
    /// Returns a [`DisciplineError`] if the outputs cannot be computed.
    fn compute(&self, design: &D, vars: &mut C, guard: &mut DomainGuard)
    -> Result<(), DisciplineError>;
}

/// A discipline whose owned variables satisfy `R(design, vars) = 0`.
pub trait ImplicitDiscipline<D, C: CouplingVars>: Discipline {
    /// Residuals for the owned slots, one per entry of [`Discipline::writes`].
    ///
    /// # Errors
    ///
    /// Returns a [`DisciplineError`] if the residuals cannot be computed.
    fn residuals(
        &self,
        design: &D,
        vars: &C,
        guard: &mut DomainGuard,
    ) -> Result<Vec<f64>, DisciplineError>;
}

/// What to do with a value outside a discipline's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainPolicy {
    /// Mirror the value across the violated bound.
    Reflect,

    /// Move the value onto the violated bound.
    Clamp,

    /// Fail with a [`DomainError`].
    Reject,
}

/// A single correction applied by a [`DomainGuard`].
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub discipline: String,
    pub quantity: &'static str,
    pub original: f64,
    pub corrected: f64,
}

/// Applies domain policies and keeps a record of what it changed.
///
/// The analysis hands one guard to every discipline call, naming the current
/// discipline with [`enter`](Self::enter) first.
#[derive(Debug, Default)]
pub struct DomainGuard {
    discipline: String,
    corrections: Vec<Correction>,
}

impl DomainGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes subsequent corrections to `discipline`.
    pub fn enter(&mut self, discipline: &str) {
        discipline.clone_into(&mut self.discipline);
    }

    /// Ensures `value >= 0`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `value` is `NaN`, if the policy is
    /// [`DomainPolicy::Reject`] and `value` is negative, or if the corrected
    /// value is still outside the domain.
    pub fn non_negative(
        &mut self,
        quantity: &'static str,
        value: f64,
        policy: DomainPolicy,
    ) -> Result<f64, DomainError> {
        self.within(quantity, value, 0.0, f64::INFINITY, policy)
    }

    /// Ensures `lower <= value <= upper`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `value` is `NaN`, if the policy is
    /// [`DomainPolicy::Reject`] and `value` is outside, or if the corrected
    /// value is still outside the domain.
    pub fn within(
        &mut self,
        quantity: &'static str,
        value: f64,
        lower: f64,
        upper: f64,
        policy: DomainPolicy,
    ) -> Result<f64, DomainError> {
        if value >= lower && value <= upper {
            return Ok(value);
        }

        let corrected = match policy {
            _ if value.is_nan() => f64::NAN,
            DomainPolicy::Reflect if value < lower => 2.0 * lower - value,
            DomainPolicy::Reflect => 2.0 * upper - value,
            DomainPolicy::Clamp => value.max(lower).min(upper),
            DomainPolicy::Reject => f64::NAN,
        };

        if !(corrected >= lower && corrected <= upper) {
            return Err(DomainError {
                discipline: self.discipline.clone(),
                quantity,
                value,
                lower,
                upper,
            });
        }

        self.corrections.push(Correction {
            discipline: self.discipline.clone(),
            quantity,
            original: value,
            corrected,
        });
        Ok(corrected)
    }

    /// Corrections recorded so far.
    #[must_use]
    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    /// Removes and returns the recorded corrections.
    pub fn take(&mut self) -> Vec<Correction> {
        std::mem::take(&mut self.corrections)
    }
}

/// A value outside a discipline's domain that its policy could not repair.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("`{quantity}` = {value} in `{discipline}` is outside [{lower}, {upper}]")]
pub struct DomainError {
    pub discipline: String,
    pub quantity: &'static str,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Errors a discipline can return.
#[derive(Debug, Error)]
pub enum DisciplineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("discipline failed: {0}")]
    Failed(Box<dyn StdError + Send + Sync>),
}

impl DisciplineError {
    /// Wraps any error raised while computing a discipline.
    pub fn failed<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Failed(Box::new(err))
    }
}
