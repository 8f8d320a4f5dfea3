use thiserror::Error;

/// The values one design value takes across a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    index: usize,
    values: Vec<f64>,
}

/// Errors that can occur when building an [`Axis`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AxisError {
    #[error("an axis needs at least one value")]
    Empty,

    #[error("axis values must be finite")]
    NonFinite,

    #[error("an axis range must have finite ends with lower <= upper")]
    Range,
}

impl Axis {
    /// Creates an axis that sweeps design value `index` over `values`.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty or holds a non-finite value.
    pub fn new(index: usize, values: Vec<f64>) -> Result<Self, AxisError> {
        if values.is_empty() {
            return Err(AxisError::Empty);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AxisError::NonFinite);
        }
        Ok(Self { index, values })
    }

    /// Creates an axis of `count` evenly spaced values from `lower` to
    /// `upper`, both included.
    ///
    /// A single value sits at `lower`.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero or the range is not finite and
    /// ordered.
    pub fn linspace(index: usize, lower: f64, upper: f64, count: usize) -> Result<Self, AxisError> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(AxisError::Range);
        }
        if count == 0 {
            return Err(AxisError::Empty);
        }

        let values = if count == 1 {
            vec![lower]
        } else {
            #[allow(clippy::cast_precision_loss)]
            let step = (upper - lower) / (count - 1) as f64;
            #[allow(clippy::cast_precision_loss)]
            let mut values: Vec<f64> = (0..count).map(|i| lower + step * i as f64).collect();
            // Land exactly on the upper bound.
            values[count - 1] = upper;
            values
        };
        Ok(Self { index, values })
    }

    /// Position of the swept value in the design.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; an axis has at least one value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
