//! Named, bounded design variables laid out in a flat solver vector.
//!
//! Solvers work on `[f64; N]`. A [`DesignSpace<N>`] gives that vector its
//! meaning: which slice belongs to which named variable (a scalar like `x` or
//! a fixed-size array like `z`) and the `[lower, upper]` limits of every
//! element. The layout is validated once, when the space is built.
//!
//! ```
//! use mdo_core::DesignSpace;
//!
//! let space = DesignSpace::<3>::builder()
//!     .scalar("x", 0.0, 10.0)
//!     .array("z", 2, 0.0, 10.0)
//!     .build()
//!     .unwrap();
//!
//! let x = [1.0, 5.0, 2.0];
//! assert!(space.check(&x).is_ok());
//! assert_eq!(space.value(&x, "z"), Some(&[5.0, 2.0][..]));
//! assert_eq!(space.label(2), "z[1]");
//! ```

use std::ops::Range;

use thiserror::Error;

/// The closed interval `[lower, upper]` a design value must lie in.
///
/// Either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    lower: f64,
    upper: f64,
}

impl Bounds {
    /// Creates bounds, rejecting `NaN` ends and `lower > upper`.
    ///
    /// # Errors
    ///
    /// Returns [`DesignSpaceError::InvalidBounds`] if the interval is empty
    /// or either end is `NaN`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, DesignSpaceError> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(DesignSpaceError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Bounds that accept every finite value.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if `value` lies in the closed interval.
    ///
    /// Values exactly at either end are inside. `NaN` is never inside.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Returns `value` limited to the interval.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// One named design variable and its place in the flat vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignVar {
    name: String,
    offset: usize,
    bounds: Vec<Bounds>,
}

impl DesignVar {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of scalar elements (1 for a scalar variable).
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Always `false`; a design variable has at least one element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// The indices this variable occupies in the flat vector.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.bounds.len()
    }

    /// Per-element bounds.
    #[must_use]
    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }
}

/// The ordered set of design variables a problem exposes to solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpace<const N: usize> {
    vars: Vec<DesignVar>,
    bounds: [Bounds; N],
}

impl<const N: usize> DesignSpace<N> {
    /// Starts a builder for a design space of `N` scalar elements.
    #[must_use]
    pub fn builder() -> DesignSpaceBuilder<N> {
        DesignSpaceBuilder { vars: Vec::new() }
    }

    /// Creates a space of `N` unbounded scalars named `x[0]`, `x[1]`, ...
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            vars: vec![DesignVar {
                name: "x".to_owned(),
                offset: 0,
                bounds: vec![Bounds::unbounded(); N],
            }],
            bounds: [Bounds::unbounded(); N],
        }
    }

    /// The variables, in layout order.
    #[must_use]
    pub fn vars(&self) -> &[DesignVar] {
        &self.vars
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&DesignVar> {
        self.vars.iter().find(|var| var.name == name)
    }

    /// Per-element bounds of the flat vector.
    #[must_use]
    pub fn bounds(&self) -> &[Bounds; N] {
        &self.bounds
    }

    /// Returns the slice of `x` belonging to the named variable.
    #[must_use]
    pub fn value<'a>(&self, x: &'a [f64; N], name: &str) -> Option<&'a [f64]> {
        self.var(name).map(|var| &x[var.range()])
    }

    /// Returns the first element of the named variable.
    #[must_use]
    pub fn scalar(&self, x: &[f64; N], name: &str) -> Option<f64> {
        self.value(x, name).and_then(|values| values.first().copied())
    }

    /// A readable label for flat index `index`, such as `x` or `z[1]`.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        self.vars
            .iter()
            .find(|var| var.range().contains(&index))
            .map_or_else(
                || format!("#{index}"),
                |var| {
                    if var.len() == 1 {
                        var.name.clone()
                    } else {
                        format!("{}[{}]", var.name, index - var.offset)
                    }
                },
            )
    }

    /// Rejects any element of `x` that lies outside its bounds.
    ///
    /// Values exactly at a bound are accepted.
    ///
    /// # Errors
    ///
    /// Returns the first [`BoundsViolation`] found, in layout order.
    pub fn check(&self, x: &[f64; N]) -> Result<(), BoundsViolation> {
        for (index, (&value, bounds)) in x.iter().zip(&self.bounds).enumerate() {
            if !bounds.contains(value) {
                return Err(BoundsViolation {
                    label: self.label(index),
                    index,
                    value,
                    lower: bounds.lower,
                    upper: bounds.upper,
                });
            }
        }
        Ok(())
    }

    /// Returns `x` with every element clamped to its bounds.
    #[must_use]
    pub fn clamp(&self, x: &[f64; N]) -> [f64; N] {
        std::array::from_fn(|i| self.bounds[i].clamp(x[i]))
    }
}

/// Collects named variables and validates them into a [`DesignSpace`].
#[derive(Debug, Clone)]
pub struct DesignSpaceBuilder<const N: usize> {
    vars: Vec<(String, Vec<(f64, f64)>)>,
}

impl<const N: usize> DesignSpaceBuilder<N> {
    /// Adds a scalar variable bounded by `[lower, upper]`.
    #[must_use]
    pub fn scalar(mut self, name: impl Into<String>, lower: f64, upper: f64) -> Self {
        self.vars.push((name.into(), vec![(lower, upper)]));
        self
    }

    /// Adds an array variable of `len` elements sharing the same bounds.
    #[must_use]
    pub fn array(mut self, name: impl Into<String>, len: usize, lower: f64, upper: f64) -> Self {
        self.vars.push((name.into(), vec![(lower, upper); len]));
        self
    }

    /// Adds an array variable with per-element bounds.
    #[must_use]
    pub fn array_with<const M: usize>(
        mut self,
        name: impl Into<String>,
        lower: [f64; M],
        upper: [f64; M],
    ) -> Self {
        self.vars
            .push((name.into(), lower.into_iter().zip(upper).collect()));
        self
    }

    /// Validates the layout and builds the space.
    ///
    /// # Errors
    ///
    /// Returns an error if a name repeats, a variable has no elements, any
    /// bounds are invalid, or the element count differs from `N`.
    pub fn build(self) -> Result<DesignSpace<N>, DesignSpaceError> {
        let mut vars: Vec<DesignVar> = Vec::with_capacity(self.vars.len());
        let mut offset = 0;

        for (name, limits) in self.vars {
            if vars.iter().any(|var| var.name == name) {
                return Err(DesignSpaceError::DuplicateName(name));
            }
            if limits.is_empty() {
                return Err(DesignSpaceError::Empty(name));
            }
            let bounds = limits
                .into_iter()
                .map(|(lower, upper)| Bounds::new(lower, upper))
                .collect::<Result<Vec<_>, _>>()?;

            let len = bounds.len();
            vars.push(DesignVar {
                name,
                offset,
                bounds,
            });
            offset += len;
        }

        if offset != N {
            return Err(DesignSpaceError::SizeMismatch {
                expected: N,
                actual: offset,
            });
        }

        let flat: Vec<Bounds> = vars.iter().flat_map(|var| var.bounds.clone()).collect();
        let bounds: [Bounds; N] = std::array::from_fn(|i| flat[i]);

        Ok(DesignSpace { vars, bounds })
    }
}

/// Errors raised while building a [`DesignSpace`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignSpaceError {
    #[error("design variable `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("design variable `{0}` has no elements")]
    Empty(String),

    #[error("invalid bounds [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("design variables span {actual} elements but the space expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A design value outside its declared bounds.
///
/// Out-of-bounds input is a caller error. It is reported, never corrected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("design variable `{label}` = {value} is outside [{lower}, {upper}]")]
pub struct BoundsViolation {
    /// Readable label such as `x` or `z[1]`.
    pub label: String,

    /// Index into the flat design vector.
    pub index: usize,

    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sellar_space() -> DesignSpace<3> {
        DesignSpace::builder()
            .scalar("x", 0.0, 10.0)
            .array("z", 2, 0.0, 10.0)
            .build()
            .expect("valid layout")
    }

    #[test]
    fn values_exactly_at_bounds_are_accepted() {
        let space = sellar_space();
        assert!(space.check(&[0.0, 0.0, 0.0]).is_ok());
        assert!(space.check(&[10.0, 10.0, 10.0]).is_ok());
    }

    #[test]
    fn one_unit_beyond_a_bound_is_rejected() {
        let space = sellar_space();

        let below = space.check(&[-1.0, 5.0, 5.0]).unwrap_err();
        assert_eq!(below.label, "x");
        assert_eq!(below.index, 0);
        assert_eq!(below.lower, 0.0);

        let above = space.check(&[5.0, 5.0, 11.0]).unwrap_err();
        assert_eq!(above.label, "z[1]");
        assert_eq!(above.index, 2);
        assert_eq!(above.upper, 10.0);
    }

    #[test]
    fn nan_is_never_in_bounds() {
        let space = sellar_space();
        assert!(space.check(&[f64::NAN, 1.0, 1.0]).is_err());
        assert!(DesignSpace::<1>::unbounded().check(&[f64::NAN]).is_err());
    }

    #[test]
    fn named_slices_follow_the_layout() {
        let space = sellar_space();
        let x = [1.0, 5.0, 2.0];

        assert_eq!(space.scalar(&x, "x"), Some(1.0));
        assert_eq!(space.value(&x, "z"), Some(&[5.0, 2.0][..]));
        assert_eq!(space.value(&x, "w"), None);
        assert_eq!(space.var("z").map(DesignVar::range), Some(1..3));
    }

    #[test]
    fn per_element_bounds() {
        let space = DesignSpace::<2>::builder()
            .array_with("lw", [0.01, 0.02], [1.0, 2.0])
            .build()
            .expect("valid layout");

        assert!(space.check(&[0.01, 2.0]).is_ok());
        assert!(space.check(&[0.01, 2.5]).is_err());
        assert_eq!(space.clamp(&[-3.0, 3.0]), [0.01, 2.0]);
    }

    #[test]
    fn rejects_invalid_layouts() {
        let duplicate = DesignSpace::<2>::builder()
            .scalar("x", 0.0, 1.0)
            .scalar("x", 0.0, 1.0)
            .build();
        assert_eq!(
            duplicate.unwrap_err(),
            DesignSpaceError::DuplicateName("x".into())
        );

        let inverted = DesignSpace::<1>::builder().scalar("x", 1.0, 0.0).build();
        assert!(matches!(
            inverted.unwrap_err(),
            DesignSpaceError::InvalidBounds { .. }
        ));

        let wrong_size = DesignSpace::<3>::builder().scalar("x", 0.0, 1.0).build();
        assert_eq!(
            wrong_size.unwrap_err(),
            DesignSpaceError::SizeMismatch {
                expected: 3,
                actual: 1
            }
        );

        let empty = DesignSpace::<0>::builder().array("z", 0, 0.0, 1.0).build();
        assert_eq!(empty.unwrap_err(), DesignSpaceError::Empty("z".into()));
    }
}
