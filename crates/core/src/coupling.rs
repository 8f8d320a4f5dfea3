/// The coupling variables exchanged between disciplines.
///
/// A type implementing `CouplingVars` is a fixed set of named `f64` slots.
/// Disciplines refer to slots by name when declaring what they read and
/// write; solvers address them by index. [`Default`] supplies the initial
/// guess used before any warm start exists.
///
/// Implement it with the [`coupling_vars!`](crate::coupling_vars) macro, which
/// generates a plain struct with one public field per slot.
pub trait CouplingVars: Clone + Default {
    /// Slot names, in index order.
    const NAMES: &'static [&'static str];

    /// Returns the value in `slot`, or `NaN` if the slot does not exist.
    fn get(&self, slot: usize) -> f64;

    /// Writes `value` into `slot`. Writes to a nonexistent slot are ignored.
    fn set(&mut self, slot: usize, value: f64);

    /// Returns the index of the slot called `name`.
    #[must_use]
    fn slot(name: &str) -> Option<usize> {
        Self::NAMES.iter().position(|candidate| *candidate == name)
    }

    /// Copies every slot into a vector, in index order.
    #[must_use]
    fn to_vec(&self) -> Vec<f64> {
        (0..Self::NAMES.len()).map(|slot| self.get(slot)).collect()
    }
}

/// Declares a struct of coupling variables with their initial guesses.
///
/// ```
/// use mdo_core::{CouplingVars, coupling_vars};
///
/// coupling_vars! {
///     /// Values exchanged by the two Sellar disciplines.
///     pub struct SellarVars {
///         y1 = 1.0,
///         y2 = 1.0,
///     }
/// }
///
/// let mut vars = SellarVars::default();
/// assert_eq!(SellarVars::NAMES, &["y1", "y2"]);
///
/// vars.set(1, 12.5);
/// assert_eq!(vars.y2, 12.5);
/// assert_eq!(vars.get(0), 1.0);
/// ```
#[macro_export]
macro_rules! coupling_vars {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident = $initial:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        $vis struct $name {
            $( $(#[$field_meta])* pub $field: f64, )+
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self { $( $field: $initial, )+ }
            }
        }

        impl $crate::CouplingVars for $name {
            const NAMES: &'static [&'static str] = &[$( stringify!($field) ),+];

            fn get(&self, slot: usize) -> f64 {
                [$( self.$field ),+].get(slot).copied().unwrap_or(f64::NAN)
            }

            fn set(&mut self, slot: usize, value: f64) {
                let mut fields = [$( &mut self.$field ),+];
                if let Some(field) = fields.get_mut(slot) {
                    **field = value;
                }
            }
        }
    };
}
