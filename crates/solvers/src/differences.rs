//! Central-difference Jacobians of vector-valued functions.

use std::{cell::RefCell, collections::HashMap};

use finitediff::FiniteDiff;
use nalgebra::DMatrix;

/// Central-difference Jacobian of `f` at `x`, `rows x x.len()`.
///
/// Rows are differenced one at a time, but every probe point is evaluated
/// once and shared across rows. The first error `f` returns is propagated.
pub(crate) fn jacobian<F, E>(f: &F, x: &[f64], rows: usize) -> Result<DMatrix<f64>, E>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, E>,
{
    let failure: RefCell<Option<E>> = RefCell::new(None);
    let probes: RefCell<HashMap<Vec<u64>, Vec<f64>>> = RefCell::new(HashMap::new());
    let point = x.to_vec();
    let mut matrix = DMatrix::zeros(rows, x.len());

    for row in 0..rows {
        let component = |y: &Vec<f64>| -> f64 {
            let key: Vec<u64> = y.iter().map(|v| v.to_bits()).collect();
            if let Some(values) = probes.borrow().get(&key) {
                return values.get(row).copied().unwrap_or(f64::NAN);
            }
            match f(y) {
                Ok(values) => {
                    let value = values.get(row).copied().unwrap_or(f64::NAN);
                    probes.borrow_mut().insert(key, values);
                    value
                }
                Err(e) => {
                    let mut slot = failure.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };

        let gradient = point.central_diff(&component);
        if let Some(e) = failure.take() {
            return Err(e);
        }
        for (col, value) in gradient.into_iter().enumerate() {
            matrix[(row, col)] = value;
        }
    }

    Ok(matrix)
}
