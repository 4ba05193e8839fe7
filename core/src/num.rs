// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!

General helpers for numerics.

*/

use crate::errors::{CoreError, Result};
use ndarray::{Array1, Array2};

/// Compute how many samples a half-open range from *start* to *stop* holds
/// when sampled every *step*.
///
/// This is `floor((stop - start) / step)`. Ranges whose quotient is not a
/// finite positive number hold zero samples; this covers a zero step, a
/// step pointing away from *stop*, and NaN inputs. Counts too large for a
/// `usize` saturate at `usize::MAX`.
pub fn step_count(start: f64, stop: f64, step: f64) -> usize {
    let n = ((stop - start) / step).floor();

    if n.is_finite() && n > 0. {
        n as usize
    } else {
        0
    }
}

/// Generate `n` coordinates `start + k * step` for `k` in `0..n`.
///
/// Each value is computed from its index rather than by accumulation, so
/// rounding errors do not build up along long axes.
pub fn stepped_values(start: f64, step: f64, n: usize) -> Array1<f64> {
    Array1::from_shape_fn(n, |k| start + k as f64 * step)
}

/// Fill a two-dimensional array of the given shape from a flat buffer in
/// row-major order: the first index varies slowest.
///
/// Returns an Err with a DimensionMismatch if the buffer does not have
/// exactly as many elements as the shape calls for.
pub fn fill_row_major(shape: (usize, usize), values: Vec<f64>) -> Result<Array2<f64>> {
    let expected = shape.0 * shape.1;

    if values.len() != expected {
        return Err(CoreError::DimensionMismatch {
            shape: vec![shape.0, shape.1],
            expected,
            actual: values.len(),
        });
    }

    Array2::from_shape_vec(shape, values).map_err(|_| CoreError::DimensionMismatch {
        shape: vec![shape.0, shape.1],
        expected,
        actual: expected,
    })
}

/// Return the finite minimum and maximum of some values, or None if there
/// are no finite values at all.
pub fn finite_extent<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a f64>,
{
    values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
