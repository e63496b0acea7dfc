//! Constant payload helpers and scalar predicates.
//!
//! Every numeric comparison of constant payloads goes through
//! [`constant_scalar`] and [`constants_equal`], so the scalar predicates and
//! the structural equality checker agree on shape and element semantics.

use milgraph_core::{Program, TensorValue, Var, VarId};

/// Default absolute tolerance for [`is_constant_scalar_close`].
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Read a single-element numeric payload as `f64`.
///
/// Any shape with exactly one element qualifies (`[]`, `[1]`, `[1, 1]`, ...).
/// Boolean payloads are not numeric.
#[inline]
pub fn constant_scalar(value: &TensorValue) -> Option<f64> {
    if value.len() != 1 {
        return None;
    }
    value.data.element_f64(0)
}

/// Element-wise equality of two payloads.
///
/// Shapes and element types must match exactly; elements compare in their
/// native type, so large `i64` values stay distinct. NaN never equals NaN.
pub fn constants_equal(lhs: &TensorValue, rhs: &TensorValue) -> bool {
    lhs.shape == rhs.shape && lhs.data == rhs.data
}

/// Check if `x` is a single-element constant whose value satisfies `predicate`.
#[inline]
pub fn const_matches<F>(program: &Program, x: VarId, predicate: F) -> bool
where
    F: FnOnce(f64) -> bool,
{
    program
        .var(x)
        .ok()
        .and_then(Var::constant)
        .and_then(constant_scalar)
        .is_some_and(predicate)
}

/// Check if `x` is a single-element constant in `[lower, upper]`.
pub fn is_constant_scalar_in_range(program: &Program, x: VarId, lower: f64, upper: f64) -> bool {
    const_matches(program, x, |value| lower <= value && value <= upper)
}

/// Check if `x` is a single-element constant within [`DEFAULT_TOLERANCE`] of `target`.
pub fn is_constant_scalar_close(program: &Program, x: VarId, target: f64) -> bool {
    is_constant_scalar_close_with_tolerance(program, x, target, DEFAULT_TOLERANCE)
}

/// Check if `x` is a single-element constant with `|value - target| < tolerance`.
pub fn is_constant_scalar_close_with_tolerance(
    program: &Program,
    x: VarId,
    target: f64,
    tolerance: f64,
) -> bool {
    const_matches(program, x, |value| (value - target).abs() < tolerance)
}
