//! Structural equality of operations.

use crate::constant::constants_equal;
use milgraph_core::{Error, Input, OpId, Program, Result, VarId};

/// Decide whether two operations are interchangeable.
///
/// Operations are identical when they have the same kind and the same input
/// slots, and every slot binds identical values (see [`vars_identical`]).
/// An operation is always identical to itself.
///
/// # Errors
///
/// Returns [`Error::Unsupported`] if either operation owns nested blocks;
/// control-flow operations need dedicated equality logic. Returns
/// [`Error::InvalidGraph`] for unknown operation or value ids.
pub fn identical(program: &Program, op1: OpId, op2: OpId) -> Result<bool> {
    if op1 == op2 {
        program.op(op1)?;
        return Ok(true);
    }

    let lhs = program.op(op1)?;
    let rhs = program.op(op2)?;
    for op in [lhs, rhs] {
        if op.has_blocks() {
            return Err(Error::Unsupported(format!(
                "identical() does not handle operations with nested blocks: '{}' ({})",
                op.name, op.op_type
            )));
        }
    }

    if lhs.op_type != rhs.op_type || lhs.inputs.len() != rhs.inputs.len() {
        return Ok(false);
    }

    for (slot, input) in &lhs.inputs {
        let Some(other) = rhs.input(slot) else {
            return Ok(false);
        };
        if !inputs_identical(program, input, other)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Decide whether two values are interchangeable as operation inputs.
///
/// Runtime values match only by identity. Constants match when their
/// element types agree and their payloads are element-wise equal. A constant
/// never matches a runtime value.
pub fn vars_identical(program: &Program, a: VarId, b: VarId) -> Result<bool> {
    let lhs = program.var(a)?;
    let rhs = program.var(b)?;
    Ok(match (lhs.constant(), rhs.constant()) {
        (None, None) => a == b,
        (Some(x), Some(y)) => lhs.dtype == rhs.dtype && constants_equal(x, y),
        _ => false,
    })
}

fn inputs_identical(program: &Program, lhs: &Input, rhs: &Input) -> Result<bool> {
    match (lhs, rhs) {
        (Input::Single(a), Input::Single(b)) => vars_identical(program, *a, *b),
        (Input::Sequence(a), Input::Sequence(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (&x, &y) in a.iter().zip(b) {
                if !vars_identical(program, x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}
