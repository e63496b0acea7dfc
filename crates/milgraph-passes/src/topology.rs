//! Local topology checks for fusion candidates.

use milgraph_core::{BlockId, OpId, Program};

/// Get the only consumer of `op`'s only output.
///
/// Returns `None` unless `op` has exactly one output and that output has
/// exactly one consuming operation.
#[inline]
pub fn single_child(program: &Program, op: OpId) -> Option<OpId> {
    let op = program.op(op).ok()?;
    let [output] = op.outputs() else {
        return None;
    };
    match program.var(*output).ok()?.child_ops() {
        [child] => Some(*child),
        _ => None,
    }
}

/// Check if `op` feeds exactly one operation, and that operation is of kind `op_type`.
///
/// A producer/consumer pair that passes this check can be fused linearly:
/// nothing else observes the intermediate value.
pub fn has_single_child_of_type(program: &Program, op: OpId, op_type: &str) -> bool {
    single_child(program, op)
        .and_then(|child| program.op(child).ok())
        .is_some_and(|child| child.op_type() == op_type)
}

/// Check that no operation of `ops` except the last one exposes a block output.
///
/// `ops` is a candidate chain slated for collapse into one fused operation.
/// The last operation's output becomes the fused result, so it may be a
/// block output. Unknown blocks or operations fail the check.
pub fn chain_has_no_external_output(program: &Program, block: BlockId, ops: &[OpId]) -> bool {
    let Ok(block) = program.block(block) else {
        return false;
    };
    let Some((_, intermediate)) = ops.split_last() else {
        return true;
    };
    intermediate.iter().all(|&op| {
        program.op(op).is_ok_and(|op| {
            op.outputs()
                .iter()
                .all(|&output| !block.contains_output(output))
        })
    })
}
