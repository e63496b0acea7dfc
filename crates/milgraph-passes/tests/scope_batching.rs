//! Mutation scope batching against a real program.

mod common;

use common::{f32_var, init_tracing, program_with_input, unary};
use milgraph_core::{BlockId, Error, Operation};
use milgraph_passes::{walk_blocks, walk_program, with_block};

#[test]
fn test_edit_batch_propagates_once() {
    init_tracing();
    let (mut program, main, x) = program_with_input();
    let before = program.propagation_count();

    let last = with_block(&mut program, main, |program, block| {
        let mut current = x;
        for op_type in ["abs", "relu", "sigmoid", "tanh", "exp"] {
            current = unary(program, block, op_type, current).1;
        }
        // Re-entering the same block does not propagate on its own.
        with_block(program, block, |program, block| {
            let (_, y) = unary(program, block, "sqrt", current);
            let (_, z) = unary(program, block, "square", y);
            program.set_outputs(block, vec![z])?;
            Ok(z)
        })
    })
    .unwrap();

    assert_eq!(program.propagation_count(), before + 1);
    assert_eq!(program.block(main).unwrap().outputs(), &[last]);
    assert_eq!(program.block(main).unwrap().scope_depth(), 0);
}

#[test]
fn test_edits_outside_scope_propagate_per_edit() {
    let (mut program, main, x) = program_with_input();
    let before = program.propagation_count();

    let (_, y) = unary(&mut program, main, "relu", x);
    let (_, z) = unary(&mut program, main, "relu", y);
    unary(&mut program, main, "relu", z);

    assert_eq!(program.propagation_count(), before + 3);
}

#[test]
fn test_failing_batch_restores_invariant_and_returns_error() {
    let mut program = milgraph_core::Program::new();
    let main = program.add_function("main");
    let state = program
        .add_block_input(main, f32_var("state").nonreplaceable())
        .unwrap();
    let before = program.propagation_count();

    let mut produced = None;
    let result: milgraph_core::Result<()> = with_block(&mut program, main, |program, block| {
        let (_, y) = unary(program, block, "relu", state);
        produced = Some(y);
        Err(Error::Pass("rewrite rejected".to_string()))
    });

    assert!(matches!(result, Err(Error::Pass(_))));
    assert_eq!(program.propagation_count(), before + 1);
    assert_eq!(program.block(main).unwrap().scope_depth(), 0);

    let y = produced.unwrap();
    assert!(program.var(y).unwrap().nonreplaceable_upstream().contains(&state));
}

#[test]
fn test_invariant_is_stale_inside_scope_and_restored_on_exit() {
    let (mut program, main, x) = program_with_input();
    let (_, state) = unary(&mut program, main, "identity", x);
    let (_, derived) = unary(&mut program, main, "relu", state);
    let (_, other) = unary(&mut program, main, "relu", x);

    with_block(&mut program, main, |program, _| {
        program.set_nonreplaceable(state, true)?;
        assert!(program.var(derived)?.nonreplaceable_upstream().is_empty());
        Ok(())
    })
    .unwrap();

    assert!(program.var(derived).unwrap().nonreplaceable_upstream().contains(&state));
    assert!(matches!(
        program.replace_uses_of_var(main, state, other),
        Err(Error::NonreplaceableVar(_))
    ));
}

#[test]
fn test_scope_on_nested_block_coalesces_into_parent() {
    let (mut program, main, x) = program_with_input();
    let (cond, _) = unary(&mut program, main, "cond", x);
    let body = program.add_nested_block(cond).unwrap();
    let before = program.propagation_count();

    with_block(&mut program, main, |program, _| {
        with_block(program, body, |program, body| {
            let (_, y) = unary(program, body, "relu", x);
            program.set_outputs(body, vec![y])
        })
    })
    .unwrap();

    assert_eq!(program.propagation_count(), before + 1);
    assert_eq!(program.operations(body).unwrap().len(), 1);
}

#[test]
fn test_nested_block_scope_alone_propagates_once() {
    let (mut program, main, x) = program_with_input();
    let (cond, _) = unary(&mut program, main, "cond", x);
    let body = program.add_nested_block(cond).unwrap();
    let before = program.propagation_count();

    with_block(&mut program, body, |program, body| {
        let (_, y) = unary(program, body, "relu", x);
        unary(program, body, "relu", y);
        Ok(())
    })
    .unwrap();

    assert_eq!(program.propagation_count(), before + 1);
}

#[test]
fn test_walk_blocks_visits_nested_first_and_propagates_once() {
    let (mut program, main, x) = program_with_input();
    let (cond, _) = unary(&mut program, main, "cond", x);
    let then_body = program.add_nested_block(cond).unwrap();
    let else_body = program.add_nested_block(cond).unwrap();
    let (inner, _) = unary(&mut program, then_body, "loop", x);
    let loop_body = program.add_nested_block(inner).unwrap();
    let before = program.propagation_count();

    let mut visited = Vec::new();
    walk_blocks(&mut program, main, &mut |program, block| {
        unary(program, block, "marker", x);
        visited.push(block);
        Ok(())
    })
    .unwrap();

    assert_eq!(visited, vec![loop_body, then_body, else_body, main]);
    assert_eq!(program.propagation_count(), before + 1);
}

#[test]
fn test_walk_program_covers_every_function() {
    let (mut program, main, _) = program_with_input();
    let helper = program.add_function("helper");
    let before = program.propagation_count();

    let mut visited = Vec::new();
    walk_program(&mut program, |_, block| {
        visited.push(block);
        Ok(())
    })
    .unwrap();

    assert_eq!(visited, vec![main, helper]);
    assert_eq!(program.propagation_count(), before + 2);
}

#[test]
fn test_unknown_block_is_usage_error() {
    let (mut program, _, _) = program_with_input();
    let before = program.propagation_count();
    let mut ran = false;

    let result = with_block(&mut program, BlockId::new(42), |_, _| {
        ran = true;
        Ok(())
    });

    assert!(matches!(result, Err(Error::InvalidBlock(_))));
    assert!(!ran);
    assert_eq!(program.propagation_count(), before);
}

#[test]
fn test_explicit_op_inputs_inside_scope() {
    let (mut program, main, x) = program_with_input();

    let concat = with_block(&mut program, main, |program, block| {
        let (_, a) = unary(program, block, "relu", x);
        let (_, b) = unary(program, block, "abs", x);
        program.add_op(
            block,
            Operation::new("concat").with_sequence_input("values", vec![a, b, x]),
            vec![f32_var("joined")],
        )
    })
    .unwrap();

    assert_eq!(program.op(concat).unwrap().flattened_inputs().count(), 3);
    assert_eq!(program.var(x).unwrap().child_ops().len(), 3);
}

#[test]
fn test_caught_panic_leaves_block_unscoped() {
    let (mut program, main, x) = program_with_input();
    let before = program.propagation_count();

    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        with_block(&mut program, main, |program, block| -> milgraph_core::Result<()> {
            unary(program, block, "relu", x);
            panic!("rewrite panicked");
        })
    }));

    assert!(unwound.is_err());
    assert_eq!(program.block(main).unwrap().scope_depth(), 0);
    assert_eq!(program.propagation_count(), before + 1);

    unary(&mut program, main, "relu", x);
    assert_eq!(program.propagation_count(), before + 2);
}
