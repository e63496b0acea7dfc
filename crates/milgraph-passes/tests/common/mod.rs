//! Common program builders for pass integration tests.

#![allow(dead_code)]

use milgraph_core::{BlockId, DataType, OpId, Operation, Program, TensorShape, Var, VarId};

/// Install a test subscriber so scope logging is visible with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .with_target(false)
        .try_init();
}

/// Describe an f32 value of shape `[1, 8]`.
pub fn f32_var(name: &str) -> Var {
    Var::new(name, DataType::F32, TensorShape::Static(vec![1, 8]))
}

/// Create a program with a `main` function taking one input `x`.
pub fn program_with_input() -> (Program, BlockId, VarId) {
    let mut program = Program::new();
    let main = program.add_function("main");
    let x = program.add_block_input(main, f32_var("x")).unwrap();
    (program, main, x)
}

/// Append `op_type(x)` with a single output.
pub fn unary(program: &mut Program, block: BlockId, op_type: &str, x: VarId) -> (OpId, VarId) {
    let op = program
        .add_op(
            block,
            Operation::new(op_type).with_name(op_type).with_input("x", x),
            vec![f32_var(op_type)],
        )
        .unwrap();
    (op, program.op(op).unwrap().outputs()[0])
}

/// Append `op_type(x, y)` with a single output.
pub fn binary(
    program: &mut Program,
    block: BlockId,
    op_type: &str,
    x: VarId,
    y: VarId,
) -> (OpId, VarId) {
    let op = program
        .add_op(
            block,
            Operation::new(op_type)
                .with_name(op_type)
                .with_input("x", x)
                .with_input("y", y),
            vec![f32_var(op_type)],
        )
        .unwrap();
    (op, program.op(op).unwrap().outputs()[0])
}
