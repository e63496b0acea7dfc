//! Program intermediate representation for the milgraph rewriting layer.
//!
//! This crate provides the IR that graph passes edit:
//! - A `Program` arena of blocks, operations and values (`Block`, `Operation`, `Var`)
//! - The block edit API and mutation-scope primitives
//! - Nonreplaceable-value propagation, the invariant restored at scope exit
//! - The `Pass` trait implemented by optimization passes

pub mod ir;
pub mod pass;
pub mod types;

// Re-export commonly used types
pub use ir::{Block, BlockId, Input, OpId, Operation, Program, Var, VarId};
pub use pass::Pass;
pub use types::{DataType, TensorData, TensorShape, TensorValue};

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for milgraph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),

    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Nonreplaceable var: {0}")]
    NonreplaceableVar(String),

    #[error("Pass error: {0}")]
    Pass(String),
}
