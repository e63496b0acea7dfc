//! Shared primitives for graph rewriting passes.
//!
//! Passes locate rewrite opportunities with read-only predicates and apply
//! edits inside a mutation scope:
//! - [`scope`]: `with_block` batches edits so the nonreplaceable-value
//!   invariant is restored once, at the outermost scope exit
//! - [`equality`]: `identical` decides whether two operations are
//!   interchangeable (common subexpression elimination)
//! - [`topology`]: local shape checks for fusion candidates
//! - [`constant`]: scalar constant predicates and the shared constant
//!   comparison helpers
//!
//! Predicates are total: a non-match, including unknown ids, yields `false`.

pub mod constant;
pub mod equality;
pub mod scope;
pub mod topology;

pub use constant::{
    DEFAULT_TOLERANCE, const_matches, constant_scalar, constants_equal,
    is_constant_scalar_close, is_constant_scalar_close_with_tolerance,
    is_constant_scalar_in_range,
};
pub use equality::{identical, vars_identical};
pub use scope::{MutationScope, walk_blocks, walk_program, with_block};
pub use topology::{chain_has_no_external_output, has_single_child_of_type, single_child};
