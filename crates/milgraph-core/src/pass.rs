//! Graph pass trait.

use crate::Result;
use crate::ir::Program;

/// Trait for implementing graph rewriting passes.
///
/// A pass edits a `Program` through its edit API, usually inside a mutation
/// scope so the nonreplaceable-value invariant is restored once per batch of
/// edits rather than once per edit. Sequencing passes is left to the caller.
///
/// # Return Value
///
/// The `run()` method returns `Ok(true)` if the pass made changes to the
/// program, or `Ok(false)` if no changes were made. This allows a driver to
/// detect when the program reaches a fixed point.
///
/// # Example
///
/// ```ignore
/// struct DeadCodeEliminationPass;
///
/// impl Pass for DeadCodeEliminationPass {
///     fn name(&self) -> &str {
///         "dead_code_elimination"
///     }
///
///     fn run(&self, program: &mut Program) -> Result<bool> {
///         let mut changed = false;
///         // Remove operations whose outputs have no consumers...
///         Ok(changed)
///     }
/// }
/// ```
pub trait Pass: Send + Sync {
    /// Get the pass name (used for logging and debugging).
    fn name(&self) -> &str;

    /// Run the pass on the given program.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the pass made changes to the program.
    /// * `Ok(false)` if no changes were made.
    /// * `Err(_)` if the pass encountered an error.
    fn run(&self, program: &mut Program) -> Result<bool>;
}
