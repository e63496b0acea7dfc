//! Mutation scope guard.
//!
//! Restoring the nonreplaceable-value invariant costs a walk over the whole
//! block, so passes batch their edits: every edit inside [`with_block`] skips
//! the restoration, and the outermost scope runs it exactly once on exit.
//! Scopes nest freely; an inner scope on the same block (or on a block whose
//! ancestor is already scoped) never propagates on its own.

use milgraph_core::{BlockId, Program, Result};

/// A target whose blocks can be edited under a mutation scope.
pub trait MutationScope {
    /// Check whether `block` or any of its ancestors has an open scope.
    fn in_scope(&self, block: BlockId) -> bool;

    /// Open a scope on `block`, returning the new depth.
    ///
    /// Must fail if `block` does not name a block of this target.
    fn enter_scope(&mut self, block: BlockId) -> Result<usize>;

    /// Close a scope on `block`, returning the remaining depth.
    fn exit_scope(&mut self, block: BlockId) -> Result<usize>;

    /// Restore the nonreplaceable-value invariant over `block`.
    fn propagate_nonreplaceable_vars(&mut self, block: BlockId) -> Result<()>;
}

impl MutationScope for Program {
    fn in_scope(&self, block: BlockId) -> bool {
        Program::in_scope(self, block)
    }

    fn enter_scope(&mut self, block: BlockId) -> Result<usize> {
        Program::enter_scope(self, block)
    }

    fn exit_scope(&mut self, block: BlockId) -> Result<usize> {
        Program::exit_scope(self, block)
    }

    fn propagate_nonreplaceable_vars(&mut self, block: BlockId) -> Result<()> {
        Program::propagate_nonreplaceable_vars(self, block)
    }
}

/// An open scope on `block`, closed on [`ScopeGuard::close`] or on drop.
///
/// Dropping an unclosed guard happens only while unwinding from a panic in
/// the work; the scope is still closed so the block is not left deferring
/// propagation forever.
struct ScopeGuard<'a, S: MutationScope + ?Sized> {
    target: &'a mut S,
    block: BlockId,
    outermost: bool,
    closed: bool,
}

impl<S: MutationScope + ?Sized> ScopeGuard<'_, S> {
    /// Propagate if outermost, then exit the scope.
    ///
    /// Both steps run even if the first fails; the first error is returned.
    fn close(&mut self) -> Result<()> {
        self.closed = true;
        let propagated = if self.outermost {
            self.target.propagate_nonreplaceable_vars(self.block)
        } else {
            Ok(())
        };
        let exited = self.target.exit_scope(self.block).map(drop);
        propagated.and(exited)
    }
}

impl<S: MutationScope + ?Sized> Drop for ScopeGuard<'_, S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        tracing::warn!(block = ?self.block, "closing mutation scope during unwind");
        if let Err(err) = self.close() {
            tracing::warn!(block = ?self.block, error = %err, "mutation scope cleanup failed");
        }
    }
}

/// Run `work` on `block` inside a mutation scope.
///
/// The work receives the target and the block back as explicit parameters.
/// When this is the outermost scope covering `block`, propagation runs once
/// after the work finishes, whether it succeeded, failed or panicked, and the
/// scope is closed afterwards.
///
/// # Errors
///
/// Fails before running `work` if `block` is not a block of `target`. An
/// error returned by `work` is passed through unchanged after cleanup; if
/// cleanup also fails, the cleanup error is logged and the work's error wins.
///
/// # Example
///
/// ```ignore
/// with_block(&mut program, main, |program, block| {
///     let fused = program.add_op_before(relu, fused_op, outputs)?;
///     program.replace_uses_of_var(block, relu_out, fused_out)?;
///     program.remove_op(relu)?;
///     program.remove_op(norm)
/// })?;
/// ```
pub fn with_block<S, T, F>(target: &mut S, block: BlockId, work: F) -> Result<T>
where
    S: MutationScope + ?Sized,
    F: FnOnce(&mut S, BlockId) -> Result<T>,
{
    let outermost = !target.in_scope(block);
    let depth = target.enter_scope(block)?;
    if outermost {
        tracing::debug!(?block, "entered mutation scope");
    }

    let mut guard = ScopeGuard {
        target,
        block,
        outermost,
        closed: false,
    };
    let result = work(&mut *guard.target, block);
    let cleanup = guard.close();
    if outermost {
        tracing::debug!(?block, depth, ok = result.is_ok(), "exited mutation scope");
    }

    match result {
        Ok(value) => {
            cleanup?;
            Ok(value)
        }
        Err(err) => {
            if let Err(cleanup) = cleanup {
                tracing::warn!(?block, error = %cleanup, "mutation scope cleanup failed");
            }
            Err(err)
        }
    }
}

/// Apply `work` to every block nested under `block`, then to `block` itself.
///
/// Nested blocks are visited depth first, before the block that owns them.
/// The whole walk runs inside one scope on `block`, so it propagates once.
#[tracing::instrument(skip_all, fields(block = ?block))]
pub fn walk_blocks<F>(program: &mut Program, block: BlockId, work: &mut F) -> Result<()>
where
    F: FnMut(&mut Program, BlockId) -> Result<()>,
{
    with_block(program, block, |program, block| {
        let ops = program.operations(block)?.to_vec();
        for op in ops {
            // Earlier visits may have removed the operation.
            let Ok(op) = program.op(op) else {
                continue;
            };
            let nested = op.blocks().to_vec();
            for inner in nested {
                walk_blocks(program, inner, work)?;
            }
        }
        work(program, block)
    })
}

/// Apply [`walk_blocks`] to every function of `program`.
pub fn walk_program<F>(program: &mut Program, mut work: F) -> Result<()>
where
    F: FnMut(&mut Program, BlockId) -> Result<()>,
{
    let functions: Vec<BlockId> = program.functions().map(|(_, block)| block).collect();
    for function in functions {
        walk_blocks(program, function, &mut work)?;
    }
    Ok(())
}
