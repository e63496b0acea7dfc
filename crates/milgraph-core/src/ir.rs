//! Intermediate representation for programs under rewriting.
//!
//! A `Program` is an arena of:
//! - **Blocks** (`Block`): ordered operation lists with designated outputs.
//!   Functions are root blocks; control-flow operations own nested blocks.
//! - **Operations** (`Operation`): typed nodes with named input slots.
//! - **Values** (`Var`): edges produced by at most one operation and consumed
//!   by any number of operations.
//!
//! Each value carries the set of nonreplaceable values upstream of it. This
//! set is derived from producer/consumer structure and is restored by
//! [`Program::propagate_nonreplaceable_vars`]. Edits made while a block has
//! an open scope leave the restoration to the scope owner; edits made outside
//! any scope restore it immediately.

use crate::types::{DataType, TensorShape, TensorValue};
use crate::{Error, Result};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;

use std::collections::{BTreeSet, HashMap};

/// Type alias for operation identifiers (backed by petgraph NodeIndex).
pub type OpId = NodeIndex;

/// Unique identifier for a value in a `Program`.
///
/// Values are never deallocated, so ids stay valid for the program lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    /// Create a new var ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Unique identifier for a block in a `Program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

impl BlockId {
    /// Create a new block ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index.
    pub fn index(&self) -> usize {
        self.0
    }
}

// ──────────────────────────────── Program ────────────────────────────────

/// Arena owning every block, operation and value of a program.
///
/// Operations are stored in a `StableGraph` so their ids survive removals.
/// Dataflow lives on the values (`producer` and `child_ops`), so the graph
/// carries no edges.
pub struct Program {
    /// Operation storage.
    ops: StableGraph<Operation, ()>,

    /// Value storage, indexed by `VarId`.
    vars: Vec<Var>,

    /// Block storage, indexed by `BlockId`. Blocks of removed operations are `None`.
    blocks: Vec<Option<Block>>,

    /// Named root blocks.
    functions: Vec<(String, BlockId)>,

    /// Number of propagation runs so far.
    propagations: usize,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self {
            ops: StableGraph::new(),
            vars: Vec::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
            propagations: 0,
        }
    }

    // ── Block access ──

    /// Add a named function and return its root block.
    pub fn add_function(&mut self, name: impl Into<String>) -> BlockId {
        let id = self.push_block(None);
        self.functions.push((name.into(), id));
        id
    }

    /// Look up a function's root block by name.
    pub fn function(&self, name: &str) -> Option<BlockId> {
        self.functions
            .iter()
            .find(|(function, _)| function == name)
            .map(|&(_, id)| id)
    }

    /// Iterate over all functions in insertion order.
    pub fn functions(&self) -> impl Iterator<Item = (&str, BlockId)> {
        self.functions.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Get an immutable reference to a block.
    pub fn block(&self, id: BlockId) -> Result<&Block> {
        self.blocks
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::InvalidBlock(format!("Block {:?} not found", id)))
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut Block> {
        self.blocks
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::InvalidBlock(format!("Block {:?} not found", id)))
    }

    /// Check whether `id` names a live block of this program.
    pub fn contains_block(&self, id: BlockId) -> bool {
        self.block(id).is_ok()
    }

    /// Get the operations of a block, in order.
    pub fn operations(&self, block: BlockId) -> Result<&[OpId]> {
        Ok(self.block(block)?.operations())
    }

    // ── Operation and value access ──

    /// Get an immutable reference to an operation.
    pub fn op(&self, id: OpId) -> Result<&Operation> {
        self.ops
            .node_weight(id)
            .ok_or_else(|| Error::InvalidGraph(format!("Operation {:?} not found", id)))
    }

    fn op_mut(&mut self, id: OpId) -> Result<&mut Operation> {
        self.ops
            .node_weight_mut(id)
            .ok_or_else(|| Error::InvalidGraph(format!("Operation {:?} not found", id)))
    }

    /// Get an immutable reference to a value.
    pub fn var(&self, id: VarId) -> Result<&Var> {
        self.vars
            .get(id.index())
            .ok_or_else(|| Error::InvalidGraph(format!("Var {:?} not found", id)))
    }

    fn var_mut(&mut self, id: VarId) -> Result<&mut Var> {
        self.vars
            .get_mut(id.index())
            .ok_or_else(|| Error::InvalidGraph(format!("Var {:?} not found", id)))
    }

    /// Get the number of live operations.
    pub fn op_count(&self) -> usize {
        self.ops.node_count()
    }

    /// Get the number of values ever created.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    // ── Edit API ──

    /// Add an input value to a block (function argument or nested-block input).
    pub fn add_block_input(&mut self, block: BlockId, var: Var) -> Result<VarId> {
        self.block(block)?;
        let id = self.push_var(var, block, None);
        self.block_mut(block)?.inputs.push(id);
        self.edited(block)?;
        Ok(id)
    }

    /// Append an operation to a block, creating its output values.
    pub fn add_op(&mut self, block: BlockId, op: Operation, outputs: Vec<Var>) -> Result<OpId> {
        let index = self.block(block)?.operations.len();
        self.insert_op(block, index, op, outputs)
    }

    /// Insert an operation immediately before `anchor`, in the anchor's block.
    pub fn add_op_before(&mut self, anchor: OpId, op: Operation, outputs: Vec<Var>) -> Result<OpId> {
        let block = self.op(anchor)?.block;
        let index = self.block(block)?.position(anchor).ok_or_else(|| {
            Error::InvalidGraph(format!("Operation {:?} is not in block {:?}", anchor, block))
        })?;
        self.insert_op(block, index, op, outputs)
    }

    /// Append a `const` operation holding `value` and return its output.
    pub fn add_const(
        &mut self,
        block: BlockId,
        name: impl Into<String>,
        value: TensorValue,
    ) -> Result<VarId> {
        let name = name.into();
        let op = Operation::new("const").with_name(name.clone());
        let op_id = self.add_op(block, op, vec![Var::with_constant(name, value)])?;
        Ok(self.op(op_id)?.outputs[0])
    }

    /// Attach a new, empty nested block to an operation.
    pub fn add_nested_block(&mut self, op: OpId) -> Result<BlockId> {
        self.op(op)?;
        let id = self.push_block(Some(op));
        self.op_mut(op)?.blocks.push(id);
        Ok(id)
    }

    /// Replace the designated outputs of a block.
    ///
    /// # Errors
    ///
    /// Returns an error if an output is not visible from `block`: it must be
    /// defined in `block` or in one of its ancestors.
    pub fn set_outputs(&mut self, block: BlockId, outputs: Vec<VarId>) -> Result<()> {
        for &var in &outputs {
            if !self.is_visible_from(block, var)? {
                return Err(Error::InvalidGraph(format!(
                    "Var '{}' is not visible from block {:?}",
                    self.var(var)?.name,
                    block
                )));
            }
        }
        self.block_mut(block)?.outputs = outputs;
        Ok(())
    }

    /// Mark or unmark a value as nonreplaceable.
    pub fn set_nonreplaceable(&mut self, var: VarId, nonreplaceable: bool) -> Result<()> {
        let owner = self.var(var)?.owner;
        self.var_mut(var)?.nonreplaceable = nonreplaceable;
        self.edited(owner)
    }

    /// Remove an operation whose outputs are no longer used.
    ///
    /// Nested blocks of the operation are removed with it.
    ///
    /// # Errors
    ///
    /// Returns an error if any output still has consumers or is an output of
    /// the operation's block or one of its ancestors.
    pub fn remove_op(&mut self, id: OpId) -> Result<()> {
        let op = self.op(id)?;
        let block = op.block;

        for &output in &op.outputs {
            let var = self.var(output)?;
            if !var.child_ops.is_empty() {
                return Err(Error::InvalidGraph(format!(
                    "Cannot remove op '{}' ({}): output '{}' still has {} consumer(s)",
                    op.name,
                    op.op_type,
                    var.name,
                    var.child_ops.len()
                )));
            }
            if self.is_visible_output(block, output)? {
                return Err(Error::InvalidGraph(format!(
                    "Cannot remove op '{}' ({}): output '{}' is a block output",
                    op.name, op.op_type, var.name
                )));
            }
        }

        self.detach_op(id)?;
        self.edited(block)
    }

    /// Redirect every use of `old` in `block` (and its nested blocks) to `new`.
    ///
    /// Block outputs are redirected too. The operation producing `new` keeps
    /// reading `old`. Returns the number of rewritten uses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonreplaceableVar`] if `old` cannot be replaced by
    /// `new` (see [`Program::can_replace_var`]).
    pub fn replace_uses_of_var(&mut self, block: BlockId, old: VarId, new: VarId) -> Result<usize> {
        self.block(block)?;
        if old == new {
            self.var(old)?;
            return Ok(0);
        }
        if !self.can_replace_var(old, new)? {
            return Err(Error::NonreplaceableVar(format!(
                "'{}' cannot be replaced by '{}'",
                self.var(old)?.name,
                self.var(new)?.name
            )));
        }

        let skip = self.var(new)?.producer;
        let mut replaced = 0;
        self.replace_uses_in_block(block, old, new, skip, &mut replaced)?;
        self.edited(block)?;
        Ok(replaced)
    }

    /// Check whether `old` may be replaced by `new`.
    ///
    /// Every nonreplaceable value upstream of `old` must also be upstream of
    /// `new`; in particular a nonreplaceable value can only be replaced by a
    /// value derived from it.
    pub fn can_replace_var(&self, old: VarId, new: VarId) -> Result<bool> {
        let old = self.var(old)?;
        let new = self.var(new)?;
        Ok(old
            .nonreplaceable_upstream
            .is_subset(&new.nonreplaceable_upstream))
    }

    // ── Mutation scopes ──

    /// Open a mutation scope on a block and return the new nesting depth.
    pub fn enter_scope(&mut self, block: BlockId) -> Result<usize> {
        let block = self.block_mut(block)?;
        block.scope_depth += 1;
        Ok(block.scope_depth)
    }

    /// Close a mutation scope on a block and return the remaining depth.
    ///
    /// Closing does not propagate; the scope owner decides when to.
    pub fn exit_scope(&mut self, id: BlockId) -> Result<usize> {
        let block = self.block_mut(id)?;
        if block.scope_depth == 0 {
            return Err(Error::InvalidBlock(format!(
                "Block {:?} has no open scope",
                id
            )));
        }
        block.scope_depth -= 1;
        Ok(block.scope_depth)
    }

    /// Check whether a block or any of its ancestors has an open scope.
    pub fn in_scope(&self, block: BlockId) -> bool {
        let mut current = Some(block);
        while let Some(id) = current {
            let Ok(block) = self.block(id) else {
                return false;
            };
            if block.scope_depth > 0 {
                return true;
            }
            current = block
                .parent
                .and_then(|parent| self.op(parent).ok())
                .map(|op| op.block);
        }
        false
    }

    /// Recompute the nonreplaceable upstream set of every value in `block`.
    ///
    /// Walks operations in block order, descending into nested blocks before
    /// their owning operation. Cost is proportional to the size of the block.
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn propagate_nonreplaceable_vars(&mut self, block: BlockId) -> Result<()> {
        self.block(block)?;
        self.propagations += 1;
        let visited = self.propagate_block(block)?;
        tracing::trace!(visited_ops = visited, "propagated nonreplaceable vars");
        Ok(())
    }

    /// Number of propagation runs performed on this program.
    pub fn propagation_count(&self) -> usize {
        self.propagations
    }

    // ── Internals ──

    fn push_block(&mut self, parent: Option<OpId>) -> BlockId {
        let id = BlockId::new(self.blocks.len());
        self.blocks.push(Some(Block::new(id, parent)));
        id
    }

    fn push_var(&mut self, mut var: Var, owner: BlockId, producer: Option<OpId>) -> VarId {
        let id = VarId::new(self.vars.len());
        var.owner = owner;
        var.producer = producer;
        var.child_ops.clear();
        var.nonreplaceable_upstream.clear();
        if var.nonreplaceable {
            var.nonreplaceable_upstream.insert(id);
        }
        self.vars.push(var);
        id
    }

    fn insert_op(
        &mut self,
        block: BlockId,
        index: usize,
        mut op: Operation,
        outputs: Vec<Var>,
    ) -> Result<OpId> {
        self.block(block)?;
        let inputs: Vec<VarId> = op.flattened_inputs().collect();
        for &var in &inputs {
            self.var(var)?;
        }

        op.block = block;
        op.outputs.clear();
        op.blocks.clear();
        let op_id = self.ops.add_node(op);

        for var in outputs {
            let output = self.push_var(var, block, Some(op_id));
            self.op_mut(op_id)?.outputs.push(output);
        }
        for var in inputs {
            self.attach_use(var, op_id)?;
        }

        self.block_mut(block)?.operations.insert(index, op_id);
        self.edited(block)?;
        Ok(op_id)
    }

    /// Register `op` as a consumer of `var`.
    fn attach_use(&mut self, var: VarId, op: OpId) -> Result<()> {
        let value = self.var_mut(var)?;
        if !value.child_ops.contains(&op) {
            value.child_ops.push(op);
        }
        Ok(())
    }

    fn detach_op(&mut self, id: OpId) -> Result<()> {
        let op = self.op(id)?.clone();

        for &nested in &op.blocks {
            let inner: Vec<OpId> = self.block(nested)?.operations.clone();
            for inner_op in inner.into_iter().rev() {
                self.detach_op(inner_op)?;
            }
            self.blocks[nested.index()] = None;
        }

        for var in op.flattened_inputs() {
            self.var_mut(var)?.child_ops.retain(|&child| child != id);
        }
        for &output in &op.outputs {
            self.var_mut(output)?.producer = None;
        }
        self.block_mut(op.block)?.operations.retain(|&o| o != id);
        self.ops.remove_node(id);
        Ok(())
    }

    fn replace_uses_in_block(
        &mut self,
        block: BlockId,
        old: VarId,
        new: VarId,
        skip: Option<OpId>,
        replaced: &mut usize,
    ) -> Result<()> {
        let ops: Vec<OpId> = self.block(block)?.operations.clone();
        for op_id in ops {
            let nested = self.op(op_id)?.blocks.clone();
            for inner in nested {
                self.replace_uses_in_block(inner, old, new, skip, replaced)?;
            }
            if Some(op_id) == skip {
                continue;
            }

            let uses = self.op_mut(op_id)?.rebind_input(old, new);
            if uses == 0 {
                continue;
            }
            self.attach_use(new, op_id)?;
            self.var_mut(old)?.child_ops.retain(|&child| child != op_id);
            *replaced += uses;
        }

        for output in self.block_mut(block)?.outputs.iter_mut() {
            if *output == old {
                *output = new;
                *replaced += 1;
            }
        }
        Ok(())
    }

    /// Check whether `var` is defined in `block` or in one of its ancestors.
    fn is_visible_from(&self, block: BlockId, var: VarId) -> Result<bool> {
        let owner = self.var(var)?.owner;
        let mut current = Some(block);
        while let Some(id) = current {
            if id == owner {
                return Ok(true);
            }
            current = match self.block(id)?.parent {
                Some(parent) => Some(self.op(parent)?.block),
                None => None,
            };
        }
        Ok(false)
    }

    /// Check whether `var` is an output of `block` or of any ancestor block.
    fn is_visible_output(&self, block: BlockId, var: VarId) -> Result<bool> {
        let mut current = Some(block);
        while let Some(id) = current {
            let block = self.block(id)?;
            if block.contains_output(var) {
                return Ok(true);
            }
            current = match block.parent {
                Some(parent) => Some(self.op(parent)?.block),
                None => None,
            };
        }
        Ok(false)
    }

    fn edited(&mut self, block: BlockId) -> Result<()> {
        if self.in_scope(block) {
            return Ok(());
        }
        self.propagate_nonreplaceable_vars(block)
    }

    fn propagate_block(&mut self, block: BlockId) -> Result<usize> {
        let (inputs, ops) = {
            let block = self.block(block)?;
            (block.inputs.clone(), block.operations.clone())
        };

        for input in inputs {
            let var = self.var_mut(input)?;
            var.nonreplaceable_upstream.clear();
            if var.nonreplaceable {
                var.nonreplaceable_upstream.insert(input);
            }
        }

        let mut visited = 0;
        for op_id in ops {
            let (nested, inputs, outputs) = {
                let op = self.op(op_id)?;
                let inputs: Vec<VarId> = op.flattened_inputs().collect();
                (op.blocks.clone(), inputs, op.outputs.clone())
            };
            for inner in nested {
                visited += self.propagate_block(inner)?;
            }

            let mut upstream = BTreeSet::new();
            for input in inputs {
                upstream.extend(self.var(input)?.nonreplaceable_upstream.iter().copied());
            }
            for output in outputs {
                let var = self.var_mut(output)?;
                var.nonreplaceable_upstream = upstream.clone();
                if var.nonreplaceable {
                    var.nonreplaceable_upstream.insert(output);
                }
            }
            visited += 1;
        }

        Ok(visited)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────── Block ─────────────────────────────────

/// A container of ordered operations with designated outputs.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    operations: Vec<OpId>,
    inputs: Vec<VarId>,
    outputs: Vec<VarId>,
    parent: Option<OpId>,
    scope_depth: usize,
}

impl Block {
    fn new(id: BlockId, parent: Option<OpId>) -> Self {
        Self {
            id,
            operations: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            parent,
            scope_depth: 0,
        }
    }

    /// Get the block's id.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Get the operations, in order.
    pub fn operations(&self) -> &[OpId] {
        &self.operations
    }

    /// Get the block inputs.
    pub fn inputs(&self) -> &[VarId] {
        &self.inputs
    }

    /// Get the designated block outputs.
    pub fn outputs(&self) -> &[VarId] {
        &self.outputs
    }

    /// Check whether `var` is a designated output of this block.
    pub fn contains_output(&self, var: VarId) -> bool {
        self.outputs.contains(&var)
    }

    /// The operation owning this block, `None` for function blocks.
    pub fn parent(&self) -> Option<OpId> {
        self.parent
    }

    /// Current mutation scope nesting depth.
    pub fn scope_depth(&self) -> usize {
        self.scope_depth
    }

    /// Position of an operation within this block.
    pub fn position(&self, op: OpId) -> Option<usize> {
        self.operations.iter().position(|&o| o == op)
    }
}

// ─────────────────────────────── Operation ───────────────────────────────

/// A value bound to an input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Slot bound to a single value.
    Single(VarId),

    /// Slot bound to an ordered sequence of values (e.g. `concat` operands).
    Sequence(Vec<VarId>),
}

impl Input {
    /// Get the bound values as a slice.
    pub fn vars(&self) -> &[VarId] {
        match self {
            Input::Single(var) => std::slice::from_ref(var),
            Input::Sequence(vars) => vars,
        }
    }
}

/// A node in the program: an operation consuming and producing values.
///
/// Outputs, nested blocks and the owning block are assigned by `Program`.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Operation name (may be empty).
    pub name: String,

    /// Operation kind (e.g., "conv", "relu", "layer_norm").
    pub op_type: String,

    /// Named input slots.
    pub inputs: HashMap<String, Input>,

    outputs: Vec<VarId>,
    blocks: Vec<BlockId>,
    block: BlockId,
}

impl Operation {
    /// Create a new operation of the given kind with no inputs.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            op_type: op_type.into(),
            inputs: HashMap::new(),
            outputs: Vec::new(),
            blocks: Vec::new(),
            block: BlockId::default(),
        }
    }

    /// Set the operation name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Bind a single value to an input slot.
    pub fn with_input(mut self, slot: impl Into<String>, var: VarId) -> Self {
        self.inputs.insert(slot.into(), Input::Single(var));
        self
    }

    /// Bind a sequence of values to an input slot.
    pub fn with_sequence_input(mut self, slot: impl Into<String>, vars: Vec<VarId>) -> Self {
        self.inputs.insert(slot.into(), Input::Sequence(vars));
        self
    }

    /// Get the operation kind.
    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    /// Get the value(s) bound to a slot.
    pub fn input(&self, slot: &str) -> Option<&Input> {
        self.inputs.get(slot)
    }

    /// Iterate every bound input value, including sequence members.
    pub fn flattened_inputs(&self) -> impl Iterator<Item = VarId> + '_ {
        self.inputs.values().flat_map(|input| input.vars().iter().copied())
    }

    /// Get output value IDs.
    pub fn outputs(&self) -> &[VarId] {
        &self.outputs
    }

    /// Get nested block IDs.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Check if this operation owns nested blocks (control flow).
    pub fn has_blocks(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Get the block that owns this operation.
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Rebind every occurrence of `old` to `new`, returning the count.
    fn rebind_input(&mut self, old: VarId, new: VarId) -> usize {
        let mut count = 0;
        for input in self.inputs.values_mut() {
            let vars = match input {
                Input::Single(var) => std::slice::from_mut(var),
                Input::Sequence(vars) => vars.as_mut_slice(),
            };
            for var in vars.iter_mut().filter(|var| **var == old) {
                *var = new;
                count += 1;
            }
        }
        count
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self(usize::MAX)
    }
}

// ────────────────────────────────── Var ──────────────────────────────────

/// A value (edge) in the program.
///
/// Owner, producer, consumers and the upstream set are maintained by
/// `Program`; values passed to the edit API only describe name, type and
/// optional constant payload.
#[derive(Debug, Clone)]
pub struct Var {
    /// Value name.
    pub name: String,

    /// Element type.
    pub dtype: DataType,

    /// Shape.
    pub shape: TensorShape,

    constant: Option<TensorValue>,
    nonreplaceable: bool,
    owner: BlockId,
    producer: Option<OpId>,
    child_ops: Vec<OpId>,
    nonreplaceable_upstream: BTreeSet<VarId>,
}

impl Var {
    /// Describe a runtime value (no constant payload).
    pub fn new(name: impl Into<String>, dtype: DataType, shape: TensorShape) -> Self {
        Self {
            name: name.into(),
            dtype,
            shape,
            constant: None,
            nonreplaceable: false,
            owner: BlockId::default(),
            producer: None,
            child_ops: Vec::new(),
            nonreplaceable_upstream: BTreeSet::new(),
        }
    }

    /// Describe a constant value; dtype and shape come from the payload.
    pub fn with_constant(name: impl Into<String>, value: TensorValue) -> Self {
        let mut var = Self::new(name, value.dtype, value.tensor_shape());
        var.constant = Some(value);
        var
    }

    /// Mark the described value as nonreplaceable.
    pub fn nonreplaceable(mut self) -> Self {
        self.nonreplaceable = true;
        self
    }

    /// Get the constant payload, if any.
    pub fn constant(&self) -> Option<&TensorValue> {
        self.constant.as_ref()
    }

    /// Check if this value holds a constant payload.
    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    /// Nonreplaceable values this value depends on (including itself).
    pub fn nonreplaceable_upstream(&self) -> &BTreeSet<VarId> {
        &self.nonreplaceable_upstream
    }

    /// The block this value was defined in.
    pub fn owner(&self) -> BlockId {
        self.owner
    }

    /// The operation producing this value, `None` for inputs.
    pub fn producer(&self) -> Option<OpId> {
        self.producer
    }

    /// The operations consuming this value, each listed once.
    pub fn child_ops(&self) -> &[OpId] {
        &self.child_ops
    }
}
