//! Pattern lowering.
//!
//! A single recursive descent over [`Pattern`] nodes producing EdgeQL AST
//! nodes. Each top-level match owns a fresh [`SelectState`]; nothing is
//! shared between independent compilations, so concurrent use needs no
//! synchronization.

mod list;
mod rewrite;

#[cfg(test)]
mod tests;

use crate::ast::{
    EdgeQLFilter, EdgeQLObject, EdgeQLSelect, EdgeQLWithBlock, FilterNode,
    LogicOperator, ToEdgeQL,
};
use crate::error::{CompileError, CompileResult};
use crate::pattern::{Pattern, PatternLogicOp};
use crate::schema::{protected_name, quoted_literal};

/// Mutable context for one top-level match compilation.
///
/// `pointer` tracks the field currently being filtered (already escaped);
/// `assignments` accumulates with-block bindings in insertion order.
pub(crate) struct SelectState {
    name: String,
    pointer: Option<String>,
    assignments: Vec<(String, EdgeQLObject)>,
}

impl SelectState {
    fn new(name: &str) -> Self {
        SelectState {
            name: name.to_string(),
            pointer: None,
            assignments: Vec::new(),
        }
    }

    /// The current field pointer. Reading it outside a match body is a
    /// compiler defect, not a pattern error.
    fn pointer(&self) -> CompileResult<&str> {
        self.pointer
            .as_deref()
            .ok_or_else(|| CompileError::internal("field pointer accessed outside a match"))
    }

    /// Bind `alias := value`, replacing any earlier binding of the alias.
    fn assign(&mut self, alias: String, value: EdgeQLObject) {
        if let Some(slot) = self.assignments.iter_mut().find(|(a, _)| *a == alias) {
            slot.1 = value;
        } else {
            self.assignments.push((alias, value));
        }
    }
}

/// Compile a top-level pattern into a select statement.
///
/// Only a [`Pattern::Match`] is a valid query root; anything else is an
/// unsupported-syntax error carrying the offending node.
pub fn compile(pattern: &Pattern) -> CompileResult<EdgeQLSelect> {
    match pattern {
        Pattern::Match { name, fields } => compile_match(name, fields),
        other => Err(CompileError::unsupported(other)),
    }
}

/// Compile a top-level pattern and render it as query text.
pub fn compile_to_edgeql(pattern: &Pattern) -> CompileResult<String> {
    Ok(compile(pattern)?.to_edgeql())
}

/// Lower a match pattern: one filter per field, AND-chained in field
/// order, plus any with-block bindings the field lowerings accumulated.
fn compile_match(name: &str, fields: &[(String, Pattern)]) -> CompileResult<EdgeQLSelect> {
    let mut state = SelectState::new(name);
    let mut filters: Option<FilterNode> = None;

    for (field, value) in fields {
        state.pointer = Some(protected_name(field, false));
        let lowered = compile_node(value, &mut state)?;
        let conversion = into_filter(lowered, state.pointer()?);
        filters = merge_filters(filters, Some(conversion), LogicOperator::And);
    }

    let mut select = EdgeQLSelect::model(state.name);
    select.filters = filters;
    if !state.assignments.is_empty() {
        select.with_block = Some(EdgeQLWithBlock::new(state.assignments));
    }
    Ok(select)
}

/// Variant dispatch for everything below the query root.
fn compile_node(pattern: &Pattern, state: &mut SelectState) -> CompileResult<EdgeQLObject> {
    match pattern {
        Pattern::Match { name, fields } => {
            // A nested match opens its own scope; the inner select is
            // later flattened by the typecheck rewrite where needed.
            Ok(compile_match(name, fields)?.into())
        }
        Pattern::MatchEnum { base, member } => Ok(EdgeQLObject::Cast {
            ty: base.clone(),
            value: Box::new(EdgeQLObject::Prepared(quoted_literal(member))),
        }),
        Pattern::Logical { left, right, op } => compile_logical(left, right, *op, state),
        Pattern::Operator(op) => Ok(EdgeQLObject::Logic(compile_operator(*op)?)),
        Pattern::Set(items) => {
            let compiled = items
                .iter()
                .map(|item| compile_node(item, state))
                .collect::<CompileResult<Vec<_>>>()?;
            Ok(EdgeQLObject::Set(compiled))
        }
        Pattern::List(items) => list::compile_list(items, state),
        Pattern::Constant(text) => Ok(EdgeQLObject::Prepared(text.clone())),
    }
}

/// Lower an explicit logical combination. Both operands compile under the
/// same field pointer; non-chain operands are wrapped as filters on it.
fn compile_logical(
    left: &Pattern,
    right: &Pattern,
    op: PatternLogicOp,
    state: &mut SelectState,
) -> CompileResult<EdgeQLObject> {
    let pointer = state.pointer()?.to_string();
    let left = compile_node(left, state)?;
    let right = compile_node(right, state)?;

    let chain = into_chain_operand(left, &pointer).chain(
        into_chain_operand(right, &pointer),
        compile_operator(op)?,
    );
    Ok(chain.into_object())
}

/// Map a pattern logic operator to its EdgeQL token. Only `Or` has a
/// mapping here: sibling-field conjunction goes through the default chain
/// operator instead, so `And` never reaches this path from well-formed
/// patterns.
fn compile_operator(op: PatternLogicOp) -> CompileResult<LogicOperator> {
    match op {
        PatternLogicOp::Or => Ok(LogicOperator::Or),
        PatternLogicOp::And => Err(CompileError::unsupported(&op)),
    }
}

/// Wrap a lowered node as a filter on `pointer` unless it already is a
/// filter or a chain.
fn into_filter(node: EdgeQLObject, pointer: &str) -> FilterNode {
    match node {
        EdgeQLObject::Filter(filter) => FilterNode::Filter(*filter),
        EdgeQLObject::FilterChain(chain) => FilterNode::Chain(chain),
        value => FilterNode::Filter(EdgeQLFilter::new(
            EdgeQLObject::FilterKey(pointer.to_string()),
            value,
        )),
    }
}

/// Chain-operand wrapping: only an existing chain escapes the filter
/// wrapper.
fn into_chain_operand(node: EdgeQLObject, pointer: &str) -> FilterNode {
    match node {
        EdgeQLObject::FilterChain(chain) => FilterNode::Chain(chain),
        value => FilterNode::Filter(EdgeQLFilter::new(
            EdgeQLObject::FilterKey(pointer.to_string()),
            value,
        )),
    }
}

/// Combine two optional filter trees; an absent side is the identity.
pub(crate) fn merge_filters(
    left: Option<FilterNode>,
    right: Option<FilterNode>,
    operator: LogicOperator,
) -> Option<FilterNode> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(left), Some(right)) => Some(left.chain(right, operator)),
    }
}
