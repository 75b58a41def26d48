//! Type-checked nested-query flattening.
//!
//! A nested match normally compiles to a correlated sub-select, but the
//! per-position predicates of the list lowering must be flat boolean
//! expressions over an iteration alias. This rewrite walks a filter tree
//! and re-roots every leaf at the alias, replacing nested selects with
//! `IS`-guarded attribute paths. The output contains no residual selects.

use crate::ast::{
    EdgeQLFilter, EdgeQLObject, FilterNode, LogicOperator, SelectTarget,
};
use crate::error::{CompileError, CompileResult};
use crate::schema::protected_name;

use super::merge_filters;

/// Rewrite `filters` so every leaf reads from an attribute path rooted at
/// `base`. Returns `None` when the tree contributes no predicates.
pub(crate) fn generate_typechecked_query(
    filters: &FilterNode,
    base: EdgeQLObject,
) -> CompileResult<Option<FilterNode>> {
    let mut base_query: Option<FilterNode> = None;

    for (leaf, operator) in unpack_filters(filters) {
        let FilterNode::Filter(filter) = leaf else {
            return Err(CompileError::unsupported(leaf));
        };
        let EdgeQLObject::FilterKey(field) = &filter.key else {
            return Err(CompileError::internal(format!(
                "typecheck rewrite expects a filter key, found {:?}",
                filter.key
            )));
        };
        let key = EdgeQLObject::attribute(base.clone(), field.clone());

        let current = match &filter.value {
            EdgeQLObject::Prepared(_) => Some(FilterNode::Filter(EdgeQLFilter {
                key,
                value: filter.value.clone(),
                operator: filter.operator,
            })),
            EdgeQLObject::Select(select) => {
                let SelectTarget::Model(model) = &select.target else {
                    return Err(CompileError::unsupported(&select.target));
                };
                // The guard becomes the new attribute root, so inner
                // fields resolve against the asserted type.
                let verifier =
                    EdgeQLObject::verify(key, protected_name(model, true));
                match &select.filters {
                    Some(inner) => generate_typechecked_query(inner, verifier)?,
                    None => None,
                }
            }
            other => return Err(CompileError::unsupported(other)),
        };

        base_query = merge_filters(base_query, current, operator.unwrap_or_default());
    }

    Ok(base_query)
}

/// Flatten a filter tree into its leaves, each paired with the logic
/// operator linking it to everything before it (None for the first leaf).
fn unpack_filters(node: &FilterNode) -> Vec<(&FilterNode, Option<LogicOperator>)> {
    let mut leaves = Vec::new();
    collect_leaves(node, None, &mut leaves);
    leaves
}

fn collect_leaves<'a>(
    node: &'a FilterNode,
    operator: Option<LogicOperator>,
    leaves: &mut Vec<(&'a FilterNode, Option<LogicOperator>)>,
) {
    match node {
        FilterNode::Chain(chain) => {
            collect_leaves(&chain.left, operator, leaves);
            collect_leaves(&chain.right, Some(chain.operator), leaves);
        }
        leaf => leaves.push((leaf, operator)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::ToEdgeQL;

    fn filter(field: &str, value: &str) -> FilterNode {
        FilterNode::Filter(EdgeQLFilter::new(
            EdgeQLObject::FilterKey(field.into()),
            EdgeQLObject::Prepared(value.into()),
        ))
    }

    #[test]
    fn test_unpack_preserves_leaf_order_and_operators() {
        let tree = filter("a", "1")
            .chain(filter("b", "2"), LogicOperator::Or)
            .chain(filter("c", "3"), LogicOperator::And);
        let leaves = unpack_filters(&tree);
        let operators: Vec<_> = leaves.iter().map(|(_, op)| *op).collect();
        assert_eq!(
            operators,
            vec![None, Some(LogicOperator::Or), Some(LogicOperator::And)]
        );
    }

    #[test]
    fn test_literal_leaf_is_rerooted() {
        let rewritten = generate_typechecked_query(
            &filter("id", "'print'"),
            EdgeQLObject::Name("__item_0".into()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(rewritten.to_edgeql(), "__item_0.id = 'print'");
    }

    #[test]
    fn test_non_filter_key_is_an_internal_error() {
        let bad = FilterNode::Filter(EdgeQLFilter::new(
            EdgeQLObject::call("count", vec![EdgeQLObject::FilterKey("body".into())]),
            EdgeQLObject::Prepared("0".into()),
        ));
        let err = generate_typechecked_query(&bad, EdgeQLObject::Name("x".into()))
            .unwrap_err();
        assert!(matches!(err, CompileError::Internal(_)));
    }

    #[test]
    fn test_unsupported_leaf_value() {
        let bad = FilterNode::Filter(EdgeQLFilter::new(
            EdgeQLObject::FilterKey("targets".into()),
            EdgeQLObject::Set(vec![]),
        ));
        let err = generate_typechecked_query(&bad, EdgeQLObject::Name("x".into()))
            .unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedSyntax(_)));
    }
}
