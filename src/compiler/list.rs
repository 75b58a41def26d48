//! Ordered list-pattern lowering.
//!
//! A list pattern is an ordered-sequence match, not a multiset match:
//! the compiled filter asserts element count, per-position type identity
//! in pattern order, and per-position field values, in that order of
//! increasing cost.

use crate::ast::{
    EdgeQLFilter, EdgeQLObject, EdgeQLSelect, EdgeQLWithBlock, FilterNode,
    LogicOperator,
};
use crate::error::{CompileError, CompileResult};
use crate::pattern::Pattern;
use crate::schema::{MODULE, protected_name, quoted_literal};

use super::{SelectState, compile_match, merge_filters, rewrite};

/// Iteration variable of the order-type check.
const FOR_TARGET: &str = "__KEY";

/// Link property ordering the elements of a sequence field.
const INDEX_PROPERTY: &str = "index";

pub(crate) fn compile_list(
    items: &[Pattern],
    state: &mut SelectState,
) -> CompileResult<EdgeQLObject> {
    let pointer = state.pointer()?.to_string();

    // Cheap short-circuit: reject length mismatches before the type and
    // value checks run.
    let quantity_verifier = FilterNode::Filter(EdgeQLFilter::new(
        EdgeQLObject::call(
            "count",
            vec![EdgeQLObject::FilterKey(pointer.clone())],
        ),
        EdgeQLObject::Prepared(items.len().to_string()),
    ));
    if items.is_empty() {
        return Ok(quantity_verifier.into_object());
    }

    let mut expected_types = Vec::new();
    let mut bindings: Vec<(String, EdgeQLObject)> = Vec::new();
    let mut select_filters: Option<FilterNode> = None;

    for (index, item) in items.iter().enumerate() {
        let Pattern::Match { name, fields } = item else {
            return Err(CompileError::unsupported(item));
        };
        expected_types.push(name.clone());

        // A type-only wildcard contributes to the order-type check but
        // binds no value filter.
        let Some(filters) = compile_match(name, fields)?.filters else {
            continue;
        };

        let alias = format!("__item_{index}");
        bindings.push((
            alias.clone(),
            EdgeQLObject::verify(
                positional_selection(&pointer, index).into(),
                protected_name(name, true),
            ),
        ));
        let rooted = rewrite::generate_typechecked_query(
            &filters,
            EdgeQLObject::Name(alias),
        )?;
        select_filters = merge_filters(select_filters, rooted, LogicOperator::And);
    }

    // One schema-identity binding per distinct expected type, first-seen
    // order, referenced by the order-type check below.
    let mut seen: Vec<&str> = Vec::new();
    for ql_type in &expected_types {
        if seen.contains(&ql_type.as_str()) {
            continue;
        }
        seen.push(ql_type);
        state.assign(
            protected_name(ql_type, false),
            type_identity_lookup(ql_type).into(),
        );
    }

    let type_verifier = order_type_verifier(&pointer, &expected_types);
    let mut object_verifier = quantity_verifier.chain(type_verifier, LogicOperator::And);

    if let Some(filters) = select_filters {
        let mut value_verifier = EdgeQLSelect::expression(filters.into_object());
        value_verifier.with_block = Some(EdgeQLWithBlock::new(bindings));
        object_verifier = object_verifier.chain(
            FilterNode::Expr(Box::new(value_verifier.into())),
            LogicOperator::And,
        );
    }
    Ok(object_verifier.into_object())
}

/// Isolates the element at position `index`:
/// `SELECT .ptr ORDER BY @index OFFSET i LIMIT 1`.
fn positional_selection(pointer: &str, index: usize) -> EdgeQLSelect {
    let mut selection =
        EdgeQLSelect::expression(EdgeQLObject::FilterKey(pointer.to_string()));
    selection.ordered = Some(EdgeQLObject::Property(INDEX_PROPERTY.to_string()));
    selection.offset = Some(index);
    selection.limit = Some(1);
    selection
}

/// Resolves the runtime identity of an expected element type:
/// `SELECT schema::ObjectType FILTER .name = 'ast::T'`.
fn type_identity_lookup(ql_type: &str) -> EdgeQLSelect {
    EdgeQLSelect::expression(EdgeQLObject::Prepared("schema::ObjectType".to_string()))
        .with_filters(FilterNode::Filter(EdgeQLFilter::new(
            EdgeQLObject::FilterKey("name".to_string()),
            EdgeQLObject::Prepared(quoted_literal(&format!("{MODULE}::{ql_type}"))),
        )))
}

/// The order-type check: aggregate the runtime type of every element of
/// `pointer` in ascending @index order and compare against the expected
/// identities in pattern order.
///
/// `array_agg(FOR __KEY IN {(SELECT .ptr ORDER BY @index)}
///  UNION __KEY.__type__.id) = [T0.id, T1.id, ...]`
fn order_type_verifier(pointer: &str, expected_types: &[String]) -> FilterNode {
    let mut ordered =
        EdgeQLSelect::expression(EdgeQLObject::FilterKey(pointer.to_string()));
    ordered.ordered = Some(EdgeQLObject::Property(INDEX_PROPERTY.to_string()));

    let aggregated = EdgeQLObject::call(
        "array_agg",
        vec![EdgeQLObject::For {
            target: FOR_TARGET.to_string(),
            iterator: Box::new(EdgeQLObject::Set(vec![ordered.into()])),
            generator: Box::new(EdgeQLObject::attribute(
                EdgeQLObject::attribute(
                    EdgeQLObject::Name(FOR_TARGET.to_string()),
                    "__type__",
                ),
                "id",
            )),
        }],
    );

    let expected = EdgeQLObject::Array(
        expected_types
            .iter()
            .map(|ql_type| {
                EdgeQLObject::attribute(
                    EdgeQLObject::Name(protected_name(ql_type, false)),
                    "id",
                )
            })
            .collect(),
    );

    FilterNode::Filter(EdgeQLFilter::new(aggregated, expected))
}
