use serde::{Deserialize, Serialize};

use crate::ast::stmt::{
    EdgeQLFilter, EdgeQLFilterChain, EdgeQLInsert, EdgeQLSelect,
    EdgeQLSelector, EdgeQLUpdate,
};
use crate::ast::{
    ComparisonOperator, LogicOperator, ToEdgeQL, VerifyOperator,
    render_sequence, render_value,
};
use crate::schema::protected_name;

/// Any EdgeQL node the compiler can produce.
///
/// Expression variants render bare; the statement variants (`Select`,
/// `Insert`, `Update`) are parenthesized whenever they appear in value
/// position, see [`render_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeQLObject {
    /// A bare name, rendered as-is.
    Name(String),
    /// A query parameter ($name).
    Variable(String),
    /// A scoped field access on the selected object (.name).
    FilterKey(String),
    /// Ordered tuple ( ... )
    Tuple(Vec<EdgeQLObject>),
    /// Ordered array [ ... ]
    Array(Vec<EdgeQLObject>),
    /// Unordered set { ... }
    Set(Vec<EdgeQLObject>),
    /// Function call func(arg, ...). The function name is trusted.
    Call {
        func: String,
        args: Vec<EdgeQLObject>,
    },
    /// Type cast <type>value. The type name is escaped at render time.
    Cast {
        ty: String,
        value: Box<EdgeQLObject>,
    },
    /// Opaque pre-rendered fragment. The escape hatch for literals whose
    /// textual form was already computed by the caller.
    Prepared(String),
    /// Attribute access base.attr. `attr` is stored pre-escaped.
    Attribute {
        base: Box<EdgeQLObject>,
        attr: String,
    },
    /// Link property reference (@name).
    Property(String),
    /// Type-intersection guard query[IS model]. `model` is stored as a
    /// fully qualified, pre-escaped type name.
    Verify {
        query: Box<EdgeQLObject>,
        operator: VerifyOperator,
        model: String,
    },
    /// Iteration: FOR target IN iterator UNION generator.
    For {
        target: String,
        iterator: Box<EdgeQLObject>,
        generator: Box<EdgeQLObject>,
    },
    /// A logic operator token.
    Logic(LogicOperator),
    /// A comparison operator token.
    Comparison(ComparisonOperator),
    /// A single predicate.
    Filter(Box<EdgeQLFilter>),
    /// A binary tree of predicates.
    FilterChain(Box<EdgeQLFilterChain>),
    /// A field projection inside a select.
    Selector(EdgeQLSelector),
    /// SELECT statement.
    Select(Box<EdgeQLSelect>),
    /// INSERT statement.
    Insert(EdgeQLInsert),
    /// UPDATE statement.
    Update(Box<EdgeQLUpdate>),
}

impl EdgeQLObject {
    /// Whether this node is a standalone statement. Statements get wrapped
    /// in parentheses when embedded as values.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            EdgeQLObject::Select(_) | EdgeQLObject::Insert(_) | EdgeQLObject::Update(_)
        )
    }

    /// Build a function call node.
    pub fn call(func: impl Into<String>, args: Vec<EdgeQLObject>) -> Self {
        EdgeQLObject::Call {
            func: func.into(),
            args,
        }
    }

    /// Build an attribute access on `base`.
    pub fn attribute(base: EdgeQLObject, attr: impl Into<String>) -> Self {
        EdgeQLObject::Attribute {
            base: Box::new(base),
            attr: attr.into(),
        }
    }

    /// Build an `IS` type guard over `query`.
    pub fn verify(query: EdgeQLObject, model: impl Into<String>) -> Self {
        EdgeQLObject::Verify {
            query: Box::new(query),
            operator: VerifyOperator::Is,
            model: model.into(),
        }
    }
}

impl ToEdgeQL for EdgeQLObject {
    fn to_edgeql(&self) -> String {
        match self {
            EdgeQLObject::Name(name) => name.clone(),
            EdgeQLObject::Variable(name) => format!("${name}"),
            EdgeQLObject::FilterKey(name) => format!(".{name}"),
            EdgeQLObject::Tuple(items) => format!("({})", render_sequence(items)),
            EdgeQLObject::Array(items) => format!("[{}]", render_sequence(items)),
            EdgeQLObject::Set(items) => format!("{{{}}}", render_sequence(items)),
            EdgeQLObject::Call { func, args } => {
                format!("{func}({})", render_sequence(args))
            }
            EdgeQLObject::Cast { ty, value } => {
                format!("<{}>{}", protected_name(ty, true), render_value(value))
            }
            EdgeQLObject::Prepared(raw) => raw.clone(),
            EdgeQLObject::Attribute { base, attr } => {
                format!("{}.{attr}", render_value(base))
            }
            EdgeQLObject::Property(name) => format!("@{name}"),
            EdgeQLObject::Verify {
                query,
                operator,
                model,
            } => {
                format!("{}[{} {model}]", render_value(query), operator.to_edgeql())
            }
            EdgeQLObject::For {
                target,
                iterator,
                generator,
            } => format!(
                "FOR {target} IN {} UNION {}",
                render_value(iterator),
                render_value(generator)
            ),
            EdgeQLObject::Logic(op) => op.to_edgeql(),
            EdgeQLObject::Comparison(op) => op.to_edgeql(),
            EdgeQLObject::Filter(filter) => filter.to_edgeql(),
            EdgeQLObject::FilterChain(chain) => chain.to_edgeql(),
            EdgeQLObject::Selector(selector) => selector.to_edgeql(),
            EdgeQLObject::Select(select) => select.to_edgeql(),
            EdgeQLObject::Insert(insert) => insert.to_edgeql(),
            EdgeQLObject::Update(update) => update.to_edgeql(),
        }
    }
}

impl From<EdgeQLSelect> for EdgeQLObject {
    fn from(select: EdgeQLSelect) -> Self {
        EdgeQLObject::Select(Box::new(select))
    }
}

impl From<EdgeQLFilter> for EdgeQLObject {
    fn from(filter: EdgeQLFilter) -> Self {
        EdgeQLObject::Filter(Box::new(filter))
    }
}

impl From<EdgeQLUpdate> for EdgeQLObject {
    fn from(update: EdgeQLUpdate) -> Self {
        EdgeQLObject::Update(Box::new(update))
    }
}

impl From<EdgeQLFilterChain> for EdgeQLObject {
    fn from(chain: EdgeQLFilterChain) -> Self {
        EdgeQLObject::FilterChain(Box::new(chain))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_leaf_expressions() {
        assert_eq!(EdgeQLObject::Name("x".into()).to_edgeql(), "x");
        assert_eq!(EdgeQLObject::Variable("file".into()).to_edgeql(), "$file");
        assert_eq!(EdgeQLObject::FilterKey("func".into()).to_edgeql(), ".func");
        assert_eq!(EdgeQLObject::Property("index".into()).to_edgeql(), "@index");
        assert_eq!(EdgeQLObject::Prepared("42".into()).to_edgeql(), "42");
    }

    #[test]
    fn test_containers_differ_only_in_brackets() {
        let items = vec![
            EdgeQLObject::Prepared("1".into()),
            EdgeQLObject::Prepared("2".into()),
        ];
        assert_eq!(EdgeQLObject::Tuple(items.clone()).to_edgeql(), "(1, 2)");
        assert_eq!(EdgeQLObject::Array(items.clone()).to_edgeql(), "[1, 2]");
        assert_eq!(EdgeQLObject::Set(items).to_edgeql(), "{1, 2}");
    }

    #[test]
    fn test_call_and_cast() {
        let call = EdgeQLObject::call(
            "count",
            vec![EdgeQLObject::FilterKey("body".into())],
        );
        assert_eq!(call.to_edgeql(), "count(.body)");

        let cast = EdgeQLObject::Cast {
            ty: "BoolOp".into(),
            value: Box::new(EdgeQLObject::Prepared("'Or'".into())),
        };
        assert_eq!(cast.to_edgeql(), "<ast::BoolOp>'Or'");
    }

    #[test]
    fn test_cast_of_atomic_type_is_unqualified() {
        let cast = EdgeQLObject::Cast {
            ty: "uuid".into(),
            value: Box::new(EdgeQLObject::Prepared("'0'".into())),
        };
        assert_eq!(cast.to_edgeql(), "<uuid>'0'");
    }

    #[test]
    fn test_attribute_chain() {
        let node = EdgeQLObject::attribute(
            EdgeQLObject::attribute(EdgeQLObject::Name("__KEY".into()), "__type__"),
            "id",
        );
        assert_eq!(node.to_edgeql(), "__KEY.__type__.id");
    }

    #[test]
    fn test_verify_guard() {
        let guard = EdgeQLObject::verify(
            EdgeQLObject::attribute(EdgeQLObject::Name("__item_0".into()), "ctx"),
            "ast::Load",
        );
        assert_eq!(guard.to_edgeql(), "__item_0.ctx[IS ast::Load]");
    }

    #[test]
    fn test_rendering_is_stable() {
        let node = EdgeQLObject::Set(vec![EdgeQLObject::Prepared("1".into())]);
        assert_eq!(node.to_edgeql(), node.to_edgeql());
    }
}
