use serde::{Deserialize, Serialize};

use crate::ast::expr::EdgeQLObject;
use crate::ast::{ComparisonOperator, LogicOperator, ToEdgeQL, render_value};
use crate::schema::protected_name;

/// A field projection inside a select, possibly with nested projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeQLSelector {
    pub name: String,
    pub inner: Vec<EdgeQLSelector>,
}

impl EdgeQLSelector {
    pub fn new(name: impl Into<String>) -> Self {
        EdgeQLSelector {
            name: name.into(),
            inner: Vec::new(),
        }
    }
}

impl ToEdgeQL for EdgeQLSelector {
    fn to_edgeql(&self) -> String {
        let mut selector = self.name.clone();
        if !self.inner.is_empty() {
            let body = self
                .inner
                .iter()
                .map(ToEdgeQL::to_edgeql)
                .collect::<Vec<_>>()
                .join(", ");
            selector.push_str(": {");
            selector.push_str(&body);
            selector.push('}');
        }
        selector
    }
}

/// A single predicate: key operator value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeQLFilter {
    pub key: EdgeQLObject,
    pub value: EdgeQLObject,
    pub operator: ComparisonOperator,
}

impl EdgeQLFilter {
    /// Equality filter, the default comparison.
    pub fn new(key: EdgeQLObject, value: EdgeQLObject) -> Self {
        EdgeQLFilter {
            key,
            value,
            operator: ComparisonOperator::Equals,
        }
    }
}

impl ToEdgeQL for EdgeQLFilter {
    fn to_edgeql(&self) -> String {
        format!(
            "{} {} {}",
            render_value(&self.key),
            self.operator.to_edgeql(),
            render_value(&self.value)
        )
    }
}

/// A binary tree of predicates. Never normalized: the tree renders in
/// construction order, left-associative as built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeQLFilterChain {
    pub left: FilterNode,
    pub right: FilterNode,
    pub operator: LogicOperator,
}

impl EdgeQLFilterChain {
    pub fn new(left: FilterNode, right: FilterNode, operator: LogicOperator) -> Self {
        EdgeQLFilterChain {
            left,
            right,
            operator,
        }
    }
}

impl ToEdgeQL for EdgeQLFilterChain {
    fn to_edgeql(&self) -> String {
        format!(
            "{} {} {}",
            self.left.to_edgeql(),
            self.operator.to_edgeql(),
            self.right.to_edgeql()
        )
    }
}

/// Either a single filter, a chain, or a bare boolean operand (a wrapped
/// sub-select standing in filter position).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterNode {
    Filter(EdgeQLFilter),
    Chain(Box<EdgeQLFilterChain>),
    Expr(Box<EdgeQLObject>),
}

impl FilterNode {
    /// Combine two filter nodes under `operator`.
    pub fn chain(self, right: FilterNode, operator: LogicOperator) -> FilterNode {
        FilterNode::Chain(Box::new(EdgeQLFilterChain::new(self, right, operator)))
    }

    pub fn into_object(self) -> EdgeQLObject {
        match self {
            FilterNode::Filter(filter) => EdgeQLObject::Filter(Box::new(filter)),
            FilterNode::Chain(chain) => EdgeQLObject::FilterChain(chain),
            FilterNode::Expr(node) => *node,
        }
    }
}

impl ToEdgeQL for FilterNode {
    fn to_edgeql(&self) -> String {
        match self {
            FilterNode::Filter(filter) => filter.to_edgeql(),
            FilterNode::Chain(chain) => chain.to_edgeql(),
            FilterNode::Expr(node) => render_value(node),
        }
    }
}

impl From<EdgeQLFilter> for FilterNode {
    fn from(filter: EdgeQLFilter) -> Self {
        FilterNode::Filter(filter)
    }
}

impl From<EdgeQLFilterChain> for FilterNode {
    fn from(chain: EdgeQLFilterChain) -> Self {
        FilterNode::Chain(Box::new(chain))
    }
}

/// Named sub-expression bindings prefixed to a select. Assignments render
/// in insertion order; aliases are stored pre-escaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EdgeQLWithBlock {
    pub assignments: Vec<(String, EdgeQLObject)>,
}

impl EdgeQLWithBlock {
    pub fn new(assignments: Vec<(String, EdgeQLObject)>) -> Self {
        EdgeQLWithBlock { assignments }
    }
}

impl ToEdgeQL for EdgeQLWithBlock {
    fn to_edgeql(&self) -> String {
        let body = self
            .assignments
            .iter()
            .map(|(alias, value)| format!("{alias} := {}", render_value(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("WITH {body}")
    }
}

/// What a select statement selects from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectTarget {
    /// A schema object type; qualified and escaped at render time.
    Model(String),
    /// An arbitrary expression, rendered in value position.
    Expr(Box<EdgeQLObject>),
}

/// SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeQLSelect {
    pub target: SelectTarget,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Property to order the selection by, e.g. the @index link property.
    pub ordered: Option<EdgeQLObject>,
    pub filters: Option<FilterNode>,
    pub selections: Vec<EdgeQLSelector>,
    pub with_block: Option<EdgeQLWithBlock>,
}

impl EdgeQLSelect {
    /// Select a schema object type.
    pub fn model(name: impl Into<String>) -> Self {
        EdgeQLSelect::new(SelectTarget::Model(name.into()))
    }

    /// Select from an arbitrary expression.
    pub fn expression(node: EdgeQLObject) -> Self {
        EdgeQLSelect::new(SelectTarget::Expr(Box::new(node)))
    }

    pub fn new(target: SelectTarget) -> Self {
        EdgeQLSelect {
            target,
            limit: None,
            offset: None,
            ordered: None,
            filters: None,
            selections: Vec::new(),
            with_block: None,
        }
    }

    pub fn with_filters(mut self, filters: FilterNode) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl ToEdgeQL for EdgeQLSelect {
    fn to_edgeql(&self) -> String {
        let mut query = String::new();
        if let Some(with_block) = &self.with_block {
            query.push_str(&with_block.to_edgeql());
            query.push(' ');
        }
        query.push_str("SELECT ");
        match &self.target {
            SelectTarget::Model(name) => query.push_str(&protected_name(name, true)),
            SelectTarget::Expr(node) => query.push_str(&render_value(node)),
        }
        if !self.selections.is_empty() {
            let body = self
                .selections
                .iter()
                .map(ToEdgeQL::to_edgeql)
                .collect::<Vec<_>>()
                .join(", ");
            query.push('{');
            query.push_str(&body);
            query.push('}');
        }
        if let Some(filters) = &self.filters {
            query.push_str(&format!(" FILTER {}", filters.to_edgeql()));
        }
        if let Some(ordered) = &self.ordered {
            query.push_str(&format!(" ORDER BY {}", render_value(ordered)));
        }
        if let Some(offset) = self.offset {
            query.push_str(&format!(" OFFSET {offset}"));
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }
        query
    }
}

/// INSERT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeQLInsert {
    pub name: String,
    pub fields: Vec<(String, EdgeQLObject)>,
}

impl EdgeQLInsert {
    pub fn new(name: impl Into<String>) -> Self {
        EdgeQLInsert {
            name: name.into(),
            fields: Vec::new(),
        }
    }
}

impl ToEdgeQL for EdgeQLInsert {
    fn to_edgeql(&self) -> String {
        let mut query = format!("INSERT {}", protected_name(&self.name, true));
        if !self.fields.is_empty() {
            let body = self
                .fields
                .iter()
                .map(|(key, value)| {
                    format!("{} := {}", protected_name(key, false), render_value(value))
                })
                .collect::<Vec<_>>()
                .join(", ");
            query.push_str(&format!(" {{{body}}}"));
        }
        query
    }
}

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeQLUpdate {
    pub name: String,
    pub filters: Option<FilterNode>,
    pub assigns: Vec<(String, EdgeQLObject)>,
}

impl EdgeQLUpdate {
    pub fn new(name: impl Into<String>) -> Self {
        EdgeQLUpdate {
            name: name.into(),
            filters: None,
            assigns: Vec::new(),
        }
    }
}

impl ToEdgeQL for EdgeQLUpdate {
    fn to_edgeql(&self) -> String {
        let mut query = format!("UPDATE {}", protected_name(&self.name, true));
        if let Some(filters) = &self.filters {
            query.push_str(&format!(" FILTER {}", filters.to_edgeql()));
        }
        let body = self
            .assigns
            .iter()
            .map(|(key, value)| {
                format!("{} := {}", protected_name(key, false), render_value(value))
            })
            .collect::<Vec<_>>()
            .join(", ");
        query.push_str(&format!(" SET {{{body}}}"));
        query
    }
}
