//! EdgeQL AST.
//!
//! A small object model of the EdgeQL fragments the compiler emits.
//! Every node renders to text through [`ToEdgeQL`]; rendering is pure and
//! performs no validation. Identifier escaping happens when nodes are
//! built or, for statement type/field names, inside the renderer itself;
//! see [`crate::schema`].

pub mod expr;
pub mod operators;
pub mod stmt;

pub use self::expr::EdgeQLObject;
pub use self::operators::{ComparisonOperator, LogicOperator, VerifyOperator};
pub use self::stmt::{
    EdgeQLFilter, EdgeQLFilterChain, EdgeQLInsert, EdgeQLSelect,
    EdgeQLSelector, EdgeQLUpdate, EdgeQLWithBlock, FilterNode, SelectTarget,
};

/// Trait for rendering AST nodes as EdgeQL text.
pub trait ToEdgeQL {
    /// Render this node as an EdgeQL fragment.
    fn to_edgeql(&self) -> String;
}

/// Render a node in value position. Statements are wrapped in parentheses
/// so a sub-query is always syntactically distinct from an expression.
pub fn render_value(node: &EdgeQLObject) -> String {
    let rendered = node.to_edgeql();
    if node.is_statement() {
        format!("({rendered})")
    } else {
        rendered
    }
}

/// Render a sequence of nodes in value position, joined with `", "`.
pub fn render_sequence(nodes: &[EdgeQLObject]) -> String {
    nodes.iter().map(render_value).collect::<Vec<_>>().join(", ")
}
