use serde::{Deserialize, Serialize};

use crate::ast::ToEdgeQL;

/// Logic operator combining two filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogicOperator {
    /// Conjunction (AND), the default combinator between sibling filters.
    #[default]
    And,
    /// Disjunction (OR)
    Or,
    /// Membership (IN)
    In,
}

impl ToEdgeQL for LogicOperator {
    fn to_edgeql(&self) -> String {
        match self {
            LogicOperator::And => "AND".to_string(),
            LogicOperator::Or => "OR".to_string(),
            LogicOperator::In => "IN".to_string(),
        }
    }
}

/// Comparison operator between a filter key and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ComparisonOperator {
    /// Equality (=)
    #[default]
    Equals,
    /// Inequality (!=)
    NotEquals,
    /// Containment (in)
    Contains,
}

impl ToEdgeQL for ComparisonOperator {
    fn to_edgeql(&self) -> String {
        match self {
            ComparisonOperator::Equals => "=".to_string(),
            ComparisonOperator::NotEquals => "!=".to_string(),
            ComparisonOperator::Contains => "in".to_string(),
        }
    }
}

/// Type-intersection operator used by verify guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VerifyOperator {
    /// Type check (IS)
    #[default]
    Is,
}

impl ToEdgeQL for VerifyOperator {
    fn to_edgeql(&self) -> String {
        match self {
            VerifyOperator::Is => "IS".to_string(),
        }
    }
}
