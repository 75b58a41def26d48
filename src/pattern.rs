//! Input pattern grammar.
//!
//! The closed set of node shapes the external pattern parser produces.
//! This crate only consumes these nodes; it neither parses pattern text
//! nor validates field names against the schema.

use serde::{Deserialize, Serialize};

/// Logic operator vocabulary of the pattern grammar.
///
/// Only `Or` has a lowering: conjunction between sibling fields is
/// produced structurally by the compiler's default chain operator, so
/// `And` is declared but unreachable from the lowering path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternLogicOp {
    And,
    Or,
}

/// A parsed match pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Match a node of a named type, with a sub-pattern per field.
    /// Field order is the pattern's own order and is observable in the
    /// compiled output.
    Match {
        name: String,
        fields: Vec<(String, Pattern)>,
    },
    /// Match a member of an enum type.
    MatchEnum { base: String, member: String },
    /// Combine two sub-patterns under an explicit logic operator.
    Logical {
        left: Box<Pattern>,
        right: Box<Pattern>,
        op: PatternLogicOp,
    },
    /// A bare logic operator node.
    Operator(PatternLogicOp),
    /// Unordered alternation over the items.
    Set(Vec<Pattern>),
    /// Ordered sequence match; every item must itself be a `Match`.
    List(Vec<Pattern>),
    /// A literal whose textual form was already rendered by the parser.
    Constant(String),
}

impl Pattern {
    /// Build a match pattern over named fields.
    pub fn match_node(
        name: impl Into<String>,
        fields: Vec<(&str, Pattern)>,
    ) -> Self {
        Pattern::Match {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        }
    }

    /// Build a constant pattern from pre-rendered literal text.
    pub fn constant(text: impl Into<String>) -> Self {
        Pattern::Constant(text.into())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serde_round_trip() {
        let pattern = Pattern::match_node(
            "Call",
            vec![(
                "args",
                Pattern::List(vec![Pattern::match_node(
                    "Name",
                    vec![("id", Pattern::constant("'print'"))],
                )]),
            )],
        );
        let encoded = serde_json::to_string(&pattern).unwrap();
        let decoded: Pattern = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, pattern);
    }

    #[test]
    fn test_match_node_preserves_field_order() {
        let pattern = Pattern::match_node(
            "FunctionDef",
            vec![
                ("name", Pattern::constant("'main'")),
                ("returns", Pattern::constant("'None'")),
            ],
        );
        let Pattern::Match { fields, .. } = &pattern else {
            panic!("expected a match");
        };
        assert_eq!(fields[0].0, "name");
        assert_eq!(fields[1].0, "returns");
    }
}
