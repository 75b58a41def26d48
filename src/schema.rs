//! Identifier safety for generated EdgeQL.
//!
//! Every type or field name that ends up in query text goes through
//! [`protected_name`] exactly once. This is the sole injection-safety
//! boundary of the crate.

/// Schema module holding the syntax-tree object types.
pub const MODULE: &str = "ast";

/// EdgeQL reserved words that must be quoted when used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "alter", "analyze", "and", "anytype", "begin", "by", "case", "check",
    "commit", "configure", "create", "delete", "describe", "detached",
    "distinct", "do", "drop", "else", "empty", "end", "exists", "explain",
    "extending", "fetch", "filter", "for", "get", "global", "grant", "group",
    "if", "ilike", "import", "in", "insert", "introspect", "is", "like",
    "limit", "listen", "lock", "match", "move", "not", "notify",
    "offset", "on", "optional", "or", "order", "over", "partition", "raise",
    "release", "reset", "revoke", "rollback", "select", "set", "single",
    "start", "typeof", "union", "update", "variadic", "when", "window",
    "with",
];

/// Built-in scalar types. These never get the schema-module prefix.
const ATOMIC_TYPES: &[&str] = &[
    "str", "bool", "bytes", "int16", "int32", "int64", "float32", "float64",
    "uuid", "datetime", "duration", "json",
];

/// Escape an identifier and, for type names, qualify it with the schema
/// module. `qualify == false` treats the name as a field or alias and
/// leaves it bare. Names that already carry a module path are returned
/// unchanged.
pub fn protected_name(name: &str, qualify: bool) -> String {
    if name.contains("::") {
        return name.to_string();
    }
    let escaped = escape_identifier(name);
    if qualify && !ATOMIC_TYPES.contains(&name) {
        format!("{MODULE}::{escaped}")
    } else {
        escaped
    }
}

/// Escape an identifier if it collides with a reserved word or contains
/// characters outside the plain-identifier set. EdgeQL quotes identifiers
/// with backticks, doubling any embedded backtick.
fn escape_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(false);

    if needs_escaping {
        format!("`{}`", name.replace('`', "``"))
    } else {
        name.to_string()
    }
}

/// Render a string as a single-quoted EdgeQL literal.
pub fn quoted_literal(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(protected_name("func", false), "func");
        assert_eq!(protected_name("Call", true), "ast::Call");
    }

    #[test]
    fn test_reserved_words_are_escaped() {
        assert_eq!(protected_name("filter", false), "`filter`");
        assert_eq!(protected_name("If", true), "ast::`If`");
    }

    #[test]
    fn test_common_type_names_stay_unescaped() {
        assert_eq!(protected_name("Module", true), "ast::Module");
        assert_eq!(protected_name("module", false), "module");
    }

    #[test]
    fn test_atomic_types_stay_unqualified() {
        assert_eq!(protected_name("uuid", true), "uuid");
        assert_eq!(protected_name("str", true), "str");
    }

    #[test]
    fn test_qualified_names_unchanged() {
        assert_eq!(
            protected_name("schema::ObjectType", true),
            "schema::ObjectType"
        );
    }

    #[test]
    fn test_special_characters_force_escaping() {
        assert_eq!(protected_name("weird name", false), "`weird name`");
        assert_eq!(protected_name("1st", false), "`1st`");
        assert_eq!(protected_name("back`tick", false), "`back``tick`");
    }

    #[test]
    fn test_quoted_literal() {
        assert_eq!(quoted_literal("print"), "'print'");
        assert_eq!(quoted_literal("it's"), "'it\\'s'");
    }
}
