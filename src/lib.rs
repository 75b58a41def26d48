//! astql compiles syntax-tree match patterns into EdgeQL queries.
//!
//! Programs are stored as syntax trees in an EdgeDB instance; a pattern
//! describes the shape of the trees to find. This crate lowers such a
//! pattern into an [`ast::EdgeQLSelect`] and renders it as query text.
//! Parsing patterns and talking to the database are both out of scope:
//! the input here is an already-parsed [`pattern::Pattern`], the output
//! a single query string.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod pattern;
pub mod schema;

pub use compiler::{compile, compile_to_edgeql};

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::{compile, compile_to_edgeql};
    pub use crate::error::*;
    pub use crate::pattern::*;
}
