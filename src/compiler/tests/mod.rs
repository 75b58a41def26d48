//! Compiler test suite.
