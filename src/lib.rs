//! javaparse
//!
//! Parses Java source text into syntax trees, one fragment at a time: whole files, compilation
//! units, single type declarations, expressions and type uses.
//!
//! ## Architecture
//!
//! - **fragment**: one entry point per fragment kind, each call fully isolated
//! - **env**: per-call parse environment (source, diagnostic collector, options)
//! - **parser**: logos lexer and recursive-descent grammar with javac-style error recovery
//! - **review**: shape checks for constrained fragment kinds
//! - **ast**: syntax tree nodes and a source printer
//! - **diagnostics**: structured errors, warnings and notes
//!
//! ## Error model
//!
//! Syntax errors are diagnostics on a [`ParseResult`] whose tree is always present. Reading
//! failures, text of the wrong fragment shape and reserved operations are [`Error`]s.
//!
//! ```text
//! text → FragmentParser → ParseEnvironment → Parser → tree + diagnostics → review → ParseResult
//! ```

pub mod ast;
pub mod parser;
pub mod diagnostics;
pub mod source;
pub mod env;
pub mod fragment;
pub mod review;
pub mod result;
pub mod error;
pub mod config;

pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use error::{Error, Result};
pub use fragment::{
    parse_compilation_unit, parse_expression, parse_file, parse_method, parse_type_declaration,
    parse_type_use, FragmentKind, FragmentParser,
};
pub use result::ParseResult;
pub use review::ReviewError;
pub use source::SourceFile;
