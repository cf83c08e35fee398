//! Fragment dispatcher
//!
//! One public operation per fragment kind. Every call builds a fresh [`ParseEnvironment`], runs
//! the grammar entry point for its kind, moves the collected diagnostics into a [`ParseResult`]
//! and drops the environment before returning. Constrained kinds are checked by [`crate::review`]
//! and rejected with [`Error::InvalidFragment`] when the text has the wrong shape.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::ast::{CompilationUnit, Expr, MethodDecl, TypeDecl};
use crate::config::Config;
use crate::env::ParseEnvironment;
use crate::error::{Error, Result};
use crate::result::ParseResult;
use crate::review;
use crate::source::SourceFile;

/// Syntactic category a piece of text is parsed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    CompilationUnit,
    TypeDeclaration,
    Expression,
    TypeUse,
    /// Reserved; no grammar entry point yet
    Method,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FragmentKind::CompilationUnit => "compilation unit",
            FragmentKind::TypeDeclaration => "type declaration",
            FragmentKind::Expression => "expression",
            FragmentKind::TypeUse => "type use",
            FragmentKind::Method => "method",
        };
        f.write_str(name)
    }
}

/// Entry points bound to one configuration
///
/// Holds no parse state, so one instance can serve any number of calls, sequential or concurrent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentParser {
    config: Config,
}

impl FragmentParser {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read `path` and parse it as a compilation unit; unreadable files fail before any parsing
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParseResult<CompilationUnit>> {
        let path = path.as_ref();
        let source = SourceFile::from_path(path).map_err(|e| Error::io(path, e))?;
        Ok(self.compilation_unit(Arc::new(source)))
    }

    pub fn parse_compilation_unit(&self, text: &str) -> ParseResult<CompilationUnit> {
        self.compilation_unit(Arc::new(SourceFile::from_string(text)))
    }

    /// Parse text that must hold exactly one class-like declaration and nothing else
    pub fn parse_type_declaration(&self, text: &str) -> Result<ParseResult<TypeDecl>> {
        let result = self.compilation_unit(Arc::new(SourceFile::from_string(text)));
        let source = Arc::clone(result.source());
        let (unit, diagnostics) = result.into_parts();
        let decl = review::review_type_declaration(unit, text)?;
        Ok(ParseResult::new(decl, diagnostics, source))
    }

    pub fn parse_expression(&self, text: &str) -> Result<ParseResult<Expr>> {
        let source = Arc::new(SourceFile::from_string(text));
        review::review_expression(&source)?;
        Ok(self.run(FragmentKind::Expression, source, |env| env.new_parser().parse_expression()))
    }

    /// Parse a type as written in a declaration, e.g. `Map<String, List<int[]>>`
    pub fn parse_type_use(&self, text: &str) -> Result<ParseResult<Expr>> {
        let source = Arc::new(SourceFile::from_string(text));
        review::review_type_use(&source)?;
        Ok(self.run(FragmentKind::TypeUse, source, |env| env.new_parser().parse_type_use()))
    }

    /// Reserved; always fails with [`Error::NotImplemented`]
    pub fn parse_method(&self, _text: &str) -> Result<ParseResult<MethodDecl>> {
        log::debug!("rejecting {} fragment: not implemented", FragmentKind::Method);
        Err(Error::NotImplemented(FragmentKind::Method))
    }

    fn compilation_unit(&self, source: Arc<SourceFile>) -> ParseResult<CompilationUnit> {
        self.run(FragmentKind::CompilationUnit, source, |env| {
            let mut unit = env.new_parser().parse_compilation_unit();
            unit.source_file = Some(Arc::clone(env.source()));
            unit
        })
    }

    fn run<T>(
        &self,
        kind: FragmentKind,
        source: Arc<SourceFile>,
        parse: impl FnOnce(&mut ParseEnvironment) -> T,
    ) -> ParseResult<T> {
        log::debug!("parsing {} from {}", kind, source.name());
        let mut env = ParseEnvironment::create(Arc::clone(&source), &self.config);
        let tree = parse(&mut env);
        let diagnostics = env.drain();
        drop(env);
        log::debug!("parsed {} from {} with {} diagnostics", kind, source.name(), diagnostics.len());
        ParseResult::new(tree, diagnostics, source)
    }
}

/// [`FragmentParser::parse_file`] with the process-wide configuration
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParseResult<CompilationUnit>> {
    FragmentParser::new(*Config::global()).parse_file(path)
}

pub fn parse_compilation_unit(text: &str) -> ParseResult<CompilationUnit> {
    FragmentParser::new(*Config::global()).parse_compilation_unit(text)
}

pub fn parse_type_declaration(text: &str) -> Result<ParseResult<TypeDecl>> {
    FragmentParser::new(*Config::global()).parse_type_declaration(text)
}

pub fn parse_expression(text: &str) -> Result<ParseResult<Expr>> {
    FragmentParser::new(*Config::global()).parse_expression(text)
}

pub fn parse_type_use(text: &str) -> Result<ParseResult<Expr>> {
    FragmentParser::new(*Config::global()).parse_type_use(text)
}

pub fn parse_method(text: &str) -> Result<ParseResult<MethodDecl>> {
    FragmentParser::new(*Config::global()).parse_method(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_tagged_with_its_source() {
        let result = FragmentParser::default().parse_compilation_unit("class A {}");
        let tagged = result.tree().source_file.as_ref().map(Arc::clone);
        assert!(tagged.map_or(false, |s| Arc::ptr_eq(&s, result.source())));
    }

    #[test]
    fn declaration_keeps_diagnostics() {
        let result = FragmentParser::default()
            .parse_type_declaration("class SyntaxError { void () {} }")
            .expect("one declaration");
        assert!(result.has_error());
        assert_eq!(result.tree().name(), "SyntaxError");
    }

    #[test]
    fn method_is_reserved() {
        let outcome: Result<ParseResult<MethodDecl>> =
            FragmentParser::default().parse_method("void m() {}");
        assert!(matches!(outcome.err(), Some(Error::NotImplemented(FragmentKind::Method))));
    }

    #[test]
    fn kinds_display() {
        assert_eq!(FragmentKind::TypeUse.to_string(), "type use");
        assert_eq!(FragmentKind::CompilationUnit.to_string(), "compilation unit");
    }
}
