use std::sync::Arc;

use crate::diagnostics::{Diagnostic, Severity};
use crate::source::SourceFile;

/// Tree of one parse call together with everything the call reported
///
/// The tree is always present; syntax problems show up as error marker nodes inside it and as
/// diagnostics here. Built once by the dispatcher and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    tree: T,
    diagnostics: Vec<Diagnostic>,
    source: Arc<SourceFile>,
}

impl<T> ParseResult<T> {
    pub fn new(tree: T, diagnostics: Vec<Diagnostic>, source: Arc<SourceFile>) -> Self {
        Self { tree, diagnostics, source }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn into_tree(self) -> T {
        self.tree
    }

    /// In emission order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when at least one diagnostic is an error; warnings and notes do not count
    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Source the tree was parsed from
    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Narrow or transform the tree, keeping diagnostics and source
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            tree: f(self.tree),
            diagnostics: self.diagnostics,
            source: self.source,
        }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.tree, self.diagnostics)
    }

    /// javac-style report of every diagnostic, one block per entry
    pub fn render_diagnostics(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.render(&self.source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Location, Span};
    use crate::diagnostics::DiagnosticCode;

    fn diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            severity,
            DiagnosticCode::Syntax,
            "message",
            Span::point(Location::new(1, 1, 0)),
            Arc::from("<input>"),
        )
    }

    #[test]
    fn only_errors_count() {
        let source = Arc::new(SourceFile::from_string("x"));
        let clean = ParseResult::new((), vec![diagnostic(Severity::Warning)], Arc::clone(&source));
        assert!(!clean.has_error());
        assert_eq!(clean.warnings().count(), 1);

        let broken = ParseResult::new((), vec![diagnostic(Severity::Note), diagnostic(Severity::Error)], source);
        assert!(broken.has_error());
        assert_eq!(broken.error_count(), 1);
    }

    #[test]
    fn map_keeps_diagnostics() {
        let source = Arc::new(SourceFile::from_string("x"));
        let result = ParseResult::new(vec![1, 2, 3], vec![diagnostic(Severity::Error)], source);
        let narrowed = result.map(|v| v.len());
        assert_eq!(*narrowed.tree(), 3);
        assert!(narrowed.has_error());
        assert_eq!(narrowed.source().content(), "x");
    }
}
