//! Structured diagnostics and the per-call collector that receives them
//!
//! The grammar engine never raises for malformed input. Every lexical or syntactic problem is
//! pushed, in emission order, to a [`DiagnosticListener`]; the dispatcher binds a fresh
//! [`DiagnosticCollector`] to each call and moves its contents into the parse result.

use std::fmt;
use std::sync::Arc;

use crate::ast::Span;
use crate::source::SourceFile;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Stable identifier of a diagnostic, named after the matching javac resource key
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticCode {
    // Lexer
    /// Character that cannot start any token
    IllegalChar,
    UnclosedStrLit,
    UnclosedCharLit,
    EmptyCharLit,
    UnclosedComment,
    UnclosedTextBlock,
    IllegalTextBlockOpen,
    IllegalEscChar,
    MalformedFpLit,
    /// `_` that does not sit between two digits of a number
    IllegalUnderscore,

    // Parser
    /// A specific token was required, e.g. `';' expected`
    Expected,
    IllegalStartOfExpr,
    IllegalStartOfType,
    /// `class, interface, enum, or record expected`
    ExpectedTypeDecl,
    /// `reached end of file while parsing`
    PrematureEof,
    NotStmt,
    IntNumberTooLarge,
    FpNumberTooLarge,
    FpNumberTooSmall,
    InvalidMethDecl,
    /// Tokens left over after a complete expression or type
    TrailingInput,
    /// Catch-all for grammar errors without a dedicated key
    Syntax,

    // Warnings and notes
    MissingDeprecatedAnnotation,
    TooManyErrors,
}

impl DiagnosticCode {
    pub fn key(&self) -> &'static str {
        match self {
            DiagnosticCode::IllegalChar => "compiler.err.illegal.char",
            DiagnosticCode::UnclosedStrLit => "compiler.err.unclosed.str.lit",
            DiagnosticCode::UnclosedCharLit => "compiler.err.unclosed.char.lit",
            DiagnosticCode::EmptyCharLit => "compiler.err.empty.char.lit",
            DiagnosticCode::UnclosedComment => "compiler.err.unclosed.comment",
            DiagnosticCode::UnclosedTextBlock => "compiler.err.unclosed.text.block",
            DiagnosticCode::IllegalTextBlockOpen => "compiler.err.illegal.text.block.open",
            DiagnosticCode::IllegalEscChar => "compiler.err.illegal.esc.char",
            DiagnosticCode::MalformedFpLit => "compiler.err.malformed.fp.lit",
            DiagnosticCode::IllegalUnderscore => "compiler.err.illegal.underscore",
            DiagnosticCode::Expected => "compiler.err.expected",
            DiagnosticCode::IllegalStartOfExpr => "compiler.err.illegal.start.of.expr",
            DiagnosticCode::IllegalStartOfType => "compiler.err.illegal.start.of.type",
            DiagnosticCode::ExpectedTypeDecl => "compiler.err.expected4",
            DiagnosticCode::PrematureEof => "compiler.err.premature.eof",
            DiagnosticCode::NotStmt => "compiler.err.not.stmt",
            DiagnosticCode::IntNumberTooLarge => "compiler.err.int.number.too.large",
            DiagnosticCode::FpNumberTooLarge => "compiler.err.fp.number.too.large",
            DiagnosticCode::FpNumberTooSmall => "compiler.err.fp.number.too.small",
            DiagnosticCode::InvalidMethDecl => "compiler.err.invalid.meth.decl.ret.type.req",
            DiagnosticCode::TrailingInput => "compiler.err.trailing.input",
            DiagnosticCode::Syntax => "compiler.err.syntax",
            DiagnosticCode::MissingDeprecatedAnnotation => "compiler.warn.missing.deprecated.annotation",
            DiagnosticCode::TooManyErrors => "compiler.note.too.many.errors",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One reported issue tied to a position in a named source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
    pub source_name: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
        source_name: Arc<str>,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            span,
            source_name,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span, source_name: Arc<str>) -> Self {
        Self::new(Severity::Error, code, message, span, source_name)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span, source_name: Arc<str>) -> Self {
        Self::new(Severity::Warning, code, message, span, source_name)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }

    pub fn column(&self) -> usize {
        self.span.start.column
    }

    /// javac-style report: header line, the offending source line and a caret under the column
    pub fn render(&self, source: &SourceFile) -> String {
        let mut out = format!("{}:{}: {}: {}", self.source_name, self.line(), self.severity, self.message);
        if let Some(text) = source.line_text(self.line()) {
            out.push('\n');
            out.push_str(text);
            out.push('\n');
            // Tabs are kept so the caret lines up in a terminal
            for c in text.chars().take(self.column().saturating_sub(1)) {
                out.push(if c == '\t' { '\t' } else { ' ' });
            }
            out.push('^');
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.source_name,
            self.line(),
            self.column(),
            self.severity,
            self.message
        )
    }
}

/// Receiver for diagnostics raised while parsing
pub trait DiagnosticListener {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticListener for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Ordered sink for the diagnostics of exactly one parse call
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        log::trace!("diagnostic recorded: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Everything recorded so far, in emission order; leaves the collector empty
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticListener for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.record(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;

    fn at(line: usize, column: usize, severity: Severity, message: &str) -> Diagnostic {
        let loc = Location::new(line, column, 0);
        Diagnostic::new(severity, DiagnosticCode::Syntax, message, Span::point(loc), Arc::from("A.java"))
    }

    #[test]
    fn collector_keeps_emission_order() {
        let mut collector = DiagnosticCollector::new();
        collector.record(at(3, 1, Severity::Warning, "first"));
        collector.record(at(1, 1, Severity::Error, "second"));
        assert!(collector.has_error());
        assert_eq!(collector.error_count(), 1);

        let drained = collector.drain();
        let messages: Vec<_> = drained.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
        assert!(collector.is_empty());
        assert!(!collector.has_error());
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.report(at(1, 1, Severity::Warning, "w"));
        collector.report(at(1, 1, Severity::Note, "n"));
        assert!(!collector.has_error());
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn display_and_render() {
        let source = SourceFile::new("A.java", "class A {\n  void () {}\n}\n");
        let diagnostic = at(2, 8, Severity::Error, "<identifier> expected");
        assert_eq!(diagnostic.to_string(), "A.java:2:8: error: <identifier> expected");
        assert_eq!(
            diagnostic.render(&source),
            "A.java:2: error: <identifier> expected\n  void () {}\n       ^"
        );
    }
}
