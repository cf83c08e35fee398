use std::sync::Arc;

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// A syntax error unwinding to the nearest recovery point
///
/// Productions return it through `?`; recovery points turn it into a [`Diagnostic`], skip
/// to a synchronization token and leave an error marker in the tree. It never leaves the parser.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {span}")]
pub struct ParseError {
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self { code, message: message.into(), span }
    }

    /// `'x' expected`, `<identifier> expected`
    pub fn expected(what: &str, span: Span) -> Self {
        Self::new(DiagnosticCode::Expected, format!("{} expected", what), span)
    }

    pub fn illegal_start_of_expr(span: Span) -> Self {
        Self::new(DiagnosticCode::IllegalStartOfExpr, "illegal start of expression", span)
    }

    pub fn illegal_start_of_type(span: Span) -> Self {
        Self::new(DiagnosticCode::IllegalStartOfType, "illegal start of type", span)
    }

    pub fn expected_type_decl(span: Span) -> Self {
        Self::new(
            DiagnosticCode::ExpectedTypeDecl,
            "class, interface, enum, or record expected",
            span,
        )
    }

    pub fn premature_eof(span: Span) -> Self {
        Self::new(DiagnosticCode::PrematureEof, "reached end of file while parsing", span)
    }

    pub fn not_a_statement(span: Span) -> Self {
        Self::new(DiagnosticCode::NotStmt, "not a statement", span)
    }

    pub fn into_diagnostic(self, source_name: Arc<str>) -> Diagnostic {
        Diagnostic::error(self.code, self.message, self.span, source_name)
    }
}

/// Result type for parsing productions
pub type PResult<T> = Result<T, ParseError>;

/// Error recovery context
#[derive(Debug)]
pub struct ErrorRecovery {
    /// Whether to continue parsing after errors
    pub continue_on_error: bool,
    /// Maximum number of errors to report before giving up
    pub max_errors: usize,
    /// Errors reported so far
    pub error_count: usize,
    /// Set once no further errors may be reported
    pub halted: bool,
    /// Offset of the last reported error, to suppress cascades at one position
    last_offset: Option<usize>,
}

impl Default for ErrorRecovery {
    fn default() -> Self {
        Self::new(true, crate::config::DEFAULT_MAX_ERRORS)
    }
}

impl ErrorRecovery {
    pub fn new(continue_on_error: bool, max_errors: usize) -> Self {
        Self {
            continue_on_error,
            max_errors: max_errors.max(1),
            error_count: 0,
            halted: false,
            last_offset: None,
        }
    }

    /// Account for an error at `offset`; false when it must not be reported
    pub fn add_error(&mut self, offset: usize) -> bool {
        if self.halted || self.last_offset == Some(offset) {
            return false;
        }
        self.last_offset = Some(offset);
        self.error_count += 1;
        if !self.continue_on_error || self.error_count >= self.max_errors {
            self.halted = true;
        }
        true
    }

    /// True when the error limit, rather than disabled recovery, stopped the parse
    pub fn hit_limit(&self) -> bool {
        self.halted && self.continue_on_error
    }

    pub fn should_continue(&self) -> bool {
        !self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_offset_is_reported_once() {
        let mut recovery = ErrorRecovery::new(true, 10);
        assert!(recovery.add_error(4));
        assert!(!recovery.add_error(4));
        assert!(recovery.add_error(9));
        assert_eq!(recovery.error_count, 2);
    }

    #[test]
    fn halts_at_limit_or_without_recovery() {
        let mut limited = ErrorRecovery::new(true, 2);
        limited.add_error(1);
        assert!(limited.should_continue());
        limited.add_error(2);
        assert!(!limited.should_continue());
        assert!(limited.hit_limit());
        assert!(!limited.add_error(3));

        let mut strict = ErrorRecovery::new(false, 100);
        assert!(strict.add_error(0));
        assert!(!strict.should_continue());
        assert!(!strict.hit_limit());
    }
}
