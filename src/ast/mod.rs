//! Syntax tree for parsed Java source
//!
//! Nodes mirror the shapes javac produces for the same input: a compilation unit with package,
//! import and module clauses plus top-level forms, class-like declarations, statements, and an
//! expression family that also represents type uses.

mod nodes;
mod printer;

pub use nodes::*;
pub use printer::*;

use std::fmt;
use std::sync::Arc;

use crate::source::SourceFile;

/// Source location information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Span of source code (start and end locations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a single location
    pub fn point(location: Location) -> Self {
        Self { start: location, end: location }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset >= self.end.offset
    }

    /// Get the source text for this span
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        if self.start.offset >= source.len() {
            return "";
        }
        let end_offset = self.end.offset.min(source.len());
        source.get(self.start.offset..end_offset).unwrap_or("")
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            if self.start.column == self.end.column {
                write!(f, "{}:{}", self.start.line, self.start.column)
            } else {
                write!(f, "{}:{}-{}", self.start.line, self.start.column, self.end.column)
            }
        } else {
            write!(f, "{}:{}-{}:{}", self.start.line, self.start.column, self.end.line, self.end.column)
        }
    }
}

/// Common surface of every syntax tree node
pub trait AstNode {
    /// Get the source span of this node
    fn span(&self) -> Span;

    /// Short human-readable name of the node kind, e.g. `"class"` or `"method invocation"`
    fn kind(&self) -> &'static str;
}

/// Root of a parsed Java file
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub package_decl: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub module_decl: Option<ModuleDecl>,
    /// Top-level forms in source order, including stray `;` and error markers
    pub type_decls: Vec<TopLevel>,
    pub span: Span,
    /// The source this unit was parsed from; set by the fragment dispatcher
    pub source_file: Option<Arc<SourceFile>>,
}

impl CompilationUnit {
    /// Iterator over the well-formed type declarations, skipping `;` and error markers
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.type_decls.iter().filter_map(|decl| match decl {
            TopLevel::Type(t) => Some(t),
            _ => None,
        })
    }
}

impl AstNode for CompilationUnit {
    fn span(&self) -> Span {
        self.span
    }

    fn kind(&self) -> &'static str {
        "compilation unit"
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&AstPrinter::new().print_compilation_unit(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_covers_both() {
        let a = Span::new(Location::new(1, 1, 0), Location::new(1, 4, 3));
        let b = Span::new(Location::new(2, 1, 10), Location::new(2, 5, 14));
        let joined = a.to(b);
        assert_eq!(joined.start.offset, 0);
        assert_eq!(joined.end.offset, 14);
        assert_eq!(joined.to_string(), "1:1-2:5");
    }

    #[test]
    fn span_source_text_is_clamped() {
        let span = Span::new(Location::new(1, 3, 2), Location::new(1, 99, 98));
        assert_eq!(span.source_text("a bcd"), "bcd");
        assert_eq!(Span::point(Location::new(1, 9, 8)).source_text("abc"), "");
    }
}
