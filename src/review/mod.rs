//! Shape review for constrained fragment kinds
//!
//! The grammar accepts any compilation unit; callers asking for a single type declaration, an
//! expression or a type use get their text checked against the shape they asked for. A shape
//! violation is caller misuse, so it is returned as a [`ReviewError`] instead of a diagnostic.

mod type_decl;
mod fragment;

pub use fragment::{leading_declaration, review_expression, review_type_use};
pub use type_decl::review_type_declaration;

pub type ReviewResult<T> = Result<T, ReviewError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Type declaration source code has imports: {text}")]
    HasImports { text: String },
    #[error("Type declaration source code has a module declaration: {text}")]
    HasModule { text: String },
    #[error("Type declaration source code has a package declaration: {text}")]
    HasPackage { text: String },
    #[error("Type declaration source code contains a top-level `;`: {text}")]
    TopLevelSemicolon { text: String },
    #[error("Type declaration source code has {count} top-level forms, not 1: {text}")]
    WrongFormCount { count: usize, text: String },
    #[error("source code should be a type declaration but is {kind}: {text}")]
    NotATypeDeclaration { kind: &'static str, text: String },
    #[error("source code should be an expression but is a {kind}: {text}")]
    NotAnExpression { kind: &'static str, text: String },
    #[error("source code should be a type use but is a {kind}: {text}")]
    NotATypeUse { kind: &'static str, text: String },
}

impl ReviewError {
    /// The rejected source text, verbatim
    pub fn source_text(&self) -> &str {
        match self {
            ReviewError::HasImports { text }
            | ReviewError::HasModule { text }
            | ReviewError::HasPackage { text }
            | ReviewError::TopLevelSemicolon { text }
            | ReviewError::WrongFormCount { text, .. }
            | ReviewError::NotATypeDeclaration { text, .. }
            | ReviewError::NotAnExpression { text, .. }
            | ReviewError::NotATypeUse { text, .. } => text,
        }
    }

    /// Short name of the violated rule
    pub fn rule(&self) -> &'static str {
        match self {
            ReviewError::HasImports { .. } => "no imports",
            ReviewError::HasModule { .. } => "no module declaration",
            ReviewError::HasPackage { .. } => "no package declaration",
            ReviewError::TopLevelSemicolon { .. } => "no top-level `;`",
            ReviewError::WrongFormCount { .. } => "exactly one top-level form",
            ReviewError::NotATypeDeclaration { .. } => "class-like declaration",
            ReviewError::NotAnExpression { .. } => "expression",
            ReviewError::NotATypeUse { .. } => "type use",
        }
    }
}
