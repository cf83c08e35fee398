use super::{ReviewError, ReviewResult};
use crate::ast::{AstNode, CompilationUnit, TopLevel, TypeDecl};

/// Narrow a compilation unit to its single class-like declaration
///
/// Rules are checked in a fixed order and the first violation wins: imports, module, package,
/// top-level `;`, number of top-level forms, kind of the remaining form. Syntax errors inside an
/// otherwise well-shaped declaration are not a violation.
pub fn review_type_declaration(unit: CompilationUnit, text: &str) -> ReviewResult<TypeDecl> {
    let reject = |error: ReviewError| {
        log::debug!("type declaration rejected: {}", error.rule());
        Err(error)
    };

    if !unit.imports.is_empty() {
        return reject(ReviewError::HasImports { text: text.to_string() });
    }
    if unit.module_decl.is_some() {
        return reject(ReviewError::HasModule { text: text.to_string() });
    }
    if unit.package_decl.is_some() {
        return reject(ReviewError::HasPackage { text: text.to_string() });
    }
    if unit.type_decls.iter().any(|form| matches!(form, TopLevel::Empty(_))) {
        return reject(ReviewError::TopLevelSemicolon { text: text.to_string() });
    }
    if unit.type_decls.len() != 1 {
        return reject(ReviewError::WrongFormCount {
            count: unit.type_decls.len(),
            text: text.to_string(),
        });
    }

    match unit.type_decls.into_iter().next() {
        Some(TopLevel::Type(decl)) => Ok(decl),
        Some(other) => reject(ReviewError::NotATypeDeclaration {
            kind: other.kind(),
            text: text.to_string(),
        }),
        None => reject(ReviewError::WrongFormCount { count: 0, text: text.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, ParserOptions};
    use crate::source::SourceFile;

    fn review(text: &str) -> ReviewResult<TypeDecl> {
        let source = SourceFile::from_string(text);
        let mut diagnostics = Vec::new();
        let unit = Parser::new(&source, ParserOptions::default(), &mut diagnostics).parse_compilation_unit();
        review_type_declaration(unit, text)
    }

    #[test]
    fn accepts_each_class_like_kind() {
        for text in [
            "class A {}",
            "public interface I<T> extends J {}",
            "enum E { X, Y }",
            "record R(int x) {}",
            "@interface Marker {}",
        ] {
            assert!(review(text).is_ok(), "{}", text);
        }
    }

    #[test]
    fn first_violated_rule_wins() {
        let text = "package p; import q.R; ; class A {} class B {}";
        assert!(matches!(review(text), Err(ReviewError::HasImports { .. })));
        assert!(matches!(review("package p; class A {}"), Err(ReviewError::HasPackage { .. })));
        assert!(matches!(review("module m {}"), Err(ReviewError::HasModule { .. })));
        assert!(matches!(review("class A {};"), Err(ReviewError::TopLevelSemicolon { .. })));
    }

    #[test]
    fn counts_top_level_forms() {
        match review("class A {} class B {}") {
            Err(ReviewError::WrongFormCount { count, text }) => {
                assert_eq!(count, 2);
                assert_eq!(text, "class A {} class B {}");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(review(""), Err(ReviewError::WrongFormCount { count: 0, .. })));
    }

    #[test]
    fn statement_is_not_a_declaration() {
        let error = review("x = 1 + 2;").err();
        assert!(matches!(error, Some(ReviewError::NotATypeDeclaration { kind: "erroneous tree", .. })));
        assert_eq!(
            error.map(|e| e.to_string()).as_deref(),
            Some("source code should be a type declaration but is erroneous tree: x = 1 + 2;")
        );
    }
}
