use javaparse::ast::{AstNode, ClassMember, TypeDecl};
use javaparse::{Error, ReviewError};

mod common;
use common::parser;

fn rejection(text: &str) -> ReviewError {
    match parser().parse_type_declaration(text) {
        Err(Error::InvalidFragment(review)) => review,
        Err(other) => panic!("{:?}: wrong error category {:?}", text, other),
        Ok(result) => panic!("{:?}: accepted as {}", text, result.tree().kind()),
    }
}

#[test]
fn single_declarations_are_accepted() {
    let cases = [
        ("class A {}", "class"),
        ("public abstract class B<T extends Comparable<T>> extends A implements Runnable { }", "class"),
        ("interface I { default void m() {} }", "interface"),
        ("enum Color { RED, GREEN; Color() {} }", "enum"),
        ("record Pair<L, R>(L left, R right) {}", "record"),
        ("@Retention(RetentionPolicy.RUNTIME) @interface Marker {}", "annotation type"),
        ("/** Docs. */ @Deprecated final class C {}", "class"),
    ];
    for (text, kind) in cases {
        let result = parser().parse_type_declaration(text).unwrap_or_else(|e| panic!("{}: {}", text, e));
        assert!(!result.has_error(), "{}: {}", text, result.render_diagnostics());
        assert_eq!(result.tree().kind(), kind, "{}", text);
    }
}

#[test]
fn members_are_kept() {
    let result = parser()
        .parse_type_declaration("class Counter { private int n; Counter() {} int next() { return ++n; } static {} }")
        .expect("accepted");
    let decl: &TypeDecl = result.tree();
    assert_eq!(decl.name(), "Counter");
    let members = decl.members();
    assert_eq!(members.len(), 4);
    assert!(matches!(members[0], ClassMember::Field(_)));
    assert!(matches!(members[2], ClassMember::Method(_)));
}

#[test]
fn disallowed_clauses_are_rejected() {
    assert!(matches!(rejection("import java.util.List; class A {}"), ReviewError::HasImports { .. }));
    assert!(matches!(rejection("package p; class A {}"), ReviewError::HasPackage { .. }));
    assert!(matches!(rejection("module m { requires java.base; }"), ReviewError::HasModule { .. }));
    assert!(matches!(rejection("import a.B;"), ReviewError::HasImports { .. }));
}

#[test]
fn wrong_number_of_forms_is_rejected() {
    assert_eq!(
        rejection("class A {} class B {}"),
        ReviewError::WrongFormCount { count: 2, text: "class A {} class B {}".into() }
    );
    assert!(matches!(rejection(""), ReviewError::WrongFormCount { count: 0, .. }));
    assert!(matches!(rejection("; class A {}"), ReviewError::TopLevelSemicolon { .. }));
}

#[test]
fn trailing_garbage_is_rejected() {
    let review = rejection("class A {} garbage");
    assert!(matches!(review, ReviewError::WrongFormCount { count: 2, .. }), "{:?}", review);
}

#[test]
fn bare_expression_is_rejected() {
    let review = rejection("1 + 2");
    assert!(
        matches!(review, ReviewError::NotATypeDeclaration { .. } | ReviewError::WrongFormCount { .. }),
        "{:?}",
        review
    );
    assert_eq!(review.source_text(), "1 + 2");
}

#[test]
fn rejection_names_the_rule_and_text() {
    let error = parser().parse_type_declaration("package p; class A {}").err();
    let message = error.map(|e| e.to_string()).unwrap_or_default();
    assert_eq!(message, "Type declaration source code has a package declaration: package p; class A {}");
}

#[test]
fn syntax_error_inside_declaration_is_a_diagnostic() {
    let result = parser()
        .parse_type_declaration("class SyntaxError { void () {} }")
        .expect("shape is fine");
    assert!(result.has_error());
    assert_eq!(result.diagnostics()[0].message, "<identifier> expected");
}
