use javaparse::ast::{AstNode, Expr, Literal, LiteralExpr};
use javaparse::{Error, FragmentKind, ReviewError};

mod common;
use common::{messages, parser};

#[test]
fn expressions_parse_cleanly() {
    for text in [
        "1 + 2",
        "foo.m(1 + 2)",
        "a ? b : c",
        "x instanceof String s && s.isEmpty()",
        "list.stream().map(String::trim).collect(Collectors.toList())",
        "new int[] {1, 2, 3}",
        "(a, b) -> a.compareTo(b)",
        "Collections.<String>emptyList()",
        "i >>>= 2",
    ] {
        let result = parser().parse_expression(text).unwrap_or_else(|e| panic!("{}: {}", text, e));
        assert!(result.diagnostics().is_empty(), "{}: {}", text, result.render_diagnostics());
    }
}

#[test]
fn expression_tree_shape() {
    let result = parser().parse_expression("foo.m(1 + 2)").expect("expression");
    match result.tree() {
        Expr::MethodCall(call) => {
            assert_eq!(call.name, "m");
            assert_eq!(call.arguments.len(), 1);
            assert_eq!(call.arguments[0].kind(), "binary expression");
        }
        other => panic!("unexpected tree {:?}", other),
    }
    assert_eq!(result.tree().to_string(), "foo.m(1 + 2)");
}

#[test]
fn string_literal_is_the_root() {
    let result = parser().parse_expression("\"hello\"").expect("expression");
    assert!(result.diagnostics().is_empty(), "{}", result.render_diagnostics());
    assert_eq!(result.tree().kind(), "literal");
    match result.tree() {
        Expr::Literal(LiteralExpr { value: Literal::String(s), .. }) => assert_eq!(s, "hello"),
        other => panic!("unexpected tree {:?}", other),
    }
}

#[test]
fn class_literal_is_a_member_select() {
    let result = parser().parse_expression("java.lang.String.class").expect("expression");
    assert!(result.diagnostics().is_empty(), "{}", result.render_diagnostics());
    assert_eq!(result.tree().kind(), "member select");
    match result.tree() {
        Expr::FieldAccess(access) => {
            assert!(access.is_class_literal());
            assert_eq!(access.target.to_string(), "java.lang.String");
        }
        other => panic!("unexpected tree {:?}", other),
    }
}

#[test]
fn compilation_unit_text_is_not_an_expression() {
    for text in ["class C {}", "package p;", "import a.B;", "public enum E { A }", "@Deprecated record R() {}"] {
        match parser().parse_expression(text) {
            Err(Error::InvalidFragment(ReviewError::NotAnExpression { text: rejected, .. })) => assert_eq!(rejected, text),
            other => panic!("{}: {:?}", text, other.map(|r| r.into_tree())),
        }
    }
}

#[test]
fn malformed_expression_is_a_diagnostic() {
    let result = parser().parse_expression("1 +").expect("not a shape violation");
    assert!(result.has_error());
    assert!(result.tree().is_erroneous());

    let result = parser().parse_expression("a b").expect("not a shape violation");
    assert_eq!(messages(result.diagnostics()), ["unexpected trailing input"]);
}

#[test]
fn type_uses() {
    for text in [
        "int",
        "String[]",
        "java.util.Map<String, java.util.List<int[]>>",
        "List<? extends Number>",
        "Comparator<? super T>[][]",
    ] {
        let result = parser().parse_type_use(text).unwrap_or_else(|e| panic!("{}: {}", text, e));
        assert!(result.diagnostics().is_empty(), "{}: {}", text, result.render_diagnostics());
        assert!(matches!(result.tree(), Expr::Type(_)));
        assert_eq!(result.tree().to_string(), text);
    }
}

#[test]
fn type_use_rejects_declarations() {
    let error = parser().parse_type_use("interface I {}").err();
    assert!(matches!(error, Some(Error::InvalidFragment(ReviewError::NotATypeUse { kind: "interface", .. }))));

    let result = parser().parse_type_use("1 + 2").expect("not a shape violation");
    assert!(result.has_error());
}

#[test]
fn method_fragments_are_not_implemented() {
    let error = parser().parse_method("void m() {}").err();
    assert!(error.as_ref().map_or(false, Error::is_not_implemented));
    assert!(matches!(error, Some(Error::NotImplemented(FragmentKind::Method))));

    let error = javaparse::parse_method("@interface A { int x(); }").err();
    assert!(error.map_or(false, |e| e.is_not_implemented()));
}

#[test]
fn free_functions_use_default_config() {
    let result = javaparse::parse_expression("a.b.c").expect("expression");
    assert!(!result.has_error());
    let result = javaparse::parse_compilation_unit("class A {}");
    assert_eq!(result.tree().types().count(), 1);
    assert!(javaparse::parse_type_declaration("class A {} class B {}").is_err());
    assert!(javaparse::parse_type_use("long[]").is_ok());
}
