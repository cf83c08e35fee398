use javaparse::ast::{ClassMember, Stmt, TopLevel};
use javaparse::{Config, DiagnosticCode, FragmentParser, Severity};

mod common;
use common::{messages, parser};

fn body_kinds(text: &str) -> Vec<&'static str> {
    use javaparse::ast::AstNode;
    let result = parser().parse_type_declaration(text).expect("one declaration");
    result.tree().members().iter().map(|m| m.kind()).collect()
}

#[test]
fn recovery_resumes_at_next_member() {
    let kinds = body_kinds("class A { int = 3; void ok() {} int fine; }");
    assert_eq!(kinds, ["erroneous tree", "method", "variable"]);
}

#[test]
fn recovery_inside_blocks_keeps_following_statements() {
    let result = parser().parse_compilation_unit("class A { void m() { int x = ; return; } }");
    assert!(result.has_error());
    let body = result.tree().types().next().and_then(|t| match t.members().first() {
        Some(ClassMember::Method(m)) => m.body.clone(),
        _ => None,
    });
    let statements = body.map(|b| b.statements).unwrap_or_default();
    assert!(matches!(statements.last(), Some(Stmt::Return(_))), "{:?}", statements);
}

#[test]
fn no_recovery_stops_at_first_error() {
    let strict = FragmentParser::new(Config::default().with_error_recovery(false));
    let result = strict.parse_compilation_unit("class A { int = 1; } class B { int = 2; } class C {}");
    assert_eq!(result.diagnostics().len(), 1);
    assert!(matches!(result.tree().type_decls.last(), Some(TopLevel::Erroneous(_))));
    assert_eq!(result.tree().types().count(), 1);
}

#[test]
fn error_limit_emits_note_and_stops() {
    let limited = FragmentParser::new(Config::default().with_max_errors(3));
    let text = "class A { int = 1; int = 2; int = 3; int = 4; int = 5; }";
    let result = limited.parse_compilation_unit(text);
    assert_eq!(result.error_count(), 3);
    let last = result.diagnostics().last().expect("note");
    assert_eq!(last.severity, Severity::Note);
    assert_eq!(last.code, DiagnosticCode::TooManyErrors);
    assert_eq!(last.message, "too many errors; parsing stopped");
}

#[test]
fn unclosed_body_reaches_end_of_file() {
    let result = parser().parse_compilation_unit("class A {\n  void m() {\n    foo();\n");
    assert_eq!(messages(result.diagnostics()), ["reached end of file while parsing"]);
    assert_eq!(result.diagnostics()[0].code, DiagnosticCode::PrematureEof);
}

#[test]
fn javac_messages() {
    let cases = [
        ("class A { void m() { 1 + 2; } }", "not a statement"),
        ("class A { foo() {} }", "invalid method declaration; return type required"),
        ("class A { int x = 99999999999; }", "integer number too large"),
        ("class A { String s = \"\\q\"; }", "illegal escape character"),
        ("class A { int x = 1000_; }", "illegal underscore"),
        ("class A { double d = 1._5; }", "illegal underscore"),
        ("class A { void m() { int x = ); } }", "illegal start of expression"),
        ("class A { void m() { try { } } }", "'try' without 'catch', 'finally' or resource declarations"),
    ];
    for (text, message) in cases {
        let result = parser().parse_compilation_unit(text);
        assert_eq!(messages(result.diagnostics()).first().copied(), Some(message), "{}", text);
    }
}
