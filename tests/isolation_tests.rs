use std::sync::Arc;
use std::thread;

use javaparse::{Config, FragmentParser};

mod common;
use common::{messages, parser};

#[test]
fn calls_do_not_share_diagnostics() {
    let parser = parser();
    let broken = parser.parse_compilation_unit("class SyntaxError { void () {} }");
    let clean = parser.parse_compilation_unit("class Fine {}");
    let broken_again = parser.parse_compilation_unit("class SyntaxError { void () {} }");

    assert_eq!(broken.diagnostics().len(), 1);
    assert!(clean.diagnostics().is_empty());
    assert_eq!(broken_again.diagnostics(), broken.diagnostics());
}

#[test]
fn repeated_calls_are_identical() {
    let text = "class A { int x = ; void m() { foo( } }";
    let first = parser().parse_compilation_unit(text);
    for _ in 0..5 {
        let again = parser().parse_compilation_unit(text);
        assert_eq!(messages(again.diagnostics()), messages(first.diagnostics()));
        assert_eq!(again.tree().type_decls, first.tree().type_decls);
    }
}

#[test]
fn rejected_calls_leave_no_trace() {
    let parser = parser();
    assert!(parser.parse_type_declaration("class A {} class B {}").is_err());
    assert!(parser.parse_expression("class C {}").is_err());
    assert!(parser.parse_method("void m() {}").is_err());
    let result = parser.parse_compilation_unit("class Fine {}");
    assert!(result.diagnostics().is_empty());
}

#[test]
fn concurrent_calls_are_independent() {
    let parser = parser();
    let inputs: Vec<(String, bool)> = (0..16)
        .map(|i| {
            if i % 2 == 0 {
                (format!("class Ok{} {{ int f{} = {}; }}", i, i, i), false)
            } else {
                (format!("class Bad{} {{ void () {{}} }}", i), true)
            }
        })
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|(text, broken)| {
                let parser = &parser;
                scope.spawn(move || {
                    for _ in 0..10 {
                        let result = parser.parse_compilation_unit(text);
                        assert_eq!(result.has_error(), *broken, "{}", text);
                        assert_eq!(result.diagnostics().len(), usize::from(*broken), "{}", text);
                        assert_eq!(result.source().content(), text);
                    }
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().is_ok());
        }
    });
}

#[test]
fn finished_calls_release_their_state() {
    let result = parser().parse_compilation_unit("class A { void () {} }");
    let weak = Arc::downgrade(result.source());
    drop(result);
    assert!(weak.upgrade().is_none());

    let result = parser().parse_type_declaration("class A {}").expect("accepted");
    let weak = Arc::downgrade(result.source());
    let (decl, diagnostics) = result.into_parts();
    assert!(weak.upgrade().is_none());
    assert_eq!(decl.name(), "A");
    assert!(diagnostics.is_empty());
}

#[test]
fn many_mixed_calls_release_every_source() {
    let parser = parser();
    let mut sources = Vec::new();
    for i in 0..3000 {
        let text = format!("class C{} {{ int f = {}; void () {{}} }}", i, i);
        let unit = parser.parse_compilation_unit(&text);
        assert!(unit.has_error());
        sources.push(Arc::downgrade(unit.source()));

        let expr = parser.parse_expression(&format!("a.m({}) + b", i)).expect("expression");
        assert!(!expr.has_error());
        sources.push(Arc::downgrade(expr.source()));

        let two_types = format!("class A{} {{}} class B {{}}", i);
        assert!(parser.parse_type_declaration(&two_types).is_err());
        assert!(parser.parse_expression("import a.B;").is_err());
    }
    assert_eq!(sources.len(), 6000);
    assert!(sources.iter().all(|weak| weak.upgrade().is_none()));
}

#[test]
fn each_parser_keeps_its_own_config() {
    let strict = FragmentParser::new(Config::default().with_error_recovery(false));
    let lenient = FragmentParser::default();
    let text = "class A { int = 1; int = 2; }";
    assert_eq!(strict.parse_compilation_unit(text).error_count(), 1);
    assert_eq!(lenient.parse_compilation_unit(text).error_count(), 2);
}
