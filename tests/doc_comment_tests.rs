use javaparse::ast::ClassMember;
use javaparse::{Config, DiagnosticCode, FragmentParser, Severity};

mod common;
use common::parser;

const DOCUMENTED: &str = r#"
/**
 * A documented class.
 */
public class Documented {
    /** Counter. */
    private int count;

    /** Increments. */
    public void bump() { count++; }
}
"#;

#[test]
fn doc_comments_attach_to_declarations() {
    let result = parser().parse_type_declaration(DOCUMENTED).expect("one declaration");
    let decl = result.tree();
    assert!(decl.doc().map_or(false, |d| d.contains("A documented class.")));

    let docs: Vec<_> = decl
        .members()
        .iter()
        .map(|m| match m {
            ClassMember::Field(f) => f.doc.as_deref(),
            ClassMember::Method(m) => m.doc.as_deref(),
            _ => None,
        })
        .collect();
    assert_eq!(docs, [Some("Counter."), Some("Increments.")]);
}

#[test]
fn doc_comments_can_be_dropped() {
    let parser = FragmentParser::new(Config::default().with_doc_comments(false));
    let result = parser.parse_type_declaration(DOCUMENTED).expect("one declaration");
    assert_eq!(result.tree().doc(), None);
}

#[test]
fn deprecated_tag_without_annotation_warns() {
    let text = "class A {\n  /** @deprecated use other */\n  void old() {}\n}";
    let result = parser().parse_compilation_unit(text);
    assert!(!result.has_error());
    let warnings: Vec<_> = result.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].code, DiagnosticCode::MissingDeprecatedAnnotation);
    assert_eq!(warnings[0].line(), 3);
}

#[test]
fn annotated_deprecation_is_quiet() {
    for text in [
        "/** @deprecated */ @Deprecated class A {}",
        "/** @deprecated */ @java.lang.Deprecated class A {}",
        "/** Not deprecated. */ class A {}",
    ] {
        let result = parser().parse_compilation_unit(text);
        assert!(result.diagnostics().is_empty(), "{}: {}", text, result.render_diagnostics());
    }
}

#[test]
fn deprecation_reporting_can_be_disabled() {
    let parser = FragmentParser::new(Config::default().with_deprecation(false));
    let result = parser.parse_compilation_unit("/** @deprecated */ class A {}");
    assert!(result.diagnostics().is_empty());
}
