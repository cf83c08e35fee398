use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

mod common;
use common::parser;

#[test]
fn parses_file_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("Hello.java");
    fs::write(&path, "package demo;\n\npublic class Hello {\n    void greet() { System.out.println(\"hi\"); }\n}\n")
        .expect("write");

    let result = parser().parse_file(&path).expect("readable");
    assert!(!result.has_error(), "{}", result.render_diagnostics());
    assert_eq!(result.source().name(), path.display().to_string());

    let unit = result.tree();
    assert_eq!(unit.types().next().map(|t| t.name()), Some("Hello"));
    let tagged = unit.source_file.as_ref().expect("source tag");
    assert!(Arc::ptr_eq(tagged, result.source()));
}

#[test]
fn diagnostics_carry_the_file_name() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("Broken.java");
    fs::write(&path, "class Broken {\n  int x = 1\n}\n").expect("write");

    let result = parser().parse_file(&path).expect("readable");
    assert!(result.has_error());
    let diagnostic = &result.diagnostics()[0];
    assert_eq!(&*diagnostic.source_name, path.display().to_string());
    assert_eq!(diagnostic.line(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("Nope.java");

    let error = parser().parse_file(&path).err().expect("unreadable");
    assert!(error.is_io());
    assert!(!error.is_invalid_fragment());
    assert!(error.to_string().contains("Nope.java"));
    match error {
        javaparse::Error::Io { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn directory_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let error = javaparse::parse_file(dir.path()).err();
    assert!(error.map_or(false, |e| e.is_io()));
}
