//! Grammar engine for Java source
//!
//! The lexer turns text into tokens, the recursive descent parser builds the syntax tree and
//! pushes every lexical or syntactic problem to a [`DiagnosticListener`](crate::diagnostics::DiagnosticListener).
//! Entry points always return a tree; error marker nodes show where recovery happened.

pub mod lexer;
pub mod parser;
pub mod error;
pub mod literal;
mod expr;

pub use lexer::{Lexer, LexicalToken, Token};
pub use parser::{Parser, ParserOptions};
pub use error::{ErrorRecovery, ParseError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, ClassMember, Stmt};
    use crate::diagnostics::Diagnostic;
    use crate::source::SourceFile;

    fn parse(text: &str) -> (crate::ast::CompilationUnit, Vec<Diagnostic>) {
        let source = SourceFile::from_string(text);
        let mut diagnostics = Vec::new();
        let unit = Parser::new(&source, ParserOptions::default(), &mut diagnostics).parse_compilation_unit();
        (unit, diagnostics)
    }

    #[test]
    fn modern_java_parses_cleanly() {
        let (unit, diagnostics) = parse(
            r#"
package com.example;

import java.util.*;
import java.util.function.Function;

public sealed interface Shape permits Circle, Square {
    double area();

    int sides();

    default String describe() {
        return switch (sides()) {
            case 0 -> "circle";
            case 3, 4 -> "polygon";
            default -> {
                String name = "shape";
                yield name + " with " + sides() + " sides";
            }
        };
    }
}

record Circle(double radius) implements Shape {
    Circle {
        if (radius < 0) throw new IllegalArgumentException("negative");
    }

    public double area() { return Math.PI * radius * radius; }
    public int sides() { return 0; }
}

final class Square implements Shape {
    private final double side;
    Square(double side) { this.side = side; }
    double side() { return side; }
    public double area() { return side * side; }
    public int sides() { return 4; }
}

non-sealed class Other {
    @SuppressWarnings({"unchecked", "rawtypes"})
    <T extends Comparable<? super T>> List<T> sorted(Collection<? extends T> items, int... extra) throws Exception {
        var result = new ArrayList<T>(items);
        Map<String, List<Map<Integer, T>>> nested = new HashMap<>();
        for (int i = 0, j = 10; i < j; i++, j--) {
            continue;
        }
        for (final T item : result) {
            System.out.println(item);
        }
        outer:
        while (true) {
            break outer;
        }
        try (var in = open(); Other o = this) {
            Function<String, Integer> f = String::length;
            Runnable r = () -> {};
            int[][] grid = new int[3][];
            Object o2 = (Comparable<T> & java.io.Serializable) null;
            if (o2 instanceof String s && !s.isEmpty()) {
                assert s.length() > 0 : "empty";
            }
        } catch (IllegalStateException | UnsupportedOperationException e) {
            throw e;
        } finally {
            synchronized (this) { count >>>= 1; }
        }
        do { extra[0]--; } while (extra[0] > 0);
        return result;
    }
}
"#,
        );
        assert!(diagnostics.is_empty(), "{:#?}", diagnostics);
        assert_eq!(unit.types().count(), 4);
    }

    #[test]
    fn local_declarations_and_statements() {
        let (unit, diagnostics) = parse(
            "class A { void m() { int x = 1; List<String> l; a.b.C c; x = 2; foo(); class Local {} } }",
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let Some(ClassMember::Method(method)) = unit.types().next().map(|t| &t.members()[0]) else {
            panic!("expected a method");
        };
        let kinds: Vec<_> = method
            .body
            .iter()
            .flat_map(|b| b.statements.iter())
            .map(|s| s.kind())
            .collect();
        assert_eq!(
            kinds,
            [
                "variable declaration",
                "variable declaration",
                "variable declaration",
                "expression statement",
                "expression statement",
                "class",
            ]
        );
        assert!(matches!(method.body.as_ref().map(|b| &b.statements[5]), Some(Stmt::TypeDecl(_))));
    }

    #[test]
    fn lexical_errors_come_first() {
        let (_, diagnostics) = parse("class A { char c = ''; # }");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages[0], "empty character literal");
        assert!(messages[1].starts_with("illegal character"));
    }
}
