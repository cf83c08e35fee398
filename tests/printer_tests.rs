use javaparse::ast::AstPrinter;

mod common;
use common::parser;

/// Printing is stable: the printed form parses cleanly and prints the same way again
fn assert_stable(text: &str) {
    let first = parser().parse_compilation_unit(text);
    assert!(!first.has_error(), "{}", first.render_diagnostics());
    let printed = AstPrinter::new().print_compilation_unit(first.tree());

    let second = parser().parse_compilation_unit(&printed);
    assert!(!second.has_error(), "reparse of\n{}\n{}", printed, second.render_diagnostics());
    assert_eq!(AstPrinter::new().print_compilation_unit(second.tree()), printed);
}

#[test]
fn classes_print_stably() {
    assert_stable(
        r#"
package org.sample;

import java.util.*;

public class Box<T extends Comparable<T>> implements Iterable<T> {
    private final List<T> items = new ArrayList<>();
    static int created;

    public Box(T first) {
        items.add(first);
        created++;
    }

    public T max() {
        T best = null;
        for (T item : items) {
            if (best == null || item.compareTo(best) > 0) {
                best = item;
            }
        }
        return best;
    }

    @Override
    public Iterator<T> iterator() {
        return items.iterator();
    }
}
"#,
    );
}

#[test]
fn modern_constructs_print_stably() {
    assert_stable(
        r#"
sealed interface Expr permits Num, Add {}

record Num(int value) implements Expr {}

record Add(Expr left, Expr right) implements Expr {}

enum Op { PLUS, MINUS }

class Eval {
    static int eval(Expr e) {
        if (e instanceof Num n) {
            return n.value();
        }
        Add a = (Add) e;
        return eval(a.left()) + eval(a.right());
    }

    static String name(Op op) {
        return switch (op) {
            case PLUS -> "+";
            default -> {
                yield "-";
            }
        };
    }
}
"#,
    );
}

#[test]
fn expressions_print_back() {
    for text in [
        "a + b * c",
        "x -> x * 2",
        "new int[3][]",
        "(String) o",
        "list.get(0).length()",
        "new ArrayList<>()",
    ] {
        let result = parser().parse_expression(text).expect("expression");
        assert_eq!(result.tree().to_string(), text);
    }
}
