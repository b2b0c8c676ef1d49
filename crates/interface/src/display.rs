//! Datum rendering.

use crate::{NodeArena, SymbolTable, Value};

/// Renders a value: nil as `()`, a symbol as its text, a pair as the
/// parenthesised list spine with elements separated by single spaces.
///
/// A non-nil, non-pair tail is rendered as a final element; there is no dot
/// notation.
pub fn render(arena: &NodeArena, symbols: &SymbolTable, value: Value) -> String {
    let mut out = String::new();
    render_into(arena, symbols, value, &mut out);
    out
}

fn render_into(arena: &NodeArena, symbols: &SymbolTable, value: Value, out: &mut String) {
    match value {
        Value::Nil => out.push_str("()"),
        Value::Sym(s) => out.push_str(symbols.text(s)),
        Value::Node(first) => {
            out.push('(');
            let mut node = first;
            loop {
                render_into(arena, symbols, arena.head(node), out);
                match arena.tail(node) {
                    Value::Nil => break,
                    Value::Node(next) => {
                        out.push(' ');
                        node = next;
                    }
                    Value::Sym(s) => {
                        out.push(' ');
                        out.push_str(symbols.text(s));
                        break;
                    }
                }
            }
            out.push(')');
        }
    }
}
