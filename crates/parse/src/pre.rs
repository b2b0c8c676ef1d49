//! Whole-command preprocessor.
//!
//! Lowercases ASCII letters, turns tabs into spaces, and expands the two
//! surface sugars into core forms:
//!
//! - `(define (f x1 … xk) body …)` ↦ `(define f (lambda (x1 … xk) body …))`,
//!   recursively, so nested function defines expand too;
//! - `' <sexp>` ↦ `(quote <sexp>)`, scanning to the matching right paren by
//!   counting parentheses.
//!
//! The rewrite emits a space-delimited token stream that the reader then
//! consumes.

use crate::{Token, Tokens};

/// Preprocesses one complete top-level command.
pub fn preprocess(command: &str) -> String {
    let lowered: String = command
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c.to_ascii_lowercase() })
        .collect();
    let mut tokens = Tokens::new(&lowered);
    let mut out = String::new();
    expand(&mut tokens, &mut out);
    trace!(command = %out, "preprocessed");
    out
}

fn emit(out: &mut String, text: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(text);
}

fn expand(tokens: &mut Tokens<'_>, out: &mut String) {
    loop {
        match tokens.next_token() {
            Token::Eof => return,
            Token::Atom(a) if a == "define" => {
                emit(out, "define");
                match tokens.next_token() {
                    // Function define: splice in the lambda form. The
                    // recursive expansion consumes the rest of the command;
                    // the formals' own `)` closes the lambda parameter list
                    // and the trailing `)` emitted here closes the lambda.
                    Token::Open => {
                        let name = tokens.next_token();
                        emit(out, name.text());
                        emit(out, "(");
                        emit(out, "lambda");
                        emit(out, "(");
                        expand(tokens, out);
                        emit(out, ")");
                    }
                    Token::Eof => return,
                    token => emit(out, token.text()),
                }
            }
            Token::Quote => {
                emit(out, "(");
                emit(out, "quote");
                let mut depth = 0i32;
                loop {
                    let token = tokens.next_token();
                    match token {
                        Token::Eof => break,
                        Token::Open => depth += 1,
                        Token::Close => depth -= 1,
                        _ => {}
                    }
                    emit(out, token.text());
                    if depth <= 0 {
                        break;
                    }
                }
                emit(out, ")");
            }
            token => emit(out, token.text()),
        }
    }
}
