//! End-to-end interpreter scenarios through the public `Interp` API.

#![allow(unused_crate_dependencies)]

use lunar::{Interp, Session};
use lunar_config::Opts;

fn interp() -> Interp {
    Interp::new(Session::builder().without_color().build())
}

fn interp_with_cells(cells: usize) -> Interp {
    let opts = Opts { arena_cells: cells, ..Default::default() };
    Interp::new(Session::builder().opts(opts).without_color().build())
}

#[track_caller]
fn eval(i: &mut Interp, src: &str) -> String {
    let value = i.execute(src).unwrap_or_else(|e| panic!("{src}: {e}"));
    i.render(value)
}

#[test]
fn addition() {
    let mut i = interp();
    assert_eq!(eval(&mut i, "(+ 1 2)"), "3");
}

#[test]
fn square() {
    let mut i = interp();
    eval(&mut i, "(define (square x) (* x x))");
    assert_eq!(eval(&mut i, "(square 5)"), "25");
}

#[test]
fn factorial() {
    let mut i = interp();
    eval(&mut i, "(define (fact n) (cond ((= n 0) 1) (else (* n (fact (- n 1))))))");
    assert_eq!(eval(&mut i, "(fact 5)"), "120");
}

#[test]
fn cons_chain() {
    let mut i = interp();
    assert_eq!(eval(&mut i, "(cons 1 (cons 2 (cons 3 ())))"), "(1 2 3)");
}

#[test]
fn quoting() {
    let mut i = interp();
    assert_eq!(eval(&mut i, "'(a b c)"), "(a b c)");
    assert_eq!(eval(&mut i, "(car '(a b c))"), "a");
    assert_eq!(eval(&mut i, "(cdr '(a b c))"), "(b c)");
}

#[test]
fn collection_reclaims_discarded_allocations() {
    // 31 cells: 30 usable. Fill the arena with commands whose results are
    // discarded; the interpreter must collect and keep going indefinitely.
    let mut i = interp_with_cells(31);
    for _ in 0..30 {
        assert_eq!(eval(&mut i, "(cons 1 ())"), "(1)");
    }
}

#[test]
fn case_insensitive_input() {
    let mut i = interp();
    eval(&mut i, "(DEFINE (Square X) (* X X))");
    assert_eq!(eval(&mut i, "(SQUARE 5)"), "25");
}

#[test]
fn numeric_canonicalisation_end_to_end() {
    let mut i = interp();
    assert_eq!(eval(&mut i, "(= 2 2.0)"), "#t");
    assert_eq!(eval(&mut i, "(+ 1.50 1.50)"), "3");
    assert_eq!(eval(&mut i, "(/ 1 2)"), "0.5");
}

#[test]
fn errors_unwind_to_the_caller() {
    let mut i = interp();
    let err = i.execute("(car 5)").unwrap_err();
    assert!(!err.is_fatal());
    // The interpreter is still usable afterwards.
    assert_eq!(eval(&mut i, "(+ 1 2)"), "3");
}

#[test]
fn definitions_survive_collections() {
    let mut i = interp_with_cells(64);
    eval(&mut i, "(define (twice x) (cons x (cons x ())))");
    eval(&mut i, "(define l '(a b))");
    for _ in 0..20 {
        assert_eq!(eval(&mut i, "(twice 9)"), "(9 9)");
        assert_eq!(eval(&mut i, "(car l)"), "a");
    }
}
