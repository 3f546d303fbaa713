// Test utilities
//
// Helpers shared by the unit tests: parse with the default driver, compare
// against the s-expression form, and assert on failure kinds.

use crate::{
    ast::Expr,
    context::parse,
    error::{Error, Result},
    pretty::sexpr,
};

/// Parse `input`, panicking with the error if it fails.
pub fn parse_expr(input: &str) -> Expr {
    match parse(input) {
        Ok(expr) => expr,
        Err(e) => panic!("failed to parse {input:?}: {e}"),
    }
}

/// Assert that `input` parses to the given s-expression.
pub fn assert_sexpr(input: &str, expected: &str) {
    let expr = parse_expr(input);
    assert_eq!(sexpr(&expr), expected, "input: {input:?}");
}

/// Assert that `input` parses.
pub fn assert_parses(input: &str) {
    if let Err(e) = parse(input) {
        panic!("expected {input:?} to parse, got {e}");
    }
}

/// Assert that `input` fails and the error satisfies `check`.
pub fn assert_parse_fails_with(input: &str, check: impl FnOnce(&Error) -> bool) {
    let result: Result<Expr> = parse(input);
    match result {
        Ok(expr) => panic!("expected {input:?} to fail, got {}", sexpr(&expr)),
        Err(e) => assert!(check(&e), "unexpected error for {input:?}: {e:?}"),
    }
}
