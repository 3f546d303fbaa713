// vimexpr: Vimscript expression parser and AST builder
//
// Source text goes through a pest grammar into a concrete parse tree, and the
// AST builder turns that tree into an `Expr`, resolving what each `.` and `-`
// means from the surrounding whitespace and operand shapes.

mod ast;
mod ast_builder;
mod common;
mod concrete;
mod constants;
mod context;
mod error;
mod literal;
mod parser;
mod pretty;

// Test utilities - only available in test builds
#[cfg(test)]
mod test_util;

pub use ast::{BinaryOp, Case, Comparison, Expr, ExprKind, Literal, Scope, UnaryOp};
pub use ast_builder::{transduce, transduce_with_depth};
pub use common::Span;
pub use concrete::{ConcreteNode, Tag};
pub use constants::{DEFAULT_MAX_AST_DEPTH, DEFAULT_MAX_CALL_LIMIT, DEFAULT_MAX_PARSE_DEPTH};
pub use context::{Builder, ExprParser, parse, parse_with_config};
pub use error::{Error, LimitExceeded, Result, unsupported};
pub use parser::{Pair, Pairs, ParseConfig, Rule, parse_tree, parse_tree_with_config};
pub use pretty::{PrettyConfig, pretty_print, pretty_print_with_config, sexpr};
