// Concrete parser
//
// This module runs the pest grammar over an expression and hands back the raw
// parse tree. It includes complexity protection against stack overflow and
// runaway backtracking; turning the tree into an `Expr` is the AST builder's job.

use crate::{
    Span, constants,
    error::{Error, Result},
};
use pest::Parser;
use pest_derive::Parser;
use std::num::NonZeroUsize;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct VimscriptParser;

pub use pest::iterators::{Pair, Pairs};

/// Configuration for parsing expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum delimiter nesting for the pre-parse heuristic (default: 64)
    ///
    /// This protects the pest parser, which recurses through every grammar
    /// level for each nested `(`, `[` or `{`.
    pub max_parse_depth: usize,

    /// Maximum AST builder recursion depth (default: 96)
    pub max_ast_depth: usize,

    /// Maximum number of rule invocations (pest call limit for DoS protection)
    ///
    /// Process-wide in pest; see [`Builder::max_call_limit`](crate::Builder::max_call_limit).
    pub max_call_limit: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_parse_depth: constants::DEFAULT_MAX_PARSE_DEPTH,
            max_ast_depth: constants::DEFAULT_MAX_AST_DEPTH,
            max_call_limit: constants::DEFAULT_MAX_CALL_LIMIT,
        }
    }
}

/// Parse an expression into its concrete parse tree with default configuration
///
/// # Example
/// ```
/// use vimexpr::parse_tree;
///
/// let pairs = parse_tree("1 + 2")?;
/// # Ok::<(), vimexpr::Error>(())
/// ```
pub fn parse_tree(input: &str) -> Result<Pairs<'_, Rule>> {
    parse_tree_with_config(input, ParseConfig::default())
}

/// Parse an expression into its concrete parse tree with custom configuration
///
/// # Example
/// ```
/// use vimexpr::{ParseConfig, parse_tree_with_config};
///
/// let config = ParseConfig {
///     max_parse_depth: 16,
///     ..ParseConfig::default()
/// };
/// assert!(parse_tree_with_config("[[1]]", config).is_ok());
/// ```
pub fn parse_tree_with_config(input: &str, config: ParseConfig) -> Result<Pairs<'_, Rule>> {
    // Limits TOTAL rule invocations across the parse, not recursion depth
    // A zero limit falls back to the default rather than disabling the guard
    let call_limit = NonZeroUsize::new(config.max_call_limit)
        .or(NonZeroUsize::new(constants::DEFAULT_MAX_CALL_LIMIT));
    pest::set_call_limit(call_limit);

    validate_nesting_depth(input, config.max_parse_depth)?;

    VimscriptParser::parse(Rule::expression, input)
        .map_err(|e| Error::from_pest_error(e, input.len()))
}

/// Validate that input doesn't exceed maximum delimiter depth (heuristic)
///
/// Each `(`, `[`, `{` increments the counter, each `)`, `]`, `}` decrements it
/// (with saturation), and the maximum reached is compared against the limit.
/// Delimiters inside string literals are counted too; rejecting an extreme
/// string is preferable to overflowing the stack.
fn validate_nesting_depth(input: &str, max_depth: usize) -> Result<()> {
    let mut depth = 0usize;

    for (pos, ch) in input.char_indices() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                if depth > max_depth {
                    // Span from the offending delimiter to end of input
                    let span = Span::new(pos, input.len());
                    return Err(Error::nesting_depth(span, Some((depth, max_depth))));
                }
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    Ok(())
}
