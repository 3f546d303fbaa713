// Configuration and parser driver
//
// `Builder` collects the safety limits and produces an `ExprParser`, which
// runs the pest grammar and the AST builder back to back. The driver holds no
// per-parse state and can be reused or shared across threads.

use crate::{
    Result,
    ast::Expr,
    ast_builder, constants,
    parser::{self, ParseConfig},
};
use tracing::{debug, instrument};

// ============================================================================
// Configuration Builder
// ============================================================================

/// Configuration builder for expression parsing
///
/// # Examples
///
/// Simple usage with defaults:
/// ```
/// use vimexpr::Builder;
///
/// let parser = Builder::default().build();
/// ```
///
/// With custom configuration:
/// ```
/// use vimexpr::Builder;
///
/// let parser = Builder::default()
///     .max_parse_depth(32)
///     .max_ast_depth(48)
///     .max_call_limit(1_000_000)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    /// Maximum delimiter nesting checked before pest runs (default: 64)
    max_parse_depth: usize,

    /// Maximum AST builder recursion depth (default: 96)
    ///
    /// Should stay above `max_parse_depth`, since every delimiter level costs
    /// the builder one unit and ternary then-branches cost more.
    max_ast_depth: usize,

    /// Maximum call limit for the pest parser (default: 10 million)
    max_call_limit: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            max_parse_depth: constants::DEFAULT_MAX_PARSE_DEPTH,
            max_ast_depth: constants::DEFAULT_MAX_AST_DEPTH,
            max_call_limit: constants::DEFAULT_MAX_CALL_LIMIT,
        }
    }
}

impl Builder {
    /// Start from an existing configuration.
    pub fn from_config(config: ParseConfig) -> Self {
        Self {
            max_parse_depth: config.max_parse_depth,
            max_ast_depth: config.max_ast_depth,
            max_call_limit: config.max_call_limit,
        }
    }

    /// Set maximum delimiter nesting for the pre-parse check
    #[must_use]
    pub fn max_parse_depth(mut self, depth: usize) -> Self {
        self.max_parse_depth = depth;
        self
    }

    /// Set maximum AST builder recursion depth
    ///
    /// # Examples
    /// ```
    /// use vimexpr::Builder;
    ///
    /// let parser = Builder::default().max_ast_depth(2).build();
    /// assert!(parser.parse("[1]").is_ok());
    /// assert!(parser.parse("[[1]]").is_err());
    /// ```
    #[must_use]
    pub fn max_ast_depth(mut self, depth: usize) -> Self {
        self.max_ast_depth = depth;
        self
    }

    /// Set maximum call limit for the pest parser
    ///
    /// Bounds the total number of rule invocations, which guards against
    /// pathological backtracking rather than deep nesting.
    ///
    /// pest keeps this limit in a process-wide setting. Each parse stores its
    /// own value on entry and pest reads it back when the parse starts, so
    /// parsers with different limits running on several threads at once may
    /// each run under another parser's limit. Parses never share any other
    /// state and need no coordination; give every parser in a process the
    /// same limit if the exact bound matters.
    #[must_use]
    pub fn max_call_limit(mut self, limit: usize) -> Self {
        self.max_call_limit = limit;
        self
    }

    /// Build a parser driver with this configuration
    #[must_use]
    pub fn build(self) -> ExprParser {
        ExprParser {
            config: ParseConfig {
                max_parse_depth: self.max_parse_depth,
                max_ast_depth: self.max_ast_depth,
                max_call_limit: self.max_call_limit,
            },
        }
    }
}

// ============================================================================
// Parser Driver
// ============================================================================

/// Expression parser driver
///
/// Holds the configuration and turns source text into an `Expr`. Reusable
/// for any number of expressions.
#[derive(Debug, Clone)]
pub struct ExprParser {
    config: ParseConfig,
}

impl Default for ExprParser {
    fn default() -> Self {
        Builder::default().build()
    }
}

impl ExprParser {
    /// Parse an expression into its AST
    ///
    /// # Examples
    ///
    /// ```
    /// use vimexpr::{ExprKind, ExprParser};
    ///
    /// let parser = ExprParser::default();
    /// let expr = parser.parse("d.key")?;
    /// assert!(matches!(expr.kind, ExprKind::OneElementSublist { .. }));
    /// # Ok::<(), vimexpr::Error>(())
    /// ```
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn parse(&self, input: &str) -> Result<Expr> {
        let pairs = parser::parse_tree_with_config(input, self.config)?;
        let expr = ast_builder::build_ast_from_pairs(pairs, self.config.max_ast_depth)?;
        debug!(span = ?expr.span, "built expression");
        Ok(expr)
    }

    pub fn config(&self) -> ParseConfig {
        self.config
    }
}

/// Parse an expression with the default configuration
///
/// # Examples
/// ```
/// let expr = vimexpr::parse("1 + 2 * 3")?;
/// assert_eq!(vimexpr::sexpr(&expr), "(+ 1 (* 2 3))");
/// # Ok::<(), vimexpr::Error>(())
/// ```
pub fn parse(input: &str) -> Result<Expr> {
    ExprParser::default().parse(input)
}

/// Parse an expression with a custom configuration
pub fn parse_with_config(input: &str, config: ParseConfig) -> Result<Expr> {
    Builder::from_config(config).build().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, test_util::{assert_parse_fails_with, assert_parses}};

    #[test]
    fn builder_defaults_match_constants() {
        let parser = Builder::default().build();
        assert_eq!(parser.config(), ParseConfig::default());
    }

    #[test]
    fn builder_setters_apply() {
        let config = Builder::default()
            .max_parse_depth(8)
            .max_ast_depth(12)
            .max_call_limit(1_000)
            .build()
            .config();
        assert_eq!(
            config,
            ParseConfig {
                max_parse_depth: 8,
                max_ast_depth: 12,
                max_call_limit: 1_000,
            }
        );
    }

    #[test]
    fn from_config_round_trips() {
        let config = ParseConfig {
            max_parse_depth: 3,
            max_ast_depth: 5,
            max_call_limit: 7,
        };
        assert_eq!(Builder::from_config(config).build().config(), config);
    }

    #[test]
    fn parser_is_reusable() {
        let parser = ExprParser::default();
        for input in ["1", "a.b", "f(x)->g()", "{x -> x}(1)"] {
            assert!(parser.parse(input).is_ok(), "failed on {input}");
        }
    }

    #[test]
    fn parse_depth_limit_applies_before_grammar() {
        let parser = Builder::default().max_parse_depth(2).build();
        assert!(matches!(
            parser.parse("[[[1]]]"),
            Err(Error::LimitExceeded { .. })
        ));
    }

    #[test]
    fn ast_depth_limit_applies_to_builder() {
        // Ternary then-branches nest without delimiters
        let config = ParseConfig {
            max_ast_depth: 2,
            ..ParseConfig::default()
        };
        assert!(parse_with_config("a ? b : c", config).is_ok());
        assert!(parse_with_config("a ? b ? c : d : e", config).is_err());
    }

    #[test]
    fn free_function_uses_defaults() {
        assert_parses("d.a-b->f()");
        assert_parses(&format!("{}1{}", "[".repeat(20), "]".repeat(20)));
    }

    #[test]
    fn errors_surface_through_driver() {
        assert_parse_fails_with("(1 +", |e| matches!(e, Error::Incomplete));
        assert_parse_fails_with("1 +* 2", |e| matches!(e, Error::Syntax { .. }));
        assert_parse_fails_with("0z00", |e| matches!(e, Error::Unsupported { .. }));
        assert_parse_fails_with("0x", |e| !matches!(e, Error::Incomplete));
    }
}
