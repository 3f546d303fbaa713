// Error types for the expression parser.
//
// Parse failures come from the pest grammar (`Syntax`, `Incomplete`); the AST
// builder adds its own hard failures (`UnresolvableOperator`, `Unsupported`,
// `InvalidLiteral`). Every error aborts the whole call: no partial tree is
// ever returned alongside one.

use crate::{Span, parser::Rule};

/// Identifiers for constructs the builder refuses to transduce.
pub mod unsupported {
    /// Blob literals (`0zFF00`) are recognised by the grammar but not built.
    pub const BLOB_LITERAL: &str = "blob literal";
    /// A concrete node whose tag cannot appear at this position.
    pub const CONCRETE_SHAPE: &str = "unexpected concrete node";
    /// A scope prefix outside `g: s: l: a: b: w: t: v:`.
    pub const SCOPE_PREFIX: &str = "unknown scope prefix";
}

// ============================================================================
// Safety Limits
// ============================================================================

// Messages pest attaches to the custom errors raised by its resource guards
const PEST_STACK_LIMIT: &str = "stack limit reached";
const PEST_CALL_LIMIT: &str = "call limit reached";

/// Safety limits exceeded during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Maximum nesting depth was exceeded, either by the delimiter pre-check
    /// or by the AST builder's recursion budget.
    NestingDepth { message: String },
    /// pest's cumulative rule-invocation budget ran out.
    CallLimit,
}

impl std::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitExceeded::NestingDepth { message } => f.write_str(message),
            LimitExceeded::CallLimit => f.write_str("parser call limit reached"),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Top-level error type for parsing and AST construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input ends in the middle of a grammatically valid construct.
    ///
    /// Examples: `(1 + 2`, `[1, 2,`, `a ? b`
    #[error("input is incomplete; more data required")]
    Incomplete,

    /// A syntax error reported by the grammar.
    #[error("syntax error at {span:?}: {message}")]
    Syntax {
        /// Source location of the error.
        ///
        /// Spans from the error position to the end of input, since pest
        /// reports cursor positions rather than token spans.
        span: Span,
        /// Human-readable description of the error.
        message: String,
    },

    /// An operator token with no canonical operator identity.
    #[error("unresolvable operator `{operator}` at {span:?}")]
    UnresolvableOperator {
        /// Source location of the operator token.
        span: Span,
        /// The operator text as it appeared in the source.
        operator: String,
    },

    /// A construct the builder does not transduce.
    ///
    /// See the [`unsupported`] module for the `kind` values.
    #[error("unsupported at {span:?}: {kind}")]
    Unsupported {
        /// Source location of the unsupported construct.
        span: Span,
        /// The unsupported feature identifier.
        kind: &'static str,
    },

    /// A numeric literal that does not fit or does not decode.
    #[error("invalid {kind} literal `{text}` at {span:?}")]
    InvalidLiteral {
        /// Source location of the literal.
        span: Span,
        /// `"integer"` or `"float"`.
        kind: &'static str,
        /// The literal text as it appeared in the source.
        text: String,
    },

    /// A safety limit was exceeded.
    #[error("limit exceeded at {span:?}: {kind}")]
    LimitExceeded {
        /// Source location where the limit was exceeded.
        span: Span,
        /// The specific limit that was exceeded.
        kind: LimitExceeded,
    },
}

impl Error {
    /// Construct a syntax error.
    #[must_use]
    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Error::Syntax {
            span,
            message: message.into(),
        }
    }

    /// Construct an unresolvable-operator error.
    #[must_use]
    pub fn unresolvable_operator(span: Span, operator: impl Into<String>) -> Self {
        Error::UnresolvableOperator {
            span,
            operator: operator.into(),
        }
    }

    /// Construct an unsupported error.
    ///
    /// Use constants from the [`unsupported`] module for the `kind` parameter.
    #[must_use]
    pub fn unsupported(span: Span, kind: &'static str) -> Self {
        Error::Unsupported { span, kind }
    }

    /// Construct an invalid literal error.
    #[must_use]
    pub fn invalid_literal(span: Span, kind: &'static str, text: impl Into<String>) -> Self {
        Error::InvalidLiteral {
            span,
            kind,
            text: text.into(),
        }
    }

    /// Construct a nesting depth exceeded error.
    ///
    /// If `details` is `Some((depth, max))`, the message includes specific values.
    #[must_use]
    pub fn nesting_depth(span: Span, details: Option<(usize, usize)>) -> Self {
        let message = match details {
            Some((depth, max)) => {
                format!("Nesting depth {depth} exceeds maximum of {max}")
            }
            None => "maximum nesting depth exceeded".to_string(),
        };
        Error::LimitExceeded {
            span,
            kind: LimitExceeded::NestingDepth { message },
        }
    }

    /// Convert a pest error, mapping failures at end of input to `Incomplete`.
    ///
    /// pest reports its own resource guards as custom errors. Running out of
    /// native stack means the input nests deeper than the delimiter pre-check
    /// can see (ternary then-branches have no delimiters), so it surfaces as
    /// a nesting-depth limit.
    pub(crate) fn from_pest_error(err: pest::error::Error<Rule>, input_len: usize) -> Self {
        let position = match err.location {
            pest::error::InputLocation::Pos(pos) => pos,
            pest::error::InputLocation::Span((start, _)) => start,
        };

        if let pest::error::ErrorVariant::CustomError { message } = &err.variant {
            let span = Span::new(position.min(input_len), input_len);
            match message.as_str() {
                PEST_STACK_LIMIT => return Error::nesting_depth(span, None),
                PEST_CALL_LIMIT => {
                    return Error::LimitExceeded {
                        span,
                        kind: LimitExceeded::CallLimit,
                    };
                }
                _ => {}
            }
        }

        if position >= input_len {
            return Error::Incomplete;
        }

        let message = match &err.variant {
            pest::error::ErrorVariant::ParsingError {
                positives,
                negatives,
            } => {
                let expected = positives
                    .iter()
                    .map(|r| format!("{r:?}"))
                    .chain(negatives.iter().map(|r| format!("not {r:?}")))
                    .collect::<Vec<_>>()
                    .join(", ");
                if expected.is_empty() {
                    "unexpected input".to_string()
                } else {
                    format!("expected {expected}")
                }
            }
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        Error::Syntax {
            span: Span::new(position, input_len),
            message,
        }
    }
}

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, Error>;
