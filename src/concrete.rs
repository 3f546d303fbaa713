// Concrete parse input
//
// The AST builder never touches pest directly. It sees the parse tree through
// `ConcreteNode`: a tag, ordered children, the source text and span, and a
// whitespace query over a run of children. Any front end that can answer those
// four questions (a hand-written Pratt parser, a test fixture) can drive the
// builder unchanged.

use crate::{Span, parser::Rule};
use pest::iterators::Pair;
use std::ops::Range;

/// Kind of a concrete parse node, as the builder understands it.
///
/// Several grammar rules collapse onto one tag: every operator token is an
/// `Operator`, every identifier-like token is a `Name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Whole-input wrapper: one expression followed by `EndOfInput`.
    Root,
    EndOfInput,
    /// `a`, `a ? b : c`, `a ?? b`: operands separated by `Coalesce` or
    /// `TernaryThen` markers.
    Conditional,
    Coalesce,
    /// `? then :`, carrying the then-branch.
    TernaryThen,
    LogicalOr,
    LogicalAnd,
    Comparison,
    Additive,
    Multiplicative,
    Operator,
    /// Zero or more prefix operators followed by a `Postfix`.
    Unary,
    /// A primary followed by zero or more subscripts, method calls, or calls.
    Postfix,
    Subscript,
    SliceSeparator,
    MethodCall,
    CallArgs,
    /// One argument slot; empty when the argument was elided.
    CallArg,
    Primary,
    Integer,
    Float,
    Blob,
    String,
    List,
    Dict,
    DictEntry,
    LiteralDict,
    LiteralDictEntry,
    LiteralDictKey,
    /// A lambda, optionally followed by an immediate call.
    LambdaExpr,
    Lambda,
    LambdaParams,
    FunctionCall,
    Variable,
    OptionRef,
    EnvVariable,
    Register,
    Scope,
    Name,
    /// A node the builder has no construct for.
    Unrecognized,
}

/// Read-only view of one node of a concrete parse tree.
pub trait ConcreteNode: Sized {
    fn tag(&self) -> Tag;

    /// Child nodes in source order.
    fn children(&self) -> Vec<Self>;

    /// Source text covered by this node.
    fn text(&self) -> &str;

    /// Byte span of this node in the original input.
    fn span(&self) -> Span;

    /// Whether any whitespace separates the children in `range`.
    ///
    /// Only the boundaries between consecutive children are inspected, so
    /// `0..3` asks about the text between child 0 and 1 and between 1 and 2.
    /// Indices past the last child are ignored.
    ///
    /// A child may carry the separating whitespace at its own edge (pest
    /// attaches implicit whitespace skipped before a failed repetition to the
    /// enclosing rule), so child edges count as well as the gap itself.
    fn has_whitespace(&self, range: Range<usize>) -> bool {
        let children = self.children();
        let end = range.end.min(children.len());
        let start = range.start.min(end);
        gaps_have_whitespace(self, &children[start..end])
    }
}

/// Whether any whitespace separates consecutive nodes of `run`, a slice of
/// `parent`'s already collected children.
///
/// Same test as [`ConcreteNode::has_whitespace`], without collecting the
/// children again, so a fold over a long operator chain stays linear.
pub fn gaps_have_whitespace<N: ConcreteNode>(parent: &N, run: &[N]) -> bool {
    let origin = parent.span().start;
    let text = parent.text();

    run.windows(2).any(|pair| {
        let (left, right) = (&pair[0], &pair[1]);
        let gap_start = left.span().end.saturating_sub(origin);
        let gap_end = right.span().start.saturating_sub(origin);
        left.text().ends_with(char::is_whitespace)
            || right.text().starts_with(char::is_whitespace)
            || text
                .get(gap_start..gap_end)
                .is_some_and(|gap| gap.chars().any(char::is_whitespace))
    })
}

impl ConcreteNode for Pair<'_, Rule> {
    fn tag(&self) -> Tag {
        match self.as_rule() {
            Rule::expression => Tag::Root,
            Rule::EOI => Tag::EndOfInput,
            Rule::expr => Tag::Conditional,
            Rule::coalesce => Tag::Coalesce,
            Rule::ternary_then => Tag::TernaryThen,
            Rule::logical_or => Tag::LogicalOr,
            Rule::logical_and => Tag::LogicalAnd,
            Rule::comparison => Tag::Comparison,
            Rule::additive => Tag::Additive,
            Rule::multiplicative => Tag::Multiplicative,
            Rule::or_op
            | Rule::and_op
            | Rule::compare_op
            | Rule::add_op
            | Rule::mul_op
            | Rule::unary_op => Tag::Operator,
            Rule::unary => Tag::Unary,
            Rule::postfix => Tag::Postfix,
            Rule::subscript => Tag::Subscript,
            Rule::slice_sep => Tag::SliceSeparator,
            Rule::method_call => Tag::MethodCall,
            Rule::call_args => Tag::CallArgs,
            Rule::call_arg => Tag::CallArg,
            Rule::primary => Tag::Primary,
            Rule::blob => Tag::Blob,
            Rule::float => Tag::Float,
            Rule::integer => Tag::Integer,
            Rule::string => Tag::String,
            Rule::list => Tag::List,
            Rule::dict => Tag::Dict,
            Rule::dict_entry => Tag::DictEntry,
            Rule::literal_dict => Tag::LiteralDict,
            Rule::literal_dict_entry => Tag::LiteralDictEntry,
            Rule::literal_dict_key => Tag::LiteralDictKey,
            Rule::lambda_expr => Tag::LambdaExpr,
            Rule::lambda => Tag::Lambda,
            Rule::lambda_params => Tag::LambdaParams,
            Rule::option => Tag::OptionRef,
            Rule::env_variable => Tag::EnvVariable,
            Rule::register => Tag::Register,
            Rule::function_call => Tag::FunctionCall,
            Rule::variable => Tag::Variable,
            Rule::scope | Rule::option_scope => Tag::Scope,
            Rule::function_name
            | Rule::variable_name
            | Rule::scoped_name
            | Rule::option_name
            | Rule::env_name
            | Rule::lambda_param => Tag::Name,
            // Silent rules never appear as pairs
            #[allow(unreachable_patterns)]
            _ => Tag::Unrecognized,
        }
    }

    fn children(&self) -> Vec<Self> {
        self.clone().into_inner().collect()
    }

    fn text(&self) -> &str {
        self.as_str()
    }

    fn span(&self) -> Span {
        let span = self.as_span();
        Span::new(span.start(), span.end())
    }
}
