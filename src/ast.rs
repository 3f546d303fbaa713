// AST for Vimscript expressions
//
// The tree produced by the builder. Every node owns its children; nothing is
// shared, and the dot/dash rewrites replace nodes rather than aliasing them.
// Operators are resolved to canonical identities here, so an evaluator never
// has to look at source text again.

pub use crate::common::Span;
use std::fmt;

/// One expression node with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Decoded scalar constant.
    Literal(Literal),

    /// `[a, b, c]`
    List(Vec<Expr>),

    /// `{k: v, ...}` or `#{k: v, ...}`
    ///
    /// Entries keep source order and are not deduplicated.
    Dict(Vec<(Expr, Expr)>),

    /// `name`, `g:name`, `a:0`
    ///
    /// No scope means the evaluator resolves the name by search order.
    Variable { scope: Option<Scope>, name: String },

    /// `&name`, `&l:name`
    OptionRef { scope: Option<Scope>, name: String },

    /// `$NAME`
    EnvVariable(String),

    /// `@r`
    Register(char),

    Unary(UnaryOp, Box<Expr>),

    Binary(BinaryOp, Box<Expr>, Box<Expr>),

    /// `condition ? then : else`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),

    /// `left ?? right`
    Falsy(Box<Expr>, Box<Expr>),

    /// `f(args)`, `s:f(args)`
    FunctionCall {
        scope: Option<Scope>,
        name: String,
        args: Vec<Expr>,
    },

    /// `{params -> body}`
    Lambda { params: Vec<String>, body: Box<Expr> },

    /// A lambda invoked in place: `{x -> x}(1)`, `v->{x -> x}()`
    LambdaCall { callee: Box<Expr>, args: Vec<Expr> },

    /// A call through a computed callee: `d.f(1)`, `d['f'](1)`, `F(1)(2)`
    FuncrefCall { callee: Box<Expr>, args: Vec<Expr> },

    /// `base[from:to]`; an absent bound is open-ended
    Sublist {
        from: Option<Box<Expr>>,
        to: Option<Box<Expr>>,
        base: Box<Expr>,
    },

    /// `base[index]`, and field access `base.key`
    OneElementSublist { index: Box<Expr>, base: Box<Expr> },
}

/// Decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

/// Variable and function scope prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `g:`
    Global,
    /// `s:`
    Script,
    /// `l:`
    Local,
    /// `a:`
    FunctionArgument,
    /// `b:`
    Buffer,
    /// `w:`
    Window,
    /// `t:`
    Tab,
    /// `v:`
    Builtin,
}

impl Scope {
    /// Resolve a prefix such as `"g:"`. The trailing colon is optional.
    pub fn from_prefix(prefix: &str) -> Option<Scope> {
        let letter = prefix.strip_suffix(':').unwrap_or(prefix);
        match letter {
            "g" => Some(Scope::Global),
            "s" => Some(Scope::Script),
            "l" => Some(Scope::Local),
            "a" => Some(Scope::FunctionArgument),
            "b" => Some(Scope::Buffer),
            "w" => Some(Scope::Window),
            "t" => Some(Scope::Tab),
            "v" => Some(Scope::Builtin),
            _ => None,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Scope::Global => "g:",
            Scope::Script => "s:",
            Scope::Local => "l:",
            Scope::FunctionArgument => "a:",
            Scope::Buffer => "b:",
            Scope::Window => "w:",
            Scope::Tab => "t:",
            Scope::Builtin => "v:",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Binary operators, lowest precedence tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Tier 1
    /// `||`
    Or,

    // Tier 2
    /// `&&`
    And,

    // Tier 3
    /// `==`, `!=#`, `=~?`, `isnot`, ...
    Compare(Comparison, Case),

    // Tier 4
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `.` and `..`
    Concat,

    // Tier 5
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

/// The relation a comparison operator tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    /// `=~`
    Matches,
    /// `!~`
    NotMatches,
    /// `is`: same instance
    Is,
    /// `isnot`
    IsNot,
}

/// Case sensitivity of a comparison, from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Case {
    /// No suffix: follows the `ignorecase` option.
    #[default]
    FollowOption,
    /// `#`
    Match,
    /// `?`
    Ignore,
}

impl BinaryOp {
    /// Resolve operator token text to its canonical identity.
    ///
    /// Returns `None` for text that is not a binary operator, including
    /// a bare case suffix (`"#"`) or a suffix on a non-comparison (`"+?"`).
    pub fn from_token(token: &str) -> Option<BinaryOp> {
        let op = match token {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "." | ".." => BinaryOp::Concat,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            _ => {
                let (base, case) = if let Some(base) = token.strip_suffix('#') {
                    (base, Case::Match)
                } else if let Some(base) = token.strip_suffix('?') {
                    (base, Case::Ignore)
                } else {
                    (token, Case::FollowOption)
                };
                BinaryOp::Compare(Comparison::from_token(base)?, case)
            }
        };
        Some(op)
    }

    /// Precedence tier, 1 (loosest) to 5 (tightest).
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Compare(..) => 3,
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Concat => 4,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 5,
        }
    }
}

impl Comparison {
    fn from_token(token: &str) -> Option<Comparison> {
        match token {
            "==" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            ">" => Some(Comparison::Greater),
            ">=" => Some(Comparison::GreaterEq),
            "<" => Some(Comparison::Less),
            "<=" => Some(Comparison::LessEq),
            "=~" => Some(Comparison::Matches),
            "!~" => Some(Comparison::NotMatches),
            "is" => Some(Comparison::Is),
            "isnot" => Some(Comparison::IsNot),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::Greater => ">",
            Comparison::GreaterEq => ">=",
            Comparison::Less => "<",
            Comparison::LessEq => "<=",
            Comparison::Matches => "=~",
            Comparison::NotMatches => "!~",
            Comparison::Is => "is",
            Comparison::IsNot => "isnot",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Compare(cmp, case) => {
                f.write_str(cmp.as_str())?;
                return match case {
                    Case::FollowOption => Ok(()),
                    Case::Match => f.write_str("#"),
                    Case::Ignore => f.write_str("?"),
                };
            }
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Concat => "..",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        };
        f.write_str(s)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Negate,
    /// `+`
    Plus,
}

impl UnaryOp {
    pub fn from_token(token: &str) -> Option<UnaryOp> {
        match token {
            "!" => Some(UnaryOp::Not),
            "-" => Some(UnaryOp::Negate),
            "+" => Some(UnaryOp::Plus),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
        };
        f.write_str(s)
    }
}
