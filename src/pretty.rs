// AST Pretty-Printer
//
// Three renderings of an `Expr`:
// - `pretty_print`: indented tree with labeled children, for debugging
// - `sexpr`: compact one-line prefix form, used heavily by tests
// - `Display`: Vimscript source that parses back to the same tree
//
// Source output always spaces binary operators and writes field access as a
// quoted subscript, so reparsing never has to guess what a `.` or `-` meant.

use crate::ast::{BinaryOp, Expr, ExprKind, Literal};
use std::fmt;

/// Configuration for pretty-printing
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Number of spaces per indentation level
    pub indent_size: usize,
    /// Whether to show span information
    pub show_spans: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent_size: 2,
            show_spans: false,
        }
    }
}

impl PrettyConfig {
    #[must_use]
    pub fn with_spans(mut self) -> Self {
        self.show_spans = true;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }
}

/// Pretty-print an expression as an indented tree.
pub fn pretty_print(expr: &Expr) -> String {
    pretty_print_with_config(expr, &PrettyConfig::default())
}

/// Pretty-print an expression with custom configuration.
pub fn pretty_print_with_config(expr: &Expr, config: &PrettyConfig) -> String {
    let mut buf = String::new();
    print_expr(&mut buf, expr, 0, config);
    buf
}

fn print_expr(buf: &mut String, expr: &Expr, indent: usize, config: &PrettyConfig) {
    let indent_str = " ".repeat(indent * config.indent_size);

    if config.show_spans {
        buf.push_str(&format!(
            "{}[{}..{}] ",
            indent_str, expr.span.start, expr.span.end
        ));
    } else {
        buf.push_str(&indent_str);
    }

    match &expr.kind {
        ExprKind::Literal(lit) => print_literal(buf, lit),

        ExprKind::List(elements) => {
            buf.push_str("List\n");
            if !elements.is_empty() {
                buf.push_str(&format!("{}  elements:\n", indent_str));
                for elem in elements {
                    print_expr(buf, elem, indent + 2, config);
                }
            }
        }

        ExprKind::Dict(entries) => {
            buf.push_str("Dict\n");
            if !entries.is_empty() {
                buf.push_str(&format!("{}  entries:\n", indent_str));
                for (key, value) in entries {
                    buf.push_str(&format!("{}    key:\n", indent_str));
                    print_expr(buf, key, indent + 3, config);
                    buf.push_str(&format!("{}    value:\n", indent_str));
                    print_expr(buf, value, indent + 3, config);
                }
            }
        }

        ExprKind::Variable { scope, name } => {
            let scope = scope.map(|s| s.prefix()).unwrap_or("");
            buf.push_str(&format!("Variable({}{})\n", scope, name));
        }

        ExprKind::OptionRef { scope, name } => {
            let scope = scope.map(|s| s.prefix()).unwrap_or("");
            buf.push_str(&format!("Option(&{}{})\n", scope, name));
        }

        ExprKind::EnvVariable(name) => buf.push_str(&format!("Env(${})\n", name)),

        ExprKind::Register(reg) => buf.push_str(&format!("Register(@{})\n", reg)),

        ExprKind::Unary(op, operand) => {
            buf.push_str(&format!("Unary ({})\n", op));
            buf.push_str(&format!("{}  operand:\n", indent_str));
            print_expr(buf, operand, indent + 2, config);
        }

        ExprKind::Binary(op, left, right) => {
            buf.push_str(&format!("Binary ({})\n", op));
            buf.push_str(&format!("{}  left:\n", indent_str));
            print_expr(buf, left, indent + 2, config);
            buf.push_str(&format!("{}  right:\n", indent_str));
            print_expr(buf, right, indent + 2, config);
        }

        ExprKind::Ternary(cond, if_true, if_false) => {
            buf.push_str("Ternary\n");
            buf.push_str(&format!("{}  condition:\n", indent_str));
            print_expr(buf, cond, indent + 2, config);
            buf.push_str(&format!("{}  if_true:\n", indent_str));
            print_expr(buf, if_true, indent + 2, config);
            buf.push_str(&format!("{}  if_false:\n", indent_str));
            print_expr(buf, if_false, indent + 2, config);
        }

        ExprKind::Falsy(left, right) => {
            buf.push_str("Falsy\n");
            buf.push_str(&format!("{}  left:\n", indent_str));
            print_expr(buf, left, indent + 2, config);
            buf.push_str(&format!("{}  right:\n", indent_str));
            print_expr(buf, right, indent + 2, config);
        }

        ExprKind::FunctionCall { scope, name, args } => {
            let scope = scope.map(|s| s.prefix()).unwrap_or("");
            buf.push_str(&format!("FunctionCall ({}{})\n", scope, name));
            print_args(buf, args, &indent_str, indent, config);
        }

        ExprKind::Lambda { params, body } => {
            buf.push_str(&format!("Lambda ({})\n", params.join(", ")));
            buf.push_str(&format!("{}  body:\n", indent_str));
            print_expr(buf, body, indent + 2, config);
        }

        ExprKind::LambdaCall { callee, args } | ExprKind::FuncrefCall { callee, args } => {
            let label = match &expr.kind {
                ExprKind::LambdaCall { .. } => "LambdaCall",
                _ => "FuncrefCall",
            };
            buf.push_str(&format!("{}\n", label));
            buf.push_str(&format!("{}  callee:\n", indent_str));
            print_expr(buf, callee, indent + 2, config);
            print_args(buf, args, &indent_str, indent, config);
        }

        ExprKind::Sublist { from, to, base } => {
            buf.push_str("Sublist\n");
            buf.push_str(&format!("{}  base:\n", indent_str));
            print_expr(buf, base, indent + 2, config);
            if let Some(from) = from {
                buf.push_str(&format!("{}  from:\n", indent_str));
                print_expr(buf, from, indent + 2, config);
            }
            if let Some(to) = to {
                buf.push_str(&format!("{}  to:\n", indent_str));
                print_expr(buf, to, indent + 2, config);
            }
        }

        ExprKind::OneElementSublist { index, base } => {
            buf.push_str("Index\n");
            buf.push_str(&format!("{}  base:\n", indent_str));
            print_expr(buf, base, indent + 2, config);
            buf.push_str(&format!("{}  index:\n", indent_str));
            print_expr(buf, index, indent + 2, config);
        }
    }
}

fn print_args(buf: &mut String, args: &[Expr], indent_str: &str, indent: usize, config: &PrettyConfig) {
    if !args.is_empty() {
        buf.push_str(&format!("{}  args:\n", indent_str));
        for arg in args {
            print_expr(buf, arg, indent + 2, config);
        }
    }
}

fn print_literal(buf: &mut String, lit: &Literal) {
    match lit {
        Literal::Int(val) => buf.push_str(&format!("Literal(Int({}))\n", val)),
        Literal::Float(val) => buf.push_str(&format!("Literal(Float({:?}))\n", val)),
        Literal::String(s) => buf.push_str(&format!("Literal(String({:?}))\n", s)),
    }
}

//==============================================================================
// S-expressions
//==============================================================================

/// Render an expression as a one-line s-expression.
///
/// ```
/// let expr = vimexpr::parse("d.a-b")?;
/// assert_eq!(vimexpr::sexpr(&expr), r#"(index (var d) "a-b")"#);
/// # Ok::<(), vimexpr::Error>(())
/// ```
pub fn sexpr(expr: &Expr) -> String {
    let mut buf = String::new();
    write_sexpr(&mut buf, expr);
    buf
}

fn write_sexpr(buf: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(val)) => buf.push_str(&val.to_string()),
        ExprKind::Literal(Literal::Float(val)) => buf.push_str(&format!("{:?}", val)),
        ExprKind::Literal(Literal::String(s)) => buf.push_str(&format!("{:?}", s)),

        ExprKind::List(elements) => write_form(buf, "list", elements.iter()),

        ExprKind::Dict(entries) => {
            buf.push_str("(dict");
            for (key, value) in entries {
                buf.push_str(" (");
                write_sexpr(buf, key);
                buf.push(' ');
                write_sexpr(buf, value);
                buf.push(')');
            }
            buf.push(')');
        }

        ExprKind::Variable { scope, name } => {
            let scope = scope.map(|s| s.prefix()).unwrap_or("");
            buf.push_str(&format!("(var {}{})", scope, name));
        }
        ExprKind::OptionRef { scope, name } => {
            let scope = scope.map(|s| s.prefix()).unwrap_or("");
            buf.push_str(&format!("(option &{}{})", scope, name));
        }
        ExprKind::EnvVariable(name) => buf.push_str(&format!("(env ${})", name)),
        ExprKind::Register(reg) => buf.push_str(&format!("(register @{})", reg)),

        ExprKind::Unary(op, operand) => write_form(buf, &op.to_string(), [operand.as_ref()]),
        ExprKind::Binary(op, left, right) => {
            write_form(buf, &op.to_string(), [left.as_ref(), right.as_ref()])
        }
        ExprKind::Ternary(cond, if_true, if_false) => write_form(
            buf,
            "?:",
            [cond.as_ref(), if_true.as_ref(), if_false.as_ref()],
        ),
        ExprKind::Falsy(left, right) => write_form(buf, "??", [left.as_ref(), right.as_ref()]),

        ExprKind::FunctionCall { scope, name, args } => {
            let scope = scope.map(|s| s.prefix()).unwrap_or("");
            write_form(buf, &format!("call {}{}", scope, name), args.iter());
        }
        ExprKind::Lambda { params, body } => {
            buf.push_str(&format!("(lambda ({}) ", params.join(" ")));
            write_sexpr(buf, body);
            buf.push(')');
        }
        ExprKind::LambdaCall { callee, args } => {
            write_form(buf, "lambda-call", std::iter::once(callee.as_ref()).chain(args))
        }
        ExprKind::FuncrefCall { callee, args } => {
            write_form(buf, "funcref-call", std::iter::once(callee.as_ref()).chain(args))
        }

        ExprKind::Sublist { from, to, base } => {
            buf.push_str("(slice ");
            write_sexpr(buf, base);
            for bound in [from, to] {
                buf.push(' ');
                match bound {
                    Some(bound) => write_sexpr(buf, bound),
                    None => buf.push('_'),
                }
            }
            buf.push(')');
        }
        ExprKind::OneElementSublist { index, base } => {
            write_form(buf, "index", [base.as_ref(), index.as_ref()])
        }
    }
}

fn write_form<'a>(buf: &mut String, head: &str, items: impl IntoIterator<Item = &'a Expr>) {
    buf.push('(');
    buf.push_str(head);
    for item in items {
        buf.push(' ');
        write_sexpr(buf, item);
    }
    buf.push(')');
}

//==============================================================================
// Source form
//==============================================================================

// Binding strength of each node when printed as source. Binary operators use
// their own tier (1..=5) between conditionals and prefix operators.
const BIND_CONDITIONAL: u8 = 0;
const BIND_UNARY: u8 = 6;
const BIND_POSTFIX: u8 = 7;
const BIND_ATOM: u8 = 8;

fn binding(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Ternary(..) | ExprKind::Falsy(..) => BIND_CONDITIONAL,
        ExprKind::Binary(op, ..) => op.precedence(),
        ExprKind::Unary(..) => BIND_UNARY,
        ExprKind::Sublist { .. }
        | ExprKind::OneElementSublist { .. }
        | ExprKind::LambdaCall { .. }
        | ExprKind::FuncrefCall { .. } => BIND_POSTFIX,
        _ => BIND_ATOM,
    }
}

/// Write `expr`, parenthesized if it binds looser than `min`.
fn operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min: u8) -> fmt::Result {
    if binding(expr) < min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn comma_separated(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Single-quoted form; the only escape is a doubled quote.
fn quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Float text the grammar accepts back: digits on both sides of the point.
fn float_source(val: f64) -> String {
    let text = format!("{:?}", val);
    match text.find('e') {
        Some(exp) if !text[..exp].contains('.') => {
            format!("{}.0{}", &text[..exp], &text[exp..])
        }
        _ => text,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(Literal::Int(val)) => write!(f, "{}", val),
            ExprKind::Literal(Literal::Float(val)) => f.write_str(&float_source(*val)),
            ExprKind::Literal(Literal::String(s)) => f.write_str(&quoted(s)),

            ExprKind::List(elements) => {
                f.write_str("[")?;
                comma_separated(f, elements)?;
                f.write_str("]")
            }

            ExprKind::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }

            ExprKind::Variable { scope, name } => match scope {
                Some(scope) => write!(f, "{}{}", scope, name),
                None => f.write_str(name),
            },
            ExprKind::OptionRef { scope, name } => match scope {
                Some(scope) => write!(f, "&{}{}", scope, name),
                None => write!(f, "&{}", name),
            },
            ExprKind::EnvVariable(name) => write!(f, "${}", name),
            ExprKind::Register(reg) => write!(f, "@{}", reg),

            ExprKind::Unary(op, inner) => {
                write!(f, "{}", op)?;
                operand(f, inner, BIND_UNARY)
            }

            ExprKind::Binary(op, left, right) => {
                let tier = op.precedence();
                operand(f, left, tier)?;
                write!(f, " {} ", op)?;
                operand(f, right, tier + 1)
            }

            ExprKind::Ternary(cond, if_true, if_false) => {
                operand(f, cond, BinaryOp::Or.precedence())?;
                write!(f, " ? {} : {}", if_true, if_false)
            }

            ExprKind::Falsy(left, right) => {
                operand(f, left, BinaryOp::Or.precedence())?;
                write!(f, " ?? {}", right)
            }

            ExprKind::FunctionCall { scope, name, args } => {
                if let Some(scope) = scope {
                    write!(f, "{}", scope)?;
                }
                write!(f, "{}(", name)?;
                comma_separated(f, args)?;
                f.write_str(")")
            }

            ExprKind::Lambda { params, body } => {
                if params.is_empty() {
                    write!(f, "{{-> {}}}", body)
                } else {
                    write!(f, "{{{} -> {}}}", params.join(", "), body)
                }
            }

            ExprKind::LambdaCall { callee, args } | ExprKind::FuncrefCall { callee, args } => {
                operand(f, callee, BIND_POSTFIX)?;
                f.write_str("(")?;
                comma_separated(f, args)?;
                f.write_str(")")
            }

            // `l[a:b]` would read as the variable `a:b`, so the colon is spaced
            ExprKind::Sublist { from, to, base } => {
                operand(f, base, BIND_POSTFIX)?;
                f.write_str("[")?;
                if let Some(from) = from {
                    write!(f, "{} ", from)?;
                }
                f.write_str(":")?;
                if let Some(to) = to {
                    write!(f, " {}", to)?;
                }
                f.write_str("]")
            }

            ExprKind::OneElementSublist { index, base } => {
                operand(f, base, BIND_POSTFIX)?;
                write!(f, "[{}]", index)
            }
        }
    }
}
