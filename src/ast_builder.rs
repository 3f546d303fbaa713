// AST builder - transduces a concrete parse tree into an `Expr`
//
// The builder walks any `ConcreteNode` tree post-order (children are built
// before their parent) and emits one `Expr` per construct. It never
// backtracks: every disambiguation below is decided from nodes that have
// already been built.
//
// Processing during transduction:
// - Literals: decoded immediately via the literal module
// - Operators: resolved to canonical identities; unknown text is fatal
// - Dot/dash: `.` and tight `-` in additive chains may become field access
// - Method calls: `x->f(a)` prepends the receiver to the call's arguments

use crate::{
    Span,
    ast::{BinaryOp, Expr, ExprKind, Literal, Scope, UnaryOp},
    concrete::{self, ConcreteNode, Tag},
    constants,
    error::{Error, Result, unsupported},
    literal,
    parser::Rule,
};
use pest::iterators::Pairs;
use tracing::{debug, trace};

/// Check recursion depth remaining and return error if exhausted
///
/// Called wherever the builder re-enters the conditional level. Since
/// depth_left is passed by value, it automatically "resets" on return.
#[inline(always)]
fn check_depth(depth_left: usize, span: Span) -> Result<usize> {
    if depth_left == 0 {
        debug!(?span, "AST depth budget exhausted");
        Err(Error::nesting_depth(span, None))
    } else {
        Ok(depth_left - 1)
    }
}

fn unexpected<N: ConcreteNode>(node: &N) -> Error {
    debug!(tag = ?node.tag(), span = ?node.span(), "unexpected concrete node");
    Error::unsupported(node.span(), unsupported::CONCRETE_SHAPE)
}

fn expect_tag<N: ConcreteNode>(node: &N, tag: Tag) -> Result<()> {
    if node.tag() == tag {
        Ok(())
    } else {
        Err(unexpected(node))
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Transduce a concrete node into an expression with the default depth budget.
///
/// `node` may be a whole-input `Root` or any expression-level node.
pub fn transduce<N: ConcreteNode>(node: &N) -> Result<Expr> {
    transduce_with_depth(node, constants::DEFAULT_MAX_AST_DEPTH)
}

/// Transduce a concrete node, allowing at most `max_ast_depth` nested
/// conditional levels.
pub fn transduce_with_depth<N: ConcreteNode>(node: &N, max_ast_depth: usize) -> Result<Expr> {
    build_expr(max_ast_depth, node)
}

/// Build an AST from the pairs returned by `parse_tree`.
pub fn build_ast_from_pairs(mut pairs: Pairs<'_, Rule>, max_ast_depth: usize) -> Result<Expr> {
    let root = pairs
        .next()
        .ok_or_else(|| Error::unsupported(Span::default(), unsupported::CONCRETE_SHAPE))?;
    transduce_with_depth(&root, max_ast_depth)
}

/// Build a nested expression, charging one unit of the depth budget.
fn build_expr<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let depth_left = check_depth(depth_left, node.span())?;
    build_node(depth_left, node)
}

/// Dispatch on the concrete tag.
fn build_node<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    match node.tag() {
        Tag::Root => build_root(depth_left, node),
        Tag::Conditional => build_conditional(depth_left, node),
        Tag::LogicalOr | Tag::LogicalAnd | Tag::Comparison | Tag::Multiplicative => {
            build_binary(depth_left, node)
        }
        Tag::Additive => build_additive(depth_left, node),
        Tag::Unary => build_unary(depth_left, node),
        Tag::Postfix => build_postfix(depth_left, node),
        Tag::Primary => build_primary(depth_left, node),
        Tag::Integer => {
            let value = literal::parse_integer(node.text(), node.span())?;
            Ok(literal_expr(Literal::Int(value), node.span()))
        }
        Tag::Float => {
            let value = literal::parse_float(node.text(), node.span())?;
            Ok(literal_expr(Literal::Float(value), node.span()))
        }
        Tag::String => {
            let value = literal::decode_string(node.text()).ok_or_else(|| unexpected(node))?;
            Ok(literal_expr(Literal::String(value), node.span()))
        }
        Tag::Blob => {
            debug!(span = ?node.span(), "blob literal");
            Err(Error::unsupported(node.span(), unsupported::BLOB_LITERAL))
        }
        Tag::List => build_list(depth_left, node),
        Tag::Dict => build_dict(depth_left, node),
        Tag::LiteralDict => build_literal_dict(depth_left, node),
        Tag::LambdaExpr => build_lambda_expr(depth_left, node),
        Tag::Lambda => build_lambda(depth_left, node),
        Tag::FunctionCall => {
            let (scope, name, args) = function_call_parts(depth_left, node)?;
            Ok(Expr::new(ExprKind::FunctionCall { scope, name, args }, node.span()))
        }
        Tag::Variable => {
            let (scope, name) = scoped_name(node)?;
            Ok(Expr::new(ExprKind::Variable { scope, name }, node.span()))
        }
        Tag::OptionRef => {
            let (scope, name) = scoped_name(node)?;
            Ok(Expr::new(ExprKind::OptionRef { scope, name }, node.span()))
        }
        Tag::EnvVariable => {
            let children = node.children();
            let [name] = children.as_slice() else {
                return Err(unexpected(node));
            };
            expect_tag(name, Tag::Name)?;
            Ok(Expr::new(
                ExprKind::EnvVariable(name.text().to_string()),
                node.span(),
            ))
        }
        Tag::Register => {
            let register = node
                .text()
                .strip_prefix('@')
                .and_then(|rest| rest.chars().next())
                .ok_or_else(|| unexpected(node))?;
            Ok(Expr::new(ExprKind::Register(register), node.span()))
        }
        _ => Err(unexpected(node)),
    }
}

fn build_root<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    let mut exprs = children.iter().filter(|c| c.tag() != Tag::EndOfInput);
    match (exprs.next(), exprs.next()) {
        (Some(expr), None) => build_node(depth_left, expr),
        _ => Err(unexpected(node)),
    }
}

// ============================================================================
// EXPRESSION PRECEDENCE CHAIN
// ============================================================================
//
// From lowest to highest precedence:
//
//   Conditional     a ? b : c, a ?? b    right-associative, folded from the right
//   LogicalOr       ||                   build_binary
//   LogicalAnd      &&                   build_binary
//   Comparison      == != =~ is ...      build_binary
//   Additive        + - . ..             build_additive (dot/dash rewriting)
//   Multiplicative  * / %                build_binary
//   Unary           ! - +                folded from the operand outward
//   Postfix         [i] [a:b] ->f() (args)
//   Primary
//
// Binary tiers arrive flat, [operand, op, operand, op, operand, ...], and fold
// to the left.
//
// ============================================================================

/// Marker between two conditional operands.
enum Branch {
    Coalesce,
    Ternary(Expr),
}

fn build_conditional<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    if children.len() % 2 == 0 {
        return Err(unexpected(node));
    }

    let mut operands = Vec::with_capacity(children.len() / 2 + 1);
    let mut branches = Vec::with_capacity(children.len() / 2);
    for (i, child) in children.iter().enumerate() {
        if i % 2 == 0 {
            operands.push(build_node(depth_left, child)?);
            continue;
        }
        let branch = match child.tag() {
            Tag::Coalesce => Branch::Coalesce,
            Tag::TernaryThen => {
                let parts = child.children();
                let [then] = parts.as_slice() else {
                    return Err(unexpected(child));
                };
                Branch::Ternary(build_expr(depth_left, then)?)
            }
            _ => return Err(unexpected(child)),
        };
        branches.push(branch);
    }

    // Fold from the right: `a ? b : c ?? d` is `a ? b : (c ?? d)`
    let mut acc = operands.pop().ok_or_else(|| unexpected(node))?;
    while let (Some(left), Some(branch)) = (operands.pop(), branches.pop()) {
        let span = left.span.merge(acc.span);
        let kind = match branch {
            Branch::Coalesce => ExprKind::Falsy(Box::new(left), Box::new(acc)),
            Branch::Ternary(then) => {
                ExprKind::Ternary(Box::new(left), Box::new(then), Box::new(acc))
            }
        };
        acc = Expr::new(kind, span);
    }
    Ok(acc)
}

fn build_binary<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    let Some((first, rest)) = children.split_first() else {
        return Err(unexpected(node));
    };

    let mut acc = build_node(depth_left, first)?;
    for pair in rest.chunks(2) {
        let [op, rhs] = pair else {
            return Err(unexpected(node));
        };
        let right = build_node(depth_left, rhs)?;
        acc = binary(resolve_binary(op)?, acc, right);
    }
    Ok(acc)
}

/// Additive tier, where `.` and `-` are overloaded.
///
/// With no whitespace around the operator:
/// - `dict.method(args)` becomes `FuncrefCall(dict['method'], args)`
/// - `dict.key` becomes `dict['key']`
/// - `dict['key']-more` and `dict.key-more` extend the string key to `key-more`
///
/// Anything else is an ordinary binary operation. The left side only has to
/// be something that could hold a dictionary at runtime.
fn build_additive<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    let Some((first, rest)) = children.split_first() else {
        return Err(unexpected(node));
    };

    let mut acc = build_node(depth_left, first)?;

    for (i, pair) in rest.chunks(2).enumerate() {
        let [op, rhs] = pair else {
            return Err(unexpected(node));
        };
        expect_tag(op, Tag::Operator)?;

        let op_index = 2 * i + 1;
        let tight = !concrete::gaps_have_whitespace(node, &children[op_index - 1..op_index + 2]);
        let right_text = rhs.text().trim();
        let right = build_node(depth_left, rhs)?;

        match op.text() {
            "." if tight && could_be_dictionary(&acc) => {
                acc = resolve_dot(acc, right, right_text);
            }
            "-" if tight
                && literal::is_literal_dict_key(right_text)
                && is_string_keyed_access(&acc) =>
            {
                trace!(suffix = right_text, "dash: extending field key");
                extend_key(&mut acc, right_text, right.span);
            }
            _ => {
                let operator = resolve_binary(op)?;
                if operator == BinaryOp::Concat {
                    trace!(tight, "dot: concatenation");
                }
                acc = binary(operator, acc, right);
            }
        }
    }
    Ok(acc)
}

/// Resolve a tight `.` whose left side could be a dictionary.
fn resolve_dot(left: Expr, right: Expr, right_text: &str) -> Expr {
    let right_span = right.span;
    let right = match right.kind {
        ExprKind::FunctionCall { name, args, .. } => {
            trace!(%name, "dot: method call through dictionary");
            let key = literal_expr(Literal::String(name), right_span);
            let callee = one_element_sublist(key, left);
            let span = callee.span;
            let call = ExprKind::FuncrefCall {
                callee: Box::new(callee),
                args,
            };
            return Expr::new(call, span);
        }
        kind => Expr::new(kind, right_span),
    };

    if literal::is_literal_dict_key(right_text) {
        trace!(key = right_text, "dot: field projection");
        let key = literal_expr(Literal::String(right_text.to_string()), right_span);
        one_element_sublist(key, left)
    } else {
        trace!("dot: concatenation");
        binary(BinaryOp::Concat, left, right)
    }
}

/// Conservative static shape test: false only for shapes that can never
/// evaluate to a dictionary.
fn could_be_dictionary(expr: &Expr) -> bool {
    !matches!(
        expr.kind,
        ExprKind::List(_) | ExprKind::Unary(..) | ExprKind::Literal(_)
    )
}

fn is_string_keyed_access(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::OneElementSublist { index, .. } => {
            matches!(index.kind, ExprKind::Literal(Literal::String(_)))
        }
        _ => false,
    }
}

/// Append `-suffix` to the key of a string-keyed field access, in place.
fn extend_key(expr: &mut Expr, suffix: &str, suffix_span: Span) {
    let ExprKind::OneElementSublist { index, .. } = &mut expr.kind else {
        return;
    };
    let ExprKind::Literal(Literal::String(key)) = &mut index.kind else {
        return;
    };
    key.push('-');
    key.push_str(suffix);
    index.span = index.span.merge(suffix_span);
    expr.span = expr.span.merge(suffix_span);
}

fn resolve_binary<N: ConcreteNode>(op: &N) -> Result<BinaryOp> {
    expect_tag(op, Tag::Operator)?;
    BinaryOp::from_token(op.text()).ok_or_else(|| {
        debug!(operator = op.text(), span = ?op.span(), "unresolvable binary operator");
        Error::unresolvable_operator(op.span(), op.text())
    })
}

fn build_unary<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    let Some((operand, ops)) = children.split_last() else {
        return Err(unexpected(node));
    };

    let mut acc = build_node(depth_left, operand)?;
    // The operator nearest the operand applies first
    for op in ops.iter().rev() {
        expect_tag(op, Tag::Operator)?;
        let operator = UnaryOp::from_token(op.text()).ok_or_else(|| {
            debug!(operator = op.text(), span = ?op.span(), "unresolvable unary operator");
            Error::unresolvable_operator(op.span(), op.text())
        })?;
        let span = op.span().merge(acc.span);
        acc = Expr::new(ExprKind::Unary(operator, Box::new(acc)), span);
    }
    Ok(acc)
}

// ============================================================================
// POSTFIX: subscripts, slices, method calls, calls
// ============================================================================

fn build_postfix<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    let Some((primary, suffixes)) = children.split_first() else {
        return Err(unexpected(node));
    };

    let mut acc = build_node(depth_left, primary)?;
    for suffix in suffixes {
        acc = match suffix.tag() {
            Tag::Subscript => build_subscript(depth_left, acc, suffix)?,
            Tag::MethodCall => build_method_call(depth_left, acc, suffix)?,
            Tag::CallArgs => {
                let args = build_args(depth_left, suffix)?;
                let span = acc.span.merge(suffix.span());
                let callee = Box::new(acc);
                let kind = if matches!(callee.kind, ExprKind::Lambda { .. }) {
                    ExprKind::LambdaCall { callee, args }
                } else {
                    ExprKind::FuncrefCall { callee, args }
                };
                Expr::new(kind, span)
            }
            _ => return Err(unexpected(suffix)),
        };
    }
    Ok(acc)
}

fn build_subscript<N: ConcreteNode>(depth_left: usize, base: Expr, node: &N) -> Result<Expr> {
    let parts = node.children();
    let span = base.span.merge(node.span());

    let Some(sep) = parts.iter().position(|p| p.tag() == Tag::SliceSeparator) else {
        let [index] = parts.as_slice() else {
            return Err(unexpected(node));
        };
        let index = build_expr(depth_left, index)?;
        let kind = ExprKind::OneElementSublist {
            index: Box::new(index),
            base: Box::new(base),
        };
        return Ok(Expr::new(kind, span));
    };

    let (before, after) = (&parts[..sep], &parts[sep + 1..]);
    if before.len() > 1 || after.len() > 1 {
        return Err(unexpected(node));
    }
    let from = before
        .first()
        .map(|p| build_expr(depth_left, p).map(Box::new))
        .transpose()?;
    let to = after
        .first()
        .map(|p| build_expr(depth_left, p).map(Box::new))
        .transpose()?;
    let kind = ExprKind::Sublist {
        from,
        to,
        base: Box::new(base),
    };
    Ok(Expr::new(kind, span))
}

/// `receiver->f(args)` and `receiver->{lambda}(args)`: the receiver becomes
/// the first argument.
fn build_method_call<N: ConcreteNode>(depth_left: usize, receiver: Expr, node: &N) -> Result<Expr> {
    let parts = node.children();
    let span = receiver.span.merge(node.span());

    match parts.as_slice() {
        [call] if call.tag() == Tag::FunctionCall => {
            let (scope, name, mut args) = function_call_parts(depth_left, call)?;
            args.insert(0, receiver);
            Ok(Expr::new(ExprKind::FunctionCall { scope, name, args }, span))
        }
        [lambda, call_args] if lambda.tag() == Tag::Lambda => {
            let callee = build_lambda(depth_left, lambda)?;
            let mut args = build_args(depth_left, call_args)?;
            args.insert(0, receiver);
            let kind = ExprKind::LambdaCall {
                callee: Box::new(callee),
                args,
            };
            Ok(Expr::new(kind, span))
        }
        _ => Err(unexpected(node)),
    }
}

/// Arguments of a call; elided slots (`f(1,,2)`) are dropped.
fn build_args<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Vec<Expr>> {
    expect_tag(node, Tag::CallArgs)?;
    let mut args = Vec::new();
    for slot in node.children() {
        expect_tag(&slot, Tag::CallArg)?;
        if let Some(arg) = slot.children().first() {
            args.push(build_expr(depth_left, arg)?);
        }
    }
    Ok(args)
}

fn build_primary<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    let [inner] = children.as_slice() else {
        return Err(unexpected(node));
    };
    if inner.tag() == Tag::Conditional {
        // Parenthesized: the expression covers its parentheses
        let expr = build_expr(depth_left, inner)?;
        Ok(Expr::new(expr.kind, node.span()))
    } else {
        build_node(depth_left, inner)
    }
}

// ============================================================================
// COLLECTIONS AND LAMBDAS
// ============================================================================

fn build_list<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let items = node
        .children()
        .iter()
        .map(|item| build_expr(depth_left, item))
        .collect::<Result<Vec<_>>>()?;
    Ok(Expr::new(ExprKind::List(items), node.span()))
}

fn build_dict<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let mut entries = Vec::new();
    for entry in node.children() {
        expect_tag(&entry, Tag::DictEntry)?;
        let parts = entry.children();
        let [key, value] = parts.as_slice() else {
            return Err(unexpected(&entry));
        };
        entries.push((build_expr(depth_left, key)?, build_expr(depth_left, value)?));
    }
    Ok(Expr::new(ExprKind::Dict(entries), node.span()))
}

/// `#{key: value}`: keys are taken verbatim as strings.
fn build_literal_dict<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let mut entries = Vec::new();
    for entry in node.children() {
        expect_tag(&entry, Tag::LiteralDictEntry)?;
        let parts = entry.children();
        let [key, value] = parts.as_slice() else {
            return Err(unexpected(&entry));
        };
        expect_tag(key, Tag::LiteralDictKey)?;
        let key = literal_expr(Literal::String(key.text().to_string()), key.span());
        entries.push((key, build_expr(depth_left, value)?));
    }
    Ok(Expr::new(ExprKind::Dict(entries), node.span()))
}

fn build_lambda_expr<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    let children = node.children();
    match children.as_slice() {
        [lambda] => build_lambda(depth_left, lambda),
        [lambda, call_args] => {
            let callee = build_lambda(depth_left, lambda)?;
            let args = build_args(depth_left, call_args)?;
            let kind = ExprKind::LambdaCall {
                callee: Box::new(callee),
                args,
            };
            Ok(Expr::new(kind, node.span()))
        }
        _ => Err(unexpected(node)),
    }
}

fn build_lambda<N: ConcreteNode>(depth_left: usize, node: &N) -> Result<Expr> {
    expect_tag(node, Tag::Lambda)?;
    let children = node.children();
    let [params, body] = children.as_slice() else {
        return Err(unexpected(node));
    };
    expect_tag(params, Tag::LambdaParams)?;

    let params = params
        .children()
        .iter()
        .map(|p| expect_tag(p, Tag::Name).map(|()| p.text().to_string()))
        .collect::<Result<Vec<_>>>()?;
    let body = build_expr(depth_left, body)?;
    let kind = ExprKind::Lambda {
        params,
        body: Box::new(body),
    };
    Ok(Expr::new(kind, node.span()))
}

// ============================================================================
// NAMES AND HELPERS
// ============================================================================

fn resolve_scope<N: ConcreteNode>(node: &N) -> Result<Scope> {
    expect_tag(node, Tag::Scope)?;
    Scope::from_prefix(node.text()).ok_or_else(|| {
        debug!(prefix = node.text(), "unknown scope prefix");
        Error::unsupported(node.span(), unsupported::SCOPE_PREFIX)
    })
}

/// `[Scope?, Name]` children of a variable or option reference.
fn scoped_name<N: ConcreteNode>(node: &N) -> Result<(Option<Scope>, String)> {
    let children = node.children();
    let (scope, name) = match children.as_slice() {
        [name] => (None, name),
        [scope, name] => (Some(resolve_scope(scope)?), name),
        _ => return Err(unexpected(node)),
    };
    expect_tag(name, Tag::Name)?;
    Ok((scope, name.text().to_string()))
}

fn function_call_parts<N: ConcreteNode>(
    depth_left: usize,
    node: &N,
) -> Result<(Option<Scope>, String, Vec<Expr>)> {
    let children = node.children();
    let (scope, name, call_args) = match children.as_slice() {
        [name, call_args] => (None, name, call_args),
        [scope, name, call_args] => (Some(resolve_scope(scope)?), name, call_args),
        _ => return Err(unexpected(node)),
    };
    expect_tag(name, Tag::Name)?;
    let args = build_args(depth_left, call_args)?;
    Ok((scope, name.text().to_string(), args))
}

fn literal_expr(value: Literal, span: Span) -> Expr {
    Expr::new(ExprKind::Literal(value), span)
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), span)
}

/// `base[index]`, spanning both.
fn one_element_sublist(index: Expr, base: Expr) -> Expr {
    let span = base.span.merge(index.span);
    let kind = ExprKind::OneElementSublist {
        index: Box::new(index),
        base: Box::new(base),
    };
    Expr::new(kind, span)
}
