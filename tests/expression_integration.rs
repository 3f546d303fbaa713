// End-to-end expression tests through the public API
//
// These check the built trees by pattern matching on `ExprKind`, the way a
// consumer of the crate would, rather than through the s-expression form.

use vimexpr::{
    BinaryOp, Case, Comparison, Error, Expr, ExprKind, Literal, Scope, UnaryOp, parse, sexpr,
    unsupported,
};

fn parse_ok(input: &str) -> Expr {
    match parse(input) {
        Ok(expr) => expr,
        Err(e) => panic!("failed to parse {input:?}: {e}"),
    }
}

fn string(expr: &Expr) -> &str {
    match &expr.kind {
        ExprKind::Literal(Literal::String(s)) => s,
        other => panic!("expected string literal, got {other:?}"),
    }
}

fn var_name(expr: &Expr) -> &str {
    match &expr.kind {
        ExprKind::Variable { name, .. } => name,
        other => panic!("expected variable, got {other:?}"),
    }
}

fn int(expr: &Expr) -> i64 {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(n)) => *n,
        other => panic!("expected integer, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expr = parse_ok("1 + 2 * 3");
    let ExprKind::Binary(BinaryOp::Add, left, right) = &expr.kind else {
        panic!("expected addition, got {expr:?}");
    };
    assert_eq!(int(left), 1);
    let ExprKind::Binary(BinaryOp::Multiply, a, b) = &right.kind else {
        panic!("expected multiplication, got {right:?}");
    };
    assert_eq!((int(a), int(b)), (2, 3));
}

#[test]
fn tight_dot_projects_a_key() {
    let expr = parse_ok("d.key");
    let ExprKind::OneElementSublist { index, base } = &expr.kind else {
        panic!("expected projection, got {expr:?}");
    };
    assert_eq!(string(index), "key");
    assert_eq!(var_name(base), "d");
}

#[test]
fn spaced_dot_concatenates() {
    let expr = parse_ok("a . b");
    assert!(matches!(expr.kind, ExprKind::Binary(BinaryOp::Concat, ..)));
}

#[test]
fn dot_after_a_list_concatenates() {
    let expr = parse_ok("[1,2].foo");
    let ExprKind::Binary(BinaryOp::Concat, left, right) = &expr.kind else {
        panic!("expected concat, got {expr:?}");
    };
    assert!(matches!(left.kind, ExprKind::List(ref items) if items.len() == 2));
    assert_eq!(var_name(right), "foo");
}

#[test]
fn dash_after_projection_extends_the_key() {
    let expr = parse_ok("d.a-b");
    let ExprKind::OneElementSublist { index, base } = &expr.kind else {
        panic!("expected projection, got {expr:?}");
    };
    assert_eq!(string(index), "a-b");
    assert_eq!(var_name(base), "d");
}

#[test]
fn dash_after_string_subscript_extends_the_key() {
    for input in ["d['a']-b", "(d.a)-b"] {
        let expr = parse_ok(input);
        let ExprKind::OneElementSublist { index, base } = &expr.kind else {
            panic!("{input}: expected projection, got {expr:?}");
        };
        assert_eq!(string(index), "a-b", "{input}");
        assert_eq!(var_name(base), "d", "{input}");
    }
}

#[test]
fn dash_after_other_operands_subtracts() {
    for input in ["l[0]-b", "d['a'] - b", "d.f()-b", "x-b"] {
        let expr = parse_ok(input);
        assert!(
            matches!(expr.kind, ExprKind::Binary(BinaryOp::Subtract, ..)),
            "{input} resolved to {expr:?}"
        );
    }
}

#[test]
fn method_through_dictionary_is_a_funcref_call() {
    let expr = parse_ok("d.f(1,2)");
    let ExprKind::FuncrefCall { callee, args } = &expr.kind else {
        panic!("expected funcref call, got {expr:?}");
    };
    let ExprKind::OneElementSublist { index, base } = &callee.kind else {
        panic!("expected projection callee, got {callee:?}");
    };
    assert_eq!(string(index), "f");
    assert_eq!(var_name(base), "d");
    assert_eq!(args.iter().map(int).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn dict_keeps_source_order() {
    let expr = parse_ok("{ 'b': 1, 'a': 2 }");
    let ExprKind::Dict(entries) = &expr.kind else {
        panic!("expected dict, got {expr:?}");
    };
    let keys: Vec<&str> = entries.iter().map(|(k, _)| string(k)).collect();
    assert_eq!(keys, vec!["b", "a"]);
}

#[test]
fn method_lambda_receives_the_receiver_first() {
    let expr = parse_ok("x->{a,b -> a+b}(2)");
    let ExprKind::LambdaCall { callee, args } = &expr.kind else {
        panic!("expected lambda call, got {expr:?}");
    };
    let ExprKind::Lambda { params, .. } = &callee.kind else {
        panic!("expected lambda callee, got {callee:?}");
    };
    assert_eq!(params, &["a", "b"]);
    assert_eq!(args.len(), 2);
    assert_eq!(var_name(&args[0]), "x");
    assert_eq!(int(&args[1]), 2);
}

#[test]
fn method_call_prepends_receiver() {
    let expr = parse_ok("l->s:Sort(1)");
    let ExprKind::FunctionCall { scope, name, args } = &expr.kind else {
        panic!("expected function call, got {expr:?}");
    };
    assert_eq!(*scope, Some(Scope::Script));
    assert_eq!(name, "Sort");
    assert_eq!(var_name(&args[0]), "l");
}

#[test]
fn comparison_keeps_case_suffix() {
    let expr = parse_ok("a =~? 'x'");
    assert!(matches!(
        expr.kind,
        ExprKind::Binary(BinaryOp::Compare(Comparison::Matches, Case::Ignore), ..)
    ));
}

#[test]
fn scopes_resolve() {
    for (input, scope) in [
        ("g:x", Scope::Global),
        ("s:x", Scope::Script),
        ("l:x", Scope::Local),
        ("a:1", Scope::FunctionArgument),
        ("b:x", Scope::Buffer),
        ("w:x", Scope::Window),
        ("t:x", Scope::Tab),
        ("v:true", Scope::Builtin),
    ] {
        let expr = parse_ok(input);
        assert!(
            matches!(expr.kind, ExprKind::Variable { scope: Some(s), .. } if s == scope),
            "{input} resolved to {expr:?}"
        );
    }
}

#[test]
fn unary_operators_nest_outward() {
    let expr = parse_ok("!-x");
    let ExprKind::Unary(UnaryOp::Not, inner) = &expr.kind else {
        panic!("expected not, got {expr:?}");
    };
    assert!(matches!(inner.kind, ExprKind::Unary(UnaryOp::Negate, _)));
}

#[test]
fn string_escapes_decode_once() {
    assert_eq!(string(&parse_ok(r#""a\"b\\c""#)), r#"a"b\c"#);
    assert_eq!(string(&parse_ok("'it''s'")), "it's");
    assert_eq!(string(&parse_ok(r#""keep\n""#)), r"keep\n");
}

#[test]
fn slices_keep_open_bounds() {
    let expr = parse_ok("l[:2]");
    let ExprKind::Sublist { from, to, base } = &expr.kind else {
        panic!("expected slice, got {expr:?}");
    };
    assert!(from.is_none());
    assert_eq!(to.as_deref().map(int), Some(2));
    assert_eq!(var_name(base), "l");
}

#[test]
fn references_carry_their_names() {
    assert!(matches!(
        parse_ok("&l:tw").kind,
        ExprKind::OptionRef { scope: Some(Scope::Local), ref name } if name == "tw"
    ));
    assert!(matches!(parse_ok("$PATH").kind, ExprKind::EnvVariable(ref n) if n == "PATH"));
    assert!(matches!(parse_ok("@+").kind, ExprKind::Register('+')));
}

#[test]
fn spans_cover_source() {
    let input = "foo(1, d.a-b)";
    let expr = parse_ok(input);
    assert_eq!((expr.span.start, expr.span.end), (0, input.len()));
    let ExprKind::FunctionCall { args, .. } = &expr.kind else {
        panic!("expected call, got {expr:?}");
    };
    assert_eq!(&input[args[1].span.start..args[1].span.end], "d.a-b");
}

#[test]
fn blob_literal_is_unsupported() {
    match parse("0zDEADBEEF") {
        Err(Error::Unsupported { kind, .. }) => assert_eq!(kind, unsupported::BLOB_LITERAL),
        other => panic!("expected unsupported blob, got {other:?}"),
    }
}

#[test]
fn failures_are_whole_call() {
    assert!(matches!(parse("[1, 2,"), Err(Error::Incomplete)));
    assert!(matches!(parse("(1 +"), Err(Error::Incomplete)));
    assert!(matches!(parse("1 +* 2"), Err(Error::Syntax { .. })));
    assert!(matches!(
        parse("f(0x7fffffffffffffff, 0x8000000000000000)"),
        Err(Error::InvalidLiteral { .. })
    ));
    assert!(matches!(
        parse("1.0e999 + 1"),
        Err(Error::InvalidLiteral { kind: "float", .. })
    ));
}

#[test]
fn source_form_round_trips() {
    for input in [
        "d.a-b.c + f(1)->g()",
        "x->{a, b -> a + b}(2) ?? #{k-1: [1, 2.5]}",
        "a ? b : c ? d : e",
        "-(1 + 2) * 3 % 4",
        "l[i : j][0] .. 'tail'",
    ] {
        let first = parse_ok(input);
        let second = parse_ok(&first.to_string());
        assert_eq!(sexpr(&first), sexpr(&second), "{input}");
    }
}
