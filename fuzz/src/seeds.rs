//! Seed corpus definitions for the fuzz target.
//!
//! These seeds are the source of truth for fuzzing starting points.
//! The `generate-seeds` binary writes them to `corpus/parse_vimscript`.

/// Vimscript expression seeds covering grammar constructs and edge cases.
#[rustfmt::skip]
pub const VIMSCRIPT_SEEDS: &[(&str, &str)] = &[
    // Empty collections
    ("empty_list", "[]"),
    ("empty_dict", "{}"),
    ("empty_literal_dict", "#{}"),

    // Literals
    ("int_decimal", "42"),
    ("int_hex", "0x1F"),
    ("int_binary", "0b1011"),
    ("int_octal", "0o17"),
    ("int_legacy_octal", "017"),
    ("float_literal", "1.5e3"),
    ("float_overflow", "1.0e999"),
    ("string_double", r#""say \"hi\"""#),
    ("string_single", "'it''s'"),
    ("blob_literal", "0zFF00"),

    // References
    ("variable", "count"),
    ("scoped_variable", "g:count"),
    ("autoload_variable", "foo#bar#baz"),
    ("option", "&l:shiftwidth"),
    ("env", "$HOME"),
    ("register", "@\""),

    // Operators
    ("arithmetic", "1 + 2 * 3 - 4 / 5 % 6"),
    ("unary_stack", "!-+x"),
    ("comparison_suffix", "a ==? b && c !~# 'x'"),
    ("is_isnot", "a is b || a isnot c"),
    ("ternary", "a ? b : c ? d : e"),
    ("ternary_nested_then", "a ? b ? 1 : 2 : 3"),
    ("falsy", "a ?? b ?? c"),
    ("concat", "a .. b . c"),

    // Dot and dash
    ("projection", "d.key"),
    ("projection_chain", "d.a.b.c"),
    ("dash_key", "d.a-b-c"),
    ("dash_subtraction", "d.a - b"),
    ("dash_after_subscript", "d['a']-b"),
    ("dash_after_parens", "(d.a)-b"),
    ("dot_on_list", "[1, 2].foo"),
    ("dot_number", "1.x"),
    ("dict_method", "d.f(1, 2)"),

    // Postfix
    ("index", "l[0][1]"),
    ("slice", "l[1:2]"),
    ("slice_open", "l[:]"),
    ("slice_scoped_ambiguity", "l[a:b]"),
    ("method_call", "x->f(1)->g()"),
    ("method_lambda", "x->{a, b -> a + b}(2)"),
    ("funcref_call", "F(1)(2)"),
    ("elided_args", "f(1,,2,)"),

    // Collections and lambdas
    ("list_trailing_comma", "[1, 'a', [2],]"),
    ("dict_order", "{'b': 1, 'a': 2}"),
    ("literal_dict", "#{one-two: 1, three: 3}"),
    ("lambda", "{a, b -> a * b}"),
    ("lambda_no_params", "{-> 1}"),
    ("lambda_immediate", "{x -> x}(1)"),

    // Incomplete and malformed input
    ("incomplete_paren", "(1 +"),
    ("incomplete_list", "[1, 2,"),
    ("unterminated_string", "'abc"),
    ("int_overflow", "99999999999999999999"),
    ("deep_nesting", "[[[[[[[[[[[[[[[[1]]]]]]]]]]]]]]]]"),
];
