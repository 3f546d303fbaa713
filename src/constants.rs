// Parser limits
//
// Defaults for the two recursion guards and the pest call budget. The parse
// tree and the AST builder both recurse once per nesting level, so deeply
// nested input has to be rejected before it reaches either of them.

/// Default maximum nesting depth for pre-parse validation (heuristic)
///
/// Tracks the maximum depth of opening delimiters `(`, `[`, `{`. Every
/// delimiter level costs the pest parser one pass through all nine grammar
/// levels (conditional down to primary), so this is set well below the depth
/// at which pest overflows a 1MB stack.
///
/// This limit is enforced in:
/// - Parser validation (`parser.rs`: `validate_nesting_depth`)
pub const DEFAULT_MAX_PARSE_DEPTH: usize = 64;

/// Default maximum AST nesting depth (precise)
///
/// Budget for the AST builder's recursion. One unit is consumed every time the
/// builder re-enters the conditional level: parentheses, subscripts, call
/// arguments, collection elements, lambda bodies and ternary then-branches.
/// The last of these nest without delimiters, so the heuristic cannot see them.
///
/// This limit is enforced in:
/// - AST builder (`ast_builder.rs`): depth parameter passed by value
pub const DEFAULT_MAX_AST_DEPTH: usize = 96;

/// Default maximum number of pest rule invocations per parse
pub const DEFAULT_MAX_CALL_LIMIT: usize = 10_000_000;
