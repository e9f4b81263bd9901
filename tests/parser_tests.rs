// tests/parser_tests.rs

use rust_decimal::Decimal;
use sqlexpr::ast::{BinaryOperator, Constant, Expr, UnaryOperator};
use sqlexpr::lexer::Lexer;
use sqlexpr::parser::{MAX_DEPTH, ParseError, Parser, parse_where};

fn parse(input: &str) -> Expr {
    parse_where(input).unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", input, e))
}

/// Call-notation rendering, the easiest way to assert tree shape.
fn tree(input: &str) -> String {
    parse(input).to_string()
}

fn prop(name: &str) -> Expr {
    Expr::property(name)
}

fn num(n: i64) -> Expr {
    Expr::Constant(Constant::from(n))
}

// ============================================================================
// Literals and Items
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(parse("'abc'"), Expr::Constant(Constant::Str("abc".into())));
    assert_eq!(parse("'O''Brien'"), Expr::Constant(Constant::Str("O'Brien".into())));
    assert_eq!(parse("true"), Expr::Constant(Constant::Bool(true)));
    assert_eq!(parse("FALSE"), Expr::Constant(Constant::Bool(false)));
    assert_eq!(parse("null"), Expr::Constant(Constant::Null));
    assert_eq!(parse("4533.10"), Expr::Constant(Constant::Number(Decimal::new(453310, 2))));
}

#[test]
fn test_number_keeps_scale() {
    let Expr::Constant(Constant::Number(n)) = parse("4533.10") else {
        panic!("Expected a number");
    };
    assert_eq!(n.to_string(), "4533.10");
}

#[test]
fn test_property() {
    assert_eq!(parse("OrderNo"), prop("OrderNo"));
}

#[test]
fn test_array() {
    assert_eq!(
        parse("One in [1, 2, 4]"),
        Expr::binary(
            BinaryOperator::In,
            prop("One"),
            Expr::Array(vec![Constant::from(1i64), Constant::from(2i64), Constant::from(4i64)]),
        )
    );
    assert_eq!(tree("A in ['x']"), "In(A, ('x'))");
    assert_eq!(tree("A in [null, true]"), "In(A, (null, true))");
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_comparison_operators() {
    let test_cases = vec![
        ("A = 1", BinaryOperator::Equal),
        ("A <> 1", BinaryOperator::NotEqual),
        ("A < 1", BinaryOperator::LessThan),
        ("A <= 1", BinaryOperator::LessOrEqual),
        ("A > 1", BinaryOperator::GreaterThan),
        ("A >= 1", BinaryOperator::GreaterOrEqual),
    ];

    for (input, op) in test_cases {
        assert_eq!(
            parse(input),
            Expr::binary(op, prop("A"), num(1)),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_constant_on_the_left() {
    assert_eq!(parse("2 <= One"), Expr::binary(BinaryOperator::LessOrEqual, num(2), prop("One")));
}

#[test]
fn test_like_and_not_like() {
    assert_eq!(tree("Three like 'three%'"), "Like(Three, 'three%')");
    assert_eq!(tree("Three not like 'three%'"), "NotLike(Three, 'three%')");
    assert_eq!(tree("Three NOT LIKE 'x'"), "NotLike(Three, 'x')");
}

#[test]
fn test_in_and_not_in() {
    assert_eq!(tree("Status not in ['C', 'P']"), "NotIn(Status, ('C', 'P'))");
}

#[test]
fn test_comparisons_fold_left() {
    assert_eq!(tree("A = B = C"), "Equal(Equal(A, B), C)");
}

// ============================================================================
// Operands: not, is null, is not null
// ============================================================================

#[test]
fn test_null_tests() {
    assert_eq!(
        parse("Two is null"),
        Expr::unary(UnaryOperator::IsNull, prop("Two"))
    );
    assert_eq!(tree("Two is not null"), "IsNotNull(Two)");
    assert_eq!(tree("Two IS NOT NULL and One = 1"), "And(IsNotNull(Two), Equal(One, 1))");
}

#[test]
fn test_not_binds_to_factor() {
    assert_eq!(tree("not A = 1"), "Equal(Not(A), 1)");
    assert_eq!(tree("not (A = 1)"), "Not(Equal(A, 1))");
    assert_eq!(tree("not On"), "Not(On)");
}

#[test]
fn test_not_with_null_test() {
    assert_eq!(tree("not A is null"), "IsNull(Not(A))");
}

// ============================================================================
// Connectives and Precedence
// ============================================================================

#[test]
fn test_and_or_fold_left_with_equal_precedence() {
    assert_eq!(tree("A or B and C"), "And(Or(A, B), C)");
    assert_eq!(tree("A and B or C"), "Or(And(A, B), C)");
    assert_eq!(tree("A and B and C"), "And(And(A, B), C)");
}

#[test]
fn test_parentheses_override_grouping() {
    assert_eq!(tree("A or (B and C)"), "Or(A, And(B, C))");
    assert_eq!(
        tree("One = 1 and (Three = 'one' or Three like 'three%')"),
        "And(Equal(One, 1), Or(Equal(Three, 'one'), Like(Three, 'three%')))"
    );
}

#[test]
fn test_comparison_binds_tighter_than_connectives() {
    assert_eq!(
        tree("OrderDate is null or OrderDate >= '2021-01-01' and OrderDate <= '2022-01-01'"),
        "And(Or(IsNull(OrderDate), GreaterOrEqual(OrderDate, '2021-01-01')), LessOrEqual(OrderDate, '2022-01-01'))"
    );
}

// ============================================================================
// Errors
// ============================================================================

fn syntax_error(input: &str) -> (&'static str, String, usize) {
    match parse_where(input) {
        Err(ParseError::Syntax {
            expected,
            found,
            position,
        }) => (expected, found, position.column),
        other => panic!("Expected a syntax error for {:?}, got {:?}", input, other),
    }
}

#[test]
fn test_truncated_comparison() {
    let (expected, found, column) = syntax_error("One = ");
    assert_eq!(expected, "expression");
    assert_eq!(found, "end of input");
    assert_eq!(column, 7);
}

#[test]
fn test_missing_close_paren() {
    let (expected, _, _) = syntax_error("(A = 1");
    assert_eq!(expected, "`)`");
}

#[test]
fn test_empty_array() {
    let (expected, found, _) = syntax_error("A in []");
    assert_eq!(expected, "literal");
    assert_eq!(found, "`]`");
}

#[test]
fn test_unclosed_array() {
    let (expected, _, _) = syntax_error("A in [1, 2");
    assert_eq!(expected, "`,` or `]`");
}

#[test]
fn test_property_in_array() {
    let (expected, found, _) = syntax_error("A in [B]");
    assert_eq!(expected, "literal");
    assert_eq!(found, "`B`");
}

#[test]
fn test_is_without_null() {
    let (expected, _, _) = syntax_error("A is 1");
    assert_eq!(expected, "`null` or `not null`");
    let (expected, _, _) = syntax_error("A is not 1");
    assert_eq!(expected, "`null`");
}

#[test]
fn test_trailing_tokens() {
    let (expected, found, column) = syntax_error("A = 1 B");
    assert_eq!(expected, "end of input");
    assert_eq!(found, "`B`");
    assert_eq!(column, 7);
}

#[test]
fn test_operand_expected_where_operator_found() {
    let (expected, found, _) = syntax_error("= 1");
    assert_eq!(expected, "expression");
    assert_eq!(found, "`=`");
}

#[test]
fn test_empty_input() {
    let (expected, found, _) = syntax_error("");
    assert_eq!(expected, "expression");
    assert_eq!(found, "end of input");
}

#[test]
fn test_reserved_ci_keyword() {
    let (_, found, _) = syntax_error("ci = 1");
    assert_eq!(found, "`ci`");
}

#[test]
fn test_lexical_errors_surface_through_parser() {
    let err = parse_where("One = 1.").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert!(err.to_string().starts_with("Lexical error:"));
}

#[test]
fn test_number_too_large_for_decimal() {
    let err = parse_where("A = 123456789012345678901234567890123").unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { .. }));
}

// ============================================================================
// Parser API
// ============================================================================

#[test]
fn test_parser_from_lexer() {
    let mut parser = Parser::new(Lexer::new("One = 1")).unwrap();
    let expr = parser.parse().unwrap();
    assert_eq!(expr, Expr::binary(BinaryOperator::Equal, prop("One"), num(1)));
}

#[test]
fn test_parser_new_reports_lexical_errors() {
    assert!(matches!(Parser::new(Lexer::new("'open")), Err(ParseError::Lex(_))));
}

// ============================================================================
// Nesting Limits
// ============================================================================

fn chain(terms: usize) -> String {
    vec!["A = 1"; terms].join(" and ")
}

fn too_deep(input: &str) -> bool {
    matches!(parse_where(input), Err(ParseError::TooDeep { limit, .. }) if limit == MAX_DEPTH)
}

#[test]
fn test_long_chains_within_limit() {
    // `A = 1` is two levels; each further term adds one
    assert!(parse_where(&chain(MAX_DEPTH - 1)).is_ok());
    assert!(too_deep(&chain(MAX_DEPTH)));
}

#[test]
fn test_very_long_chain_is_an_error() {
    assert!(too_deep(&chain(100_000)));
}

#[test]
fn test_nested_parentheses_limit() {
    let nested = |depth: usize| format!("{}A{}", "(".repeat(depth), ")".repeat(depth));

    assert_eq!(tree(&nested(MAX_DEPTH)), "A");
    assert!(too_deep(&nested(MAX_DEPTH + 1)));
    assert!(too_deep(&nested(100_000)));
}

#[test]
fn test_too_deep_reports_position() {
    let err = parse_where(&format!("{}A", "(".repeat(MAX_DEPTH + 1))).unwrap_err();
    assert_eq!(err.position().column, MAX_DEPTH + 1);
    assert_eq!(
        err.to_string(),
        format!(
            "Expression at line 1, column {} nests deeper than {} levels",
            MAX_DEPTH + 1,
            MAX_DEPTH
        )
    );
}
