// tests/order_by_tests.rs

use sqlexpr::ast::{OrderByTerm, SortDirection};
use sqlexpr::order_by::compile_to_string;
use sqlexpr::{ParseError, parse_order_by};

fn orders(property: &str) -> Result<String, String> {
    Ok(format!("\"Orders\".\"{}\"", property))
}

fn compile(input: &str) -> String {
    let clause =
        parse_order_by(input).unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", input, e));
    compile_to_string(&clause, orders).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_default_direction_is_ascending() {
    let clause = parse_order_by("OrderNo").unwrap();
    assert_eq!(
        clause.terms,
        vec![OrderByTerm {
            property: "OrderNo".to_string(),
            direction: SortDirection::Ascending,
        }]
    );
}

#[test]
fn test_directions_ignore_case() {
    let clause = parse_order_by("A ASC, B Desc, C desc").unwrap();
    let directions: Vec<SortDirection> = clause.terms.iter().map(|t| t.direction).collect();
    assert_eq!(
        directions,
        vec![SortDirection::Ascending, SortDirection::Descending, SortDirection::Descending]
    );
}

#[test]
fn test_empty_clause() {
    assert!(parse_order_by("").unwrap().is_empty());
    assert!(parse_order_by("   ").unwrap().is_empty());
}

// ============================================================================
// Compiling
// ============================================================================

#[test]
fn test_compile() {
    let test_cases = vec![
        ("OrderNo", "\"Orders\".\"OrderNo\""),
        ("OrderNo asc", "\"Orders\".\"OrderNo\""),
        ("OrderNo desc", "\"Orders\".\"OrderNo\" desc"),
        (
            "OrderNo asc, OrderDate desc",
            "\"Orders\".\"OrderNo\", \"Orders\".\"OrderDate\" desc",
        ),
        (
            "OrderNo,OrderDate,Charge desc",
            "\"Orders\".\"OrderNo\", \"Orders\".\"OrderDate\", \"Orders\".\"Charge\" desc",
        ),
        ("", ""),
    ];

    for (input, expected) in test_cases {
        assert_eq!(compile(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_mapper_error_is_returned_unchanged() {
    let clause = parse_order_by("OrderNo, Secret desc").unwrap();
    let result = compile_to_string(&clause, |name| {
        if name == "Secret" {
            Err(format!("Unknown property of {}", name))
        } else {
            Ok(name.to_string())
        }
    });
    assert_eq!(result, Err("Unknown property of Secret".to_string()));
}

// ============================================================================
// Errors
// ============================================================================

fn syntax_error(input: &str) -> (&'static str, String) {
    match parse_order_by(input) {
        Err(ParseError::Syntax { expected, found, .. }) => (expected, found),
        other => panic!("Expected a syntax error for {:?}, got {:?}", input, other),
    }
}

#[test]
fn test_trailing_comma() {
    assert_eq!(syntax_error("OrderNo,"), ("property", "end of input".to_string()));
}

#[test]
fn test_leading_direction() {
    assert_eq!(syntax_error("desc"), ("property", "`desc`".to_string()));
}

#[test]
fn test_missing_comma() {
    assert_eq!(syntax_error("A B"), ("`,` or end of input", "`B`".to_string()));
    assert_eq!(syntax_error("A asc desc"), ("`,` or end of input", "`desc`".to_string()));
}

#[test]
fn test_unexpected_character() {
    let err = parse_order_by("OrderNo; drop").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert_eq!(err.position().column, 8);
}
