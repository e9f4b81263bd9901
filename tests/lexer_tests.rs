// tests/lexer_tests.rs

use sqlexpr::ast::TokenKind;
use sqlexpr::lexer::{LexError, Lexer, Position};
use std::time::{Duration, Instant};

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::tokenize(input)
        .unwrap_or_else(|e| panic!("Failed to tokenize {:?}: {}", input, e))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        (",", TokenKind::Comma),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        ("<", TokenKind::LessThan),
        (">", TokenKind::GreaterThan),
        ("=", TokenKind::Equal),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

// ============================================================================
// Two Character Tokens
// ============================================================================

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("<=", TokenKind::LessOrEqual),
        (">=", TokenKind::GreaterOrEqual),
        ("<>", TokenKind::NotEqual),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_two_char_tokens_win_over_single() {
    assert_eq!(
        kinds("< = <> >="),
        vec![
            TokenKind::LessThan,
            TokenKind::Equal,
            TokenKind::NotEqual,
            TokenKind::GreaterOrEqual,
        ]
    );
}

// ============================================================================
// Keywords and Identifiers
// ============================================================================

#[test]
fn test_keywords_ignore_case() {
    for input in ["and", "AND", "And", "aNd"] {
        assert_eq!(kinds(input), vec![TokenKind::And], "Failed for input: {}", input);
    }
    assert_eq!(kinds("NULL"), vec![TokenKind::Null]);
    assert_eq!(kinds("Like"), vec![TokenKind::Like]);
}

#[test]
fn test_identifiers() {
    let tokens = Lexer::tokenize("OrderNo _private x1 andy Größe").unwrap();
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
    let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["OrderNo", "_private", "x1", "andy", "Größe"]);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    let tokens = Lexer::tokenize("42 4533.10 0.5").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["42", "4533.10", "0.5"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Number));
}

#[test]
fn test_number_followed_by_delimiter() {
    assert_eq!(
        kinds("[1,2]"),
        vec![
            TokenKind::LBracket,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::RBracket,
        ]
    );
    assert_eq!(kinds("(1)"), vec![TokenKind::LParen, TokenKind::Number, TokenKind::RParen]);
}

#[test]
fn test_malformed_numbers() {
    for input in ["1.", "1.x", "12abc", "1.2.3"] {
        let err = Lexer::tokenize(input).unwrap_err();
        assert!(
            matches!(err, LexError::MalformedNumber { .. }),
            "Expected malformed number for {:?}, got {:?}",
            input,
            err
        );
    }
}

#[test]
fn test_strings_keep_quotes_and_escapes() {
    let tokens = Lexer::tokenize("'O''Brien' ''").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "'O''Brien'");
    assert_eq!(tokens[1].text, "''");
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::tokenize("Three = 'abc").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString { .. }));
    assert_eq!(err.position().column, 9);
}

// ============================================================================
// Errors and Positions
// ============================================================================

#[test]
fn test_unexpected_character() {
    let err = Lexer::tokenize("One == 1 && Two").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedCharacter { ch: '&', .. }));
    assert_eq!(err.position().offset, 9);
    assert_eq!(err.to_string(), "Unexpected character '&' at line 1, column 10");
}

#[test]
fn test_lexer_stops_after_error() {
    let mut lexer = Lexer::new("A ! B");
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        kinds(" \tOne\r\n=\n1 "),
        vec![TokenKind::Identifier, TokenKind::Equal, TokenKind::Number]
    );
    assert!(kinds("   ").is_empty());
}

#[test]
fn test_full_expression() {
    assert_eq!(
        kinds("Status not in ['C', 'P'] or Two is not null"),
        vec![
            TokenKind::Identifier,
            TokenKind::Not,
            TokenKind::In,
            TokenKind::LBracket,
            TokenKind::String,
            TokenKind::Comma,
            TokenKind::String,
            TokenKind::RBracket,
            TokenKind::Or,
            TokenKind::Identifier,
            TokenKind::Is,
            TokenKind::Not,
            TokenKind::Null,
        ]
    );
}

// ============================================================================
// Positions and Scaling
// ============================================================================

#[test]
fn test_positions_match_source_offsets() {
    let input = "Name = 'Zoë'\r\n\tand  Ünit <> 2\nor\nB is null";
    for token in Lexer::tokenize(input).unwrap() {
        assert_eq!(
            token.position,
            Position::locate(input, token.position.offset),
            "Failed for token: {:?}",
            token.text
        );
    }
}

#[test]
fn test_error_position_after_newlines() {
    let err = Lexer::tokenize("A = 1\nand B = 2\n  and C ; 3").unwrap_err();
    let position = err.position();
    assert_eq!((position.line, position.column), (3, 9));
}

#[test]
fn test_long_input_lexes_in_linear_time() {
    let terms = 100_000;
    let input = vec!["A = 1"; terms].join(" and\n");

    let started = Instant::now();
    let tokens = Lexer::tokenize(&input).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(tokens.len(), terms * 4 - 1);
    let last = tokens.last().unwrap();
    assert_eq!(last.position.line, terms);
    assert_eq!(last.position.column, 5);
    assert!(
        elapsed < Duration::from_secs(10),
        "Lexing {} bytes took {:?}",
        input.len(),
        elapsed
    );
}
