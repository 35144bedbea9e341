use super::*;

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn scans_simple_select() {
    let (tokens, diags) = scan("SELECT id, name FROM users;");
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[0].value, Value::Text("SELECT".to_string()));
}

#[test]
fn keyword_matching_is_case_insensitive() {
    let (tokens, _) = scan("select Id from Users");
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[0].value, Value::Text("SELECT".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::Keyword);
    assert_eq!(tokens[2].value, Value::Text("FROM".to_string()));
}

#[test]
fn single_quoted_strings_resolve_doubled_quotes() {
    let (tokens, diags) = scan("'it''s fine'");
    assert!(diags.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, Value::Text("it's fine".to_string()));
}

#[test]
fn unclosed_string_produces_diagnostic() {
    let (tokens, diags) = scan("'unterminated");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().message, "unclosed string literal");
    assert_eq!(tokens[0].kind, TokenKind::String);
}

#[test]
fn unclosed_string_stops_at_newline() {
    let (_, diags) = scan("'abc\ndef'");
    assert_eq!(diags.len(), 1);
}

#[test]
fn integer_and_float_literals() {
    let (tokens, diags) = scan("42 3.14");
    assert!(diags.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, Value::Integer(42));
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, Value::Float(3.14));
}

#[test]
fn multiple_decimal_points_is_a_diagnostic() {
    let (tokens, diags) = scan("1.2.5");
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags.iter().next().unwrap().message,
        "invalid number: multiple decimal points"
    );
    assert_eq!(tokens[0].kind, TokenKind::Integer);
}

#[test]
fn dash_comment_runs_to_end_of_line() {
    let (tokens, diags) = scan("SELECT 1 -- trailing note\nFROM t;");
    assert!(diags.is_empty());
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Keyword,
            TokenKind::Integer,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn hash_comment_unterminated_at_eof_is_diagnostic() {
    let (_, diags) = scan("SELECT 1 ## dangling to eof");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().message, "unclosed comment");
}

#[test]
fn hash_comment_terminated_by_newline_is_clean() {
    let (_, diags) = scan("## fine\nSELECT 1;");
    assert!(diags.is_empty());
}

#[test]
fn multi_char_comparison_operators() {
    let (tokens, diags) = scan("<= >= <> != < > =");
    assert!(diags.is_empty());
    assert!(tokens[..7].iter().all(|t| t.kind == TokenKind::Comparison));
}

#[test]
fn double_pipe_is_concatenation_operator() {
    let (tokens, diags) = scan("a || b");
    assert!(diags.is_empty());
    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[1].lexeme, "||");
}

#[test]
fn lone_bang_is_invalid() {
    let (_, diags) = scan("a ! b");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().message, "invalid character '!'");
}

#[test]
fn invalid_character_is_reported_and_skipped() {
    let (tokens, diags) = scan("a @ b");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().message, "invalid character '@'");
    assert_eq!(kinds(&tokens), vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]);
}

#[test]
fn position_tracks_lines_and_columns() {
    let (tokens, _) = scan("SELECT 1\nFROM t;");
    assert_eq!(tokens[0].position.line, 1);
    assert_eq!(tokens[0].position.column, 1);
    let from = tokens.iter().find(|t| t.lexeme.eq_ignore_ascii_case("from")).unwrap();
    assert_eq!(from.position.line, 2);
    assert_eq!(from.position.column, 1);
}

#[test]
fn always_ends_with_a_single_eof_token() {
    let (tokens, _) = scan("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);

    let (tokens, _) = scan("SELECT 1;");
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
}

#[test]
fn dot_is_its_own_token_for_qualified_columns() {
    let (tokens, diags) = scan("t.id");
    assert!(diags.is_empty());
    assert_eq!(kinds(&tokens), vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier, TokenKind::Eof]);
}

#[test]
fn scanning_is_idempotent() {
    let source = "SELECT a, b FROM t WHERE a = 1 AND b <> 'x';";
    let (tokens1, diags1) = scan(source);
    let (tokens2, diags2) = scan(source);
    assert_eq!(tokens1, tokens2);
    assert_eq!(diags1.into_vec(), diags2.into_vec());
}
