use super::*;

fn token(kind: TokenKind, line: usize) -> Token {
    Token { kind, line }
}

fn stream() -> TokenStream {
    TokenStream::new(vec![
        token(TokenKind::BlockStart, 1),
        token(TokenKind::Name("sheet".to_string()), 1),
        token(TokenKind::BlockEnd, 2),
    ])
}

#[test]
fn appends_eof() {
    let mut stream = stream();
    stream.skip(10);
    assert!(stream.is_eof());
    assert_eq!(stream.current().line, 2);

    // Stays on the end.
    stream.next();
    assert!(stream.is_eof());
}

#[test]
fn expect_tokens() {
    let mut stream = stream();
    stream.expect(TokenKind::BlockStart).unwrap();
    assert!(stream.test_name("sheet"));
    stream.expect_keyword("sheet").unwrap();
    assert_eq!(stream.remaining().len(), 2);
    stream.expect(TokenKind::BlockEnd).unwrap();
}

#[test]
fn expect_mismatch() {
    let mut stream = stream();
    let err = stream.expect_name().unwrap_err();
    assert_eq!(err.message, "Unexpected token \"{%\" (expected \"name\").");
    assert_eq!(err.line, Some(1));

    stream.next();
    let err = stream.expect(TokenKind::Comma).unwrap_err();
    assert_eq!(err.message, "Unexpected token \"sheet\" (expected \",\").");
}

#[test]
fn expect_at_end() {
    let mut stream = TokenStream::new(Vec::new());
    let err = stream.expect_keyword("endif").unwrap_err();
    assert_eq!(err.message, "Unexpected end of template.");
    assert_eq!(err.line, Some(1));
}
