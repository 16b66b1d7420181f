// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::ops::Range;

use chumsky::{
    error::Simple,
    primitive::{choice, end, filter, just, one_of},
    text::{self, TextParser},
    Parser,
};

use crate::error::SyntaxError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text(String),
    VarStart,
    VarEnd,
    BlockStart,
    BlockEnd,
    Name(String),
    String(String),
    Integer(i64),
    Real(String),
    Dot,
    Comma,
    Colon,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Eq,
    Ne,
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn test_name(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Name(value) if value == name)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Text(value) => write!(f, "text {:?}", value),
            TokenKind::VarStart => f.write_str("{{"),
            TokenKind::VarEnd => f.write_str("}}"),
            TokenKind::BlockStart => f.write_str("{%"),
            TokenKind::BlockEnd => f.write_str("%}"),
            TokenKind::Name(name) => f.write_str(name),
            TokenKind::String(value) => write!(f, "{:?}", value),
            TokenKind::Integer(i) => write!(f, "{}", i),
            TokenKind::Real(string) => f.write_str(string),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Eq => f.write_str("=="),
            TokenKind::Ne => f.write_str("!="),
            TokenKind::Eof => f.write_str("end of template"),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum TagKind {
    Variable,
    Block,
    Comment,
}

/// Splits template source into text and tag tokens.
///
/// Tag interiors are lexed with a chumsky lexer. The surrounding scan only
/// looks for tag delimiters and applies whitespace control.
pub struct Lexer {
    lexer: Box<dyn Parser<char, Vec<(TokenKind, Range<usize>)>, Error = Simple<char>>>,
}

impl Lexer {
    pub fn new() -> Lexer {
        Lexer {
            lexer: Box::new(gen_lexer()),
        }
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, SyntaxError> {
        let run = LexerRun::new(self, source);
        run.run()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

struct LexerRun<'a> {
    lexer: &'a Lexer,
    source: &'a str,
    line_starts: Vec<usize>,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> LexerRun<'a> {
    fn new(lexer: &'a Lexer, source: &'a str) -> LexerRun<'a> {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(index, _)| index + 1));
        LexerRun {
            lexer,
            source,
            line_starts,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some((start, tag)) = self.next_tag() {
            let trim_before = self.source[start + 2..].starts_with('-');

            // Add text preceding the tag.
            let mut text = &self.source[self.pos..start];
            if trim_before {
                text = text.trim_end();
            }
            self.push_text(self.pos, text);

            let inner_start = start + 2 + usize::from(trim_before);
            match tag {
                TagKind::Comment => self.lex_comment(start, inner_start)?,
                TagKind::Variable => self.lex_tag(start, inner_start, "}}", TokenKind::VarStart, TokenKind::VarEnd)?,
                TagKind::Block => self.lex_tag(start, inner_start, "%}", TokenKind::BlockStart, TokenKind::BlockEnd)?,
            }
        }

        // Add trailing text.
        let text = &self.source[self.pos..];
        self.push_text(self.pos, text);

        let line = self.line_at(self.source.len());
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line,
        });
        Ok(self.tokens)
    }

    fn next_tag(&self) -> Option<(usize, TagKind)> {
        let mut offset = self.pos;
        while let Some(index) = self.source[offset..].find('{') {
            let start = offset + index;
            match self.source.as_bytes().get(start + 1) {
                Some(b'{') => return Some((start, TagKind::Variable)),
                Some(b'%') => return Some((start, TagKind::Block)),
                Some(b'#') => return Some((start, TagKind::Comment)),
                _ => offset = start + 1,
            }
        }
        None
    }

    fn lex_comment(&mut self, start: usize, inner_start: usize) -> Result<(), SyntaxError> {
        let Some(index) = self.source[inner_start..].find("#}") else {
            return Err(SyntaxError::at("Unclosed comment", self.line_at(start)));
        };

        let close = inner_start + index;
        let trim_after = close > inner_start && self.source.as_bytes()[close - 1] == b'-';
        self.finish_tag(close + 2, trim_after, true);
        Ok(())
    }

    fn lex_tag(
        &mut self,
        start: usize,
        inner_start: usize,
        delimiter: &str,
        start_kind: TokenKind,
        end_kind: TokenKind,
    ) -> Result<(), SyntaxError> {
        let line = self.line_at(start);
        let Some(close) = self.find_close(inner_start, delimiter) else {
            let what = if start_kind == TokenKind::BlockStart { "block" } else { "variable" };
            return Err(SyntaxError::at(format!("Unclosed \"{}\"", what), line));
        };

        let trim_after = close > inner_start && self.source.as_bytes()[close - 1] == b'-';
        let inner_end = if trim_after { close - 1 } else { close };
        let is_block = start_kind == TokenKind::BlockStart;

        self.tokens.push(Token { kind: start_kind, line });
        self.lex_inner(inner_start, inner_end)?;
        self.tokens.push(Token {
            kind: end_kind,
            line: self.line_at(close),
        });

        self.finish_tag(close + delimiter.len(), trim_after, is_block);
        Ok(())
    }

    // Finds the closing delimiter of a tag, skipping over string literals and
    // balanced braces (so hash literals can sit inside `{{ }}`).
    fn find_close(&self, inner_start: usize, delimiter: &str) -> Option<usize> {
        let rest = &self.source[inner_start..];
        let mut quote = None;
        let mut escaped = false;
        let mut depth = 0usize;

        for (index, c) in rest.char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            if depth == 0 && rest[index..].starts_with(delimiter) {
                return Some(inner_start + index);
            }

            match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        None
    }

    fn lex_inner(&mut self, inner_start: usize, inner_end: usize) -> Result<(), SyntaxError> {
        let inner = &self.source[inner_start..inner_end];

        let tokens = match self.lexer.lexer.parse(inner) {
            Ok(tokens) => tokens,
            Err(errs) => {
                for err in &errs {
                    tracing::debug!(error = %err, "lex error");
                }
                let err = match errs.into_iter().next() {
                    Some(err) => {
                        let offset = Self::byte_offset(inner, err.span().start);
                        SyntaxError::at(err.to_string(), self.line_at(inner_start + offset))
                    }
                    None => SyntaxError::at("invalid tag contents", self.line_at(inner_start)),
                };
                return Err(err);
            }
        };

        for (kind, span) in tokens {
            let offset = Self::byte_offset(inner, span.start);
            let line = self.line_at(inner_start + offset);
            self.tokens.push(Token { kind, line });
        }
        Ok(())
    }

    fn finish_tag(&mut self, end: usize, trim_after: bool, drop_newline: bool) {
        let rest = &self.source[end..];
        self.pos = end;
        if trim_after {
            self.pos += rest.len() - rest.trim_start().len();
        } else if drop_newline {
            if rest.starts_with("\r\n") {
                self.pos += 2;
            } else if rest.starts_with('\n') {
                self.pos += 1;
            }
        }
    }

    fn push_text(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let line = self.line_at(offset);
        self.tokens.push(Token {
            kind: TokenKind::Text(text.to_string()),
            line,
        });
    }

    // 1-based line of a byte offset.
    fn line_at(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    // chumsky spans count chars, not bytes.
    fn byte_offset(string: &str, char_index: usize) -> usize {
        string
            .char_indices()
            .nth(char_index)
            .map(|(index, _)| index)
            .unwrap_or(string.len())
    }
}

fn gen_lexer() -> impl Parser<char, Vec<(TokenKind, Range<usize>)>, Error = Simple<char>> {
    let frac = just('.').chain(text::digits(10));

    let exp = just('e')
        .or(just('E'))
        .chain(just('+').or(just('-')).or_not())
        .chain::<char, _, _>(text::digits(10));

    let number = just('-')
        .or_not()
        .chain::<char, _, _>(text::int(10))
        .chain::<char, _, _>(frac.or_not().flatten())
        .chain::<char, _, _>(exp.or_not().flatten())
        .collect::<String>()
        .map(|string| match string.parse::<i64>() {
            Ok(i) => TokenKind::Integer(i),
            Err(_) => TokenKind::Real(string),
        })
        .labelled("number");

    let escape = just('\\').ignore_then(
        just('\\')
            .or(just('/'))
            .or(just('"'))
            .or(just('\''))
            .or(just('b').to('\x08'))
            .or(just('f').to('\x0C'))
            .or(just('n').to('\n'))
            .or(just('r').to('\r'))
            .or(just('t').to('\t'))
            .or(just('u').ignore_then(
                filter(|c: &char| c.is_ascii_hexdigit())
                    .repeated()
                    .exactly(4)
                    .collect::<String>()
                    .validate(|digits, span, emit| {
                        u32::from_str_radix(&digits, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or_else(|| {
                                emit(Simple::custom(span, "invalid unicode character"));
                                '\u{FFFD}' // unicode replacement character
                            })
                    }),
            )),
    );

    let double_quoted = just('"')
        .ignore_then(filter(|c: &char| *c != '\\' && *c != '"').or(escape.clone()).repeated())
        .then_ignore(just('"'));

    let single_quoted = just('\'')
        .ignore_then(filter(|c: &char| *c != '\\' && *c != '\'').or(escape).repeated())
        .then_ignore(just('\''));

    let string = double_quoted
        .or(single_quoted)
        .collect::<String>()
        .map(TokenKind::String)
        .labelled("string");

    let ident = text::ident().map(TokenKind::Name);

    let op = one_of("!=")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|s, span| match s.as_str() {
            "==" => Ok(TokenKind::Eq),
            "!=" => Ok(TokenKind::Ne),
            _ => Err(Simple::custom(span, format!("unknown operator {}", s))),
        });

    let ctrl = choice((
        just('.').to(TokenKind::Dot),
        just(',').to(TokenKind::Comma),
        just(':').to(TokenKind::Colon),
        just('[').to(TokenKind::LBracket),
        just(']').to(TokenKind::RBracket),
        just('{').to(TokenKind::LBrace),
        just('}').to(TokenKind::RBrace),
        just('(').to(TokenKind::LParen),
        just(')').to(TokenKind::RParen),
    ));

    let token = choice((string, number, ident, ctrl, op));

    let tokens = token.map_with_span(|tok, span| (tok, span)).padded().repeated();

    text::whitespace().ignore_then(tokens).then_ignore(end())
}
