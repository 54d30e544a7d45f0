//! Lexer for EPICS database templates.
//!
//! This module provides a lexer that tokenizes template text into a stream
//! of tokens with their positions in the source text.

mod tokens;

pub use tokens::TokenKind;

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Returns the length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    /// Returns true if the token has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Lexer for template source text.
///
/// The lexer is an iterator over tokens. Any unrecognized characters are
/// returned as `TokenKind::Error` so that the parser can report them in place.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the text of the current token.
    #[must_use]
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        Some(Token::new(kind, range))
    }
}

/// Lex the entire source and return all tokens.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex source and return tokens paired with their text.
///
/// Useful for debugging and testing.
#[must_use]
pub fn lex_with_text(source: &str) -> Vec<(Token, &str)> {
    Lexer::new(source)
        .map(|token| (token, &source[token.range]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_basic() {
        let source = r#"field(DTYP, "asynInt32")"#;
        let tokens = lex(source);

        let non_trivia: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia.len(), 6);
        assert_eq!(non_trivia[0].kind, TokenKind::KwField);
        assert_eq!(non_trivia[1].kind, TokenKind::LParen);
        assert_eq!(non_trivia[2].kind, TokenKind::Bareword);
        assert_eq!(non_trivia[3].kind, TokenKind::Comma);
        assert_eq!(non_trivia[4].kind, TokenKind::String);
        assert_eq!(non_trivia[5].kind, TokenKind::RParen);
    }

    #[test]
    fn test_lexer_preserves_positions() {
        let source = "record(ai, x)";
        let tokens = lex(source);

        assert_eq!(tokens[0].range, TextRange::new(0.into(), 6.into()));
        assert_eq!(tokens[1].range, TextRange::new(6.into(), 7.into()));
        assert_eq!(tokens[2].range, TextRange::new(7.into(), 9.into()));
    }

    #[test]
    fn test_lex_with_text() {
        let source = "info(autosaveFields, \"VAL\")";
        let tokens = lex_with_text(source);

        let non_trivia: Vec<_> = tokens.iter().filter(|(t, _)| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia[0].1, "info");
        assert_eq!(non_trivia[2].1, "autosaveFields");
        assert_eq!(non_trivia[4].1, "\"VAL\"");
    }
}
