//! Token definitions for EPICS database templates.
//!
//! The token set covers the `record`/`field`/`info` grammar used by `.db` and
//! `.template` files, plus macro references and `include` directives.

use logos::Logos;

/// All token kinds in an EPICS database template.
///
/// Token kinds are divided into categories:
/// - Trivia (whitespace, comments) - preserved but not semantically significant
/// - Punctuation
/// - Keywords
/// - Values (quoted strings, macro references, bare words)
/// - Special tokens (errors, EOF)
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u16)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Whitespace (spaces, tabs, newlines)
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// Line comment: `# ...`
    ///
    /// A commented-out `field(...)` or `record(...)` line lexes as a single
    /// comment and never reaches the parser.
    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `,`
    #[token(",")]
    Comma,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// `record`
    #[token("record")]
    KwRecord,

    /// `grecord` (legacy spelling of `record`)
    #[token("grecord")]
    KwGrecord,

    /// `field`
    #[token("field")]
    KwField,

    /// `info`
    #[token("info")]
    KwInfo,

    /// `alias`
    #[token("alias")]
    KwAlias,

    /// `include`
    #[token("include")]
    KwInclude,

    // =========================================================================
    // VALUES
    // =========================================================================
    /// Double quoted string with backslash escapes.
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    String,

    /// Macro reference: `$(NAME)`, `$(NAME=default)` or `${NAME}`
    #[regex(r"\$\([^)\r\n]*\)")]
    #[regex(r"\$\{[^}\r\n]*\}")]
    Macro,

    /// Unquoted word such as a record type or a bare field value.
    #[regex(r"[A-Za-z0-9_\-+:.\[\]<>;/=@*&%!?|^~']+")]
    Bareword,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Unrecognized input
    #[default]
    Error,

    /// End of file
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is trivia (whitespace or comment).
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns `true` if this token is a keyword.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::KwRecord
                | Self::KwGrecord
                | Self::KwField
                | Self::KwInfo
                | Self::KwAlias
                | Self::KwInclude
        )
    }

    /// Returns `true` if this token can start a value.
    ///
    /// Keywords are accepted too: `field(info, "x")` is legal in a template
    /// body, just unusual.
    #[must_use]
    pub fn can_start_value(self) -> bool {
        matches!(self, Self::String | Self::Macro | Self::Bareword) || self.is_keyword()
    }

    /// Returns `true` if this token can continue an unquoted value.
    #[must_use]
    pub fn is_unquoted_value_part(self) -> bool {
        matches!(self, Self::Macro | Self::Bareword) || self.is_keyword()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords_win_over_barewords() {
        assert_eq!(
            kinds("record grecord field info alias include recordx"),
            vec![
                TokenKind::KwRecord,
                TokenKind::KwGrecord,
                TokenKind::KwField,
                TokenKind::KwInfo,
                TokenKind::KwAlias,
                TokenKind::KwInclude,
                TokenKind::Bareword,
            ]
        );
    }

    #[test]
    fn test_macro_prefixed_name() {
        assert_eq!(
            kinds("$(P)$(R)Gain_RBV"),
            vec![TokenKind::Macro, TokenKind::Macro, TokenKind::Bareword]
        );
        assert_eq!(kinds("${P}"), vec![TokenKind::Macro]);
        assert_eq!(kinds("$(ADDR=0)"), vec![TokenKind::Macro]);
    }

    #[test]
    fn test_string_with_escapes() {
        let tokens = lex(r#""say \"hi\"""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
    }

    #[test]
    fn test_commented_field_is_one_comment() {
        let tokens = lex("#field(PINI, \"YES\")\n");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert_eq!(kinds("\"abc")[0], TokenKind::Error);
    }
}
