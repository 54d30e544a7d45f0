//! Syntax tree types for EPICS database templates.
//!
//! This module provides the `rowan`-based syntax tree implementation,
//! including the `SyntaxKind` enum that covers both tokens and composite nodes.

use crate::lexer::TokenKind;

/// All syntax node and token kinds in a database template.
///
/// The token kinds mirror `TokenKind` one to one and come first, so a kind is
/// a token exactly when it sorts at or before `Eof`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // =========================================================================
    // TOKEN KINDS (mirrors TokenKind)
    // =========================================================================
    Whitespace,
    Comment,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    KwRecord,
    KwGrecord,
    KwField,
    KwInfo,
    KwAlias,
    KwInclude,
    String,
    Macro,
    Bareword,
    Error,
    Eof,

    // =========================================================================
    // COMPOSITE NODE KINDS (produced by parser)
    // =========================================================================
    /// Root node of a template file
    SourceFile,

    /// A record declaration: `record(type, "name") { ... }`
    Record,

    /// The brace-delimited body of a record
    RecordBody,

    /// A field: `field(NAME, "value")`
    Field,

    /// An info tag: `info(NAME, "value")`
    Info,

    /// An alias: `alias("name")`
    Alias,

    /// An include directive: `include "file.template"`
    Include,

    /// A quoted string or a run of bare words and macro references
    Value,
}

const SYNTAX_KINDS: &[SyntaxKind] = &[
    SyntaxKind::Whitespace,
    SyntaxKind::Comment,
    SyntaxKind::LParen,
    SyntaxKind::RParen,
    SyntaxKind::LBrace,
    SyntaxKind::RBrace,
    SyntaxKind::Comma,
    SyntaxKind::KwRecord,
    SyntaxKind::KwGrecord,
    SyntaxKind::KwField,
    SyntaxKind::KwInfo,
    SyntaxKind::KwAlias,
    SyntaxKind::KwInclude,
    SyntaxKind::String,
    SyntaxKind::Macro,
    SyntaxKind::Bareword,
    SyntaxKind::Error,
    SyntaxKind::Eof,
    SyntaxKind::SourceFile,
    SyntaxKind::Record,
    SyntaxKind::RecordBody,
    SyntaxKind::Field,
    SyntaxKind::Info,
    SyntaxKind::Alias,
    SyntaxKind::Include,
    SyntaxKind::Value,
];

impl SyntaxKind {
    /// Returns `true` if this is a trivia kind.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns `true` if this is a token kind (not a composite node).
    #[must_use]
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::Eof as u16)
    }

    /// Returns `true` if this is a composite node kind.
    #[must_use]
    pub fn is_node(self) -> bool {
        !self.is_token()
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Whitespace => Self::Whitespace,
            TokenKind::Comment => Self::Comment,
            TokenKind::LParen => Self::LParen,
            TokenKind::RParen => Self::RParen,
            TokenKind::LBrace => Self::LBrace,
            TokenKind::RBrace => Self::RBrace,
            TokenKind::Comma => Self::Comma,
            TokenKind::KwRecord => Self::KwRecord,
            TokenKind::KwGrecord => Self::KwGrecord,
            TokenKind::KwField => Self::KwField,
            TokenKind::KwInfo => Self::KwInfo,
            TokenKind::KwAlias => Self::KwAlias,
            TokenKind::KwInclude => Self::KwInclude,
            TokenKind::String => Self::String,
            TokenKind::Macro => Self::Macro,
            TokenKind::Bareword => Self::Bareword,
            TokenKind::Error => Self::Error,
            TokenKind::Eof => Self::Eof,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The language type for database templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DbLanguage {}

impl rowan::Language for DbLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SYNTAX_KINDS
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A syntax node in the template syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<DbLanguage>;

/// A syntax token in the template syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<DbLanguage>;

/// A syntax element (either node or token) in the template syntax tree.
pub type SyntaxElement = rowan::SyntaxElement<DbLanguage>;
