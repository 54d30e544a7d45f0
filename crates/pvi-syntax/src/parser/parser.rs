//! Main parser implementation.

use crate::lexer::{lex, Token, TokenKind};
use crate::parser::event::Event;
use crate::parser::sink::Sink;
use crate::parser::source::Source;
use crate::parser::{Parse, ParseError};
use crate::syntax::SyntaxKind;
use drop_bomb::DropBomb;

/// Parses template text into a syntax tree.
#[must_use]
pub fn parse(source: &str) -> Parse {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    let (events, errors) = parser.parse();

    let sink = Sink::new(&tokens, source, events);
    let green_node = sink.finish();

    Parse { green_node, errors }
}

/// The parser state.
pub(crate) struct Parser<'t> {
    pub(crate) source: Source<'t>,
    pub(crate) events: Vec<Event>,
    errors: Vec<ParseError>,
}

pub(crate) struct Marker {
    pos: usize,
    bomb: DropBomb,
}

impl Marker {
    pub(crate) fn complete(mut self, parser: &mut Parser<'_>, kind: SyntaxKind) {
        self.bomb.defuse();
        parser.events[self.pos] = Event::start(kind);
        parser.events.push(Event::Finish);
    }

    /// Drop the marker without creating a node; its placeholder is skipped.
    pub(crate) fn abandon(mut self) {
        self.bomb.defuse();
    }
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            source: Source::new(tokens),
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> (Vec<Event>, Vec<ParseError>) {
        self.start_node(SyntaxKind::SourceFile);

        while !self.at_end() {
            if self.at(TokenKind::KwRecord) || self.at(TokenKind::KwGrecord) {
                self.parse_record();
            } else if self.at(TokenKind::KwInclude) {
                self.parse_include();
            } else {
                // Error recovery: skip unknown token
                self.error("expected record or include");
                self.bump();
            }
        }

        self.finish_node();

        (self.events, self.errors)
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    pub(crate) fn current(&self) -> TokenKind {
        self.source.current()
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.source.current() == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.source.at_end()
    }

    pub(crate) fn bump(&mut self) {
        let kind = self.source.current();
        self.events.push(Event::token(SyntaxKind::from(kind)));
        self.source.bump();
    }

    /// Consume `kind` if present, otherwise report `message` and leave the
    /// token for the caller.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error(message);
            false
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            bomb: DropBomb::new("uncompleted marker"),
        }
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.events.push(Event::start(kind));
    }

    pub(crate) fn finish_node(&mut self) {
        self.events.push(Event::Finish);
    }

    pub(crate) fn error(&mut self, message: &str) {
        let range = self
            .source
            .current_token()
            .map(|t| t.range)
            .or_else(|| {
                self.source
                    .last_token()
                    .map(|t| text_size::TextRange::empty(t.range.end()))
            })
            .unwrap_or_else(|| text_size::TextRange::empty(text_size::TextSize::from(0)));

        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    /// Returns true if the current token starts a new top-level item.
    pub(crate) fn is_sync_point(&self) -> bool {
        matches!(
            self.current(),
            TokenKind::KwRecord | TokenKind::KwGrecord | TokenKind::KwInclude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let parse = parse("");
        assert!(parse.ok());
        assert_eq!(parse.syntax().kind(), SyntaxKind::SourceFile);
    }

    #[test]
    fn test_parse_simple_record() {
        let source = r#"record(ai, "$(P)Temp") { field(DTYP, "asynFloat64") }"#;
        let parse = parse(source);
        assert!(parse.ok(), "errors: {:?}", parse.errors());
    }

    #[test]
    fn test_parse_is_lossless() {
        let source = r#"
# Leading comment
record(bo, "$(P)Go")
{
    field(OUT, "@asyn($(PORT),0)GO")   # trailing
#    field(PINI, "YES")
    info(autosaveFields, "VAL")
}

include "other.template"
"#;
        let parse = parse(source);
        assert!(parse.ok(), "errors: {:?}", parse.errors());
        assert_eq!(parse.syntax().to_string(), source);
    }

    #[test]
    fn test_record_without_body() {
        let parse = parse("record(ai, \"x\")\nrecord(bi, \"y\") {}");
        assert!(parse.ok(), "errors: {:?}", parse.errors());
        let records: Vec<_> = parse
            .syntax()
            .children()
            .filter(|n| n.kind() == SyntaxKind::Record)
            .collect();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_closing_brace_recovers_at_next_record() {
        let source = "record(ai, \"a\") {\n field(DESC, \"x\")\nrecord(bi, \"b\") {}\n";
        let parse = parse(source);
        assert!(parse
            .errors()
            .iter()
            .any(|error| error.message == "expected '}'"));
        let records = parse
            .syntax()
            .children()
            .filter(|n| n.kind() == SyntaxKind::Record)
            .count();
        assert_eq!(records, 2);
        assert_eq!(parse.syntax().to_string(), source);
    }
}
