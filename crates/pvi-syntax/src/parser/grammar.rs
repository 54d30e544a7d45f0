//! Grammar rules for database templates.
//!
//! Handles:
//! - `record(type, name) { ... }` and the legacy `grecord`
//! - `field(NAME, value)` / `info(NAME, value)` / `alias(name)` inside a body
//! - `include "file"`

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::Parser;

impl Parser<'_> {
    /// Parse a record declaration with an optional body.
    pub(crate) fn parse_record(&mut self) {
        self.start_node(SyntaxKind::Record);
        self.bump(); // record | grecord

        self.expect(TokenKind::LParen, "expected '('");
        self.parse_value("expected record type");
        self.expect(TokenKind::Comma, "expected ','");
        self.parse_value("expected record name");
        self.expect(TokenKind::RParen, "expected ')'");

        if self.at(TokenKind::LBrace) {
            self.parse_record_body();
        }

        self.finish_node();
    }

    fn parse_record_body(&mut self) {
        self.start_node(SyntaxKind::RecordBody);
        self.bump(); // {

        while !self.at(TokenKind::RBrace) && !self.at_end() && !self.is_sync_point() {
            match self.current() {
                TokenKind::KwField => self.parse_pair(SyntaxKind::Field, "expected field name"),
                TokenKind::KwInfo => self.parse_pair(SyntaxKind::Info, "expected info name"),
                TokenKind::KwAlias => self.parse_alias(),
                _ => {
                    self.error("expected field, info or alias");
                    self.bump();
                }
            }
        }

        self.expect(TokenKind::RBrace, "expected '}'");
        self.finish_node();
    }

    /// Parse `field(NAME, value)` or `info(NAME, value)`.
    fn parse_pair(&mut self, kind: SyntaxKind, name_message: &str) {
        self.start_node(kind);
        self.bump(); // field | info

        self.expect(TokenKind::LParen, "expected '('");
        self.parse_value(name_message);
        self.expect(TokenKind::Comma, "expected ','");
        self.parse_value("expected value");
        self.expect(TokenKind::RParen, "expected ')'");

        self.finish_node();
    }

    fn parse_alias(&mut self) {
        self.start_node(SyntaxKind::Alias);
        self.bump(); // alias

        self.expect(TokenKind::LParen, "expected '('");
        self.parse_value("expected alias name");
        self.expect(TokenKind::RParen, "expected ')'");

        self.finish_node();
    }

    /// Parse an `include "file"` directive.
    pub(crate) fn parse_include(&mut self) {
        self.start_node(SyntaxKind::Include);
        self.bump(); // include
        self.parse_value("expected include path");
        self.finish_node();
    }

    /// Parse a quoted string, or a run of bare words and macro references
    /// such as `$(P)$(R)Gain_RBV`.
    fn parse_value(&mut self, message: &str) {
        let marker = self.start();

        if self.at(TokenKind::String) {
            self.bump();
        } else if self.current().can_start_value() {
            self.bump();
            while self.current().is_unquoted_value_part() && !self.current().is_keyword() {
                self.bump();
            }
        } else {
            marker.abandon();
            self.error(message);
            return;
        }

        marker.complete(self, SyntaxKind::Value);
    }
}
