//! Sink for converting parser events into a syntax tree.
//!
//! The sink takes the flat event stream and builds a `rowan` green tree.
//! Trivia in front of a node is attached to its parent, so a node's text
//! range starts at its first significant token.

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax::SyntaxKind;

/// Builds a syntax tree from parser events.
pub struct Sink<'t, 'src> {
    tokens: &'t [Token],
    source: &'src str,
    events: Vec<Event>,
    cursor: usize,
    builder: rowan::GreenNodeBuilder<'static>,
}

impl<'t, 'src> Sink<'t, 'src> {
    /// Creates a new sink.
    pub fn new(tokens: &'t [Token], source: &'src str, events: Vec<Event>) -> Self {
        Self {
            tokens,
            source,
            events,
            cursor: 0,
            builder: rowan::GreenNodeBuilder::new(),
        }
    }

    /// Consumes the sink and returns the green tree.
    pub fn finish(mut self) -> rowan::GreenNode {
        let last = self.events.len().saturating_sub(1);
        let events = std::mem::take(&mut self.events);

        for (index, event) in events.into_iter().enumerate() {
            match event {
                Event::Start { kind } => {
                    if index > 0 {
                        self.eat_trivia();
                    }
                    self.builder.start_node(kind.into());
                }
                Event::Token { kind } => {
                    self.eat_trivia();
                    self.token(kind);
                }
                Event::Finish => {
                    if index == last {
                        // Whatever trails the last item belongs to the root.
                        self.eat_trivia();
                    }
                    self.builder.finish_node();
                }
                Event::Placeholder => {}
            }
        }

        self.builder.finish()
    }

    /// Adds trivia (whitespace, comments) to the tree.
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if !token.kind.is_trivia() {
                break;
            }
            self.token(SyntaxKind::from(token.kind));
        }
    }

    /// Adds a token to the tree.
    fn token(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.tokens.get(self.cursor) {
            let text = &self.source[token.range];
            self.builder.token(kind.into(), text);
            self.cursor += 1;
        }
    }
}
