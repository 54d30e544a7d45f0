//! Typed views over the concrete syntax tree.
//!
//! Each wrapper holds a `SyntaxNode` of a known kind and exposes the pieces a
//! consumer cares about as plain strings, with quotes and escapes removed.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::syntax::{SyntaxKind, SyntaxNode};

/// The root of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile(SyntaxNode);

impl SourceFile {
    /// Wraps a root node.
    #[must_use]
    pub fn new(node: SyntaxNode) -> Self {
        Self(node)
    }

    /// Returns the underlying syntax node.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    /// All record declarations in source order.
    pub fn records(&self) -> impl Iterator<Item = RecordDecl> + '_ {
        self.0.children().filter_map(RecordDecl::cast)
    }

    /// All include directives in source order.
    pub fn includes(&self) -> impl Iterator<Item = IncludeDecl> + '_ {
        self.0.children().filter_map(IncludeDecl::cast)
    }
}

/// A `record(type, name) { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordDecl(SyntaxNode);

impl RecordDecl {
    /// Casts a node to a record declaration.
    #[must_use]
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::Record).then_some(Self(node))
    }

    /// Returns the underlying syntax node.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    /// The record type, e.g. `ai`.
    #[must_use]
    pub fn record_type(&self) -> Option<SmolStr> {
        self.values().next()
    }

    /// The record name as written, macros included.
    #[must_use]
    pub fn name(&self) -> Option<SmolStr> {
        self.values().nth(1)
    }

    /// Byte range from the `record` keyword to the closing brace.
    #[must_use]
    pub fn text_range(&self) -> TextRange {
        self.0.text_range()
    }

    /// The declaration line, `record(type, "name")`, as written.
    #[must_use]
    pub fn header_text(&self) -> String {
        let text = self.0.to_string();
        let end = self
            .body()
            .map_or(text.len(), |body| {
                usize::from(body.text_range().start() - self.0.text_range().start())
            });
        text[..end].trim_end().to_string()
    }

    /// The brace-delimited body, if the record has one.
    #[must_use]
    pub fn body(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|child| child.kind() == SyntaxKind::RecordBody)
    }

    /// `field(...)` entries in source order.
    pub fn fields(&self) -> impl Iterator<Item = PairDecl> {
        self.pairs(SyntaxKind::Field)
    }

    /// `info(...)` entries in source order.
    pub fn infos(&self) -> impl Iterator<Item = PairDecl> {
        self.pairs(SyntaxKind::Info)
    }

    /// `alias(...)` names in source order.
    pub fn aliases(&self) -> impl Iterator<Item = SmolStr> {
        self.body()
            .into_iter()
            .flat_map(|body| body.children())
            .filter(|child| child.kind() == SyntaxKind::Alias)
            .filter_map(|alias| alias.children().find_map(|node| value_text(&node)))
    }

    fn pairs(&self, kind: SyntaxKind) -> impl Iterator<Item = PairDecl> {
        self.body()
            .into_iter()
            .flat_map(|body| body.children())
            .filter(move |child| child.kind() == kind)
            .map(PairDecl)
    }

    fn values(&self) -> impl Iterator<Item = SmolStr> + '_ {
        self.0.children().filter_map(|node| value_text(&node))
    }
}

/// A `field(NAME, value)` or `info(NAME, value)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairDecl(SyntaxNode);

impl PairDecl {
    /// Returns the underlying syntax node.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    /// The field or info name.
    #[must_use]
    pub fn name(&self) -> Option<SmolStr> {
        self.0.children().find_map(|node| value_text(&node))
    }

    /// The unquoted value.
    #[must_use]
    pub fn value(&self) -> Option<SmolStr> {
        self.0.children().filter_map(|node| value_text(&node)).nth(1)
    }
}

/// An `include "file"` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncludeDecl(SyntaxNode);

impl IncludeDecl {
    /// Casts a node to an include directive.
    #[must_use]
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::Include).then_some(Self(node))
    }

    /// The included path.
    #[must_use]
    pub fn path(&self) -> Option<SmolStr> {
        self.0.children().find_map(|node| value_text(&node))
    }
}

fn value_text(node: &SyntaxNode) -> Option<SmolStr> {
    if node.kind() != SyntaxKind::Value {
        return None;
    }

    let first = node
        .children_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .find(|token| !token.kind().is_trivia())?;

    if first.kind() == SyntaxKind::String {
        Some(unquote(first.text()))
    } else {
        Some(SmolStr::new(node.text().to_string()))
    }
}

/// Strips the surrounding quotes of a string token and resolves `\"` and `\\`.
///
/// Other escape sequences are kept verbatim; the IOC resolves them at load time.
#[must_use]
pub fn unquote(text: &str) -> SmolStr {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped @ ('"' | '\\')) => out.push(escaped),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out.into()
}

/// Quotes `value` for use as a template string, escaping `"` and `\`.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
