//! Shared helpers for parser snapshot tests.
#![allow(dead_code, unused_imports)]

pub use pvi_syntax::parser::parse;
pub use pvi_syntax::syntax::SyntaxKind;

/// Helper to format a parse result for snapshot testing.
pub fn snapshot_parse(source: &str) -> String {
    let parsed = parse(source);
    let syntax = parsed.syntax();

    let mut output = String::new();
    format_node(&syntax, &mut output, 0);

    if !parsed.ok() {
        output.push_str("\n---\nErrors:\n");
        for err in parsed.errors() {
            output.push_str(&format!("  - {}\n", err));
        }
    }

    output
}

fn format_node(node: &pvi_syntax::syntax::SyntaxNode, out: &mut String, depth: usize) {
    let indent = "  ".repeat(depth);

    out.push_str(&format!(
        "{}{:?}@{:?}\n",
        indent,
        node.kind(),
        node.text_range()
    ));

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_node(&n, out, depth + 1),
            rowan::NodeOrToken::Token(t) => {
                // Only show non-trivial tokens
                let kind = t.kind();
                if !kind.is_trivia() {
                    out.push_str(&format!(
                        "{}{:?}@{:?} {:?}\n",
                        "  ".repeat(depth + 1),
                        kind,
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }
    }
}

/// Record names of a parsed source, in order.
pub fn record_names(source: &str) -> Vec<String> {
    parse(source)
        .source_file()
        .records()
        .filter_map(|record| record.name())
        .map(|name| name.to_string())
        .collect()
}
