//! Screen file templates.
//!
//! A template file holds the screen properties and one example of every widget
//! a style uses, each with a unique placeholder. Rendering copies a snippet,
//! sets its bounds and properties, and assembles the snippets into a screen.

mod adl;
mod bob;
mod edl;

pub use adl::AdlTemplate;
pub use bob::BobTemplate;
pub use edl::EdlTemplate;

use pvi_device::Widget;
use regex::Regex;

use crate::bounds::Bounds;
use crate::error::{FormatError, Result};
use crate::formatter::WidgetFormatter;

/// Formats one child widget of a group into snippets.
pub type FormatChild<'a> = dyn Fn(&WidgetFormatter) -> Result<Vec<String>> + 'a;

/// Access to the snippets of a screen template.
pub trait UiTemplate {
    /// The screen properties snippet.
    fn screen(&self) -> &str;

    /// The single widget snippet matching `query`.
    fn search(&self, query: &str) -> Result<String>;

    /// `template` with its bounds and `properties` replaced. `widget` adds
    /// properties specific to it, such as the display format of text.
    fn set(
        &self,
        template: &str,
        bounds: Option<&Bounds>,
        widget: Option<&Widget>,
        properties: &[(&str, String)],
    ) -> Result<String>;

    /// Combines the snippets of a group's decorations with its `children`,
    /// formatted with `format` and placed inside `padding`.
    fn create_group(
        &self,
        group: Vec<String>,
        children: &[WidgetFormatter],
        padding: &Bounds,
        format: &FormatChild<'_>,
    ) -> Result<Vec<String>> {
        let mut texts = group;
        for child in children {
            texts.extend(format(&child.shifted(padding.x, padding.y))?);
        }
        Ok(texts)
    }

    /// The text of a screen file from its screen snippet and widgets.
    fn document(&self, screen: String, widgets: Vec<String>) -> String {
        let mut text = screen;
        for widget in widgets {
            text.push_str(&widget);
        }
        text
    }
}

/// Property value in a line-oriented template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Number(i32),
    Text(String),
}

impl Value {
    /// Text quoted, numbers as is.
    fn quoted(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => format!("\"{text}\""),
        }
    }
}

/// Bounds as the named properties of a template, followed by `properties`.
fn bounds_values<'a>(
    names: [&'a str; 4],
    bounds: Option<&Bounds>,
    properties: &[(&'a str, String)],
) -> Vec<(&'a str, Value)> {
    let mut values = Vec::new();
    if let Some(bounds) = bounds {
        let [x, y, w, h] = names;
        values.extend([
            (x, Value::Number(bounds.x)),
            (y, Value::Number(bounds.y)),
            (w, Value::Number(bounds.w)),
            (h, Value::Number(bounds.h)),
        ]);
    }
    values.extend(
        properties
            .iter()
            .map(|(name, value)| (*name, Value::Text(value.clone()))),
    );
    values
}

/// Replaces the single match of `pattern` in `text` with `replace(match)`.
fn replace_one(
    pattern: &Regex,
    text: &str,
    property: &str,
    replace: impl FnOnce(&regex::Captures<'_>) -> String,
) -> Result<String> {
    let mut matches = pattern.captures_iter(text);
    let (Some(captures), None) = (matches.next(), matches.next()) else {
        return Err(FormatError::MissingProperty {
            property: property.to_string(),
        });
    };
    let Some(found) = captures.get(0) else {
        return Err(FormatError::MissingProperty {
            property: property.to_string(),
        });
    };
    Ok(format!(
        "{}{}{}",
        &text[..found.start()],
        replace(&captures),
        &text[found.end()..]
    ))
}

/// Splits `text` at every `separator`, keeping the separator on each part.
fn split_with_separator(text: &str, separator: &str) -> Vec<String> {
    text.split(separator)
        .map(|part| format!("{part}{separator}"))
        .collect()
}

/// The single snippet of `snippets` containing `query`.
fn find_one(snippets: &[String], query: &str) -> Result<String> {
    let matches: Vec<&String> = snippets.iter().filter(|s| s.contains(query)).collect();
    match matches.as_slice() {
        [snippet] => Ok((*snippet).clone()),
        _ => Err(FormatError::MissingTemplate {
            query: query.to_string(),
            matches: matches.len(),
        }),
    }
}

/// `file` with `extension` appended unless it already ends with it.
fn with_extension(file: &str, extension: &str) -> String {
    if file.ends_with(extension) {
        file.to_string()
    } else {
        format!("{file}{extension}")
    }
}

/// Inserts `insert` before the last `marker` in `text`.
fn insert_before_last(text: &mut String, marker: &str, insert: &str) {
    if let Some(index) = text.rfind(marker) {
        text.insert_str(index, insert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_one_requires_single_match() {
        let pattern = Regex::new(r"(?m)^x .*$").expect("regex");
        let text = "x 0\ny 0\n";
        let replaced = replace_one(&pattern, text, "x", |_| "x 5".to_string()).expect("replace");
        assert_eq!(replaced, "x 5\ny 0\n");

        let err = replace_one(&pattern, "y 0\n", "x", |_| String::new()).unwrap_err();
        assert_eq!(err.to_string(), "no single replacement for property 'x'");
        assert!(replace_one(&pattern, "x 0\nx 1\n", "x", |_| String::new()).is_err());
    }

    #[test]
    fn test_split_with_separator() {
        assert_eq!(
            split_with_separator("a\n}\nb\n}\n", "\n}\n"),
            vec!["a\n}\n", "b\n}\n", "\n}\n"]
        );
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("camera_Table", ".bob"), "camera_Table.bob");
        assert_eq!(with_extension("motor.adl", ".adl"), "motor.adl");
    }
}
