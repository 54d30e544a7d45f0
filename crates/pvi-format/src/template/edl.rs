//! EDM (`.edl`) screen templates.

use pvi_device::{TextFormat, Widget};
use regex::Regex;

use super::{
    bounds_values, find_one, insert_before_last, replace_one, split_with_separator,
    with_extension, UiTemplate, Value,
};
use crate::bounds::Bounds;
use crate::error::{FormatError, Result};

const END_SCREEN: &str = "\nendScreenProperties\n";
const END_OBJECT: &str = "\nendObjectProperties\n";

/// Array properties that hold one indexed item.
const INDEXED: &[&str] = &["displayFileName", "symbols"];

/// An EDM screen template split into screen properties and widget objects.
#[derive(Debug, Clone)]
pub struct EdlTemplate {
    screen: String,
    widgets: Vec<String>,
}

impl EdlTemplate {
    pub fn new(text: &str) -> Result<Self> {
        if text.contains("endGroup") {
            return Err(FormatError::InvalidTemplate {
                reason: "EDM groups are not supported".to_string(),
            });
        }
        let Some((screen, widgets)) = text.split_once(END_SCREEN) else {
            return Err(FormatError::InvalidTemplate {
                reason: "no endScreenProperties".to_string(),
            });
        };
        Ok(Self {
            screen: format!("{screen}{END_SCREEN}"),
            widgets: split_with_separator(widgets, END_OBJECT)
                .into_iter()
                .filter(|widget| widget.contains("object "))
                .collect(),
        })
    }
}

impl UiTemplate for EdlTemplate {
    fn screen(&self) -> &str {
        &self.screen
    }

    fn search(&self, query: &str) -> Result<String> {
        find_one(&self.widgets, query)
    }

    fn set(
        &self,
        template: &str,
        bounds: Option<&Bounds>,
        widget: Option<&Widget>,
        properties: &[(&str, String)],
    ) -> Result<String> {
        let mut text = template.to_string();
        for (item, value) in bounds_values(["x", "y", "w", "h"], bounds, properties) {
            let value = match value {
                Value::Text(file) if item == "displayFileName" => {
                    Value::Text(with_extension(&file, ".edl"))
                }
                value => value,
            };

            let name = regex::escape(item);
            let multiline = Regex::new(&format!(r"(?ms)^{name} \{{[^}}]*\}}$"))?;
            text = if multiline.is_match(&text) {
                let lines = array_lines(item, &value);
                replace_one(&multiline, &text, item, |_| {
                    format!("{item} {{\n{}\n}}", lines.join("\n"))
                })?
            } else {
                let single = Regex::new(&format!(r"(?m)^{name} .*$"))?;
                replace_one(&single, &text, item, |_| format!("{item} {}", value.quoted()))?
            };
        }

        let format = widget
            .and_then(Widget::text_options)
            .and_then(|options| options.format);
        if let Some(format) = format {
            if text.starts_with("\n# (Text") {
                insert_before_last(
                    &mut text,
                    "endObjectProperties\n",
                    &format!("displayMode \"{}\"\n", display_mode(format)),
                );
            }
        }
        Ok(text)
    }
}

/// Lines of a `{ ... }` property holding `value`.
fn array_lines(item: &str, value: &Value) -> Vec<String> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::Text(text) => text.clone(),
    };
    if INDEXED.contains(&item) {
        return vec![format!("  0 \"{text}\"")];
    }
    if text.is_empty() {
        return vec!["  \"\"".to_string()];
    }
    text.lines().map(|line| format!("  \"{line}\"")).collect()
}

fn display_mode(format: TextFormat) -> &'static str {
    match format {
        TextFormat::Decimal => "decimal",
        TextFormat::Hexadecimal => "hex",
        TextFormat::Engineer => "engineer",
        TextFormat::Exponential => "exp",
        TextFormat::String => "default",
    }
}
