//! MEDM (`.adl`) screen templates.

use pvi_device::{TextFormat, Widget};
use regex::Regex;

use super::{
    bounds_values, find_one, insert_before_last, replace_one, split_with_separator,
    with_extension, UiTemplate, Value,
};
use crate::bounds::Bounds;
use crate::error::{FormatError, Result};

const END_BLOCK: &str = "\n}\n";

/// Blocks at the start of the file that make up the screen: file, display
/// and color map.
const SCREEN_BLOCKS: usize = 3;

/// A MEDM screen template split into screen blocks and widget blocks.
#[derive(Debug, Clone)]
pub struct AdlTemplate {
    screen: String,
    widgets: Vec<String>,
}

impl AdlTemplate {
    pub fn new(text: &str) -> Result<Self> {
        if text.contains("children {") {
            return Err(FormatError::InvalidTemplate {
                reason: "MEDM composites are not supported".to_string(),
            });
        }
        let blocks = split_with_separator(text, END_BLOCK);
        if blocks.len() <= SCREEN_BLOCKS {
            return Err(FormatError::InvalidTemplate {
                reason: format!("expected {SCREEN_BLOCKS} screen blocks before the widgets"),
            });
        }
        let (screen, widgets) = blocks.split_at(SCREEN_BLOCKS);
        Ok(Self {
            screen: screen.concat(),
            widgets: widgets
                .iter()
                .filter(|widget| widget.contains("object {"))
                .cloned()
                .collect(),
        })
    }
}

impl UiTemplate for AdlTemplate {
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
        let related_display = template.starts_with("\"related display\"");
        let mut text = template.to_string();
        for (item, value) in bounds_values(["x", "y", "width", "height"], bounds, properties) {
            let value = match value {
                Value::Text(file) if related_display && item == "name" => {
                    Value::Text(with_extension(&file, ".adl"))
                }
                value => value,
            };
            let pattern = Regex::new(&format!(r"(?m)^([ \t]*{})=.*$", regex::escape(item)))?;
            text = replace_one(&pattern, &text, item, |captures| {
                format!("{}={}", &captures[1], value.quoted())
            })?;
        }

        let format = widget
            .and_then(Widget::text_options)
            .and_then(|options| options.format);
        if let Some(format) = format {
            if text.starts_with("\"text ") {
                insert_before_last(
                    &mut text,
                    "\n}",
                    &format!("\n\tformat=\"{}\"", text_format(format)),
                );
            }
        }
        Ok(text)
    }
}

fn text_format(format: TextFormat) -> &'static str {
    match format {
        TextFormat::Decimal => "decimal",
        TextFormat::Hexadecimal => "hexadecimal",
        TextFormat::Engineer => "engr. notation",
        TextFormat::Exponential => "exponential",
        TextFormat::String => "string",
    }
}
