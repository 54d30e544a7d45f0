//! Widgets that display or control a PV.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display format of text widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// Plain decimal.
    Decimal,
    /// Hexadecimal.
    Hexadecimal,
    /// Engineering notation.
    Engineer,
    /// Exponential notation.
    Exponential,
    /// Character string.
    String,
}

/// Options shared by `TextRead` and `TextWrite`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Number of lines to display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
    /// Display format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
}

impl TextOptions {
    /// Text options with only a format set.
    #[must_use]
    pub fn with_format(format: TextFormat) -> Self {
        Self {
            lines: None,
            format: Some(format),
        }
    }

    /// Number of lines, one when unset.
    #[must_use]
    pub fn lines(&self) -> u32 {
        self.lines.unwrap_or(1).max(1)
    }
}

/// Widget that displays a PV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReadWidget {
    /// LED display of a boolean PV.
    #[serde(rename = "LED")]
    Led,
    /// LED and label for each bit of an integer PV.
    BitField {
        /// Label for each bit.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        labels: Option<Vec<String>>,
        /// Number of bits to display.
        #[serde(default = "default_number_of_bits")]
        number_of_bits: u32,
    },
    /// Progress bar from the lower to the upper limit of a float PV.
    ProgressBar,
    /// Text view of any PV.
    TextRead(TextOptions),
    /// Trace of an array in a plot.
    ArrayTrace {
        /// Traces with the same axis share an axis.
        axis: String,
    },
    /// 2D image view of an NTNDArray.
    ImageRead,
    /// Read-only tabular view of an NTTable.
    TableRead {
        /// Widget repeated in each column.
        #[serde(default)]
        widgets: Vec<ReadWidget>,
    },
}

fn default_number_of_bits() -> u32 {
    8
}

impl Default for ReadWidget {
    fn default() -> Self {
        Self::TextRead(TextOptions::default())
    }
}

impl ReadWidget {
    /// Tag used in device files and template lookups.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Led => "LED",
            Self::BitField { .. } => "BitField",
            Self::ProgressBar => "ProgressBar",
            Self::TextRead(_) => "TextRead",
            Self::ArrayTrace { .. } => "ArrayTrace",
            Self::ImageRead => "ImageRead",
            Self::TableRead { .. } => "TableRead",
        }
    }
}

/// Widget that controls a PV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WriteWidget {
    /// Checkable control of a boolean PV.
    CheckBox,
    /// Pair of buttons selecting between two states.
    ToggleButton,
    /// Selection of an enum PV.
    ComboBox {
        /// Choices to select from.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        choices: Option<Vec<String>>,
    },
    /// Buttons that each write a fixed value.
    ButtonPanel {
        /// Button label to value written.
        #[serde(default = "default_actions")]
        actions: IndexMap<String, String>,
    },
    /// Text control of any PV.
    TextWrite(TextOptions),
    /// Control of an array PV.
    ArrayWrite {
        /// Widget used for each item.
        widget: Box<WriteWidget>,
    },
    /// Writeable tabular view of an NTTable.
    TableWrite {
        /// Widget repeated in each column.
        #[serde(default)]
        widgets: Vec<WriteWidget>,
    },
}

fn default_actions() -> IndexMap<String, String> {
    IndexMap::from([("Go".to_string(), "1".to_string())])
}

impl Default for WriteWidget {
    fn default() -> Self {
        Self::TextWrite(TextOptions::default())
    }
}

impl WriteWidget {
    /// A `ButtonPanel` with the single `Go` action.
    #[must_use]
    pub fn button_panel() -> Self {
        Self::ButtonPanel {
            actions: default_actions(),
        }
    }

    /// Tag used in device files and template lookups.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CheckBox => "CheckBox",
            Self::ToggleButton => "ToggleButton",
            Self::ComboBox { .. } => "ComboBox",
            Self::ButtonPanel { .. } => "ButtonPanel",
            Self::TextWrite(_) => "TextWrite",
            Self::ArrayWrite { .. } => "ArrayWrite",
            Self::TableWrite { .. } => "TableWrite",
        }
    }
}

/// Either kind of widget, as placed on a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// A display widget.
    Read(ReadWidget),
    /// A control widget.
    Write(WriteWidget),
}

impl Widget {
    /// Tag used in template lookups.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read(widget) => widget.kind(),
            Self::Write(widget) => widget.kind(),
        }
    }

    /// Text options for `TextRead`/`TextWrite`.
    #[must_use]
    pub fn text_options(&self) -> Option<&TextOptions> {
        match self {
            Self::Read(ReadWidget::TextRead(options))
            | Self::Write(WriteWidget::TextWrite(options)) => Some(options),
            _ => None,
        }
    }

    /// `true` for `TableRead` and `TableWrite`.
    #[must_use]
    pub fn is_table(&self) -> bool {
        matches!(
            self,
            Self::Read(ReadWidget::TableRead { .. }) | Self::Write(WriteWidget::TableWrite { .. })
        )
    }

    /// Column widget kinds of a table, empty for other widgets.
    #[must_use]
    pub fn table_columns(&self) -> Vec<Widget> {
        match self {
            Self::Read(ReadWidget::TableRead { widgets }) => {
                widgets.iter().cloned().map(Widget::Read).collect()
            }
            Self::Write(WriteWidget::TableWrite { widgets }) => {
                widgets.iter().cloned().map(Widget::Write).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<ReadWidget> for Widget {
    fn from(widget: ReadWidget) -> Self {
        Self::Read(widget)
    }
}

impl From<WriteWidget> for Widget {
    fn from(widget: WriteWidget) -> Self {
        Self::Write(widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_json_tags() {
        let led = serde_json::to_string(&ReadWidget::Led).expect("serialize");
        assert_eq!(led, r#"{"type":"LED"}"#);

        let text = serde_json::to_string(&ReadWidget::TextRead(TextOptions::with_format(
            TextFormat::String,
        )))
        .expect("serialize");
        assert_eq!(text, r#"{"type":"TextRead","format":"string"}"#);
    }

    #[test]
    fn test_widget_defaults_on_deserialize() {
        let panel: WriteWidget =
            serde_json::from_str(r#"{"type":"ButtonPanel"}"#).expect("deserialize");
        assert_eq!(panel, WriteWidget::button_panel());

        let bits: ReadWidget = serde_json::from_str(r#"{"type":"BitField"}"#).expect("deserialize");
        assert_eq!(
            bits,
            ReadWidget::BitField {
                labels: None,
                number_of_bits: 8
            }
        );
    }

    #[test]
    fn test_nested_array_write() {
        let json = r#"{"type":"ArrayWrite","widget":{"type":"TextWrite"}}"#;
        let widget: WriteWidget = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            widget,
            WriteWidget::ArrayWrite {
                widget: Box::new(WriteWidget::TextWrite(TextOptions::default()))
            }
        );
        assert_eq!(serde_json::to_string(&widget).expect("serialize"), json);
    }

    #[test]
    fn test_text_lines_default_to_one() {
        assert_eq!(TextOptions::default().lines(), 1);
        let options = TextOptions {
            lines: Some(4),
            format: None,
        };
        let widget = Widget::Write(WriteWidget::TextWrite(options));
        assert_eq!(widget.text_options().map(TextOptions::lines), Some(4));
    }
}
