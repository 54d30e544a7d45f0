//! Phoebus display builder (`.bob`) screen templates.

use std::cmp::Reverse;

use pvi_device::{ReadWidget, Widget, WriteWidget};
use roxmltree::{Document, Node};

use super::{insert_before_last, with_extension, FormatChild, UiTemplate};
use crate::bounds::Bounds;
use crate::error::{FormatError, Result};
use crate::formatter::WidgetFormatter;

/// Name of the display element in the template.
const DISPLAY: &str = "Display";

/// A Phoebus screen template. Widgets are found by the text of their `name`
/// element.
#[derive(Debug, Clone)]
pub struct BobTemplate {
    text: String,
    screen: String,
}

impl BobTemplate {
    pub fn new(text: &str) -> Result<Self> {
        let screen = find_element(text, DISPLAY)?;
        Ok(Self {
            text: text.to_string(),
            screen,
        })
    }
}

impl UiTemplate for BobTemplate {
    fn screen(&self) -> &str {
        &self.screen
    }

    fn search(&self, query: &str) -> Result<String> {
        find_element(&self.text, query)
    }

    fn set(
        &self,
        template: &str,
        bounds: Option<&Bounds>,
        widget: Option<&Widget>,
        properties: &[(&str, String)],
    ) -> Result<String> {
        let document = Document::parse(template)?;
        let root = document.root_element();
        let widget_type = root.attribute("type").unwrap_or_default();

        let mut values: Vec<(&str, String)> = Vec::new();
        if let Some(bounds) = bounds {
            values.extend([
                ("x", bounds.x.to_string()),
                ("y", bounds.y.to_string()),
                ("width", bounds.w.to_string()),
                ("height", bounds.h.to_string()),
            ]);
        }
        for (tag, value) in properties {
            let value = match *tag {
                "pv_name" if widget_type == "table" => format!("pva://{value}"),
                "file" => with_extension(value, ".bob"),
                _ => value.clone(),
            };
            values.push((*tag, value));
        }

        let mut edits = Vec::with_capacity(values.len());
        for (tag, value) in &values {
            let element = root
                .descendants()
                .find(|node| node.has_tag_name(*tag))
                .ok_or_else(|| FormatError::MissingProperty {
                    property: (*tag).to_string(),
                })?;
            let content = if *tag == "macros" {
                macro_elements(value)
            } else {
                escape_xml(value)
            };
            edits.push((element.range(), format!("<{tag}>{content}</{tag}>")));
        }
        edits.sort_by_key(|(range, _)| Reverse(range.start));

        let mut text = template.to_string();
        for (range, replacement) in edits {
            text.replace_range(range, &replacement);
        }

        let extra = match (widget_type, widget) {
            ("table", Some(widget)) => table_columns(widget),
            ("combo", Some(Widget::Write(WriteWidget::ComboBox { choices: Some(choices) }))) => {
                combo_items(choices)
            }
            _ => String::new(),
        };
        if !extra.is_empty() {
            insert_before_last(&mut text, "</widget>", &extra);
        }
        Ok(text)
    }

    fn create_group(
        &self,
        group: Vec<String>,
        children: &[WidgetFormatter],
        _padding: &Bounds,
        format: &FormatChild<'_>,
    ) -> Result<Vec<String>> {
        let [group] = group.as_slice() else {
            return Err(FormatError::InvalidTemplate {
                reason: format!("a group needs one group widget, got {}", group.len()),
            });
        };
        let mut inner = String::new();
        for child in children {
            if let Some(snippet) = format(child)?.into_iter().next() {
                inner.push_str(&snippet);
                inner.push('\n');
            }
        }
        let mut text = group.clone();
        insert_before_last(&mut text, "</widget>", &inner);
        Ok(vec![text])
    }

    fn document(&self, screen: String, widgets: Vec<String>) -> String {
        let mut screen = screen;
        let inner: String = widgets
            .iter()
            .map(|widget| format!("  {widget}\n"))
            .collect();
        insert_before_last(&mut screen, "</display>", &inner);
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{screen}\n")
    }
}

/// Source text of the element whose `name` child is `query`. The display
/// element comes without its widgets.
fn find_element(text: &str, query: &str) -> Result<String> {
    let document = Document::parse(text)?;
    let matches: Vec<Node<'_, '_>> = document
        .descendants()
        .filter(|node| node.has_tag_name("name") && node.text() == Some(query))
        .filter_map(|node| node.parent_element())
        .collect();
    let [element] = matches.as_slice() else {
        return Err(FormatError::MissingTemplate {
            query: query.to_string(),
            matches: matches.len(),
        });
    };

    let range = element.range();
    if !element.has_tag_name("display") {
        return Ok(text[range].to_string());
    }

    let mut screen = String::with_capacity(range.len());
    let mut cursor = range.start;
    for widget in element.children().filter(|node| node.has_tag_name("widget")) {
        let start = widget.range().start;
        // Take the indentation before the widget along with it.
        let start = cursor + text[cursor..start].trim_end().len();
        screen.push_str(&text[cursor..start]);
        cursor = widget.range().end;
    }
    screen.push_str(&text[cursor..range.end]);
    Ok(screen)
}

/// Column definitions and editability of a table widget. Without column
/// widgets the table takes its columns from the PV.
fn table_columns(widget: &Widget) -> String {
    let columns = widget.table_columns();
    if columns.is_empty() {
        return String::new();
    }

    let mut xml = String::from("  <columns>\n");
    for (index, column) in columns.iter().enumerate() {
        xml.push_str("    <column>\n");
        xml.push_str(&format!("      <name>Column {}</name>\n", index + 1));
        xml.push_str(&format!(
            "      <editable>{}</editable>\n",
            matches!(column, Widget::Write(_))
        ));
        let options: Vec<String> = match column {
            Widget::Read(ReadWidget::Led) => vec!["false".to_string(), "true".to_string()],
            Widget::Write(WriteWidget::ComboBox {
                choices: Some(choices),
            }) => choices.clone(),
            _ => Vec::new(),
        };
        if !options.is_empty() {
            xml.push_str("      <options>\n");
            for option in &options {
                xml.push_str(&format!("        <option>{}</option>\n", escape_xml(option)));
            }
            xml.push_str("      </options>\n");
        }
        xml.push_str("    </column>\n");
    }
    xml.push_str("  </columns>\n");
    xml.push_str(&format!(
        "  <editable>{}</editable>\n",
        matches!(widget, Widget::Write(_))
    ));
    xml
}

/// Fixed items of a combo box.
fn combo_items(choices: &[String]) -> String {
    if choices.is_empty() {
        return String::new();
    }
    let mut xml = String::from("  <items>\n");
    for choice in choices {
        xml.push_str(&format!("    <item>{}</item>\n", escape_xml(choice)));
    }
    xml.push_str("  </items>\n  <items_from_pv>false</items_from_pv>\n");
    xml
}

/// `NAME=value,...` macros as one element per macro.
fn macro_elements(macros: &str) -> String {
    macros
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| format!("<{name}>{}</{name}>", escape_xml(value)))
        .collect()
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<display version="2.0.0">
  <name>Display</name>
  <x>0</x>
  <y>0</y>
  <width>400</width>
  <height>300</height>
  <widget type="textentry" version="3.0.0">
    <name>TextEntry</name>
    <pv_name>TextEntry</pv_name>
    <x>0</x>
    <y>0</y>
    <width>120</width>
    <height>20</height>
  </widget>
  <widget type="table" version="2.0.0">
    <name>Table</name>
    <pv_name>Table</pv_name>
    <x>0</x>
    <y>0</y>
    <width>200</width>
    <height>200</height>
  </widget>
  <widget type="action_button" version="3.0.0">
    <name>SubScreen</name>
    <actions>
      <action type="open_display">
        <file>SubScreen.bob</file>
        <target>tab</target>
        <macros></macros>
      </action>
    </actions>
    <text>SubScreen</text>
  </widget>
</display>
"#;

    fn template() -> BobTemplate {
        BobTemplate::new(TEMPLATE).expect("template")
    }

    #[test]
    fn test_screen_without_widgets() {
        expect![[r#"
            <display version="2.0.0">
              <name>Display</name>
              <x>0</x>
              <y>0</y>
              <width>400</width>
              <height>300</height>
            </display>"#]]
        .assert_eq(template().screen());
    }

    #[test]
    fn test_set_text_entry() {
        let template = template();
        let snippet = template.search("TextEntry").expect("text entry");
        let text = template
            .set(
                &snippet,
                Some(&Bounds::new(128, 32, 120, 20)),
                None,
                &[("pv_name", "$(P)Name<1>".to_string())],
            )
            .expect("set");
        expect![[r#"
            <widget type="textentry" version="3.0.0">
                <name>TextEntry</name>
                <pv_name>$(P)Name&lt;1&gt;</pv_name>
                <x>128</x>
                <y>32</y>
                <width>120</width>
                <height>20</height>
              </widget>"#]]
        .assert_eq(&text);
    }

    #[test]
    fn test_table_columns() {
        let template = template();
        let snippet = template.search("Table").expect("table");
        let widget = Widget::Write(WriteWidget::TableWrite {
            widgets: vec![WriteWidget::CheckBox, WriteWidget::default()],
        });
        let text = template
            .set(&snippet, None, Some(&widget), &[("pv_name", "$(P)Points".to_string())])
            .expect("set");
        assert!(text.contains("<pv_name>pva://$(P)Points</pv_name>"));

        let document = Document::parse(&text).expect("valid XML");
        let names: Vec<&str> = document
            .descendants()
            .filter(|node| node.has_tag_name("column"))
            .filter_map(|column| column.children().find(|node| node.has_tag_name("name")))
            .filter_map(|name| name.text())
            .collect();
        assert_eq!(names, ["Column 1", "Column 2"]);
        let editable = document
            .root_element()
            .children()
            .find(|node| node.has_tag_name("editable"))
            .and_then(|node| node.text());
        assert_eq!(editable, Some("true"));
    }

    #[test]
    fn test_sub_screen_file_and_macros() {
        let template = template();
        let snippet = template.search("SubScreen").expect("sub-screen");
        let text = template
            .set(
                &snippet,
                None,
                None,
                &[
                    ("text", "Motor".to_string()),
                    ("file", "motor".to_string()),
                    ("macros", "P=BL01:,M=M1".to_string()),
                ],
            )
            .expect("set");
        assert!(text.contains("<file>motor.bob</file>"));
        assert!(text.contains("<macros><P>BL01:</P><M>M1</M></macros>"));
        assert!(text.contains("<text>Motor</text>"));
    }

    #[test]
    fn test_search_requires_unique_name() {
        let err = template().search("Missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected one template snippet matching 'Missing', found 0"
        );
    }
}
