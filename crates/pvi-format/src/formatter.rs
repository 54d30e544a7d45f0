//! Positioned widgets produced by the layout engine.

use indexmap::IndexMap;
use pvi_device::{Group, ReadWidget, Widget, WriteWidget};

use crate::bounds::Bounds;
use crate::preset::{Field, TemplateKind};

/// A widget placed on a screen, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetFormatter {
    /// Column heading of a row.
    Header { bounds: Bounds, text: String },
    /// Label of a component.
    Label {
        bounds: Bounds,
        text: String,
        tooltip: String,
    },
    /// Widget bound to a PV.
    Pv {
        bounds: Bounds,
        pv: String,
        widget: Widget,
    },
    /// Button writing a fixed value to a PV.
    Action {
        bounds: Bounds,
        label: String,
        pv: String,
        value: String,
    },
    /// Button opening another screen.
    SubScreen(SubScreenFormatter),
    /// Group of widgets with a title.
    Group(GroupFormatter),
}

/// Button opening another screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubScreenFormatter {
    pub bounds: Bounds,
    pub label: String,
    /// Screen to open, without extension.
    pub file_name: String,
    /// Components to lay out on the opened screen. `None` for a screen that
    /// already exists.
    pub components: Option<Group>,
    pub macros: IndexMap<String, String>,
}

/// Titled container of widgets, also used for whole screens.
///
/// Child bounds are relative to the contents of the group, so moving the
/// group only changes its own bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFormatter {
    pub bounds: Bounds,
    pub title: String,
    pub children: Vec<WidgetFormatter>,
}

impl WidgetFormatter {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Header { bounds, .. }
            | Self::Label { bounds, .. }
            | Self::Pv { bounds, .. }
            | Self::Action { bounds, .. } => *bounds,
            Self::SubScreen(sub_screen) => sub_screen.bounds,
            Self::Group(group) => group.bounds,
        }
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        match self {
            Self::Header { bounds, .. }
            | Self::Label { bounds, .. }
            | Self::Pv { bounds, .. }
            | Self::Action { bounds, .. } => bounds,
            Self::SubScreen(sub_screen) => &mut sub_screen.bounds,
            Self::Group(group) => &mut group.bounds,
        }
    }

    /// Copy moved by `dx`, `dy`.
    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        let mut shifted = self.clone();
        let bounds = shifted.bounds_mut();
        *bounds = bounds.offset(dx, dy);
        shifted
    }

    /// Widget template used to render this formatter. Groups have none.
    #[must_use]
    pub fn template_kind(&self) -> Option<TemplateKind> {
        match self {
            Self::Header { .. } => Some(TemplateKind::Header),
            Self::Label { .. } => Some(TemplateKind::Label),
            Self::Pv { widget, .. } => Some(widget_template_kind(widget)),
            Self::Action { .. } => Some(TemplateKind::Action),
            Self::SubScreen(_) => Some(TemplateKind::SubScreen),
            Self::Group(_) => None,
        }
    }

    /// The widget of a PV formatter.
    #[must_use]
    pub fn widget(&self) -> Option<&Widget> {
        match self {
            Self::Pv { widget, .. } => Some(widget),
            _ => None,
        }
    }

    /// Value of a template property taken from this formatter.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<String> {
        match (field, self) {
            (Field::Text, Self::Header { text, .. } | Self::Label { text, .. }) => {
                Some(text.clone())
            }
            (Field::Text, Self::Group(group)) => Some(group.title.clone()),
            (Field::Tooltip, Self::Label { tooltip, .. }) => Some(tooltip.clone()),
            (Field::Pv, Self::Pv { pv, .. } | Self::Action { pv, .. }) => Some(pv.clone()),
            (Field::Label, Self::Action { label, .. }) => Some(label.clone()),
            (Field::Label, Self::SubScreen(sub_screen)) => Some(sub_screen.label.clone()),
            (Field::Value, Self::Action { value, .. }) => Some(value.clone()),
            (Field::File, Self::SubScreen(sub_screen)) => Some(sub_screen.file_name.clone()),
            (Field::Macros, Self::SubScreen(sub_screen)) => Some(
                sub_screen
                    .macros
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }
}

/// Template for a widget. Widgets without a template of their own use the
/// closest one.
#[must_use]
pub fn widget_template_kind(widget: &Widget) -> TemplateKind {
    match widget {
        Widget::Read(ReadWidget::Led) => TemplateKind::Led,
        Widget::Read(ReadWidget::ProgressBar) => TemplateKind::ProgressBar,
        Widget::Read(
            ReadWidget::TextRead(_)
            | ReadWidget::BitField { .. }
            | ReadWidget::ArrayTrace { .. }
            | ReadWidget::ImageRead,
        ) => TemplateKind::TextRead,
        Widget::Read(ReadWidget::TableRead { .. })
        | Widget::Write(WriteWidget::TableWrite { .. }) => TemplateKind::Table,
        Widget::Write(WriteWidget::CheckBox | WriteWidget::ToggleButton) => TemplateKind::CheckBox,
        Widget::Write(WriteWidget::ComboBox { .. }) => TemplateKind::ComboBox,
        Widget::Write(
            WriteWidget::TextWrite(_)
            | WriteWidget::ArrayWrite { .. }
            | WriteWidget::ButtonPanel { .. },
        ) => TemplateKind::TextWrite,
    }
}

/// Rightmost edge of `widgets`, 0 when empty.
#[must_use]
pub fn max_x(widgets: &[WidgetFormatter]) -> i32 {
    widgets.iter().map(|w| w.bounds().right()).max().unwrap_or(0)
}

/// Bottom edge of `widgets`, 0 when empty.
#[must_use]
pub fn max_y(widgets: &[WidgetFormatter]) -> i32 {
    widgets.iter().map(|w| w.bounds().bottom()).max().unwrap_or(0)
}

/// Next free x after `widgets`, 0 when empty.
#[must_use]
pub fn next_x(widgets: &[WidgetFormatter], spacing: i32) -> i32 {
    if widgets.is_empty() {
        0
    } else {
        max_x(widgets) + spacing
    }
}

/// Next free y after `widgets`, 0 when empty.
#[must_use]
pub fn next_y(widgets: &[WidgetFormatter], spacing: i32) -> i32 {
    if widgets.is_empty() {
        0
    } else {
        max_y(widgets) + spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(bounds: Bounds) -> WidgetFormatter {
        WidgetFormatter::Label {
            bounds,
            text: "Gain".to_string(),
            tooltip: String::new(),
        }
    }

    #[test]
    fn test_extents() {
        let widgets = vec![
            label(Bounds::new(0, 0, 115, 20)),
            label(Bounds::new(120, 25, 125, 20)),
        ];
        assert_eq!(max_x(&widgets), 245);
        assert_eq!(max_y(&widgets), 45);
        assert_eq!(next_x(&widgets, 5), 250);
        assert_eq!(next_y(&[], 5), 0);
    }

    #[test]
    fn test_shifted_group_keeps_child_bounds() {
        let group = WidgetFormatter::Group(GroupFormatter {
            bounds: Bounds::new(0, 0, 100, 50),
            title: "Settings".to_string(),
            children: vec![label(Bounds::new(0, 0, 50, 20))],
        });
        let WidgetFormatter::Group(shifted) = group.shifted(5, 30) else {
            panic!("expected a group");
        };
        assert_eq!(shifted.bounds, Bounds::new(5, 30, 100, 50));
        assert_eq!(shifted.children[0].bounds(), Bounds::new(0, 0, 50, 20));
    }

    #[test]
    fn test_unsupported_widgets_fall_back() {
        let bits = Widget::Read(ReadWidget::BitField {
            labels: None,
            number_of_bits: 8,
        });
        assert_eq!(widget_template_kind(&bits), TemplateKind::TextRead);
        let toggle = Widget::Write(WriteWidget::ToggleButton);
        assert_eq!(widget_template_kind(&toggle), TemplateKind::CheckBox);
    }
}
