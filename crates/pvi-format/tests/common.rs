//! Shared helpers for layout and rendering integration tests.

#![allow(dead_code)]

use pvi_device::{Component, Group, Layout, ReadWidget, SignalR, SignalRW, SignalW, WriteWidget};
use pvi_format::{ScreenFormatterFactory, ScreenLayout, WidgetFormatter};

/// Factory laying out DLS EDM screens for `$(P)` named `camera`.
pub fn factory() -> ScreenFormatterFactory {
    ScreenFormatterFactory::new(ScreenLayout::DLS_EDL, "$(P)", "camera")
}

pub fn text_read(name: &str) -> Component {
    Component::SignalR(SignalR::new(name, format!("{name}_RBV"), ReadWidget::default()))
}

pub fn text_write(name: &str) -> Component {
    Component::SignalW(SignalW::new(name, name, WriteWidget::default()))
}

pub fn read_write(name: &str) -> Component {
    Component::SignalRW(SignalRW::new(
        name,
        name,
        WriteWidget::default(),
        Some(format!("{name}_RBV")),
        None,
    ))
}

pub fn group(name: &str, layout: Layout, children: Vec<Component>) -> Component {
    Component::Group(Group::new(name, layout, children))
}

pub fn row(name: &str, children: Vec<Component>) -> Component {
    group(name, Layout::Row { header: None }, children)
}

/// Every formatter below `widgets`, groups included.
pub fn flatten(widgets: &[WidgetFormatter]) -> Vec<&WidgetFormatter> {
    let mut all = Vec::new();
    for widget in widgets {
        all.push(widget);
        if let WidgetFormatter::Group(group) = widget {
            all.extend(flatten(&group.children));
        }
    }
    all
}

/// Text of every label below `widgets`.
pub fn labels(widgets: &[WidgetFormatter]) -> Vec<String> {
    flatten(widgets)
        .into_iter()
        .filter_map(|widget| match widget {
            WidgetFormatter::Label { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}
