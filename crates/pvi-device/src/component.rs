//! Components that make up a device.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::naming::to_title_case;
use crate::widget::{ReadWidget, WriteWidget};

/// An ordered list of components.
pub type Tree = Vec<Component>;

/// A named part of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Component {
    /// Child components in a layout.
    Group(Group),
    /// Read-only signal.
    SignalR(SignalR),
    /// Write-only signal.
    SignalW(SignalW),
    /// Read/write signal.
    SignalRW(SignalRW),
    /// Signal that writes a fixed value when triggered.
    SignalX(SignalX),
    /// Reference to another signal of the same device by name.
    SignalRef(SignalRef),
    /// Reference to another device.
    DeviceRef(DeviceRef),
}

macro_rules! common_fields {
    ($self:ident, $field:ident) => {
        match $self {
            Component::Group(c) => &c.$field,
            Component::SignalR(c) => &c.$field,
            Component::SignalW(c) => &c.$field,
            Component::SignalRW(c) => &c.$field,
            Component::SignalX(c) => &c.$field,
            Component::SignalRef(c) => &c.$field,
            Component::DeviceRef(c) => &c.$field,
        }
    };
}

impl Component {
    /// The PascalCase (or numeric) name.
    #[must_use]
    pub fn name(&self) -> &str {
        common_fields!(self, name)
    }

    /// The explicit label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        common_fields!(self, label).as_deref()
    }

    /// The tooltip description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        common_fields!(self, description).as_deref()
    }

    /// The label to display: the explicit label or the title-cased name.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.label()
            .map_or_else(|| to_title_case(self.name()), str::to_string)
    }

    /// The group, if this is one.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Tag used in device files.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Group(_) => "Group",
            Self::SignalR(_) => "SignalR",
            Self::SignalW(_) => "SignalW",
            Self::SignalRW(_) => "SignalRW",
            Self::SignalX(_) => "SignalX",
            Self::SignalRef(_) => "SignalRef",
            Self::DeviceRef(_) => "DeviceRef",
        }
    }
}

/// Group of child components in a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub layout: Layout,
    #[serde(default)]
    pub children: Tree,
}

impl Group {
    /// An unlabelled group.
    #[must_use]
    pub fn new(name: impl Into<String>, layout: Layout, children: Tree) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            layout,
            children,
        }
    }

    /// The label to display: the explicit label or the title-cased name.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| to_title_case(&self.name))
    }

    /// `true` when the group has more than one child and every child is a
    /// `Row` group, so it displays as a table.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.children.len() > 1
            && self
                .children
                .iter()
                .all(|child| child.as_group().is_some_and(|g| g.layout.is_row()))
    }
}

/// Read-only signal backed by a single PV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalR {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub read_pv: String,
    #[serde(default)]
    pub read_widget: ReadWidget,
}

impl SignalR {
    /// A read signal shown with `widget`.
    #[must_use]
    pub fn new(name: impl Into<String>, read_pv: impl Into<String>, widget: ReadWidget) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            read_pv: read_pv.into(),
            read_widget: widget,
        }
    }
}

/// Write-only signal backed by a single PV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalW {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub write_pv: String,
    #[serde(default)]
    pub write_widget: WriteWidget,
}

impl SignalW {
    /// A write signal controlled with `widget`.
    #[must_use]
    pub fn new(name: impl Into<String>, write_pv: impl Into<String>, widget: WriteWidget) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            write_pv: write_pv.into(),
            write_widget: widget,
        }
    }
}

/// Read/write signal backed by a demand PV and an optional readback PV.
///
/// Without a `read_pv` the demand PV is also the readback and no readback
/// widget is shown unless `read_widget` is set. With a `read_pv` and no
/// `read_widget`, a `TextRead` is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRW {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub write_pv: String,
    #[serde(default)]
    pub write_widget: WriteWidget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_pv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_widget: Option<ReadWidget>,
}

impl SignalRW {
    /// A read/write signal on `write_pv` with a separate `read_pv`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        write_pv: impl Into<String>,
        write_widget: WriteWidget,
        read_pv: Option<String>,
        read_widget: Option<ReadWidget>,
    ) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            write_pv: write_pv.into(),
            write_widget,
            read_pv,
            read_widget,
        }
    }

    /// The readback PV, falling back to the demand PV.
    #[must_use]
    pub fn effective_read_pv(&self) -> &str {
        match self.read_pv.as_deref() {
            Some(pv) if !pv.is_empty() => pv,
            _ => &self.write_pv,
        }
    }

    /// The readback widget to display, if any.
    #[must_use]
    pub fn effective_read_widget(&self) -> Option<ReadWidget> {
        match (&self.read_widget, self.read_pv.as_deref()) {
            (Some(widget), _) => Some(widget.clone()),
            (None, Some(pv)) if !pv.is_empty() => Some(ReadWidget::default()),
            (None, _) => None,
        }
    }
}

/// Signal that writes `value` to a PV when triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalX {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub write_pv: String,
    #[serde(default = "default_value")]
    pub value: String,
}

fn default_value() -> String {
    "1".to_string()
}

impl SignalX {
    /// An action writing `value` to `write_pv`.
    #[must_use]
    pub fn new(name: impl Into<String>, write_pv: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            write_pv: write_pv.into(),
            value: value.into(),
        }
    }
}

/// Reference to another signal with the same name in this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reference to another device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// PVI PV of the child device.
    pub pv: String,
    /// UI file to open for the child device.
    pub ui: String,
    /// Macro values for the UI file.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub macros: IndexMap<String, String>,
}

/// Depth-first iterator over the non-group components of a tree.
///
/// Groups are descended into but never yielded.
pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, Component>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(Component::Group(group)) => self.stack.push(group.children.iter()),
                Some(component) => return Some(component),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Walks `tree` depth first, yielding every non-group component.
#[must_use]
pub fn walk(tree: &[Component]) -> Walk<'_> {
    Walk {
        stack: vec![tree.iter()],
    }
}
