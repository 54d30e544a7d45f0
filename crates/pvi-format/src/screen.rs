//! The layout engine: turns a component tree into positioned widgets.
//!
//! Widgets are placed top to bottom in columns. A component that would end
//! below the maximum height is laid out again at the top of the next column,
//! so no component is ever split between columns. Two cursors are threaded
//! through the recursion: the next free slot of the current column and of the
//! column after it. Whichever column takes a component has its cursor moved
//! below it.
//!
//! `SubScreen` groups and tables are replaced by a button, and their children
//! are laid out on a screen of their own.

use indexmap::IndexMap;
use pvi_device::{
    Component, Group, Layout, ReadWidget, SignalR, SignalX, Widget, WriteWidget,
};
use tracing::{debug, warn};

use crate::bounds::{count, Bounds};
use crate::error::{FormatError, Result};
use crate::formatter::{
    max_x, max_y, next_x, next_y, GroupFormatter, SubScreenFormatter, WidgetFormatter,
};
use crate::layout::ScreenLayout;

/// Tooltip of labels for components without a description.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Height of a table in widget rows; the row count is not known when laying
/// out.
const TABLE_ROWS: i32 = 10;

/// Width of each table column.
const TABLE_COLUMN_WIDTH: i32 = 100;

/// A laid out screen and the sub-screens it opens, by file name.
pub type ScreenFormatters = (GroupFormatter, Vec<(String, GroupFormatter)>);

/// Lays out the components of one screen and its sub-screens.
///
/// Each top-level call starts from an empty signal registry, so one factory
/// can lay out several devices in turn. Sub-screens see the refs of the
/// screen that opens them.
#[derive(Debug, Clone)]
pub struct ScreenFormatterFactory {
    layout: ScreenLayout,
    prefix: String,
    base_file_name: String,
    nested: bool,
    components: IndexMap<String, Component>,
}

impl ScreenFormatterFactory {
    /// A factory prefixing every PV with `prefix` and naming sub-screens
    /// after `base_file_name`.
    #[must_use]
    pub fn new(
        layout: ScreenLayout,
        prefix: impl Into<String>,
        base_file_name: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            prefix: prefix.into(),
            base_file_name: base_file_name.into(),
            nested: false,
            components: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    /// Lays out `components` as a screen titled `title`.
    ///
    /// A lone `SubScreen` group is expanded in place: this is how the content
    /// of a sub-screen is laid out once its button has been placed.
    pub fn create_screen_formatter(
        &mut self,
        components: &[Component],
        title: &str,
    ) -> Result<ScreenFormatters> {
        if !self.nested {
            self.components.clear();
        }

        let layout = self.layout;
        let full_w = layout.full_width();
        let screen_bounds = Bounds::new(0, 0, 0, layout.max_height);

        let (components, add_label) = match components {
            [Component::Group(group)] if group.layout.is_sub_screen() => {
                (group.children.as_slice(), group.layout.labelled())
            }
            _ => (components, true),
        };

        let mut column = Bounds::sized(full_w, layout.widget_height);
        let mut screen_widgets: Vec<WidgetFormatter> = Vec::new();
        for component in components {
            let mut next_column = Bounds::new(
                next_x(&screen_widgets, layout.spacing),
                0,
                full_w,
                layout.widget_height,
            );

            let moved;
            let component = match component {
                Component::SignalR(signal)
                    if signal.read_widget == ReadWidget::ImageRead && components.len() != 1 =>
                {
                    // Images get a screen of their own.
                    moved = Component::Group(Group::new(
                        signal.name.clone(),
                        Layout::sub_screen(),
                        vec![component.clone()],
                    ));
                    &moved
                }
                _ => component,
            };

            let widgets = match component {
                Component::Group(group) if !group.layout.is_row() => self.create_group_formatters(
                    group,
                    &screen_bounds,
                    &mut column,
                    &mut next_column,
                )?,
                _ => self.create_component_widget_formatters(
                    component,
                    &screen_bounds,
                    &mut column,
                    &mut next_column,
                    true,
                    add_label,
                )?,
            };
            screen_widgets.extend(widgets);

            if next_column.y != 0 {
                column = next_column;
            }
        }

        let sub_screens = self.create_sub_screen_formatters(&screen_widgets)?;

        let bounds = Bounds::sized(max_x(&screen_widgets), max_y(&screen_widgets))
            .added_to(&padding(layout.spacing, layout.title_height));
        debug!(title, w = bounds.w, h = bounds.h, "laid out screen");
        Ok((
            GroupFormatter {
                bounds,
                title: title.to_string(),
                children: screen_widgets,
            },
            sub_screens,
        ))
    }

    /// Lays out the screens opened by the sub-screen buttons at the top level
    /// of `screen_widgets` or inside one of its groups.
    fn create_sub_screen_formatters(
        &self,
        screen_widgets: &[WidgetFormatter],
    ) -> Result<Vec<(String, GroupFormatter)>> {
        let root = screen_widgets.iter().filter_map(as_sub_screen);
        let in_groups = screen_widgets
            .iter()
            .filter_map(|widget| match widget {
                WidgetFormatter::Group(group) => Some(group.children.iter()),
                _ => None,
            })
            .flatten()
            .filter_map(as_sub_screen);

        let mut sub_screens = Vec::new();
        for sub_screen in root.chain(in_groups) {
            // References to existing screens have nothing to lay out.
            let Some(group) = &sub_screen.components else {
                continue;
            };
            if self.nested {
                return Err(FormatError::NestedSubScreen {
                    group: group.name.clone(),
                });
            }

            debug!(file = %sub_screen.file_name, "laying out sub-screen");
            let mut factory = Self {
                layout: self.layout,
                prefix: self.prefix.clone(),
                base_file_name: sub_screen.file_name.clone(),
                nested: true,
                components: self.components.clone(),
            };
            let (screen, nested) = factory.create_screen_formatter(
                &[Component::Group(group.clone())],
                &group.display_label(),
            )?;
            sub_screens.push((sub_screen.file_name.clone(), screen));
            sub_screens.extend(nested);
        }
        Ok(sub_screens)
    }

    /// Widgets for a top-level group: one group widget, or a sub-screen
    /// button for tables and `SubScreen` groups.
    fn create_group_formatters(
        &mut self,
        group: &Group,
        screen_bounds: &Bounds,
        column: &mut Bounds,
        next_column: &mut Bounds,
    ) -> Result<Vec<WidgetFormatter>> {
        if group.is_table() || group.layout.is_sub_screen() {
            let sub_screen = as_sub_screen_group(group);
            return self.create_component_widget_formatters(
                &sub_screen,
                screen_bounds,
                column,
                next_column,
                true,
                false,
            );
        }

        let spacing = self.layout.spacing;
        let mut formatter = self.create_group_formatter(
            group,
            Bounds::new(column.x, column.y, 0, screen_bounds.h),
        )?;
        if formatter.bounds.bottom() <= screen_bounds.h {
            formatter.bounds.w += self.layout.group_width_offset;
            column.y = formatter.bounds.bottom() + spacing;
        } else {
            // Won't fit in this column, start the next one.
            formatter = self.create_group_formatter(
                group,
                Bounds::new(next_column.x, next_column.y, 0, screen_bounds.h),
            )?;
            formatter.bounds.w += self.layout.group_width_offset;
            next_column.y = formatter.bounds.bottom() + spacing;
        }
        Ok(vec![WidgetFormatter::Group(formatter)])
    }

    /// Lays out the children of `group` as rows inside a group widget at the
    /// position of `bounds`. The height of `bounds` limits each column.
    fn create_group_formatter(&mut self, group: &Group, bounds: Bounds) -> Result<GroupFormatter> {
        let layout = self.layout;
        let full_w = layout.full_width();
        let mut column = Bounds::sized(full_w, layout.widget_height);
        let mut widgets: Vec<WidgetFormatter> = Vec::new();

        for child in &group.children {
            let converted;
            let component = match child {
                Component::Group(inner) if !inner.layout.is_row() && !inner.layout.is_sub_screen() => {
                    if !inner.is_table() {
                        return Err(FormatError::NestedGroup {
                            group: inner.name.clone(),
                        });
                    }
                    converted = as_sub_screen_group(inner);
                    &converted
                }
                _ => child,
            };

            let mut next_column = Bounds::new(
                next_x(&widgets, layout.spacing),
                0,
                full_w,
                layout.widget_height,
            );
            widgets.extend(self.create_component_widget_formatters(
                component,
                &bounds,
                &mut column,
                &mut next_column,
                false,
                group.layout.labelled(),
            )?);
            if next_column.y != 0 {
                column = next_column;
            }
        }

        let contents = Bounds::new(bounds.x, bounds.y, max_x(&widgets), max_y(&widgets));
        Ok(GroupFormatter {
            bounds: contents.added_to(&padding(layout.spacing, layout.group_label_height)),
            title: group.display_label(),
            children: widgets,
        })
    }

    /// Widgets for one component in the current column, or at the top of the
    /// next column when they would end below `parent_bounds`.
    fn create_component_widget_formatters(
        &mut self,
        component: &Component,
        parent_bounds: &Bounds,
        column: &mut Bounds,
        next_column: &mut Bounds,
        indent: bool,
        add_label: bool,
    ) -> Result<Vec<WidgetFormatter>> {
        let mut current = *column;
        let mut next = *next_column;
        if indent {
            current.indent(self.layout.group_widget_indent);
            next.indent(self.layout.group_widget_indent);
        }

        let widgets = self.generate_component_formatters(component, current, add_label)?;
        if max_y(&widgets) <= parent_bounds.h {
            column.y = next_y(&widgets, self.layout.spacing);
            return Ok(widgets);
        }

        let widgets = self.generate_component_formatters(component, next, add_label)?;
        next_column.y = next_y(&widgets, self.layout.spacing);
        Ok(widgets)
    }

    /// Converts a component into widgets starting at `bounds`.
    fn generate_component_formatters(
        &mut self,
        component: &Component,
        bounds: Bounds,
        add_label: bool,
    ) -> Result<Vec<WidgetFormatter>> {
        let layout = self.layout;
        if !matches!(component, Component::SignalRef(_) | Component::Group(_)) {
            self.components
                .insert(component.name().to_string(), component.clone());
        }

        let mut widgets = Vec::new();
        let mut component_bounds = bounds;
        let mut add_label = add_label;

        let row_components: Vec<Component> = match component {
            Component::Group(group) if group.layout.is_row() => {
                if let Some(header) = group.layout.header() {
                    widgets.extend(self.header_formatters(group, header, component_bounds, add_label)?);
                    component_bounds.y += layout.widget_height + layout.spacing;
                }
                component_bounds =
                    component_bounds.tile(count(group.children.len()), 1, layout.spacing);
                group.children.clone()
            }
            Component::SignalW(signal) => match &signal.write_widget {
                WriteWidget::ButtonPanel { actions } => button_actions(actions, &signal.write_pv),
                WriteWidget::TableWrite { widgets: columns } => {
                    add_label = false;
                    component_bounds = table_bounds(component_bounds, columns.len());
                    vec![component.clone()]
                }
                _ => vec![component.clone()],
            },
            Component::SignalRW(signal) => match &signal.write_widget {
                WriteWidget::ButtonPanel { actions } => {
                    let mut row = button_actions(actions, &signal.write_pv);
                    if let Some(read_widget) = signal.effective_read_widget() {
                        row.push(Component::SignalR(SignalR::new(
                            signal.name.clone(),
                            signal.effective_read_pv(),
                            read_widget,
                        )));
                    }
                    row
                }
                WriteWidget::TableWrite { widgets: columns } => {
                    add_label = false;
                    component_bounds = table_bounds(component_bounds, columns.len());
                    vec![component.clone()]
                }
                _ => vec![component.clone()],
            },
            Component::SignalR(signal) => {
                match &signal.read_widget {
                    ReadWidget::TableRead { widgets: columns } => {
                        add_label = false;
                        component_bounds = table_bounds(component_bounds, columns.len());
                    }
                    ReadWidget::ImageRead => add_label = false,
                    _ => {}
                }
                vec![component.clone()]
            }
            _ => vec![component.clone()],
        };

        let row_bounds = if add_label {
            let (left, right) = component_bounds.split_left(layout.label_width, layout.spacing)?;
            widgets.push(WidgetFormatter::Label {
                bounds: left,
                text: component.display_label(),
                tooltip: component
                    .description()
                    .unwrap_or(NO_DESCRIPTION)
                    .to_string(),
            });
            right
        } else {
            component_bounds
        };

        if let Component::SignalRef(signal) = component {
            let target = self.components.get(&signal.name).cloned().ok_or_else(|| {
                FormatError::UnknownSignalRef {
                    name: signal.name.clone(),
                }
            })?;
            // The reference already has its label.
            widgets.extend(self.generate_component_formatters(&target, row_bounds, false)?);
            return Ok(widgets);
        }

        widgets.extend(self.generate_row_component_formatters(&row_components, row_bounds));
        Ok(widgets)
    }

    /// Column headings of a row, scaled to leave room for the label column
    /// when the row is labelled.
    #[allow(clippy::cast_possible_truncation)]
    fn header_formatters(
        &self,
        group: &Group,
        header: &[String],
        bounds: Bounds,
        add_label: bool,
    ) -> Result<Vec<WidgetFormatter>> {
        let layout = self.layout;
        if header.len() != group.children.len() {
            return Err(FormatError::RowHeaderMismatch {
                group: group.name.clone(),
                header: header.len(),
                children: group.children.len(),
            });
        }

        let mut header_bounds = bounds;
        if add_label {
            let original_width = count(header.len()) * (header_bounds.w + layout.spacing);
            let label_width = layout.label_width + layout.spacing;
            let scale = f64::from(original_width - label_width) / f64::from(original_width);
            header_bounds.w = (f64::from(header_bounds.w) * scale) as i32;
            header_bounds.indent(label_width);
        }

        Ok(header
            .iter()
            .map(|text| {
                let formatter = WidgetFormatter::Header {
                    bounds: header_bounds,
                    text: text.clone(),
                };
                header_bounds.x += header_bounds.w + layout.spacing;
                formatter
            })
            .collect())
    }

    /// Splits `row_bounds` equally between `row_components`.
    fn generate_row_component_formatters(
        &self,
        row_components: &[Component],
        row_bounds: Bounds,
    ) -> Vec<WidgetFormatter> {
        let spacing = self.layout.spacing;
        let mut widgets = Vec::new();
        for (bounds, component) in row_bounds
            .split_into(row_components.len(), spacing)
            .into_iter()
            .zip(row_components)
        {
            match component {
                Component::SignalX(signal) => widgets.push(WidgetFormatter::Action {
                    bounds,
                    label: component.display_label(),
                    pv: self.pv(&signal.write_pv),
                    value: signal.value.clone(),
                }),
                Component::SignalRW(signal) => match signal.effective_read_widget() {
                    Some(read_widget) => {
                        let halves = bounds.split_into(2, spacing);
                        widgets.push(self.pv_widget_formatter(
                            signal.write_widget.clone().into(),
                            halves[0],
                            &signal.write_pv,
                        ));
                        widgets.push(self.pv_widget_formatter(
                            read_widget.into(),
                            halves[1],
                            signal.effective_read_pv(),
                        ));
                    }
                    None => widgets.push(self.pv_widget_formatter(
                        signal.write_widget.clone().into(),
                        bounds,
                        &signal.write_pv,
                    )),
                },
                Component::SignalW(signal) => widgets.push(self.pv_widget_formatter(
                    signal.write_widget.clone().into(),
                    bounds,
                    &signal.write_pv,
                )),
                Component::SignalR(signal) => widgets.push(self.pv_widget_formatter(
                    signal.read_widget.clone().into(),
                    bounds,
                    &signal.read_pv,
                )),
                Component::Group(group) if group.layout.is_sub_screen() => {
                    widgets.push(WidgetFormatter::SubScreen(SubScreenFormatter {
                        bounds,
                        label: group.display_label(),
                        file_name: format!(
                            "{}_{}",
                            self.base_file_name,
                            group.name.replace(' ', "_")
                        ),
                        components: Some(group.clone()),
                        macros: IndexMap::new(),
                    }));
                }
                Component::DeviceRef(device) => {
                    let label = device.macros.values().cloned().collect::<Vec<_>>().join(" ");
                    widgets.push(WidgetFormatter::SubScreen(SubScreenFormatter {
                        bounds,
                        label: if label.is_empty() {
                            component.display_label()
                        } else {
                            label
                        },
                        file_name: device.ui.clone(),
                        components: None,
                        macros: device.macros.clone(),
                    }));
                }
                _ => warn!(
                    component = component.name(),
                    kind = component.kind(),
                    "ignoring row component"
                ),
            }
        }
        widgets
    }

    fn pv_widget_formatter(&self, widget: Widget, bounds: Bounds, pv: &str) -> WidgetFormatter {
        let mut bounds = bounds;
        if let Some(options) = widget.text_options() {
            bounds.h *= i32::try_from(options.lines()).unwrap_or(1);
        }
        WidgetFormatter::Pv {
            bounds,
            pv: self.pv(pv),
            widget,
        }
    }

    fn pv(&self, pv: &str) -> String {
        format!("{}{pv}", self.prefix)
    }
}

/// Padding of a group or screen with a title `title_height` high.
fn padding(spacing: i32, title_height: i32) -> Bounds {
    let padding = Bounds::with_title(spacing, title_height);
    Bounds::sized(padding.w, padding.h)
}

fn as_sub_screen(widget: &WidgetFormatter) -> Option<&SubScreenFormatter> {
    match widget {
        WidgetFormatter::SubScreen(sub_screen) => Some(sub_screen),
        _ => None,
    }
}

/// `group` with a `SubScreen` layout, keeping its own if it has one.
fn as_sub_screen_group(group: &Group) -> Component {
    let layout = if group.layout.is_sub_screen() {
        group.layout.clone()
    } else {
        Layout::sub_screen()
    };
    Component::Group(Group {
        layout,
        ..group.clone()
    })
}

fn button_actions(actions: &IndexMap<String, String>, write_pv: &str) -> Vec<Component> {
    actions
        .iter()
        .map(|(action, value)| Component::SignalX(SignalX::new(action.clone(), write_pv, value.clone())))
        .collect()
}

fn table_bounds(bounds: Bounds, columns: usize) -> Bounds {
    Bounds {
        w: TABLE_COLUMN_WIDTH * count(columns),
        h: bounds.h * TABLE_ROWS,
        ..bounds
    }
}
