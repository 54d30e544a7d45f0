//! Layout parameters of a screen style.

use serde::{Deserialize, Serialize};

/// Sizes and spacings that control where widgets go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenLayout {
    /// Gap between widgets and around group contents.
    pub spacing: i32,
    /// Height of the screen title.
    pub title_height: i32,
    /// Height at which a column is full and widgets move to the next one.
    pub max_height: i32,
    /// Height of a group title.
    pub group_label_height: i32,
    /// Width of the label column.
    pub label_width: i32,
    /// Width of a widget next to a label.
    pub widget_width: i32,
    /// Height of one row of widgets.
    pub widget_height: i32,
    /// Indent of top-level widgets so they line up with group contents.
    pub group_widget_indent: i32,
    /// Extra width given to every group.
    pub group_width_offset: i32,
}

impl ScreenLayout {
    /// DLS style for EDM screens.
    pub const DLS_EDL: Self = Self {
        spacing: 5,
        title_height: 25,
        max_height: 900,
        group_label_height: 10,
        label_width: 115,
        widget_width: 120,
        widget_height: 20,
        group_widget_indent: 5,
        group_width_offset: 0,
    };

    /// DLS style for Phoebus screens.
    pub const DLS_BOB: Self = Self {
        spacing: 4,
        title_height: 28,
        max_height: 900,
        group_label_height: 26,
        label_width: 120,
        widget_width: 120,
        widget_height: 20,
        group_widget_indent: 18,
        group_width_offset: 26,
    };

    /// APS style for MEDM screens.
    pub const APS_ADL: Self = Self {
        spacing: 5,
        title_height: 25,
        max_height: 900,
        group_label_height: 25,
        label_width: 205,
        widget_width: 100,
        widget_height: 20,
        group_widget_indent: 0,
        group_width_offset: 0,
    };

    /// Width of a labelled widget row.
    #[must_use]
    pub const fn full_width(&self) -> i32 {
        self.label_width + self.widget_width + 2 * self.spacing
    }
}
