//! How a group lays out its children.

use serde::{Deserialize, Serialize};

/// Layout of a group's children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Layout {
    /// Children are traces of a plot.
    Plot,
    /// Children are columns in a single row.
    Row {
        /// Labels for the items in the row.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header: Option<Vec<String>>,
    },
    /// Children are rows in a grid.
    Grid {
        /// Use the children's names as labels.
        #[serde(default = "labelled_default")]
        labelled: bool,
    },
    /// Children are shown on another screen opened with a button.
    SubScreen {
        /// Display labels for the children.
        #[serde(default = "labelled_default")]
        labelled: bool,
    },
}

fn labelled_default() -> bool {
    true
}

impl Default for Layout {
    fn default() -> Self {
        Self::grid()
    }
}

impl Layout {
    /// A labelled grid.
    #[must_use]
    pub fn grid() -> Self {
        Self::Grid { labelled: true }
    }

    /// A labelled sub-screen.
    #[must_use]
    pub fn sub_screen() -> Self {
        Self::SubScreen { labelled: true }
    }

    /// Whether children get a label column. Rows and plots are never labelled.
    #[must_use]
    pub fn labelled(&self) -> bool {
        match self {
            Self::Grid { labelled } | Self::SubScreen { labelled } => *labelled,
            Self::Row { .. } | Self::Plot => false,
        }
    }

    /// `true` for `Row`.
    #[must_use]
    pub fn is_row(&self) -> bool {
        matches!(self, Self::Row { .. })
    }

    /// `true` for `SubScreen`.
    #[must_use]
    pub fn is_sub_screen(&self) -> bool {
        matches!(self, Self::SubScreen { .. })
    }

    /// `true` for `Grid`.
    #[must_use]
    pub fn is_grid(&self) -> bool {
        matches!(self, Self::Grid { .. })
    }

    /// Header labels of a row.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        match self {
            Self::Row { header } => header.as_deref(),
            _ => None,
        }
    }

    /// Tag used in device files.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plot => "Plot",
            Self::Row { .. } => "Row",
            Self::Grid { .. } => "Grid",
            Self::SubScreen { .. } => "SubScreen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let grid: Layout = serde_json::from_str(r#"{"type":"Grid"}"#).expect("deserialize");
        assert_eq!(grid, Layout::grid());
        assert!(grid.labelled());

        let row: Layout = serde_json::from_str(r#"{"type":"Row","header":["A","B"]}"#)
            .expect("deserialize");
        assert_eq!(row.header().map(<[String]>::len), Some(2));
        assert!(!row.labelled());
    }

    #[test]
    fn test_layout_serializes_tag_first() {
        let json = serde_json::to_string(&Layout::SubScreen { labelled: false }).expect("json");
        assert_eq!(json, r#"{"type":"SubScreen","labelled":false}"#);
    }
}
