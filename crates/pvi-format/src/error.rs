//! Layout and rendering errors.

use thiserror::Error;

/// Errors laying out or rendering a screen.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A `Row` header does not have one label per child.
    #[error("header of row '{group}' has {header} labels for {children} children")]
    RowHeaderMismatch {
        group: String,
        header: usize,
        children: usize,
    },

    /// A sub-screen was found on a screen that is itself a sub-screen.
    #[error("sub-screen '{group}' is nested inside another sub-screen")]
    NestedSubScreen { group: String },

    /// A `Grid` group that is not a table was found inside another group.
    #[error("cannot nest grid group '{group}' in another group on one screen")]
    NestedGroup { group: String },

    /// A `SignalRef` names no signal laid out before it.
    #[error("signal reference '{name}' does not name a signal on this screen")]
    UnknownSignalRef { name: String },

    /// Splitting bounds asked for more width than they have.
    #[error("can't split off {width} from {available}")]
    NoRoom { width: i32, available: i32 },

    /// A widget template lookup did not find exactly one snippet.
    #[error("expected one template snippet matching '{query}', found {matches}")]
    MissingTemplate { query: String, matches: usize },

    /// A template snippet has no single placeholder for a property.
    #[error("no single replacement for property '{property}'")]
    MissingProperty { property: String },

    /// A screen template cannot be split into screen and widgets.
    #[error("invalid screen template: {reason}")]
    InvalidTemplate { reason: String },

    /// A preset name is not one of the known presets.
    #[error("unknown preset '{name}', expected one of dls-edl, dls-bob, aps-adl")]
    UnknownPreset { name: String },

    /// A property pattern built from a property name is not a valid regex.
    #[error("invalid property pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A BOB template or snippet is not well-formed XML.
    #[error("invalid XML template: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Result alias for layout and rendering operations.
pub type Result<T> = std::result::Result<T, FormatError>;
