//! `pvi-format` - Screen layout and rendering for PVI devices.
//!
//! The [`ScreenFormatterFactory`] lays a device's components out in columns
//! of labelled widgets, groups and sub-screen buttons. A [`ScreenRenderer`]
//! then turns the positioned widgets into an EDM (`.edl`), MEDM (`.adl`) or
//! Phoebus (`.bob`) screen by copying snippets from a template file.
//!
//! # Example
//!
//! ```
//! use pvi_device::{Component, Device, ReadWidget, SignalR};
//! use pvi_format::{DeviceFormatter, Preset};
//!
//! let device = Device::new(
//!     "Camera",
//!     vec![Component::SignalR(SignalR::new("Temperature", "Temp_RBV", ReadWidget::default()))],
//! );
//! let screens = DeviceFormatter::new(Preset::DlsEdl)
//!     .format(&device, "$(P)", "camera")
//!     .unwrap();
//! assert_eq!(screens[0].file_name, "camera.edl");
//! assert!(screens[0].text.contains("controlPv \"$(P)Temp_RBV\""));
//! ```

#![forbid(unsafe_code)]

pub mod bounds;
pub mod error;
pub mod formatter;
pub mod layout;
pub mod preset;
pub mod render;
pub mod screen;
pub mod template;

pub use bounds::Bounds;
pub use error::{FormatError, Result};
pub use formatter::{GroupFormatter, SubScreenFormatter, WidgetFormatter};
pub use layout::ScreenLayout;
pub use preset::{Preset, TemplateKind};
pub use render::{DeviceFormatter, FormattedScreen, ScreenRenderer};
pub use screen::{ScreenFormatterFactory, ScreenFormatters, NO_DESCRIPTION};
pub use template::{AdlTemplate, BobTemplate, EdlTemplate, UiTemplate};
