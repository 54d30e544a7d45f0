//! `pvi-device` - Device component model for EPICS device interfaces.
//!
//! A [`Device`] is a labelled tree of [`Component`]s: signals backed by PVs,
//! references to other signals or devices, and groups that lay their children
//! out as a grid, a row, a plot or a sub-screen. Devices are stored as
//! `<Name>.pvi.device.json` and may name a parent device whose components are
//! merged in.
//!
//! # Example
//!
//! ```
//! use pvi_device::{Component, Device, SignalX};
//!
//! let device = Device::new("Camera", vec![Component::SignalX(SignalX::new("Start", "Acquire", "1"))]);
//! assert!(device.validate().is_ok());
//! assert_eq!(device.children[0].display_label(), "Start");
//! ```

#![forbid(unsafe_code)]

pub mod component;
pub mod device;
pub mod error;
pub mod layout;
pub mod naming;
pub mod widget;

pub use component::{
    walk, Component, DeviceRef, Group, SignalR, SignalRW, SignalRef, SignalW, SignalX, Tree,
};
pub use device::{find_components, Device, DEVICE_SUFFIX, ROOT_DEVICE};
pub use error::DeviceError;
pub use layout::Layout;
pub use naming::{enforce_pascal_case, is_pascal_case, is_valid_name, to_title_case};
pub use widget::{ReadWidget, TextFormat, TextOptions, Widget, WriteWidget};
