//! `pvi` - Convert asyn driver templates and lay out EPICS device screens.
//!
//! The commands of the `pvi` binary as functions over paths:
//!
//! - [`convert::convert`] turns driver templates and source into a producer,
//!   its records template and ParamSet header
//! - [`produce::produce`] writes one artifact of a producer
//! - [`screens::format_device`] writes the screens of a device
//!
//! Settings come from an optional `pvi.toml` ([`config::Config`]).

#![forbid(unsafe_code)]

pub mod config;
pub mod convert;
pub mod logging;
pub mod produce;
pub mod screens;

pub use config::{Config, CONFIG_FILE};
pub use convert::{convert, ConvertOptions};
pub use produce::{produce, Artifact};
pub use screens::{format_device, FormatOptions};

pub use pvi_convert;
pub use pvi_device;
pub use pvi_format;
