//! `pvi-convert` - Conversion of asyn driver templates and sources.
//!
//! The pipeline runs in stages:
//!
//! - **Extraction**: [`RecordExtractor`] reads the records of a template and
//!   keeps the asyn ones
//! - **Classification**: [`classify`] matches read and write records on their
//!   driver info string and builds [`AsynParameter`]s
//! - **Source conversion**: [`SourceConverter`] maps driver info strings to
//!   index names and rewrites the driver to use a generated ParamSet
//! - **Production**: an [`AsynProducer`] writes the records, the ParamSet
//!   header and the device of its parameters
//!
//! # Example
//!
//! ```
//! use pvi_convert::{Template, TemplateConverter};
//!
//! let template = Template::new(
//!     "camera",
//!     r#"record(bo, "$(P)$(R)Start") { field(DTYP, "asynInt32") field(OUT, "@asyn($(PORT))START") }"#,
//! );
//! let conversion = TemplateConverter::new(vec![template]).convert().unwrap();
//! assert_eq!(conversion.drv_infos(), ["START"]);
//! ```

#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod extract;
pub mod fields;
pub mod kinds;
pub mod parameter;
pub mod producer;
pub mod record;
pub mod release;
pub mod source;
pub mod template;

pub use classify::{classify, sort_records, Classification, FieldClash, Parameter, SettingPair};
pub use error::{ConvertError, Result};
pub use extract::{producer_macros, RecordExtractor};
pub use fields::FieldTable;
pub use kinds::{AsynKind, KindSignature, KINDS};
pub use parameter::{
    merge_in_index_names, parameters, template_parameters, Access, AsynParameter, DisplayForm,
    ParameterGroup, ParameterNode,
};
pub use producer::{
    find_parameters, param_set_name, truncate_description, AsynProducer, PRODUCER_SUFFIX,
};
pub use record::{AsynMacros, AsynRecord, Record, Rejection, Role};
pub use release::{find_parent_modules, producer_search_paths, PVI_DIR};
pub use source::{RewrittenSource, SourceConverter};
pub use template::{Conversion, Template, TemplateConverter, OVERRIDE_DESC};
