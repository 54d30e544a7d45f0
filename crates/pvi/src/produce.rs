//! `pvi produce`: one artifact from a producer file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use pvi_convert::{AsynProducer, FieldTable};
use pvi_device::DEVICE_SUFFIX;

use crate::convert::write;

/// Artifacts a producer can write, chosen by output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Database template with the parameter records.
    Records,
    /// C++ header of the ParamSet class.
    ParamSetHeader,
    /// Device file for screens.
    Device,
}

impl Artifact {
    /// The artifact `output` names, from its extension.
    #[must_use]
    pub fn for_output(output: &Path) -> Option<Self> {
        let name = output.file_name()?.to_str()?;
        if name.ends_with(DEVICE_SUFFIX) {
            Some(Self::Device)
        } else if name.ends_with(".template") || name.ends_with(".db") {
            Some(Self::Records)
        } else if name.ends_with(".h") {
            Some(Self::ParamSetHeader)
        } else {
            None
        }
    }
}

/// Writes the artifact named by `output` from the producer at `producer`.
pub fn produce(output: &Path, producer: &Path, table: &FieldTable) -> anyhow::Result<PathBuf> {
    let Some(artifact) = Artifact::for_output(output) else {
        bail!(
            "can't tell what to produce for '{}': expected .template, .h or {DEVICE_SUFFIX}",
            output.display()
        );
    };
    let producer = AsynProducer::load(producer)
        .with_context(|| format!("failed to load producer '{}'", producer.display()))?;

    let text = match artifact {
        Artifact::Records => producer.produce_records(table),
        Artifact::ParamSetHeader => {
            let stem = output
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            producer.produce_param_set_header(&stem)
        }
        Artifact::Device => producer.produce_device().to_json()?,
    };

    let dir = output.parent().unwrap_or_else(|| Path::new(""));
    let name = output
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("'{}' has no file name", output.display()))?;
    write(dir, name, &text)
}
