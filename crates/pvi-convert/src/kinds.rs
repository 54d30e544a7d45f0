//! Registry of asyn parameter kinds.
//!
//! Each kind names the record types and DTYPs of its read and write records
//! and the asyn parameter type the driver registers. Records are matched
//! against this table to find the kind of the parameter they belong to.

use pvi_device::{ReadWidget, TextFormat, TextOptions, WriteWidget};
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::record::{AsynRecord, Role};

/// The kind of an asyn parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsynKind {
    Binary,
    Busy,
    Float64,
    Int32,
    Long,
    MultiBitBinary,
    String,
    Waveform,
    Int32Waveform,
    Float64Waveform,
}

/// Record types, DTYPs and asyn parameter type of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSignature {
    pub kind: AsynKind,
    pub read_record: &'static str,
    pub write_record: &'static str,
    pub dtyp_read: &'static str,
    pub dtyp_write: &'static str,
    pub asyn_param: &'static str,
}

const fn signature(
    kind: AsynKind,
    records: (&'static str, &'static str),
    dtyps: (&'static str, &'static str),
    asyn_param: &'static str,
) -> KindSignature {
    KindSignature {
        kind,
        read_record: records.0,
        write_record: records.1,
        dtyp_read: dtyps.0,
        dtyp_write: dtyps.1,
        asyn_param,
    }
}

/// All kinds in lookup order. Binary precedes Busy so a `bi` read record
/// resolves to Binary.
pub static KINDS: &[KindSignature] = &[
    signature(
        AsynKind::Binary,
        ("bi", "bo"),
        ("asynInt32", "asynInt32"),
        "asynParamInt32",
    ),
    signature(
        AsynKind::Busy,
        ("bi", "busy"),
        ("asynInt32", "asynInt32"),
        "asynParamInt32",
    ),
    signature(
        AsynKind::Float64,
        ("ai", "ao"),
        ("asynFloat64", "asynFloat64"),
        "asynParamFloat64",
    ),
    signature(
        AsynKind::Int32,
        ("ai", "ao"),
        ("asynInt32", "asynInt32"),
        "asynParamInt32",
    ),
    signature(
        AsynKind::Long,
        ("longin", "longout"),
        ("asynInt32", "asynInt32"),
        "asynParamInt32",
    ),
    signature(
        AsynKind::MultiBitBinary,
        ("mbbi", "mbbo"),
        ("asynInt32", "asynInt32"),
        "asynParamInt32",
    ),
    signature(
        AsynKind::String,
        ("stringin", "stringout"),
        ("asynOctetRead", "asynOctetWrite"),
        "asynParamOctet",
    ),
    signature(
        AsynKind::Waveform,
        ("waveform", "waveform"),
        ("asynOctetRead", "asynOctetWrite"),
        "asynParamOctet",
    ),
    signature(
        AsynKind::Int32Waveform,
        ("waveform", "waveform"),
        ("asynInt32ArrayIn", "asynInt32ArrayOut"),
        "asynParamInt32",
    ),
    signature(
        AsynKind::Float64Waveform,
        ("waveform", "waveform"),
        ("asynFloat64ArrayIn", "asynFloat64ArrayOut"),
        "asynParamFloat64",
    ),
];

impl AsynKind {
    /// The registry row of this kind.
    #[must_use]
    pub fn signature(self) -> &'static KindSignature {
        // Rows are in variant order.
        &KINDS[self as usize]
    }

    /// Whether records of this kind are waveforms.
    #[must_use]
    pub fn is_waveform(self) -> bool {
        matches!(
            self,
            Self::Waveform | Self::Int32Waveform | Self::Float64Waveform
        )
    }

    /// Default widget for the read record.
    #[must_use]
    pub fn read_widget(self) -> ReadWidget {
        match self {
            Self::Binary | Self::Busy => ReadWidget::Led,
            Self::String | Self::Waveform => {
                ReadWidget::TextRead(TextOptions::with_format(TextFormat::String))
            }
            Self::Int32Waveform | Self::Float64Waveform => ReadWidget::ArrayTrace {
                axis: "y".to_string(),
            },
            Self::Float64 | Self::Int32 | Self::Long | Self::MultiBitBinary => {
                ReadWidget::default()
            }
        }
    }

    /// Default widget for the write record.
    #[must_use]
    pub fn write_widget(self) -> WriteWidget {
        match self {
            Self::Binary | Self::Busy => WriteWidget::CheckBox,
            Self::MultiBitBinary => WriteWidget::ComboBox { choices: None },
            Self::String | Self::Waveform => {
                WriteWidget::TextWrite(TextOptions::with_format(TextFormat::String))
            }
            Self::Int32Waveform | Self::Float64Waveform => WriteWidget::ArrayWrite {
                widget: Box::new(WriteWidget::default()),
            },
            Self::Float64 | Self::Int32 | Self::Long => WriteWidget::default(),
        }
    }

    /// Finds the kind of `record`.
    ///
    /// Waveforms are matched by DTYP alone since read and write records share
    /// the record type. Other records match record type and DTYP against the
    /// columns of their role.
    pub fn resolve(record: &AsynRecord) -> Result<Self> {
        let inner = record.record();
        let record_type = inner.record_type.as_str();
        let dtyp = inner.field("DTYP").unwrap_or_default();

        let found = if record_type == "waveform" {
            KINDS.iter().find(|s| {
                s.kind.is_waveform() && (s.dtyp_read == dtyp || s.dtyp_write == dtyp)
            })
        } else {
            let role = record.role();
            KINDS.iter().find(|s| match role {
                Role::Read => s.read_record == record_type && s.dtyp_read == dtyp,
                Role::Write => s.write_record == record_type && s.dtyp_write == dtyp,
            })
        };

        found
            .map(|signature| signature.kind)
            .ok_or_else(|| ConvertError::UnknownAsynKind {
                record: inner.name.clone(),
                record_type: record_type.to_string(),
                dtyp: dtyp.to_string(),
            })
    }
}
