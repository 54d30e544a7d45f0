//! Conversion errors.

#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of a conversion run.
///
/// Records that are merely not convertible are dropped during extraction and
/// never surface here.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No parameter kind matches the record type and DTYP of an asyn record.
    #[error("{record} asyn type: ({record_type}, {dtyp}) not found")]
    UnknownAsynKind {
        record: String,
        record_type: String,
        dtyp: String,
    },

    /// A `createParam` call names a string constant with no `#define`.
    #[error("String drvInfoString mapping not found for string: index pair {string}:{index}")]
    MissingDefine { string: String, index: String },

    /// More than one read/write pair formed for one driver info string.
    #[error("driver info '{drv_info}' is shared by more than one read/write pair: {}", records.join(", "))]
    DuplicateJoinKey {
        drv_info: String,
        records: Vec<String>,
    },

    /// The header has no `class X : public Y` declaration.
    #[error("can't find device class and parent class in header")]
    MissingClass,

    /// The header does not include its parent class header.
    #[error("can't find '#include \"{parent}.h\"' in header")]
    MissingParentInclude { parent: String },

    /// The header class has no `protected:` section.
    #[error("can't find 'protected:' in header")]
    MissingProtected,

    /// A source pattern built from a class or index name is not a valid regex.
    #[error("invalid source pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A RELEASE file pattern is not a valid glob.
    #[error("invalid release file pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A record-field table is not valid TOML.
    #[error("invalid record field table: {0}")]
    FieldTable(#[from] toml::de::Error),

    /// Reading or writing a file failed.
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A producer file is not valid JSON for the producer model.
    #[error("failed to parse producer '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a producer failed.
    #[error("failed to serialize producer: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A parent producer file was not found on the search path.
    #[error("cannot find {file} in {paths:?}")]
    ProducerNotFound { file: String, paths: Vec<PathBuf> },
}

/// Result alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
