//! Table of the fields each record type accepts.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::error;

use crate::error::{ConvertError, Result};

const BUILTIN: &str = include_str!("../data/record_fields.toml");

static BUILTIN_TABLE: Lazy<FieldTable> = Lazy::new(|| {
    FieldTable::from_toml_str(BUILTIN).unwrap_or_else(|err| {
        error!(%err, "built-in record field table is invalid");
        FieldTable::default()
    })
});

/// Record type → field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldTable {
    #[serde(default)]
    record_types: IndexMap<String, Vec<String>>,
}

impl FieldTable {
    /// The table for the record types of the kind registry.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_TABLE
    }

    /// Parses a table from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Fields of `record_type`, empty for unknown types.
    #[must_use]
    pub fn fields(&self, record_type: &str) -> &[String] {
        self.record_types
            .get(record_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `record_type` accepts `field`.
    #[must_use]
    pub fn knows(&self, record_type: &str, field: &str) -> bool {
        self.fields(record_type).iter().any(|f| f == field)
    }

    /// Splits `fields` into those of the read record and those of the write
    /// record. A field both types accept, or neither does, goes to both.
    #[must_use]
    pub fn split(
        &self,
        read_type: &str,
        write_type: &str,
        fields: &IndexMap<String, String>,
    ) -> (IndexMap<String, String>, IndexMap<String, String>) {
        let mut read = IndexMap::new();
        let mut write = IndexMap::new();
        for (name, value) in fields {
            let in_read = self.knows(read_type, name);
            let in_write = self.knows(write_type, name);
            if in_read || !in_write {
                read.insert(name.clone(), value.clone());
            }
            if in_write || !in_read {
                write.insert(name.clone(), value.clone());
            }
        }
        (read, write)
    }
}
