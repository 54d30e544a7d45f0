//! Classification of asyn records into parameters.
//!
//! Records are matched on their driver info string. A write record with no
//! read record of the same key is an [`Parameter::Action`], a read record with
//! no write record a [`Parameter::Readback`], and a read and write record
//! sharing a key a [`Parameter::SettingPair`]. Each parameter then becomes an
//! [`AsynParameter`].

use std::fmt;

use indexmap::IndexMap;
use pvi_device::enforce_pascal_case;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{ConvertError, Result};
use crate::kinds::AsynKind;
use crate::parameter::{Access, AsynParameter, DisplayForm};
use crate::record::{AsynRecord, Record, Role};

/// Fields that describe the record itself rather than the parameter.
pub const INVALID_FIELDS: [&str; 6] = ["DESC", "DTYP", "INP", "OUT", "PINI", "VAL"];

/// A field two paired records disagree on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldClash {
    /// Write record suffix of the pair.
    pub pair: String,
    /// Full name of the record whose value was replaced.
    pub record: String,
    pub field: String,
    /// Value of the dominant record, now used by both.
    pub chosen: String,
    pub discarded: String,
}

impl fmt::Display for FieldClash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pair: {}; Field: {}; Values: {}, {}; Using {} for both",
            self.pair, self.field, self.chosen, self.discarded, self.chosen
        )
    }
}

/// A read and a write record of one driver parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingPair {
    pub read: AsynRecord,
    pub write: AsynRecord,
}

impl SettingPair {
    /// Copies every field of the read record that the write record sets to a
    /// different value into the write record.
    pub fn resolve_clashes(&mut self) -> Vec<FieldClash> {
        let mut clashes = Vec::new();
        let pair = self.write.suffix().to_string();
        let subordinate = self.write.name().to_string();

        let dominant = self.read.record();
        let write = self.write.record_mut();
        for (field, chosen) in &dominant.fields {
            if INVALID_FIELDS.contains(&field.as_str()) {
                continue;
            }
            let Some(existing) = write.fields.get_mut(field) else {
                continue;
            };
            if existing != chosen {
                let clash = FieldClash {
                    pair: pair.clone(),
                    record: subordinate.clone(),
                    field: field.clone(),
                    chosen: chosen.clone(),
                    discarded: std::mem::replace(existing, chosen.clone()),
                };
                warn!("{clash}");
                clashes.push(clash);
            }
        }
        clashes
    }
}

/// The role a group of records plays for one driver parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Action { write: AsynRecord },
    Readback { read: AsynRecord },
    SettingPair(SettingPair),
}

impl Parameter {
    /// Builds the structured parameter.
    pub fn generate(&self) -> Result<AsynParameter> {
        match self {
            Self::Action { write } => {
                let mut parameter = from_write(write)?;
                parameter.access = Access::W;
                Ok(parameter)
            }
            Self::Readback { read } => from_read(read),
            Self::SettingPair(pair) => {
                let mut parameter = from_write(&pair.write)?;
                let read_suffix = pair.read.suffix();
                if read_suffix != format!("{}_RBV", parameter.name) {
                    parameter.read_record_suffix = Some(read_suffix.to_string());
                }
                if parameter.display_form.is_none() {
                    parameter.display_form = display_form(pair.read.record());
                }
                for (field, value) in valid_fields(pair.read.record()) {
                    parameter.record_fields.insert(field, value);
                }
                Ok(parameter)
            }
        }
    }
}

fn from_write(write: &AsynRecord) -> Result<AsynParameter> {
    let record = write.record();
    let suffix = write.suffix();
    let name = enforce_pascal_case(suffix);

    let mut parameter = AsynParameter::new(
        name.clone(),
        record.field("DESC").unwrap_or_default(),
        AsynKind::resolve(write)?,
    );
    if suffix != name {
        parameter.write_record_suffix = Some(suffix.to_string());
    }
    if write.join_key() != name {
        parameter.drv_info = Some(write.join_key().to_string());
    }
    if record
        .field("PINI")
        .is_some_and(|pini| pini.eq_ignore_ascii_case("yes"))
    {
        parameter.initial = Some(record.field("VAL").unwrap_or("0").to_string());
    }
    parameter.demand_auto_updates = record
        .infos
        .get("asyn:READBACK")
        .is_some_and(|value| value == "1");
    parameter.autosave = record
        .infos
        .get("autosaveFields")
        .map(|fields| fields.split(' ').filter(|f| !f.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    parameter.display_form = display_form(record);
    parameter.record_fields = valid_fields(record);
    Ok(parameter)
}

fn from_read(read: &AsynRecord) -> Result<AsynParameter> {
    let record = read.record();
    let suffix = read.suffix();
    let name = enforce_pascal_case(suffix.strip_suffix("_RBV").unwrap_or(suffix));

    let mut parameter = AsynParameter::new(
        name.clone(),
        record.field("DESC").unwrap_or_default(),
        AsynKind::resolve(read)?,
    );
    parameter.access = Access::R;
    if suffix != format!("{name}_RBV") {
        parameter.read_record_suffix = Some(suffix.to_string());
    }
    if read.join_key() != name {
        parameter.drv_info = Some(read.join_key().to_string());
    }
    parameter.display_form = display_form(record);
    parameter.record_fields = valid_fields(record);
    Ok(parameter)
}

fn display_form(record: &Record) -> Option<DisplayForm> {
    record
        .infos
        .get("Q:form")
        .and_then(|form| DisplayForm::from_info(form))
}

fn valid_fields(record: &Record) -> IndexMap<String, String> {
    record
        .fields
        .iter()
        .filter(|(field, _)| !INVALID_FIELDS.contains(&field.as_str()))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}

/// Splits `records` by role and matches them on their join key.
///
/// Actions come first, then Readbacks, then SettingPairs. Fails when one key
/// would form more than one SettingPair.
pub fn sort_records(records: Vec<AsynRecord>) -> Result<Vec<Parameter>> {
    let mut reads = Vec::new();
    let mut writes = Vec::new();
    let mut waveform_writes = Vec::new();
    for record in records {
        match record.role() {
            Role::Read => reads.push(record),
            Role::Write if record.record().fields.contains_key("OUT") => writes.push(record),
            Role::Write => waveform_writes.push(record),
        }
    }
    writes.extend(waveform_writes);

    let read_keys: FxHashMap<&str, usize> = count_keys(&reads);
    let write_keys: FxHashMap<&str, usize> = count_keys(&writes);

    for read in &reads {
        let key = read.join_key();
        let read_count = read_keys.get(key).copied().unwrap_or_default();
        let write_count = write_keys.get(key).copied().unwrap_or_default();
        if read_count * write_count > 1 {
            let records = reads
                .iter()
                .chain(&writes)
                .filter(|record| record.join_key() == key)
                .map(|record| record.name().to_string())
                .collect();
            return Err(ConvertError::DuplicateJoinKey {
                drv_info: key.to_string(),
                records,
            });
        }
    }

    let mut parameters = Vec::new();
    parameters.extend(
        writes
            .iter()
            .filter(|w| !read_keys.contains_key(w.join_key()))
            .map(|w| Parameter::Action { write: w.clone() }),
    );
    parameters.extend(
        reads
            .iter()
            .filter(|r| !write_keys.contains_key(r.join_key()))
            .map(|r| Parameter::Readback { read: r.clone() }),
    );
    for read in &reads {
        for write in writes.iter().filter(|w| w.join_key() == read.join_key()) {
            parameters.push(Parameter::SettingPair(SettingPair {
                read: read.clone(),
                write: write.clone(),
            }));
        }
    }
    Ok(parameters)
}

fn count_keys(records: &[AsynRecord]) -> FxHashMap<&str, usize> {
    let mut counts = FxHashMap::default();
    for record in records {
        *counts.entry(record.join_key()).or_insert(0) += 1;
    }
    counts
}

/// Parameters of one template and the clashes resolved while building them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub parameters: Vec<AsynParameter>,
    pub clashes: Vec<FieldClash>,
}

/// Sorts `records`, resolves clashes within each SettingPair and builds the
/// parameters.
pub fn classify(records: Vec<AsynRecord>) -> Result<Classification> {
    let mut classification = Classification::default();
    for mut parameter in sort_records(records)? {
        if let Parameter::SettingPair(pair) = &mut parameter {
            classification.clashes.extend(pair.resolve_clashes());
        }
        classification.parameters.push(parameter.generate()?);
    }
    Ok(classification)
}
