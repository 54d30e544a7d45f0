//! Extraction of asyn records from template text.

use indexmap::IndexSet;
use pvi_syntax::ast::{RecordDecl, SourceFile};
use pvi_syntax::{parse, Parse};
use tracing::{debug, warn};

use crate::record::{AsynMacros, AsynRecord, Record, Rejection};

/// Parses a template and yields its records.
pub struct RecordExtractor {
    parse: Parse,
}

impl RecordExtractor {
    /// Parses `text`. Syntax errors are logged and the records that could be
    /// recovered are still extracted.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let parse = parse(text);
        for err in parse.errors() {
            warn!(%err, "template syntax error");
        }
        Self { parse }
    }

    /// The typed syntax tree.
    #[must_use]
    pub fn source_file(&self) -> SourceFile {
        self.parse.source_file()
    }

    /// Every record declaration with a type and name, in source order.
    ///
    /// A field or info tag declared twice keeps its last value.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.source_file()
            .records()
            .filter_map(|decl| to_record(&decl))
            .collect()
    }

    /// The records that are asyn records, in source order. Other records are
    /// logged and dropped.
    #[must_use]
    pub fn asyn_records(&self) -> Vec<AsynRecord> {
        self.records()
            .into_iter()
            .filter_map(|record| {
                let header = record.header();
                match AsynRecord::new(record) {
                    Ok(record) => Some(record),
                    Err(rejection @ Rejection::BothLinks) => {
                        warn!(record = %header, "{rejection}");
                        None
                    }
                    Err(rejection) => {
                        debug!(record = %header, "{rejection}");
                        None
                    }
                }
            })
            .collect()
    }
}

pub(crate) fn to_record(decl: &RecordDecl) -> Option<Record> {
    let mut record = Record::new(decl.record_type()?.as_str(), decl.name()?.as_str());
    for field in decl.fields() {
        if let (Some(name), Some(value)) = (field.name(), field.value()) {
            record.fields.insert(name.to_string(), value.to_string());
        }
    }
    for info in decl.infos() {
        if let (Some(name), Some(value)) = (info.name(), info.value()) {
            record.infos.insert(name.to_string(), value.to_string());
        }
    }
    Some(record)
}

/// Record name prefix and asyn macros of a producer, taken from the first
/// record. Defaults apply when there are no records.
#[must_use]
pub fn producer_macros(records: &[AsynRecord]) -> (String, AsynMacros) {
    let distinct: IndexSet<AsynMacros> = records.iter().map(AsynRecord::asyn_macros).collect();
    if distinct.len() > 1 {
        let sets: Vec<String> = distinct.iter().map(AsynMacros::directive).collect();
        warn!(
            macro_sets = ?sets,
            "More than one set of asyn params found. Taking the first instance"
        );
    }

    match records.first() {
        Some(first) => (first.record().prefix().to_string(), first.asyn_macros()),
        None => ("$(P)$(R)".to_string(), AsynMacros::default()),
    }
}
