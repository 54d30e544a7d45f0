//! Conversion of whole templates: parameter groups out, top-level text back.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use pvi_syntax::ast::RecordDecl;
use tracing::{debug, info};

use crate::classify::{classify, FieldClash};
use crate::error::{ConvertError, Result};
use crate::extract::{producer_macros, to_record, RecordExtractor};
use crate::parameter::{parameters, template_parameters, ParameterNode};
use crate::producer::AsynProducer;
use crate::record::{AsynMacros, AsynRecord};

/// Comment heading each record block that restores a clashing field.
pub const OVERRIDE_DESC: &str = "# Overriding value in auto-generated template";

/// A template file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// File name without extension, used to name the parameter group.
    pub stem: String,
    pub text: String,
}

impl Template {
    pub fn new(stem: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            text: text.into(),
        }
    }

    /// Reads the template at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { stem, text })
    }
}

/// Everything extracted from a set of templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Record name prefix shared by the records.
    pub prefix: String,
    pub macros: AsynMacros,
    /// One grid group per template, in input order.
    pub groups: Vec<ParameterNode>,
    pub clashes: Vec<FieldClash>,
}

impl Conversion {
    /// Driver info strings of every converted parameter.
    #[must_use]
    pub fn drv_infos(&self) -> Vec<String> {
        parameters(&self.groups)
            .into_iter()
            .map(|parameter| parameter.get_drv_info().to_string())
            .collect()
    }

    /// The producer for driver class `label`, deriving from `parent`.
    #[must_use]
    pub fn into_producer(self, label: impl Into<String>, parent: impl Into<String>) -> AsynProducer {
        AsynProducer {
            label: label.into(),
            parent: parent.into(),
            prefix: self.prefix,
            asyn_port: self.macros.port,
            address: self.macros.address,
            timeout: self.macros.timeout,
            parameters: self.groups,
        }
    }
}

/// Converts the asyn records of one or more templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateConverter {
    templates: Vec<Template>,
}

impl TemplateConverter {
    #[must_use]
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Classifies the records of every template into a parameter group
    /// named after it.
    pub fn convert(&self) -> Result<Conversion> {
        let mut all_records = Vec::new();
        let mut groups = Vec::new();
        let mut clashes = Vec::new();
        for template in &self.templates {
            let records = RecordExtractor::new(&template.text).asyn_records();
            info!(
                template = %template.stem,
                records = records.len(),
                "converting template"
            );
            all_records.extend(records.iter().cloned());

            let classification = classify(records)?;
            clashes.extend(classification.clashes);
            groups.push(template_parameters(&template.stem, classification.parameters));
        }

        let (prefix, macros) = producer_macros(&all_records);
        Ok(Conversion {
            prefix,
            macros,
            groups,
            clashes,
        })
    }

    /// The text left for each template once its asyn records move to
    /// `<output_name>ParamSet.template`: that file is included at the top and
    /// each clashing field gets an override block at the bottom.
    pub fn top_level_text(&self, output_name: &str) -> Result<Vec<String>> {
        self.templates
            .iter()
            .map(|template| top_level_text(&template.text, output_name))
            .collect()
    }
}

fn top_level_text(text: &str, output_name: &str) -> Result<String> {
    let extractor = RecordExtractor::new(text);
    let decls: Vec<RecordDecl> = extractor.source_file().records().collect();

    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;
    for decl in decls.iter().filter(|decl| is_asyn(decl)) {
        let range = decl.text_range();
        let end = usize::from(range.end());
        let start = usize::from(range.start());
        // Take the blank lines before the record along with it.
        let start = cursor + text[cursor..start].trim_end().len();
        kept.push_str(&text[cursor..start]);
        cursor = end;
    }
    kept.push_str(&text[cursor..]);

    let mut out = format!("include \"{output_name}ParamSet.template\"\n");
    let kept = kept.trim_end();
    if !kept.is_empty() {
        out.push_str(kept);
        out.push('\n');
    }

    let overrides = override_blocks(&decls, &classify(extractor.asyn_records())?.clashes);
    if !overrides.is_empty() {
        out.push('\n');
        out.push_str(&overrides.join("\n\n"));
        out.push('\n');
    }
    Ok(out)
}

fn is_asyn(decl: &RecordDecl) -> bool {
    to_record(decl).is_some_and(|record| AsynRecord::new(record).is_ok())
}

fn override_blocks(decls: &[RecordDecl], clashes: &[FieldClash]) -> Vec<String> {
    let mut by_record: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for clash in clashes {
        by_record
            .entry(clash.record.as_str())
            .or_default()
            .push(clash.field.as_str());
    }

    by_record
        .into_iter()
        .filter_map(|(record, fields)| {
            // The last declaration of a record is the one that was used.
            let decl = decls
                .iter()
                .rev()
                .find(|decl| decl.name().as_deref() == Some(record))?;
            debug!(record, ?fields, "writing override");

            let mut lines = vec![OVERRIDE_DESC.to_string(), decl.header_text(), "{".to_string()];
            lines.extend(
                decl.fields()
                    .filter(|field| field.name().is_some_and(|name| fields.contains(&name.as_str())))
                    .map(|field| format!("    {}", field.syntax().to_string().trim())),
            );
            lines.push("}".to_string());
            Some(lines.join("\n"))
        })
        .collect()
}
