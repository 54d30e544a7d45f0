//! `pvi convert`: templates and driver source to a producer and its
//! generated files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pvi_convert::{
    find_parameters, merge_in_index_names, param_set_name, parameters, producer_search_paths,
    AsynProducer, FieldTable, SourceConverter, Template, TemplateConverter,
};
use pvi_device::{enforce_pascal_case, ROOT_DEVICE};
use tracing::{debug, info};

/// Inputs of one conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output_dir: PathBuf,
    pub templates: Vec<PathBuf>,
    /// Driver source and header, converted together.
    pub source: Option<(PathBuf, PathBuf)>,
    /// Module root whose `configure/RELEASE*` files locate parent producers.
    pub module_root: PathBuf,
    /// Driver name when there is no source to take it from.
    pub name: Option<String>,
}

/// Converts `options.templates` and, if given, the driver source. Returns the
/// files written.
pub fn convert(options: &ConvertOptions, table: &FieldTable) -> anyhow::Result<Vec<PathBuf>> {
    let templates = options
        .templates
        .iter()
        .map(|path| {
            Template::read(path).with_context(|| format!("failed to read '{}'", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let converter = TemplateConverter::new(templates);
    let conversion = converter
        .convert()
        .with_context(|| format!("failed to convert {}", describe(&options.templates)))?;
    if !conversion.clashes.is_empty() {
        info!(
            clashes = conversion.clashes.len(),
            "fields kept in the top-level templates"
        );
    }

    let source = match &options.source {
        Some((cpp, h)) => Some(
            SourceConverter::new(read(cpp)?, read(h)?, &conversion.drv_infos())
                .with_context(|| format!("failed to convert '{}'", h.display()))?,
        ),
        None => None,
    };

    let (name, parent) = match (&source, &options.name) {
        (_, Some(name)) => (
            name.clone(),
            source
                .as_ref()
                .map_or_else(|| ROOT_DEVICE.to_string(), |s| s.parent_class().to_string()),
        ),
        (Some(source), None) => (
            source.device_class().to_string(),
            source.parent_class().to_string(),
        ),
        (None, None) => (default_name(&options.templates), ROOT_DEVICE.to_string()),
    };
    info!(driver = %name, parent = %parent, "converted templates");

    let top_level = converter.top_level_text(&name)?;
    let mut producer = conversion.into_producer(name.clone(), parent.clone());

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!("failed to create '{}'", options.output_dir.display())
    })?;
    let mut written = Vec::new();

    if let (Some(source), Some((cpp, h))) = (&source, &options.source) {
        merge_in_index_names(&mut producer.parameters, &source.info_index_map()?);

        let search_paths = producer_search_paths(&options.module_root)?;
        let parent_nodes = find_parameters(&parent, &search_paths)
            .with_context(|| format!("failed to find parameters of parent '{parent}'"))?;
        let parent_indexes: Vec<String> = parameters(&parent_nodes)
            .into_iter()
            .map(|parameter| parameter.get_index_name().to_string())
            .collect();

        let rewritten = source.rewrite(&parent_indexes)?;
        written.push(write(&options.output_dir, file_name(cpp)?, &rewritten.cpp)?);
        written.push(write(&options.output_dir, file_name(h)?, &rewritten.h)?);
        written.push(write(
            &options.output_dir,
            &format!("{}.h", param_set_name(&name)),
            &producer.produce_param_set_header(&param_set_name(&name)),
        )?);
    }

    for (path, text) in options.templates.iter().zip(&top_level) {
        written.push(write(&options.output_dir, file_name(path)?, text)?);
    }

    written.push(write(
        &options.output_dir,
        &AsynProducer::file_name(&name),
        &producer.to_json()?,
    )?);
    written.push(write(
        &options.output_dir,
        &format!("{}.template", param_set_name(&name)),
        &producer.produce_records(table),
    )?);
    Ok(written)
}

/// Driver name taken from the first template.
fn default_name(templates: &[PathBuf]) -> String {
    templates
        .first()
        .and_then(|path| path.file_stem())
        .map(|stem| enforce_pascal_case(&stem.to_string_lossy()))
        .unwrap_or_else(|| "Device".to_string())
}

fn describe(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("'{}'", path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn file_name(path: &Path) -> anyhow::Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("'{}' has no file name", path.display()))
}

pub(crate) fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

pub(crate) fn write(dir: &Path, name: &str, text: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, text).with_context(|| format!("failed to write '{}'", path.display()))?;
    debug!(path = %path.display(), "wrote");
    Ok(path)
}
