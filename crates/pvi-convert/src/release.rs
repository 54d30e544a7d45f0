//! Lookup of dependency modules through `configure/RELEASE*` files.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Directory of a module that holds its producer files.
pub const PVI_DIR: &str = "pvi";

/// Paths of the modules named in the RELEASE files of `module_root`, with
/// `$(MACRO)` references to other definitions expanded.
pub fn find_parent_modules(module_root: &Path) -> Result<Vec<PathBuf>> {
    // ADCORE = /path/to/ADCore
    let definition = Regex::new(r"(?m)^(\w+)\s*=\s*(\S+)")?;
    let reference = Regex::new(r"\$\(([^)]+)\)")?;

    let pattern = module_root.join("configure").join("RELEASE*");
    let mut macros: IndexMap<String, String> = IndexMap::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry.map_err(|err| ConvertError::Io {
            path: err.path().to_path_buf(),
            source: err.into_error(),
        })?;
        debug!(path = %path.display(), "reading release file");
        let text = fs::read_to_string(&path).map_err(|source| ConvertError::Io {
            path: path.clone(),
            source,
        })?;
        for captures in definition.captures_iter(&text) {
            macros.insert(captures[1].to_string(), captures[2].to_string());
        }
    }

    let names: Vec<String> = macros.keys().cloned().collect();
    for name in names {
        let value = macros[&name].clone();
        let mut expanded = value.clone();
        for captures in reference.captures_iter(&value) {
            if let Some(nested) = macros.get(&captures[1]) {
                expanded = expanded.replace(&captures[0], nested);
            }
        }
        macros.insert(name, expanded);
    }

    Ok(macros.into_values().map(PathBuf::from).collect())
}

/// Directories searched for producer files: the module's own `pvi`
/// directory, then those of its dependencies.
pub fn producer_search_paths(module_root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = vec![module_root.join(PVI_DIR)];
    paths.extend(
        find_parent_modules(module_root)?
            .into_iter()
            .map(|module| module.join(PVI_DIR)),
    );
    Ok(paths)
}
