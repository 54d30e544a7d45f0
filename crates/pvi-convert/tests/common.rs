//! Shared helpers for conversion integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use pvi_convert::{classify, Classification, ParameterNode, RecordExtractor};

/// A fresh directory under the system temp dir.
pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "pvi-convert-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Writes `text` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, text).expect("write file");
    path
}

/// Extracts and classifies the records of `text`.
pub fn classify_text(text: &str) -> Classification {
    classify(RecordExtractor::new(text).asyn_records()).expect("classify")
}

/// Parameter names of a tree, group children in brackets.
pub fn outline(nodes: &[ParameterNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            ParameterNode::Group(group) => format!("{}[{}]", group.name, outline(&group.children)),
            ParameterNode::Parameter(parameter) => parameter.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
