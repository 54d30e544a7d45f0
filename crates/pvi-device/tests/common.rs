//! Shared helpers for device integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pvi_device::Device;

/// A fresh directory under the system temp dir.
pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "pvi-device-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Writes `json` as `<name>.pvi.device.json` in `dir`.
pub fn write_device(dir: &std::path::Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(Device::file_name(name));
    std::fs::write(&path, json).expect("write device");
    path
}

/// Names of the top level components, with group children in brackets.
pub fn outline(device: &Device) -> String {
    fn render(tree: &[pvi_device::Component], out: &mut Vec<String>) {
        for component in tree {
            match component {
                pvi_device::Component::Group(group) => {
                    let mut inner = Vec::new();
                    render(&group.children, &mut inner);
                    out.push(format!("{}[{}]", group.name, inner.join(" ")));
                }
                other => out.push(other.name().to_string()),
            }
        }
    }
    let mut out = Vec::new();
    render(&device.children, &mut out);
    out.join(" ")
}
