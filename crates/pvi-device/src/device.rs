//! Devices: a labelled tree of components with an optional parent device.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::{walk, Component, Tree};
use crate::error::{DeviceError, Result};
use crate::naming::is_valid_name;

/// Name of the device every asyn driver ultimately derives from. It has no
/// components of its own.
pub const ROOT_DEVICE: &str = "asynPortDriver";

/// File suffix of serialized devices.
pub const DEVICE_SUFFIX: &str = ".pvi.device.json";

/// A collection of components shown on one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Screen label.
    pub label: String,
    /// Name of the parent device, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Child components.
    #[serde(default)]
    pub children: Tree,
}

impl Device {
    /// A device without a parent.
    #[must_use]
    pub fn new(label: impl Into<String>, children: Tree) -> Self {
        Self {
            label: label.into(),
            parent: None,
            children,
        }
    }

    /// File name of the device called `name`.
    #[must_use]
    pub fn file_name(name: &str) -> String {
        format!("{name}{DEVICE_SUFFIX}")
    }

    /// Parses a device from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serializes the device as pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// Loads and validates a device file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading device");
        let text = fs::read_to_string(path).map_err(|source| DeviceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let device = Self::from_json(&text).map_err(|source| DeviceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        device.validate()?;
        Ok(device)
    }

    /// Writes the device to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|source| DeviceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks every component name, groups included.
    pub fn validate(&self) -> Result<()> {
        fn check(tree: &[Component]) -> Result<()> {
            for component in tree {
                if !is_valid_name(component.name()) {
                    return Err(DeviceError::InvalidName {
                        name: component.name().to_string(),
                    });
                }
                if let Component::Group(group) = component {
                    check(&group.children)?;
                }
            }
            Ok(())
        }
        check(&self.children)
    }

    /// Adds the components of the parent device chain found on `search_paths`.
    pub fn merge_parents(&mut self, search_paths: &[PathBuf]) -> Result<()> {
        match self.parent.as_deref() {
            None | Some(ROOT_DEVICE) => Ok(()),
            Some(parent) => {
                let components = find_components(parent, search_paths)?;
                self.merge_components(components);
                Ok(())
            }
        }
    }

    /// Merges `components` into this device.
    ///
    /// A group with the name of an existing group adds its missing children to
    /// that group. Any other group is appended without the components this
    /// device already has. Loose components are appended.
    pub fn merge_components(&mut self, components: Tree) {
        let existing: Vec<String> = walk(&self.children)
            .map(|component| component.name().to_string())
            .collect();

        for node in components {
            let mut group = match node {
                Component::Group(group) => group,
                component => {
                    self.children.push(component);
                    continue;
                }
            };

            let target = self.children.iter_mut().find_map(|child| match child {
                Component::Group(existing) if existing.name == group.name => Some(existing),
                _ => None,
            });

            match target {
                Some(target) => {
                    for child in group.children {
                        if !target.children.iter().any(|c| c.name() == child.name()) {
                            target.children.push(child);
                        }
                    }
                }
                None => {
                    group
                        .children
                        .retain(|child| !existing.iter().any(|name| name == child.name()));
                    self.children.push(Component::Group(group));
                }
            }
        }
    }
}

/// Returns the components of device `name` followed by those of its parents.
pub fn find_components(name: &str, search_paths: &[PathBuf]) -> Result<Tree> {
    if name == ROOT_DEVICE {
        return Ok(Vec::new());
    }

    let file = Device::file_name(name);
    let path = search_paths
        .iter()
        .map(|dir| dir.join(&file))
        .find(|path| path.is_file())
        .ok_or_else(|| DeviceError::NotFound {
            file: file.clone(),
            paths: search_paths.to_vec(),
        })?;

    let device = Device::load(&path)?;
    let mut components = device.children;
    if let Some(parent) = device.parent.as_deref() {
        components.extend(find_components(parent, search_paths)?);
    }
    Ok(components)
}
