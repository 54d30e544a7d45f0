//! `pvi.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pvi_convert::FieldTable;
use pvi_format::{Preset, ScreenLayout};
use serde::Deserialize;
use tracing::debug;

/// Configuration file looked for in the working directory.
pub const CONFIG_FILE: &str = "pvi.toml";

/// Settings read from `pvi.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Style used when neither the command line nor the output file names
    /// one.
    pub preset: Option<Preset>,
    #[serde(default)]
    pub layout: LayoutOverrides,
}

/// Layout parameters replacing those of the preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutOverrides {
    pub spacing: Option<i32>,
    pub title_height: Option<i32>,
    pub max_height: Option<i32>,
    pub group_label_height: Option<i32>,
    pub label_width: Option<i32>,
    pub widget_width: Option<i32>,
    pub widget_height: Option<i32>,
    pub group_widget_indent: Option<i32>,
    pub group_width_offset: Option<i32>,
}

impl LayoutOverrides {
    /// `layout` with the overridden parameters replaced.
    #[must_use]
    pub fn apply(&self, layout: ScreenLayout) -> ScreenLayout {
        ScreenLayout {
            spacing: self.spacing.unwrap_or(layout.spacing),
            title_height: self.title_height.unwrap_or(layout.title_height),
            max_height: self.max_height.unwrap_or(layout.max_height),
            group_label_height: self.group_label_height.unwrap_or(layout.group_label_height),
            label_width: self.label_width.unwrap_or(layout.label_width),
            widget_width: self.widget_width.unwrap_or(layout.widget_width),
            widget_height: self.widget_height.unwrap_or(layout.widget_height),
            group_widget_indent: self
                .group_widget_indent
                .unwrap_or(layout.group_widget_indent),
            group_width_offset: self.group_width_offset.unwrap_or(layout.group_width_offset),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Record-field table replacing the built-in one, relative to the
    /// configuration file.
    pub field_table: Option<PathBuf>,
}

impl Config {
    /// Parses configuration text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads the configuration at `path`, resolving relative paths in it
    /// against its directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!(path = %path.display(), "loading configuration");
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        if let (Some(table), Some(dir)) = (&config.convert.field_table, path.parent()) {
            config.convert.field_table = Some(dir.join(table));
        }
        Ok(config)
    }

    /// The configuration at `explicit`, else `pvi.toml` in the working
    /// directory if there is one, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.is_file() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The record-field table to produce records with.
    pub fn field_table(&self) -> anyhow::Result<FieldTable> {
        match &self.convert.field_table {
            Some(path) => FieldTable::load(path)
                .with_context(|| format!("failed to load field table '{}'", path.display())),
            None => Ok(FieldTable::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_layout_overrides_preset() {
        let config = Config::from_toml_str(
            r#"
            [format]
            preset = "dls-bob"

            [format.layout]
            spacing = 8
            max_height = 600
            "#,
        )
        .expect("config");
        assert_eq!(config.format.preset, Some(Preset::DlsBob));

        let layout = config.format.layout.apply(ScreenLayout::DLS_BOB);
        assert_eq!(layout.spacing, 8);
        assert_eq!(layout.max_height, 600);
        assert_eq!(layout.label_width, ScreenLayout::DLS_BOB.label_width);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("[format]\ncolour = \"red\"\n").is_err());
        assert!(Config::from_toml_str("[format.layout]\npadding = 3\n").is_err());
        assert!(Config::from_toml_str("[format]\npreset = \"dls\"\n").is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").expect("config");
        assert_eq!(config, Config::default());
        assert!(config.field_table().is_ok());
    }
}
