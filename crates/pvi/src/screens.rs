//! `pvi format`: screens for a device file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use pvi_device::{Device, DEVICE_SUFFIX};
use pvi_format::{DeviceFormatter, Preset};
use tracing::info;

use crate::config::FormatConfig;
use crate::convert::write;

/// Inputs of one `pvi format` run.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Main screen file; sub-screens are written next to it.
    pub output: PathBuf,
    pub device: PathBuf,
    /// Prefix of every PV on the screens.
    pub prefix: String,
    pub preset: Option<Preset>,
    /// Directories holding parent device files, after the device's own.
    pub search_paths: Vec<PathBuf>,
}

/// The style to write `output` in: `preset` if given, else the one matching
/// the extension of `output`, else the configured one.
pub fn resolve_preset(
    preset: Option<Preset>,
    output: &Path,
    config: &FormatConfig,
) -> anyhow::Result<Preset> {
    let from_extension = output
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(Preset::for_extension);
    match preset.or(from_extension).or(config.preset) {
        Some(preset) => Ok(preset),
        None => bail!(
            "can't choose a screen style for '{}': pass --preset or use an .edl, .adl or .bob file",
            output.display()
        ),
    }
}

/// Lays out the device and writes its screens. Returns the files written.
pub fn format_device(
    options: &FormatOptions,
    config: &FormatConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    let preset = resolve_preset(options.preset, &options.output, config)?;

    let mut device = Device::load(&options.device)
        .with_context(|| format!("failed to load device '{}'", options.device.display()))?;
    let mut search_paths: Vec<PathBuf> = options
        .device
        .parent()
        .map(Path::to_path_buf)
        .into_iter()
        .collect();
    search_paths.extend(options.search_paths.iter().cloned());
    device
        .merge_parents(&search_paths)
        .with_context(|| format!("failed to merge parents of '{}'", options.device.display()))?;
    device.validate()?;

    let base = base_file_name(&options.output)?;
    let screens = DeviceFormatter::new(preset)
        .with_layout(config.layout.apply(preset.layout()))
        .format(&device, &options.prefix, &base)
        .with_context(|| format!("failed to format '{}'", options.device.display()))?;

    let dir = options.output.parent().unwrap_or_else(|| Path::new(""));
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create '{}'", dir.display()))?;
    }
    let written = screens
        .iter()
        .map(|screen| write(dir, &screen.file_name, &screen.text))
        .collect::<anyhow::Result<Vec<_>>>()?;
    info!(device = %device.label, %preset, screens = written.len(), "formatted");
    Ok(written)
}

/// Output file name without its screen extension.
fn base_file_name(output: &Path) -> anyhow::Result<String> {
    let name = output
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("'{}' has no file name", output.display()))?;
    if name.ends_with(DEVICE_SUFFIX) {
        bail!("'{}' is a device file, not a screen", output.display());
    }
    let base = Preset::ALL
        .into_iter()
        .find_map(|preset| name.strip_suffix(&format!(".{}", preset.extension())))
        .unwrap_or(name);
    Ok(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_choice() {
        let config = FormatConfig {
            preset: Some(Preset::ApsAdl),
            ..FormatConfig::default()
        };
        let output = Path::new("screens/camera.bob");
        assert_eq!(
            resolve_preset(Some(Preset::DlsEdl), output, &config).expect("preset"),
            Preset::DlsEdl
        );
        assert_eq!(resolve_preset(None, output, &config).expect("preset"), Preset::DlsBob);
        assert_eq!(
            resolve_preset(None, Path::new("camera"), &config).expect("preset"),
            Preset::ApsAdl
        );
        assert!(resolve_preset(None, Path::new("camera"), &FormatConfig::default()).is_err());
    }

    #[test]
    fn test_base_file_name() {
        assert_eq!(base_file_name(Path::new("out/camera.edl")).expect("name"), "camera");
        assert_eq!(base_file_name(Path::new("camera")).expect("name"), "camera");
        assert!(base_file_name(Path::new("camera.pvi.device.json")).is_err());
    }
}
