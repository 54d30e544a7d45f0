//! CLI definitions for pvi.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pvi_format::Preset;

#[derive(Debug, Parser)]
#[command(
    name = "pvi",
    version,
    about = "Convert asyn driver templates and lay out EPICS device screens",
    after_help = "Examples:\n  pvi convert pvi --template db/simDetector.template --cpp src/simDetector.cpp --header src/simDetector.h\n  pvi produce db/simDetectorParamSet.template pvi/simDetector.pvi.producer.json\n  pvi format opi/simDetector.bob pvi/simDetector.pvi.device.json --prefix '$(P)$(R)'"
)]
pub struct Cli {
    /// Configuration file (default: ./pvi.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log debug details.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert driver templates (and source) into a producer and ParamSet files.
    Convert {
        /// Directory the generated files are written to.
        output_dir: PathBuf,
        /// Database template holding asyn records.
        #[arg(long = "template", short = 't', required = true)]
        templates: Vec<PathBuf>,
        /// Driver source file.
        #[arg(long, requires = "header")]
        cpp: Option<PathBuf>,
        /// Driver header file.
        #[arg(long, requires = "cpp")]
        header: Option<PathBuf>,
        /// Module root with the configure/RELEASE files listing parent modules.
        #[arg(long, short = 'r', default_value = ".")]
        root: PathBuf,
        /// Driver name when no source is given.
        #[arg(long)]
        name: Option<String>,
    },
    /// Write a records template, ParamSet header or device file from a producer.
    Produce {
        /// Output file; its extension picks the artifact.
        output: PathBuf,
        /// Producer file (.pvi.producer.json).
        producer: PathBuf,
    },
    /// Lay out a device and write its screen and sub-screens.
    Format {
        /// Main screen file (.edl, .adl or .bob).
        output: PathBuf,
        /// Device file (.pvi.device.json).
        device: PathBuf,
        /// Prefix of every PV on the screens.
        #[arg(long, default_value = "$(P)")]
        prefix: String,
        /// Screen style: dls-edl, dls-bob or aps-adl.
        #[arg(long)]
        preset: Option<Preset>,
        /// Extra directory searched for parent device files.
        #[arg(long = "search-path", short = 's')]
        search_paths: Vec<PathBuf>,
    },
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
