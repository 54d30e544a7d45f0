//! CLI entrypoint for pvi.

#[path = "pvi/cli.rs"]
mod cli;
#[path = "pvi/completions.rs"]
mod completions;
#[path = "pvi/style.rs"]
mod style;

use std::path::PathBuf;

use clap::Parser;
use pvi::{Config, ConvertOptions, FormatOptions};

use cli::{Cli, Command};

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", style::error(format!("Error: {err:#}")));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    pvi::logging::init(cli.verbose);

    let written = match cli.command {
        Command::Completions { shell } => return completions::run_completions(shell),
        Command::Convert {
            output_dir,
            templates,
            cpp,
            header,
            root,
            name,
        } => {
            let config = Config::discover(cli.config.as_deref())?;
            let options = ConvertOptions {
                output_dir,
                templates,
                source: cpp.zip(header),
                module_root: root,
                name,
            };
            pvi::convert(&options, &config.field_table()?)?
        }
        Command::Produce { output, producer } => {
            let config = Config::discover(cli.config.as_deref())?;
            vec![pvi::produce(&output, &producer, &config.field_table()?)?]
        }
        Command::Format {
            output,
            device,
            prefix,
            preset,
            search_paths,
        } => {
            let config = Config::discover(cli.config.as_deref())?;
            let options = FormatOptions {
                output,
                device,
                prefix,
                preset,
                search_paths,
            };
            pvi::format_device(&options, &config.format)?
        }
    };
    report(&written);
    Ok(())
}

fn report(written: &[PathBuf]) {
    for path in written {
        println!("{}", style::success(format!("wrote {}", path.display())));
    }
}
