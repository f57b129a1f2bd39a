use banded::{PipelineBuilder, ReportError, strftime_formatter};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Generates a banded report from a JSON definition and a JSON data file.
#[derive(Parser, Debug)]
#[command(name = "banded", version, about)]
struct Cli {
    /// Report definition (JSON).
    definition: PathBuf,

    /// Data file: a JSON array of objects.
    data: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Install no date formatter; elements with a date pattern then fail.
    #[arg(long)]
    no_date_formatter: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Data file '{}' is not valid JSON: {source}", .path.display())]
    Data {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

fn run(cli: Cli) -> Result<(), CliError> {
    log::info!("Loading definition from {}", cli.definition.display());
    let mut builder = PipelineBuilder::new().with_definition_file(&cli.definition)?;
    if !cli.no_date_formatter {
        builder = builder.with_date_formatter(strftime_formatter());
    }
    let mut pipeline = builder.build()?;

    log::info!("Loading data from {}", cli.data.display());
    let source = fs::read_to_string(&cli.data).map_err(|source| CliError::Read {
        path: cli.data.clone(),
        source,
    })?;
    let data: serde_json::Value =
        serde_json::from_str(&source).map_err(|source| CliError::Data {
            path: cli.data.clone(),
            source,
        })?;

    match &cli.output {
        Some(path) => {
            pipeline.generate_to_file(&cli.format, data, path)?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let bytes = pipeline.generate(&cli.format, data)?;
            std::io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
