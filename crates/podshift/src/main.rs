//! podshift command-line entry point
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod errors;
mod tracing;

use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;

use crate::errors::CliError;
use crate::tracing::{TracingConfig, TracingFormat};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> miette::Result<()> {
    let cli = cli::parse();

    crate::tracing::init_tracing(TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            TracingFormat::Pretty
        },
        level: cli.level.into(),
        ..TracingConfig::default()
    })?;

    let registry = podshift::default_registry();

    if cli.list_formats {
        for info in registry.info() {
            println!(
                "{:<7} {:<8} {}",
                info.direction.to_string(),
                info.format,
                info.description
            );
        }
        return Ok(());
    }

    // Resolve both formats before touching the input.
    let converter = podshift::Converter::new(&registry, &cli.input, &cli.output)?;

    let reader: Box<dyn Read> = match cli.file {
        Some(path) => match File::open(&path) {
            Ok(file) => Box::new(file),
            Err(source) => return Err(CliError::FileOpen { path, source }.into()),
        },
        None => Box::new(io::stdin().lock()),
    };

    let output = converter.run(reader)?;
    println!("{output}");
    Ok(())
}
