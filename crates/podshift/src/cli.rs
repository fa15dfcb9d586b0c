use crate::tracing::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "podshift")]
#[command(about = "Convert container workload definitions between formats")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(short = 'i', long, default_value = "compose", help = "Format of the input")]
    pub input: String,

    #[arg(short = 'o', long, default_value = "ecs", help = "Format of the output")]
    pub output: String,

    #[arg(help = "Input file; reads stdin when omitted")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "List the available input and output formats")]
    pub list_formats: bool,

    #[arg(
        short = 'l',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, help = "Output logs in JSON format")]
    pub json: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
