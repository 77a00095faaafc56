//! hiera-audit cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; hiera-audit ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    /// Load settings from a yaml file
    #[clap(long = "config", global(true))]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read an existing hierarchy and catalog all keys
    Read(ReadCommand),

    /// Rebuild a hierarchy tree from a catalog file
    #[command(alias = "gen")]
    Generate(GenerateCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct ReadCommand {
    /// Hierarchy definition (hiera.yaml)
    pub hierarchy: PathBuf,

    /// Root directory of the hierarchy
    pub root_path: PathBuf,

    /// Print only this key
    #[clap(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Write the whole catalog into a file instead of printing it
    #[clap(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Catalog file written by `read --output`
    pub input: PathBuf,

    /// Root directory of the generated hierarchy. Asks before writing into an existing directory.
    pub root_path: PathBuf,

    /// Overwrite files in an existing root directory without asking
    #[clap(short = 'y', long = "yes", conflicts_with("strict"))]
    pub yes: bool,

    /// Fail if the root directory exists
    #[clap(long = "strict")]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

impl From<OutputFormat> for hiera_audit::present::Format {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Json => Self::Json,
            OutputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Compiled matcher of each hierarchy level
    Matchers { hierarchy: PathBuf },
    /// Files classified under each hierarchy level
    Buckets {
        hierarchy: PathBuf,
        root_path: PathBuf,
    },
}
