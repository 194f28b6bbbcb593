//! ose-inventory cli interface

use clap::{Parser, Subcommand, ValueEnum};
use ose_inventory::inventory::KeyOrder;
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
    /// This is equivalent to running { cd <directory>; ose-inventory ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the inventory of a deployment description
    ///
    /// Reads YAML from stdin unless a file is given
    #[command(alias = "inventory")]
    Render(RenderCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct RenderCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Write the inventory to a file instead of stdout
    #[clap(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Order of roles and variables
    #[arg(short = 'k', long = "key-order", default_value_t)]
    pub key_order: KeyOrderArg,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Deployment description (YAML)
    pub file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum KeyOrderArg {
    /// Lexicographic
    #[default]
    Sorted,
    /// As written in the deployment description
    Document,
}

impl std::fmt::Display for KeyOrderArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyOrderArg::Sorted => f.write_str("sorted"),
            KeyOrderArg::Document => f.write_str("document"),
        }
    }
}

impl From<KeyOrderArg> for KeyOrder {
    fn from(value: KeyOrderArg) -> Self {
        match value {
            KeyOrderArg::Sorted => KeyOrder::Sorted,
            KeyOrderArg::Document => KeyOrder::Document,
        }
    }
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
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

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// The parsed YAML document
    Document(InputArgs),
    /// The loaded deployment model
    Config(DevConfigCommand),
}

#[derive(Parser, Debug)]
pub struct DevConfigCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}
