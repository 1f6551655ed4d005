use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "oapip")]
#[command(about = "Validate OGC API - Processes documents")]
pub struct Cli {
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Validate a schema fragment and print it normalized.
    Schema(SchemaCommand),
    /// Validate a process description.
    Process(ProcessCommand),
    /// Resolve an execution request, optionally against a process description.
    Execute(ExecuteCommand),
    /// Validate a job status document.
    Status(StatusCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct SchemaCommand {
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ProcessCommand {
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ExecuteCommand {
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long)]
    pub process: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StatusCommand {
    #[arg(long)]
    pub file: PathBuf,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
