mod cli;
mod config;
mod io;
mod logging;
mod run;

pub use cli::{
    Cli, Commands, ExecuteCommand, OutputFormat, ProcessCommand, SchemaCommand, StatusCommand,
};
pub use config::{
    load_cli_config, validate_cli_config, CliConfig, ConfigError, ProcessManagerConfig,
    CLI_CONFIG_SCHEMA,
};
pub use io::{read_document, read_value};
pub use logging::init_tracing;
pub use run::{execute_execute, execute_process, execute_schema, execute_status, run, CliError};
