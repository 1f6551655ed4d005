mod execution;

pub use execution::{
    validate_execution_against_process, validate_execution_against_process_with_options,
    ConformanceOptions,
};
