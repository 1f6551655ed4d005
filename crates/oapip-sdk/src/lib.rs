mod decode;
pub mod error;
pub mod execute;
pub mod link;
pub mod parse;
pub mod process;
pub mod schema;
pub mod status;
pub mod validate;
pub mod vocabulary;

pub use error::OapipError;
pub use execute::{
    parse_execution_request, resolve_input_entry, resolve_input_value, resolve_input_value_at,
    BoundingBox, ExecutionInputValue, ExecutionOutput, ExecutionRequest, Format, FormatSchema,
    InlineValue, InputEntry, QualifiedContent, QualifiedInputValue, Scalar, Subscriber,
};
pub use link::Link;
pub use parse::{parse_document, parse_text, DocumentFormat};
pub use process::{
    parse_process_description, parse_process_description_with_options, parse_process_summary,
    AdditionalParameter, AdditionalParameters, IoDescription, LocalizedText, MaxOccurs,
    ProcessDescription, ProcessInput, ProcessMetadata, ProcessOutput, ProcessSummary,
};
pub use schema::{
    parse_schema_node, parse_schema_node_with_options, AdditionalProperties, SchemaItems,
    SchemaNode, SchemaParseOptions, DEFAULT_MAX_SCHEMA_DEPTH,
};
pub use status::{parse_job_status_info, JobStatusInfo};
pub use validate::{
    validate_execution_against_process, validate_execution_against_process_with_options,
    ConformanceOptions,
};
pub use vocabulary::{
    JobControlOption, JobStatus, JobType, ProcessIoFormat, ProcessIoType, ResponseType,
    TransmissionMode, CRS84,
};
