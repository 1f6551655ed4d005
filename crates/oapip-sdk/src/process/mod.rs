mod description;
mod metadata;
mod summary;

pub use description::{
    parse_process_description, parse_process_description_with_options, IoDescription, MaxOccurs,
    ProcessDescription, ProcessInput, ProcessOutput,
};
pub use metadata::{AdditionalParameter, AdditionalParameters, LocalizedText, ProcessMetadata};
pub use summary::{parse_process_summary, ProcessSummary};
