mod request;
mod resolve;
mod value;

pub use request::{
    parse_execution_request, resolve_input_entry, ExecutionOutput, ExecutionRequest, InputEntry,
    Subscriber,
};
pub use resolve::{resolve_input_value, resolve_input_value_at};
pub use value::{
    BoundingBox, ExecutionInputValue, Format, FormatSchema, InlineValue, QualifiedContent,
    QualifiedInputValue, Scalar,
};
