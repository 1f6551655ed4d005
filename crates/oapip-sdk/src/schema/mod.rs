mod json_schema;
mod node;
mod validate;

pub use node::{semantic_field, AdditionalProperties, SchemaItems, SchemaNode, SCHEMA_KEYWORDS};
pub use validate::{
    parse_schema_node, parse_schema_node_with_options, SchemaParseOptions, DEFAULT_MAX_SCHEMA_DEPTH,
};

