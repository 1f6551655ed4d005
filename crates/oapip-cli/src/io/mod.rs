mod read_document;

pub(crate) use read_document::attach_issue_file;
pub use read_document::{read_document, read_value};
