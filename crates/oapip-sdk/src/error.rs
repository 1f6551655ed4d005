use oapip_core::{FieldPath, StructuredIssue};

/// Every failure the document model reports, located by the path where it was detected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OapipError {
    #[error("schema validation failed at {path} ({field}): {message}")]
    SchemaValidation {
        path: FieldPath,
        field: String,
        message: String,
    },
    #[error("ambiguous or invalid input value at {path}: {message}")]
    AmbiguousOrInvalidInputValue { path: FieldPath, message: String },
    #[error("missing required field `{field}` at {path}")]
    MissingRequiredField { path: FieldPath, field: String },
    #[error("unknown {vocabulary} value `{token}` at {path}")]
    UnknownEnumerationValue {
        path: FieldPath,
        vocabulary: &'static str,
        token: String,
    },
    #[error("invalid field `{field}` at {path}: {message}")]
    InvalidField {
        path: FieldPath,
        field: String,
        message: String,
    },
}

impl OapipError {
    pub(crate) fn schema(path: &FieldPath, field: &str, message: impl Into<String>) -> Self {
        OapipError::SchemaValidation {
            path: path.clone(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn input_value(path: &FieldPath, message: impl Into<String>) -> Self {
        OapipError::AmbiguousOrInvalidInputValue {
            path: path.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn missing(path: &FieldPath, field: &str) -> Self {
        OapipError::MissingRequiredField {
            path: path.clone(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(path: &FieldPath, field: &str, message: impl Into<String>) -> Self {
        OapipError::InvalidField {
            path: path.clone(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            OapipError::SchemaValidation { path, .. }
            | OapipError::AmbiguousOrInvalidInputValue { path, .. }
            | OapipError::MissingRequiredField { path, .. }
            | OapipError::UnknownEnumerationValue { path, .. }
            | OapipError::InvalidField { path, .. } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OapipError::SchemaValidation { .. } => "schema_validation_error",
            OapipError::AmbiguousOrInvalidInputValue { .. } => "ambiguous_or_invalid_input_value",
            OapipError::MissingRequiredField { .. } => "missing_required_field",
            OapipError::UnknownEnumerationValue { .. } => "unknown_enumeration_value",
            OapipError::InvalidField { .. } => "invalid_field",
        }
    }

    pub fn to_issue(&self) -> StructuredIssue {
        let reference = match self {
            OapipError::SchemaValidation { field, .. } => format!("schema.{field}"),
            OapipError::AmbiguousOrInvalidInputValue { .. } => "execute.input_value".to_string(),
            OapipError::MissingRequiredField { field, .. } => format!("required.{field}"),
            OapipError::UnknownEnumerationValue { vocabulary, .. } => format!("vocabulary.{vocabulary}"),
            OapipError::InvalidField { field, .. } => format!("field.{field}"),
        };
        StructuredIssue::error(self.kind(), self.path().clone(), self.to_string(), reference)
    }
}

impl From<OapipError> for StructuredIssue {
    fn from(error: OapipError) -> Self {
        error.to_issue()
    }
}
