use super::description::{parse_token_list, ProcessDescription};
use super::metadata::{
    parse_additional_parameters, parse_localized, parse_metadata_list, AdditionalParameters,
    LocalizedText, ProcessMetadata,
};
use crate::decode::{invalid_field, ObjectReader};
use crate::error::OapipError;
use crate::link::{parse_links, Link};
use crate::vocabulary::{JobControlOption, TransmissionMode};
use oapip_core::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List-view entry for a process, as returned by `/processes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct ProcessSummary {
    pub id: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_control_options: Option<Vec<JobControlOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_transmission: Option<Vec<TransmissionMode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<ProcessMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_parameters: Option<AdditionalParameters>,
}

impl ProcessDescription {
    pub fn summary(&self) -> ProcessSummary {
        ProcessSummary {
            id: self.id.clone(),
            version: self.version.clone(),
            job_control_options: Some(self.job_control_options.clone()),
            output_transmission: Some(self.output_transmission.clone()),
            links: (!self.links.is_empty()).then(|| self.links.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            metadata: self.metadata.clone(),
            additional_parameters: self.additional_parameters.clone(),
        }
    }
}

impl From<&ProcessDescription> for ProcessSummary {
    fn from(description: &ProcessDescription) -> Self {
        description.summary()
    }
}

impl TryFrom<Value> for ProcessSummary {
    type Error = OapipError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_process_summary(&value)
    }
}

pub fn parse_process_summary(raw: &Value) -> Result<ProcessSummary, OapipError> {
    let reader = ObjectReader::new(raw, &FieldPath::root(), "process summary", invalid_field)?;
    reader.reject_unknown(&[
        "id",
        "version",
        "jobControlOptions",
        "outputTransmission",
        "links",
        "title",
        "description",
        "keywords",
        "metadata",
        "additionalParameters",
    ])?;
    Ok(ProcessSummary {
        id: reader.required_str("id")?,
        version: reader.required_str("version")?,
        job_control_options: parse_token_list(
            &reader,
            "jobControlOptions",
            JobControlOption::parse_at,
        )?,
        output_transmission: parse_token_list(
            &reader,
            "outputTransmission",
            TransmissionMode::parse_at,
        )?,
        links: parse_links(&reader)?,
        title: parse_localized(&reader, "title")?,
        description: parse_localized(&reader, "description")?,
        keywords: reader.optional_string_list("keywords")?,
        metadata: parse_metadata_list(&reader)?,
        additional_parameters: parse_additional_parameters(&reader)?,
    })
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
