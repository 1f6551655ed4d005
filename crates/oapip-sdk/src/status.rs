use crate::decode::{invalid_field, ObjectReader};
use crate::error::OapipError;
use crate::link::{parse_links, Link};
use crate::vocabulary::{JobStatus, JobType};
use chrono::{DateTime, Utc};
use oapip_core::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct JobStatusInfo {
    #[serde(rename = "jobID")]
    pub job_id: String,
    pub status: JobStatus,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(rename = "processID")]
    pub process_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl JobStatusInfo {
    pub fn new(job_id: impl Into<String>, process_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            job_type: JobType::Process,
            process_id: process_id.into(),
            message: None,
            created: None,
            started: None,
            finished: None,
            updated: None,
            progress: None,
            links: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

impl TryFrom<Value> for JobStatusInfo {
    type Error = OapipError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_job_status_info(&value)
    }
}

pub fn parse_job_status_info(raw: &Value) -> Result<JobStatusInfo, OapipError> {
    let reader = ObjectReader::new(raw, &FieldPath::root(), "status info", invalid_field)?;
    reader.reject_unknown(&[
        "jobID",
        "status",
        "type",
        "processID",
        "message",
        "created",
        "started",
        "finished",
        "updated",
        "progress",
        "links",
    ])?;

    let job_id = reader.required_str("jobID")?;
    let status = JobStatus::parse_at(&reader.required_str("status")?, &reader.key_path("status"))?;
    let job_type = match reader.optional_str("type")? {
        Some(token) => JobType::parse_at(&token, &reader.key_path("type"))?,
        None => JobType::default(),
    };
    let process_id = reader.required_str("processID")?;

    let progress = match reader.optional_u64("progress")? {
        Some(progress) if progress > 100 => {
            return Err(reader.invalid(
                "progress",
                format!("progress must be within 0..=100, got {progress}"),
            ))
        }
        Some(progress) => Some(progress as u8),
        None => None,
    };

    let info = JobStatusInfo {
        job_id,
        status,
        job_type,
        process_id,
        message: reader.optional_str("message")?,
        created: parse_timestamp(&reader, "created")?,
        started: parse_timestamp(&reader, "started")?,
        finished: parse_timestamp(&reader, "finished")?,
        updated: parse_timestamp(&reader, "updated")?,
        progress,
        links: parse_links(&reader)?,
    };
    tracing::debug!(job = %info.job_id, status = %info.status, "assembled job status");
    Ok(info)
}

fn parse_timestamp(
    reader: &ObjectReader<'_>,
    key: &str,
) -> Result<Option<DateTime<Utc>>, OapipError> {
    let Some(text) = reader.optional_str(key)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&text)
        .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
        .map_err(|err| reader.invalid(key, format!("`{key}` must be an RFC 3339 timestamp: {err}")))
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
