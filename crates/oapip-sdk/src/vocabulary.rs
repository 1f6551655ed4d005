//! Closed token sets of the OGC API – Processes documents.
//!
//! Every vocabulary is a plain enum whose serde representation is its wire
//! token. Parsing an unknown token fails; nothing is passed through as a
//! loose string.

use crate::error::OapipError;
use oapip_core::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const CRS84: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} token `{token}`")]
pub struct UnknownToken {
    pub vocabulary: &'static str,
    pub token: String,
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident as $label:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const VOCABULARY: &'static str = $label;

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }

            pub fn parse_at(token: &str, path: &FieldPath) -> Result<Self, OapipError> {
                token.parse().map_err(|err: UnknownToken| OapipError::UnknownEnumerationValue {
                    path: path.clone(),
                    vocabulary: err.vocabulary,
                    token: err.token,
                })
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(token: &str) -> Result<Self, Self::Err> {
                match token {
                    $($token => Ok($name::$variant),)+
                    _ => Err(UnknownToken {
                        vocabulary: $label,
                        token: token.to_string(),
                    }),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// JSON primitive types a schema fragment may declare.
    ProcessIoType as "type" {
        Array => "array",
        Boolean => "boolean",
        Integer => "integer",
        Number => "number",
        Object => "object",
        String => "string",
    }
}

vocabulary! {
    /// JSON Schema defined formats plus the format identifiers of OGC API – Processes (table 13).
    /// `iri` and `iri-reference` are absent: any valid URI is a valid IRI.
    ProcessIoFormat as "format" {
        DateTime => "date-time",
        Date => "date",
        Time => "time",
        Duration => "duration",
        Email => "email",
        Hostname => "hostname",
        Ipv4 => "ipv4",
        Ipv6 => "ipv6",
        Uri => "uri",
        UriReference => "uri-reference",
        Uuid => "uuid",
        UriTemplate => "uri-template",
        JsonPointer => "json-pointer",
        RelativeJsonPointer => "relative-json-pointer",
        Regex => "regex",
        Binary => "binary",
        GeojsonFeatureCollectionUri => "http://www.opengis.net/def/format/ogcapi-processes/0/geojson-feature-collection",
        GeojsonFeatureUri => "http://www.opengis.net/def/format/ogcapi-processes/0/geojson-feature",
        GeojsonGeometryUri => "http://www.opengis.net/def/format/ogcapi-processes/0/geojson-geometry",
        OgcBboxUri => "http://www.opengis.net/def/format/ogcapi-processes/0/ogc-bbox",
        GeojsonFeatureCollection => "geojson-feature-collection",
        GeojsonFeature => "geojson-feature",
        GeojsonGeometry => "geojson-geometry",
        OgcBbox => "ogc-bbox",
    }
}

vocabulary! {
    JobControlOption as "jobControlOptions" {
        SyncExecute => "sync-execute",
        AsyncExecute => "async-execute",
        Dismiss => "dismiss",
    }
}

vocabulary! {
    TransmissionMode as "transmissionMode" {
        Value => "value",
        Reference => "reference",
    }
}

vocabulary! {
    ResponseType as "response" {
        Document => "document",
        Raw => "raw",
    }
}

vocabulary! {
    /// Job lifecycle states; the job manager owns the transitions, this crate only checks tokens.
    JobStatus as "status" {
        Accepted => "accepted",
        Running => "running",
        Successful => "successful",
        Failed => "failed",
        Dismissed => "dismissed",
    }
}

vocabulary! {
    JobType as "jobType" {
        Process => "process",
    }
}

impl Default for TransmissionMode {
    fn default() -> Self {
        TransmissionMode::Value
    }
}

impl Default for ResponseType {
    fn default() -> Self {
        ResponseType::Raw
    }
}

impl Default for JobType {
    fn default() -> Self {
        JobType::Process
    }
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Successful | JobStatus::Failed | JobStatus::Dismissed)
    }
}

impl ProcessIoFormat {
    /// Formats that `jsonschema` can check on its own; OGC geometry formats are annotations only.
    pub fn is_json_schema_format(self) -> bool {
        !matches!(
            self,
            ProcessIoFormat::Binary
                | ProcessIoFormat::GeojsonFeatureCollectionUri
                | ProcessIoFormat::GeojsonFeatureUri
                | ProcessIoFormat::GeojsonGeometryUri
                | ProcessIoFormat::OgcBboxUri
                | ProcessIoFormat::GeojsonFeatureCollection
                | ProcessIoFormat::GeojsonFeature
                | ProcessIoFormat::GeojsonGeometry
                | ProcessIoFormat::OgcBbox
        )
    }
}

#[cfg(test)]
#[path = "vocabulary_test.rs"]
mod tests;
