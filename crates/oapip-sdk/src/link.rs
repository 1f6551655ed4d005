use crate::decode::{decode_list, invalid_field, InvalidField, ObjectReader};
use crate::error::OapipError;
use oapip_core::FieldPath;
use serde::Serialize;
use serde_json::Value;

/// Web link as used by process descriptions, status documents and by-reference input values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: None,
            media_type: None,
            title: None,
            hreflang: None,
        }
    }
}

pub(crate) fn parse_link(
    value: &Value,
    path: &FieldPath,
    on_invalid: InvalidField,
) -> Result<Link, OapipError> {
    let reader = ObjectReader::new(value, path, "link", on_invalid)?;
    reader.reject_unknown(&["href", "rel", "type", "title", "hreflang"])?;
    Ok(Link {
        href: reader.required_str("href")?,
        rel: reader.optional_str("rel")?,
        media_type: reader.optional_str("type")?,
        title: reader.optional_str("title")?,
        hreflang: reader.optional_str("hreflang")?,
    })
}

pub(crate) fn parse_links(reader: &ObjectReader<'_>) -> Result<Option<Vec<Link>>, OapipError> {
    decode_list(reader, "links", |value, path| parse_link(value, path, invalid_field))
}
