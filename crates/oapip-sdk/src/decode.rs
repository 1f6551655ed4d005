use crate::error::OapipError;
use oapip_core::FieldPath;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Builds the error reported when a present key holds the wrong kind of value.
pub(crate) type InvalidField = fn(&FieldPath, &str, String) -> OapipError;

pub(crate) fn invalid_field(path: &FieldPath, key: &str, message: String) -> OapipError {
    OapipError::invalid(path, key, message)
}

/// Typed, path-aware access to the keys of one JSON object. Explicit `null` counts as absent.
pub(crate) struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    path: FieldPath,
    on_invalid: InvalidField,
}

impl<'a> ObjectReader<'a> {
    pub(crate) fn new(
        value: &'a Value,
        path: &FieldPath,
        what: &str,
        on_invalid: InvalidField,
    ) -> Result<Self, OapipError> {
        match value.as_object() {
            Some(object) => Ok(Self::from_map(object, path, on_invalid)),
            None => Err(on_invalid(path, what, format!("{what} must be an object"))),
        }
    }

    pub(crate) fn from_map(
        object: &'a Map<String, Value>,
        path: &FieldPath,
        on_invalid: InvalidField,
    ) -> Self {
        Self {
            object,
            path: path.clone(),
            on_invalid,
        }
    }

    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn key_path(&self, key: &str) -> FieldPath {
        self.path.key(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|value| !value.is_null())
    }

    /// Like [`Self::get`] but keeps an explicit `null`.
    pub(crate) fn get_raw(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key)
    }

    pub(crate) fn invalid(&self, key: &str, message: impl Into<String>) -> OapipError {
        (self.on_invalid)(&self.key_path(key), key, message.into())
    }

    pub(crate) fn missing(&self, key: &str) -> OapipError {
        OapipError::missing(&self.path, key)
    }

    pub(crate) fn reject_unknown(&self, known: &[&str]) -> Result<(), OapipError> {
        for key in self.object.keys() {
            if !known.contains(&key.as_str()) {
                return Err(self.invalid(key, format!("unknown field `{key}`")));
            }
        }
        Ok(())
    }

    pub(crate) fn optional_str(&self, key: &str) -> Result<Option<String>, OapipError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(self.invalid(key, format!("`{key}` must be a string"))),
        }
    }

    pub(crate) fn required_str(&self, key: &str) -> Result<String, OapipError> {
        self.optional_str(key)?.ok_or_else(|| self.missing(key))
    }

    pub(crate) fn optional_bool(&self, key: &str) -> Result<Option<bool>, OapipError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(self.invalid(key, format!("`{key}` must be a boolean"))),
        }
    }

    pub(crate) fn optional_u64(&self, key: &str) -> Result<Option<u64>, OapipError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(number)) => number.as_u64().map(Some).ok_or_else(|| {
                self.invalid(key, format!("`{key}` must be a non-negative integer, got {number}"))
            }),
            Some(_) => Err(self.invalid(key, format!("`{key}` must be a non-negative integer"))),
        }
    }

    pub(crate) fn optional_number(&self, key: &str) -> Result<Option<Number>, OapipError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(number)) => Ok(Some(number.clone())),
            Some(_) => Err(self.invalid(key, format!("`{key}` must be a number"))),
        }
    }

    pub(crate) fn optional_array(&self, key: &str) -> Result<Option<&'a Vec<Value>>, OapipError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(self.invalid(key, format!("`{key}` must be an array"))),
        }
    }

    pub(crate) fn optional_object(
        &self,
        key: &str,
    ) -> Result<Option<&'a Map<String, Value>>, OapipError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(object)) => Ok(Some(object)),
            Some(_) => Err(self.invalid(key, format!("`{key}` must be an object"))),
        }
    }

    pub(crate) fn optional_string_list(&self, key: &str) -> Result<Option<Vec<String>>, OapipError> {
        let Some(items) = self.optional_array(key)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(text) => out.push(text.to_string()),
                None => {
                    return Err((self.on_invalid)(
                        &self.key_path(key).index(index),
                        key,
                        format!("`{key}` entries must be strings"),
                    ))
                }
            }
        }
        Ok(Some(out))
    }

    pub(crate) fn optional_string_map(
        &self,
        key: &str,
    ) -> Result<Option<BTreeMap<String, String>>, OapipError> {
        let Some(object) = self.optional_object(key)? else {
            return Ok(None);
        };
        let mut out = BTreeMap::new();
        for (entry_key, entry_value) in object {
            match entry_value.as_str() {
                Some(text) => {
                    out.insert(entry_key.clone(), text.to_string());
                }
                None => {
                    return Err((self.on_invalid)(
                        &self.key_path(key).key(entry_key.as_str()),
                        key,
                        format!("`{key}` values must be strings"),
                    ))
                }
            }
        }
        Ok(Some(out))
    }
}

/// Decodes an optional array of objects with `decode`, threading each element's path.
pub(crate) fn decode_list<T>(
    reader: &ObjectReader<'_>,
    key: &str,
    mut decode: impl FnMut(&Value, &FieldPath) -> Result<T, OapipError>,
) -> Result<Option<Vec<T>>, OapipError> {
    let Some(items) = reader.optional_array(key)? else {
        return Ok(None);
    };
    let base = reader.key_path(key);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode(item, &base.index(index)))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
