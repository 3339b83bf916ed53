//! Event payloads.
//!
//! Every dispatch carries one [`EventData`] value, a string-keyed map of JSON
//! values. Publishers either build it field by field or encode any
//! `Serialize` struct; subscribers read single fields or decode the whole
//! payload back into a typed struct.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named arguments delivered to every subscriber of a dispatched event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData {
    fields: Map<String, Value>,
}

impl EventData {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value under the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Encode a serializable struct into a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` fails to serialize or does not serialize
    /// to a JSON object.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "event payload must be an object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Decode the payload into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not match the shape of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }

    /// Get a raw field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a string field.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Get an integer field.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    /// Get a boolean field.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Whether the payload carries `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<Map<String, Value>> for EventData {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<EventData> for Value {
    fn from(data: EventData) -> Self {
        Value::Object(data.fields)
    }
}

impl<K, V> FromIterator<(K, V)> for EventData
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
