//! Decoding of heterogeneous `structured_data` payloads.
//!
//! Backend answers optionally carry a `structured_data` blob feeding the
//! dashboard's widgets (tables, metric rows). Upstream it arrives in several
//! shapes: already a JSON array, a JSON-encoded string containing an array,
//! or an envelope object wrapping the array under `data`/`items`/`rows`.
//! [`StructuredShape`] makes the variants explicit; anything else decodes to
//! an empty list rather than an error.

use serde_json::Value;
use tracing::debug;

/// The recognized shapes a `structured_data` payload arrives in.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredShape {
    /// Already a JSON array of widget rows.
    Array(Vec<Value>),
    /// A JSON-encoded string whose content is an array.
    Encoded(Vec<Value>),
    /// An object wrapping the array under `data`, `items`, or `rows`.
    Envelope(Vec<Value>),
    /// Anything else — treated as no rows.
    Unrecognized,
}

impl StructuredShape {
    /// Classify a raw payload value.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Array(rows) => Self::Array(rows.clone()),
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(rows)) => Self::Encoded(rows),
                _ => Self::Unrecognized,
            },
            Value::Object(map) => {
                for field in ["data", "items", "rows"] {
                    if let Some(Value::Array(rows)) = map.get(field) {
                        return Self::Envelope(rows.clone());
                    }
                }
                Self::Unrecognized
            }
            _ => Self::Unrecognized,
        }
    }

    /// Extract the widget rows, empty for [`StructuredShape::Unrecognized`].
    pub fn into_rows(self) -> Vec<Value> {
        match self {
            Self::Array(rows) | Self::Encoded(rows) | Self::Envelope(rows) => rows,
            Self::Unrecognized => Vec::new(),
        }
    }
}

/// Decode a `structured_data` payload into widget rows, falling back to an
/// empty list on any shape mismatch.
pub fn decode_structured_data(value: &Value) -> Vec<Value> {
    let shape = StructuredShape::classify(value);
    if matches!(shape, StructuredShape::Unrecognized) && !value.is_null() {
        debug!("unrecognized structured_data shape, rendering no widgets");
    }
    shape.into_rows()
}
