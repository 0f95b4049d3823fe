use super::{DiseaseClass, ImageRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Image count as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CountValue {
    /// Whether the value counts as "provided" (non-zero, non-empty).
    pub fn is_present(&self) -> bool {
        match self {
            CountValue::Integer(n) => *n != 0,
            CountValue::Float(f) => *f != 0.0 && !f.is_nan(),
            CountValue::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric value, or `None` when the text is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CountValue::Integer(n) => Some(*n as f64),
            CountValue::Float(f) if f.is_finite() => Some(*f),
            CountValue::Float(_) => None,
            CountValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }
}

impl From<u32> for CountValue {
    fn from(value: u32) -> Self {
        CountValue::Integer(value.into())
    }
}

/// Body of `POST /api/generate`, before validation.
///
/// `class` stays an arbitrary JSON value so that a non-string class is
/// reported by validation rather than by the body decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub class: Option<Value>,
    pub count: Option<CountValue>,
}

impl GenerateRequest {
    pub fn new(class: impl Into<String>, count: impl Into<CountValue>) -> Self {
        Self {
            class: Some(Value::String(class.into())),
            count: Some(count.into()),
        }
    }
}

/// Whether a JSON value counts as "provided": not null, false, zero or empty text.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub disease_class: DiseaseClass,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub success: bool,
    pub images: Vec<ImageRecord>,
}
