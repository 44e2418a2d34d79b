use serde_json::Value;

/// The aggregations document could not be decoded.
///
/// This is the only failure of the extraction: irregularities inside an aggregation
/// are skipped instead of being reported.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid aggregations document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the aggregations document must be a JSON object but found {found}")]
    NotAnObject { found: &'static str },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    pub(crate) fn not_an_object(value: &Value) -> DecodeError {
        DecodeError::NotAnObject { found: kind_of(value) }
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
