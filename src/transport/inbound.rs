use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::InboundSms;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty request body")]
    Empty,

    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

// `Option<String>` lets an explicit `null` read the same as a missing field.
#[derive(Debug, Deserialize)]
struct InboundSmsJson {
    #[serde(default)]
    number: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    test: Option<bool>,
    #[serde(default)]
    subid: Option<String>,
}

/// Decode a caller's request body.
///
/// Only the first JSON value is read; anything after it is ignored. A
/// top-level `null` decodes as an empty object. Field names match without
/// regard to case, and unknown fields are ignored.
pub fn decode_inbound_sms(body: &[u8]) -> Result<InboundSms, DecodeError> {
    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .ok_or(DecodeError::Empty)??;

    let object = match value {
        Value::Object(object) => object,
        Value::Null => Map::new(),
        other => {
            return Err(DecodeError::NotAnObject {
                found: top_level_kind(&other),
            });
        }
    };

    let parsed: InboundSmsJson = serde_json::from_value(Value::Object(fold_field_names(object)))?;
    Ok(InboundSms {
        recipient: parsed.number,
        message: parsed.message.unwrap_or_default(),
        sender: parsed.sender.unwrap_or_default(),
        date: parsed.date,
        reference: parsed.reference,
        test: parsed.test,
        subid: parsed.subid,
    })
}

// An exactly lower-cased key wins over other spellings of the same name.
fn fold_field_names(object: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::with_capacity(object.len());
    for (key, value) in object {
        let lower = key.to_lowercase();
        if lower == key {
            folded.insert(key, value);
        } else {
            folded.entry(lower).or_insert(value);
        }
    }
    folded
}

fn top_level_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
