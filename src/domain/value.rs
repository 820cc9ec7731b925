use std::fmt;

use serde_json::Value;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway client identity, sent verbatim as the `X-Client-Id` header.
///
/// Invariant: not empty or whitespace-only.
pub struct ClientId(String);

impl ClientId {
    /// Configuration variable the value is read from.
    pub const FIELD: &'static str = "SMS_CLIENT_ID";

    /// Create a validated [`ClientId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the validated identity.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Gateway client secret, sent verbatim as the `X-Client-Secret` header.
///
/// Invariant: not empty or whitespace-only. `Debug` output is redacted.
pub struct ClientSecret(String);

impl ClientSecret {
    /// Configuration variable the value is read from.
    pub const FIELD: &'static str = "SMS_CLIENT_SECRET";

    /// Create a validated [`ClientSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway subaccount the message is sent from (`subid`).
///
/// Invariant: non-empty. An empty value means "no subaccount", never "clear the subaccount".
pub struct SubaccountId(String);

impl SubaccountId {
    /// Wire field name used by the gateway (`subid`).
    pub const FIELD: &'static str = "subid";

    /// Create a validated [`SubaccountId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Recipient field as the caller sent it.
///
/// Callers may give either one number or a list of numbers. Anything else is
/// rejected when the input is classified with [`RecipientInput::from_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecipientInput {
    Single(String),
    List(Vec<Value>),
}

impl RecipientInput {
    /// Classify a raw JSON value. `None` stands for a missing or `null` field.
    pub fn from_json(value: Option<Value>) -> Result<Self, ValidationError> {
        match value {
            Some(Value::String(number)) => Ok(Self::Single(number)),
            Some(Value::Array(numbers)) => Ok(Self::List(numbers)),
            Some(other) => Err(ValidationError::InvalidRecipientFormat {
                found: json_kind(&other),
            }),
            None => Err(ValidationError::InvalidRecipientFormat { found: "null" }),
        }
    }

    /// Produce the canonical ordered sequence.
    ///
    /// List elements are passed through as given; their types are not checked.
    pub fn normalize(self) -> Result<Recipients, ValidationError> {
        match self {
            Self::Single(number) => Ok(Recipients(vec![Value::String(number)])),
            Self::List(numbers) if numbers.is_empty() => {
                Err(ValidationError::InvalidRecipientFormat {
                    found: "empty array",
                })
            }
            Self::List(numbers) => Ok(Recipients(numbers)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Normalized destination list (`to`).
///
/// Invariant: non-empty, order preserved from the caller.
pub struct Recipients(Vec<Value>);

impl Recipients {
    /// Gateway wire field name (`to`).
    pub const FIELD: &'static str = "to";

    /// Build a list from plain numbers.
    pub fn from_numbers<I, S>(numbers: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let numbers = numbers
            .into_iter()
            .map(|number| Value::String(number.into()))
            .collect::<Vec<_>>();
        RecipientInput::List(numbers).normalize()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
