use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MalformedBody { reason: String },
    InvalidRecipientFormat { found: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MalformedBody { reason } => write!(f, "malformed request body: {reason}"),
            Self::InvalidRecipientFormat { found } => {
                write!(
                    f,
                    "invalid recipient format: expected a string or a non-empty array, got {found}"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
