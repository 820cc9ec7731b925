//! Transport layer: wire-format details (JSON decoding/encoding).

mod inbound;
mod send_sms;

pub use inbound::{DecodeError, decode_inbound_sms};
pub use send_sms::encode_send_sms_json;

use crate::domain::{GatewayRequest, ValidationError};

/// Turn a raw caller body into a gateway-facing request.
///
/// Errors:
/// - [`ValidationError::MalformedBody`] when the body is empty, its first JSON
///   value is neither an object nor `null`, or a field has the wrong type,
/// - [`ValidationError::InvalidRecipientFormat`] when `number` is neither a
///   string nor a non-empty array.
pub fn normalize(body: &[u8]) -> Result<GatewayRequest, ValidationError> {
    let inbound = decode_inbound_sms(body).map_err(|err| ValidationError::MalformedBody {
        reason: err.to_string(),
    })?;
    GatewayRequest::from_inbound(inbound)
}
