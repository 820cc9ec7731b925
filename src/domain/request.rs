use serde_json::Value;

use crate::domain::validation::ValidationError;
use crate::domain::value::{RecipientInput, Recipients, SubaccountId};

/// Send request as received from a caller, after JSON decoding and before
/// any normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundSms {
    /// Raw `number` value; `None` when missing or `null`.
    pub recipient: Option<Value>,
    pub message: String,
    pub sender: String,
    pub date: Option<String>,
    pub reference: Option<String>,
    pub test: Option<bool>,
    pub subid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Scheduled send time, free-form and passed through unchanged.
    pub date: Option<String>,
    /// Caller-defined reference.
    pub reference: Option<String>,
    /// Dry run: the gateway checks parameters but sends nothing.
    pub test: bool,
    pub subid: Option<SubaccountId>,
}

/// Gateway-facing send request.
///
/// Built either from an [`InboundSms`] via [`GatewayRequest::from_inbound`] or
/// directly with [`GatewayRequest::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    recipients: Recipients,
    message: String,
    sender: String,
    options: SendOptions,
}

impl GatewayRequest {
    pub fn new(
        recipients: Recipients,
        message: impl Into<String>,
        sender: impl Into<String>,
        options: SendOptions,
    ) -> Self {
        Self {
            recipients,
            message: message.into(),
            sender: sender.into(),
            options,
        }
    }

    /// Normalize a decoded inbound request.
    ///
    /// Fails only on the recipient field; message, sender and date are not
    /// checked for length or format.
    pub fn from_inbound(inbound: InboundSms) -> Result<Self, ValidationError> {
        let recipients = RecipientInput::from_json(inbound.recipient)?.normalize()?;
        let options = SendOptions {
            date: inbound.date,
            reference: inbound.reference,
            test: inbound.test.unwrap_or(false),
            subid: inbound.subid.and_then(|subid| SubaccountId::new(subid).ok()),
        };
        Ok(Self::new(
            recipients,
            inbound.message,
            inbound.sender,
            options,
        ))
    }

    pub fn recipients(&self) -> &Recipients {
        &self.recipients
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}
