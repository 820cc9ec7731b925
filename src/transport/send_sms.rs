use serde::Serialize;
use serde_json::Value;

use crate::domain::{GatewayRequest, SubaccountId};

#[derive(Debug, Serialize)]
struct SendSmsJson<'a> {
    message: &'a str,
    to: &'a [Value],
    sender: &'a str,
    date: &'a str,
    reference: &'a str,
    test: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    subid: Option<&'a str>,
}

impl<'a> From<&'a GatewayRequest> for SendSmsJson<'a> {
    fn from(request: &'a GatewayRequest) -> Self {
        let options = request.options();
        Self {
            message: request.message(),
            to: request.recipients().as_slice(),
            sender: request.sender(),
            date: options.date.as_deref().unwrap_or_default(),
            reference: options.reference.as_deref().unwrap_or_default(),
            test: options.test,
            subid: options.subid.as_ref().map(SubaccountId::as_str),
        }
    }
}

/// Encode the gateway JSON body. Absent optional strings are sent as `""`.
pub fn encode_send_sms_json(request: &GatewayRequest) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&SendSmsJson::from(request))
}
