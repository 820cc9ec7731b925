/// Raw reply from the SMS gateway.
///
/// The body is kept verbatim; the gateway's JSON schema is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    /// Only an exact `200 OK` counts as an accepted message.
    pub fn is_accepted(&self) -> bool {
        self.status == 200
    }
}
