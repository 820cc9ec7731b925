use axum::body::Bytes;
use axum::extract::State;

use crate::server::AppState;
use crate::server::error::RelayError;

pub const SMS_SENT: &str = "SMS sent successfully";
pub const API_UP: &str = "API is up and running";

/// `POST /send-sms`: normalize the body, forward it, relay the outcome.
pub(crate) async fn send_sms(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, RelayError> {
    let request = crate::transport::normalize(&body)?;
    state.gateway.send(&request).await?;

    tracing::info!(
        recipients = request.recipients().len(),
        test = request.options().test,
        "SMS forwarded to gateway"
    );
    Ok(SMS_SENT)
}

/// `GET /health`: independent of configuration and gateway state.
pub(crate) async fn health() -> &'static str {
    API_UP
}
