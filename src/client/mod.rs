//! Client layer: sends normalized requests to the SMS gateway and maps its reply.

use std::error::Error as StdError;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{ClientId, ClientSecret, GatewayRequest, GatewayResponse, ValidationError};

/// Header carrying the client identity.
pub const CLIENT_ID_HEADER: &str = "X-Client-Id";
/// Header carrying the client secret.
pub const CLIENT_SECRET_HEADER: &str = "X-Client-Secret";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(&'static str, String)>,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<GatewayResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(&'static str, String)>,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<GatewayResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut request = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json");
            for (name, value) in headers {
                request = request.header(name, value);
            }
            let response = request.body(body).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(GatewayResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Static credentials attached to every gateway call.
pub struct Credentials {
    client_id: ClientId,
    client_secret: ClientSecret,
}

impl Credentials {
    pub fn new(client_id: ClientId, client_secret: ClientSecret) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    /// Validate raw values and build [`Credentials`].
    pub fn from_raw(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(
            ClientId::new(client_id)?,
            ClientSecret::new(client_secret)?,
        ))
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    fn push_headers(&self, headers: &mut Vec<(&'static str, String)>) {
        headers.push((CLIENT_ID_HEADER, self.client_id.as_str().to_owned()));
        headers.push((CLIENT_SECRET_HEADER, self.client_secret.as_str().to_owned()));
    }
}

/// Receives every raw gateway reply, whatever the outcome.
///
/// Observers run after the call completes and cannot change its result. A
/// panicking observer is caught and logged.
pub trait ResponseObserver: Send + Sync {
    fn observe(&self, response: &GatewayResponse);
}

/// Default observer: logs the gateway reply through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ResponseObserver for LogObserver {
    fn observe(&self, response: &GatewayResponse) {
        tracing::info!(
            status = response.status,
            body = %response.body,
            "Response from SMS gateway"
        );
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`GatewayClient`].
pub enum GatewayError {
    /// The request could not be encoded as JSON.
    #[error("failed to encode gateway request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// DNS, connect, TLS or read failure while talking to the gateway.
    #[error("gateway unreachable: {0}")]
    Unreachable(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway answered with something other than `200 OK`.
    #[error("gateway rejected the message with HTTP status {status}")]
    Rejected { status: u16, body: String },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Clone)]
/// Builder for [`GatewayClient`].
///
/// Use this when you need a request timeout, proxy bypass or a custom observer.
pub struct GatewayClientBuilder {
    credentials: Credentials,
    endpoint: Url,
    timeout: Option<Duration>,
    no_proxy: bool,
    observer: Arc<dyn ResponseObserver>,
}

impl GatewayClientBuilder {
    pub fn new(credentials: Credentials, endpoint: Url) -> Self {
        Self {
            credentials,
            endpoint,
            timeout: None,
            no_proxy: false,
            observer: Arc::new(LogObserver),
        }
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Replace the default [`LogObserver`].
    pub fn observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if self.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|err| GatewayError::Build(Box::new(err)))?;

        Ok(GatewayClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            http: Arc::new(ReqwestTransport { client }),
            observer: self.observer,
        })
    }
}

#[derive(Clone)]
/// SMS gateway client.
///
/// Holds the credentials and endpoint fixed at startup. Every call to
/// [`GatewayClient::send`] issues exactly one POST; nothing is retried or cached.
pub struct GatewayClient {
    credentials: Credentials,
    endpoint: Url,
    http: Arc<dyn HttpTransport>,
    observer: Arc<dyn ResponseObserver>,
}

impl GatewayClient {
    /// Create a client with default HTTP settings and the [`LogObserver`].
    pub fn new(credentials: Credentials, endpoint: Url) -> Self {
        Self {
            credentials,
            endpoint,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
            observer: Arc::new(LogObserver),
        }
    }

    pub fn builder(credentials: Credentials, endpoint: Url) -> GatewayClientBuilder {
        GatewayClientBuilder::new(credentials, endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Forward one message to the gateway.
    ///
    /// Errors:
    /// - [`GatewayError::Serialization`] if the body cannot be encoded,
    /// - [`GatewayError::Unreachable`] for transport failures,
    /// - [`GatewayError::Rejected`] for any status other than `200`.
    pub async fn send(&self, request: &GatewayRequest) -> Result<(), GatewayError> {
        let body =
            crate::transport::encode_send_sms_json(request).map_err(GatewayError::Serialization)?;

        let mut headers = Vec::<(&'static str, String)>::with_capacity(2);
        self.credentials.push_headers(&mut headers);

        tracing::debug!(
            endpoint = %self.endpoint,
            recipients = request.recipients().len(),
            test = request.options().test,
            "Forwarding message to SMS gateway"
        );

        let response = self
            .http
            .post_json(self.endpoint.as_str(), headers, body)
            .await
            .map_err(GatewayError::Unreachable)?;

        self.notify(&response);

        if !response.is_accepted() {
            return Err(GatewayError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        Ok(())
    }

    fn notify(&self, response: &GatewayResponse) {
        let observer = &self.observer;
        if catch_unwind(AssertUnwindSafe(|| observer.observe(response))).is_err() {
            tracing::warn!(
                status = response.status,
                "Gateway response observer panicked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{Recipients, SendOptions};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        requests: Vec<RecordedRequest>,
        response: Result<GatewayResponse, String>,
    }

    #[derive(Debug, Clone)]
    struct RecordedRequest {
        url: String,
        headers: Vec<(&'static str, String)>,
        body: serde_json::Value,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self::with_response(Ok(GatewayResponse {
                status: response_status,
                body: response_body.into(),
            }))
        }

        fn failing(reason: impl Into<String>) -> Self {
            Self::with_response(Err(reason.into()))
        }

        fn with_response(response: Result<GatewayResponse, String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    response,
                })),
            }
        }

        fn requests(&self) -> Vec<RecordedRequest> {
            self.state.lock().unwrap().requests.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            headers: Vec<(&'static str, String)>,
            body: Vec<u8>,
        ) -> BoxFuture<'a, Result<GatewayResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    url: url.to_owned(),
                    headers,
                    body: serde_json::from_slice(&body)?,
                });
                state.response.clone().map_err(Into::into)
            })
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<GatewayResponse>>,
    }

    impl ResponseObserver for RecordingObserver {
        fn observe(&self, response: &GatewayResponse) {
            self.seen.lock().unwrap().push(response.clone());
        }
    }

    struct PanickingObserver;

    impl ResponseObserver for PanickingObserver {
        fn observe(&self, _response: &GatewayResponse) {
            panic!("observer failure");
        }
    }

    fn make_client(transport: FakeTransport, observer: Arc<dyn ResponseObserver>) -> GatewayClient {
        GatewayClient {
            credentials: Credentials::from_raw("client-1", "secret-1").unwrap(),
            endpoint: Url::parse("https://gateway.example.invalid/v1/sms").unwrap(),
            http: Arc::new(transport),
            observer,
        }
    }

    fn sample_request() -> GatewayRequest {
        GatewayRequest::new(
            Recipients::from_numbers(["+15551234567"]).unwrap(),
            "hi",
            "Acme",
            SendOptions::default(),
        )
    }

    fn assert_header(headers: &[(&'static str, String)], name: &str, value: &str) {
        assert!(
            headers.iter().any(|(k, v)| *k == name && v == value),
            "missing header {name}: {value}; got: {headers:?}"
        );
    }

    #[tokio::test]
    async fn send_posts_json_with_credential_headers() {
        let transport = FakeTransport::new(200, r#"{"status":"ok"}"#);
        let client = make_client(transport.clone(), Arc::new(LogObserver));

        client.send(&sample_request()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, "https://gateway.example.invalid/v1/sms");
        assert_header(&request.headers, CLIENT_ID_HEADER, "client-1");
        assert_header(&request.headers, CLIENT_SECRET_HEADER, "secret-1");
        assert_eq!(
            request.body,
            serde_json::json!({
                "to": ["+15551234567"],
                "message": "hi",
                "sender": "Acme",
                "date": "",
                "reference": "",
                "test": false
            })
        );
    }

    #[tokio::test]
    async fn send_maps_non_200_to_rejected_with_raw_body() {
        for status in [201, 400, 503] {
            let transport = FakeTransport::new(status, "quota exceeded");
            let client = make_client(transport, Arc::new(LogObserver));

            let err = client.send(&sample_request()).await.unwrap_err();
            match err {
                GatewayError::Rejected { status: got, body } => {
                    assert_eq!(got, status);
                    assert_eq!(body, "quota exceeded");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn send_maps_transport_failure_to_unreachable() {
        let transport = FakeTransport::failing("connection refused");
        let observer = Arc::new(RecordingObserver::default());
        let client = make_client(transport, observer.clone());

        let err = client.send(&sample_request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unreachable(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(observer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn observer_sees_body_for_every_reply() {
        let observer = Arc::new(RecordingObserver::default());

        let ok = make_client(FakeTransport::new(200, "accepted"), observer.clone());
        ok.send(&sample_request()).await.unwrap();

        let rejected = make_client(FakeTransport::new(503, "busy"), observer.clone());
        rejected.send(&sample_request()).await.unwrap_err();

        let seen = observer.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                GatewayResponse {
                    status: 200,
                    body: "accepted".to_owned()
                },
                GatewayResponse {
                    status: 503,
                    body: "busy".to_owned()
                },
            ]
        );
    }

    #[tokio::test]
    async fn panicking_observer_does_not_change_outcome() {
        let client = make_client(FakeTransport::new(200, "ok"), Arc::new(PanickingObserver));
        client.send(&sample_request()).await.unwrap();

        let client = make_client(FakeTransport::new(500, "no"), Arc::new(PanickingObserver));
        assert!(matches!(
            client.send(&sample_request()).await,
            Err(GatewayError::Rejected { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn identical_requests_are_sent_twice() {
        let transport = FakeTransport::new(200, "ok");
        let client = make_client(transport.clone(), Arc::new(LogObserver));
        let request = sample_request();

        client.send(&request).await.unwrap();
        client.send(&request).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[test]
    fn credentials_validate_inputs() {
        assert!(Credentials::from_raw("   ", "secret").is_err());
        assert!(Credentials::from_raw("client", "").is_err());
        assert!(Credentials::from_raw("client", "  ").is_err());
        let credentials = Credentials::from_raw("client", "secret").unwrap();
        assert_eq!(credentials.client_id().as_str(), "client");
        assert!(!format!("{credentials:?}").contains("secret\""));
    }

    #[test]
    fn credential_headers_are_sent_as_configured() {
        let credentials = Credentials::from_raw(" client ", " secret ").unwrap();
        let mut headers = Vec::new();
        credentials.push_headers(&mut headers);
        assert_eq!(
            headers,
            vec![
                (CLIENT_ID_HEADER, " client ".to_owned()),
                (CLIENT_SECRET_HEADER, " secret ".to_owned()),
            ]
        );
    }

    #[test]
    fn builder_keeps_endpoint() {
        let endpoint = Url::parse("https://gateway.example.invalid/send").unwrap();
        let client = GatewayClient::builder(
            Credentials::from_raw("client", "secret").unwrap(),
            endpoint.clone(),
        )
        .timeout(Duration::from_secs(5))
        .no_proxy()
        .build()
        .unwrap();
        assert_eq!(client.endpoint(), &endpoint);
    }
}
