//! Shared helpers for integration tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use axum::routing::post;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

use sms_relay::server::{self, AppState};
use sms_relay::{Credentials, GatewayClient};

pub const CLIENT_ID: &str = "client-1";
pub const CLIENT_SECRET: &str = "secret-1";

/// One request received by the mock gateway.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

type Calls = Arc<Mutex<Vec<RecordedCall>>>;

/// SMS gateway stand-in that records every call and answers with a fixed reply.
pub struct MockGateway {
    pub url: Url,
    calls: Calls,
}

impl MockGateway {
    pub async fn start(status: u16, reply: &'static str) -> Self {
        let calls = Calls::default();
        let status = StatusCode::from_u16(status).unwrap();
        let app = Router::new()
            .route("/v1/sms", post(record_call))
            .with_state((calls.clone(), status, reply));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}/v1/sms")).unwrap(),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record_call(
    State((calls, status, reply)): State<(Calls, StatusCode, &'static str)>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    calls.lock().unwrap().push(RecordedCall { headers, body });
    (status, reply)
}

/// URL of a local port with nothing listening on it.
pub fn closed_port_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/v1/sms")).unwrap()
}

/// URL of a gateway that promises a longer body than it sends, then hangs up.
pub async fn truncating_gateway_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request(&mut socket).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\n\r\npartial")
            .await;
        let _ = socket.shutdown().await;
    });
    Url::parse(&format!("http://{addr}/v1/sms")).unwrap()
}

// Reads the head and a `content-length` body so the reply is not cut short by a reset.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut received = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        if let Some(head_end) = find(&received, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&received[..head_end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= head_end + 4 + length {
                return;
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => received.extend_from_slice(&chunk[..read]),
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub fn relay_app(gateway_url: Url) -> Router {
    let credentials = Credentials::from_raw(CLIENT_ID, CLIENT_SECRET).unwrap();
    let client = GatewayClient::builder(credentials, gateway_url)
        .no_proxy()
        .build()
        .unwrap();
    server::router(AppState::new(client))
}

/// Response status, content type and body text.
pub struct TextResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

pub async fn call(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> TextResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TextResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn send_sms(app: Router, body: impl Into<Body>) -> TextResponse {
    call(app, Method::POST, "/send-sms", body).await
}
