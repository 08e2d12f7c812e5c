//! Purpose: In-process mock test.guide server for integration tests.
//! Exports: `MockServer`, `Recorded`, `TestResult`, `init_tracing`, `TOKEN`.
//! Role: Serves canned replies per (method, path) and records every request it receives.
//! Invariants: Loopback only; one current-thread runtime per server; shut down on drop.
#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use testguide::Client;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

pub type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

pub const TOKEN: &str = "test-auth-key";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> TestResult<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockServer {
    base_url: String,
    shared: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub fn start() -> TestResult<Self> {
        init_tracing();
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let shared = Shared::default();
        let state = shared.clone();
        let (shutdown, signal) = oneshot::channel::<()>();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        std::thread::spawn(move || {
            runtime.block_on(async move {
                let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                    return;
                };
                let app = Router::new().fallback(handle).with_state(state);
                let _ = axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = signal.await;
                    })
                    .await;
            });
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            shared,
            shutdown: Some(shutdown),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> TestResult<Client> {
        Ok(Client::new(self.base_url.clone(), TOKEN)?)
    }

    /// Canned reply for `method` + `path` (path without query string).
    pub fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        let mut routes = self
            .shared
            .routes
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        routes.insert((method.to_string(), path.to_string()), (status, body.into()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared
            .requests
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    pub fn last_request(&self) -> TestResult<Recorded> {
        self.requests()
            .pop()
            .ok_or_else(|| "mock server received no request".into())
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let key = (method.as_str().to_string(), uri.path().to_string());
    shared
        .requests
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
        .push(Recorded {
            method: key.0.clone(),
            path: key.1.clone(),
            query: uri.query().map(str::to_string),
            headers,
            body: body.to_vec(),
        });
    let reply = shared
        .routes
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
        .get(&key)
        .cloned();
    let (status, body) = reply.unwrap_or((404, "no route".to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}
