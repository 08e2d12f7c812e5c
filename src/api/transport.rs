//! Purpose: Blocking HTTP client for the test.guide REST API.
//! Exports: `Client`, `Reply`, `AUTH_HEADER`.
//! Role: Issues one authenticated exchange per call and classifies the outcome.
//! Invariants: Every request carries the `TestGuide-AuthKey` header.
//! Invariants: Response bodies are drained before classification; 404 is always `NotFound`.
//! Invariants: Decoding only happens for 2xx replies, through the target type's `FromJson`.
#![allow(clippy::result_large_err)]

use super::artifacts::Artifacts;
use super::config::ClientConfig;
use super::platform::Platform;
use super::report_management::ReportManagement;
use super::request::{ApiRequest, Body};
use super::user_management::UserManagement;
use crate::core::body::FromJson;
use crate::core::error::{ApiResult, Error, ErrorKind, body_excerpt};
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

pub const AUTH_HEADER: &str = "TestGuide-AuthKey";

/// HTTP status of a successful exchange plus the decoded body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reply<T> {
    pub status: u16,
    pub value: T,
}

impl<T> Reply<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    auth_key: String,
    agent: ureq::Agent,
}

impl Client {
    pub fn new(base_url: impl Into<String>, auth_key: impl Into<String>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                auth_key: auth_key.into(),
                agent,
            }),
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let client = Self::new(config.base_url.clone(), config.auth_key.clone())?;
        match &config.tls_ca_file {
            Some(path) => client.with_tls_ca_file(path),
            None => Ok(client),
        }
    }

    pub fn with_tls_ca_file(self, path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let cert_bytes = std::fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("failed to read TLS CA/certificate file")
                .with_path(path)
                .with_source(err)
        })?;
        let mut cert_reader = Cursor::new(cert_bytes);
        let certs = rustls_pemfile::certs(&mut cert_reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("failed to parse TLS CA/certificate file")
                    .with_path(path)
                    .with_source(err)
            })?;
        if certs.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("TLS CA/certificate file contains no certificates")
                .with_path(path));
        }

        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let mut root_store = rustls::RootCertStore::empty();
        let (added, _) = root_store.add_parsable_certificates(certs);
        if added == 0 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("TLS CA/certificate file contains no parsable certificates")
                .with_path(path));
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        let agent = ureq::builder().tls_config(Arc::new(tls_config)).build();
        Ok(self.with_agent(agent))
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn artifacts(&self) -> Artifacts<'_> {
        Artifacts::new(self)
    }

    pub fn platform(&self) -> Platform<'_> {
        Platform::new(self)
    }

    pub fn report_management(&self) -> ReportManagement<'_> {
        ReportManagement::new(self)
    }

    pub fn user_management(&self) -> UserManagement<'_> {
        UserManagement::new(self)
    }

    /// Full URL for `request`: base URL, then the encoded segments, then the query.
    pub fn url_for(&self, request: &ApiRequest) -> ApiResult<Url> {
        build_url(&self.inner.base_url, request)
    }

    /// Sends `request` and discards the (drained) body of a 2xx reply.
    pub fn send(&self, request: ApiRequest) -> ApiResult<Reply<()>> {
        let (status, _body) = self.execute(request)?;
        Ok(Reply { status, value: () })
    }

    /// Sends `request` and decodes a 2xx body as `T`.
    pub fn fetch<T: FromJson>(&self, request: ApiRequest) -> ApiResult<Reply<T>> {
        let (status, body) = self.execute(request)?;
        let value = T::from_json(&body)?;
        Ok(Reply { status, value })
    }

    fn execute(&self, request: ApiRequest) -> ApiResult<(u16, String)> {
        let url = self.url_for(&request)?;
        let method = request.method();
        debug!(%method, %url, "sending request");

        let call = self
            .inner
            .agent
            .request(method.as_str(), url.as_str())
            .set(AUTH_HEADER, &self.inner.auth_key)
            .set("Accept", "application/json");
        let result = match request.into_body() {
            Body::Empty => call.call(),
            Body::Json(payload) => call
                .set("Content-Type", "application/json")
                .send_bytes(&payload),
            Body::Bytes { content_type, data } => {
                call.set("Content-Type", content_type).send_bytes(&data)
            }
            Body::Multipart(form) => {
                let content_type = form.content_type();
                let content_length = form.content_length().to_string();
                call.set("Content-Type", &content_type)
                    .set("Content-Length", &content_length)
                    .send(form.into_reader())
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(Error::new(ErrorKind::Transport)
                    .with_message(format!("{method} {url} failed"))
                    .with_source(err));
            }
        };

        let status = response.status();
        debug!(status, %url, "received response");
        let body = drain_body(response)?;
        trace!(status, body = %body_excerpt(&body), "response body");
        classify(status, body).map(|body| (status, body))
    }

    fn with_agent(mut self, agent: ureq::Agent) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.agent = agent;
        } else {
            self.inner = Arc::new(ClientInner {
                base_url: self.inner.base_url.clone(),
                auth_key: self.inner.auth_key.clone(),
                agent,
            });
        }
        self
    }
}

fn drain_body(response: ureq::Response) -> ApiResult<String> {
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|err| {
            Error::new(ErrorKind::Transport)
                .with_message("failed to read response body")
                .with_source(err)
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn classify(status: u16, body: String) -> ApiResult<String> {
    if status == 404 {
        return Err(Error::new(ErrorKind::NotFound)
            .with_message("404 Not Found")
            .with_status(status)
            .with_body(body));
    }
    if !(200..300).contains(&status) {
        return Err(Error::new(ErrorKind::RequestFailed)
            .with_message(format!("unexpected status code {status}"))
            .with_status(status)
            .with_body(body));
    }
    Ok(body)
}

fn normalize_base_url(raw: String) -> ApiResult<Url> {
    let mut url = Url::parse(&raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid test.guide base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("test.guide base url must use http or https scheme"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn build_url(base_url: &Url, request: &ApiRequest) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("test.guide base url cannot be a base")
        })?;
        path.pop_if_empty();
        for segment in request.segments() {
            path.push(segment);
        }
    }
    if !request.query_pairs().is_empty() {
        url.query_pairs_mut().extend_pairs(request.query_pairs());
    }
    Ok(url)
}
