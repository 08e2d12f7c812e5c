//! Purpose: Connection settings for a test.guide server.
//! Exports: `ClientConfig`, the environment variable names it reads.
//! Role: Input to `Client::from_config`; immutable once built.

use crate::core::error::{ApiResult, Error, ErrorKind};
use std::fmt;
use std::path::PathBuf;

pub const ENV_BASE_URL: &str = "TEST_GUIDE_BASE_URL";
pub const ENV_TOKEN: &str = "TEST_GUIDE_TOKEN";
pub const ENV_CA_FILE: &str = "TEST_GUIDE_CA_FILE";

#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_key: String,
    /// PEM bundle trusted in place of the default roots (on-prem servers).
    pub tls_ca_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_key: auth_key.into(),
            tls_ca_file: None,
        }
    }

    pub fn with_tls_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_ca_file = Some(path.into());
        self
    }

    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    Error::new(ErrorKind::Usage)
                        .with_message(format!("environment variable {name} is not set"))
                })
        };
        let config = Self::new(required(ENV_BASE_URL)?, required(ENV_TOKEN)?);
        Ok(match lookup(ENV_CA_FILE).filter(|value| !value.is_empty()) {
            Some(path) => config.with_tls_ca_file(path),
            None => config,
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth_key", &"<redacted>")
            .field("tls_ca_file", &self.tls_ca_file)
            .finish()
    }
}
