//! Purpose: Single error type shared by the decoder, transport, and façades.
//! Exports: `Error`, `ErrorKind`, `ApiResult`.
//! Role: Carries the failure kind plus the context a caller needs to report it verbatim.
//! Invariants: Every failure is returned to the immediate caller; nothing is swallowed.
//! Invariants: Response body excerpts are capped so errors stay cheap to log.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

pub type ApiResult<T> = Result<T, Error>;

pub const BODY_EXCERPT_LIMIT: usize = 2048;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Discriminator field absent, not a string, or the envelope is not a JSON object.
    MalformedEnvelope,
    /// Discriminator present but not in the family's table.
    UnknownVariant,
    /// JSON is structurally invalid for the resolved concrete type.
    Decode,
    /// Server responded 404.
    NotFound,
    /// Any other non-2xx response.
    RequestFailed,
    /// Network or IO failure before a response was obtained.
    Transport,
    /// Local file could not be opened, locked, or read.
    File,
    /// Invalid configuration or request description.
    Usage,
    /// Encoding failures and broken internal invariants.
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    family: Option<&'static str>,
    variant: Option<String>,
    status: Option<u16>,
    body: Option<String>,
    path: Option<PathBuf>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            family: None,
            variant: None,
            status: None,
            body: None,
            path: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Variant family the failure occurred in, if it came from the decoder.
    pub fn family(&self) -> Option<&'static str> {
        self.family
    }

    /// Offending discriminator value or resolved variant name.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Excerpt of the response body for non-2xx responses.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_family(mut self, family: &'static str) -> Self {
        self.family = Some(family);
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(excerpt(body.into()));
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Longest prefix of `body` within `BODY_EXCERPT_LIMIT` bytes that ends on a char boundary.
pub fn body_excerpt(body: &str) -> &str {
    if body.len() <= BODY_EXCERPT_LIMIT {
        return body;
    }
    let mut cut = BODY_EXCERPT_LIMIT;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

fn excerpt(mut body: String) -> String {
    let cut = body_excerpt(&body).len();
    body.truncate(cut);
    body
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(family) = self.family {
            write!(f, " (family: {family})")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, " (variant: {variant})")?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(body) = &self.body {
            if !body.is_empty() {
                write!(f, ": {body}")?;
            }
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{BODY_EXCERPT_LIMIT, Error, ErrorKind};

    #[test]
    fn display_includes_context() {
        let err = Error::new(ErrorKind::UnknownVariant)
            .with_message("unknown discriminator")
            .with_family("Storage")
            .with_variant("tapeStorage");
        let text = err.to_string();
        assert_eq!(
            text,
            "UnknownVariant: unknown discriminator (family: Storage) (variant: tapeStorage)"
        );
    }

    #[test]
    fn request_failed_display_carries_status_and_body() {
        let err = Error::new(ErrorKind::RequestFailed)
            .with_message("unexpected status code")
            .with_status(500)
            .with_body("boom");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("boom"));
        assert!(err.to_string().ends_with("(status: 500): boom"));
    }

    #[test]
    fn body_excerpt_is_capped_on_char_boundary() {
        let body = "é".repeat(BODY_EXCERPT_LIMIT);
        let err = Error::new(ErrorKind::RequestFailed).with_body(body);
        let kept = err.body().expect("body");
        assert!(kept.len() <= BODY_EXCERPT_LIMIT);
        assert!(kept.chars().all(|c| c == 'é'));
    }

    #[test]
    fn source_is_exposed() {
        use std::error::Error as _;
        let io = std::io::Error::other("disk gone");
        let err = Error::new(ErrorKind::File).with_source(io);
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("disk gone"));
    }
}
