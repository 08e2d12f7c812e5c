//! Purpose: Streamed `multipart/form-data` bodies with one file part and optional text parts.
//! Exports: `MultipartForm`.
//! Role: Body for artifact uploads; the file is read from its locked handle while sending.
//! Invariants: Layout is file part first, then text parts, then the closing boundary.
//! Invariants: `content_length` equals the exact number of bytes the reader yields.
//! Invariants: Text parts with empty values are omitted.

use super::upload_file::UploadFile;
use crate::core::error::{ApiResult, Error, ErrorKind};
use std::io::{Cursor, Read};

#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    file: UploadFile,
    fields: Vec<(&'static str, String)>,
}

impl MultipartForm {
    /// File part named `file`, with a fresh random boundary.
    pub fn new(file: UploadFile) -> ApiResult<Self> {
        let mut seed = [0u8; 16];
        getrandom::fill(&mut seed).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("failed to generate multipart boundary: {err}"))
        })?;
        let hex: String = seed.iter().map(|byte| format!("{byte:02x}")).collect();
        Ok(Self::with_boundary(file, format!("testguide-{hex}")))
    }

    pub(crate) fn with_boundary(file: UploadFile, boundary: String) -> Self {
        Self {
            boundary,
            file,
            fields: Vec::new(),
        }
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.fields.push((name, value));
        }
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn content_length(&self) -> u64 {
        self.head().len() as u64 + self.file.len() + self.tail().len() as u64
    }

    /// Consumes the form; the file lock is released when the returned reader drops.
    pub fn into_reader(self) -> impl Read + Send + 'static {
        let head = self.head();
        let tail = self.tail();
        let len = self.file.len();
        Cursor::new(head)
            .chain(self.file.take(len))
            .chain(Cursor::new(tail))
    }

    fn head(&self) -> Vec<u8> {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            self.boundary,
            escape_quotes(self.file.file_name())
        )
        .into_bytes()
    }

    fn tail(&self) -> Vec<u8> {
        let mut tail = String::from("\r\n");
        for (name, value) in &self.fields {
            tail.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            ));
        }
        tail.push_str(&format!("--{}--\r\n", self.boundary));
        tail.into_bytes()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
