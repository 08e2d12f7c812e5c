//! Purpose: A local file opened for upload and held under an exclusive advisory lock.
//! Exports: `UploadFile`.
//! Role: Source of multipart file parts and zipped report bodies.
//! Invariants: The lock is taken in `open` and released exactly once, when the value drops.
//! Invariants: Length is sampled once under the lock; streaming never reads past it.

use crate::core::error::{ApiResult, Error, ErrorKind};
use fs2::FileExt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct UploadFile {
    file: File,
    path: PathBuf,
    file_name: String,
    len: u64,
}

impl UploadFile {
    pub fn open(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            Error::new(ErrorKind::File)
                .with_message("failed to open upload file")
                .with_path(path)
                .with_source(err)
        })?;
        FileExt::lock_exclusive(&file).map_err(|err| {
            Error::new(ErrorKind::File)
                .with_message("failed to lock upload file")
                .with_path(path)
                .with_source(err)
        })?;
        // From here on the lock is owned by `UploadFile`, so early returns still unlock.
        let mut upload = Self {
            file,
            path: path.to_path_buf(),
            file_name: file_name_of(path),
            len: 0,
        };
        upload.len = upload
            .file
            .metadata()
            .map_err(|err| {
                Error::new(ErrorKind::File)
                    .with_message("failed to stat upload file")
                    .with_path(path)
                    .with_source(err)
            })?
            .len();
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used as the multipart `filename` and the zip entry name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Read for UploadFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Drop for UploadFile {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
