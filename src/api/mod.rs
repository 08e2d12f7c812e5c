//! Purpose: Public client surface for the test.guide REST API.
//! Exports: `Client`, `ClientConfig`, `ApiRequest`, `Reply`, the service façades, upload helpers.
//! Role: Everything an application needs to talk to a server; wire types live in `model`.
//! Invariants: All calls are blocking and return `ApiResult`.

mod artifacts;
mod config;
mod multipart;
mod platform;
mod report_management;
mod request;
mod transport;
mod upload_file;
mod user_management;

pub use crate::core::body::FromJson;
pub use crate::core::error::{ApiResult, Error, ErrorKind};
pub use artifacts::Artifacts;
pub use config::{ClientConfig, ENV_BASE_URL, ENV_CA_FILE, ENV_TOKEN};
pub use multipart::MultipartForm;
pub use platform::Platform;
pub use report_management::{JSON2ATX_CONVERTER, ReportManagement};
pub use request::{ApiRequest, Body, Method};
pub use transport::{AUTH_HEADER, Client, Reply};
pub use upload_file::UploadFile;
pub use user_management::UserManagement;
