//! Purpose: Report upload and test case execution queries (`api/report/...`).
//! Exports: `ReportManagement`, `JSON2ATX_CONVERTER`.
//! Role: Service façade obtained from `Client::report_management`.
//! Invariants: Report bodies are single-entry zip archives named after the source file.
//! Invariants: Execution replies decode their step trees through the `TestStep` family.

use super::multipart::MultipartForm;
use super::request::ApiRequest;
use super::transport::{Client, Reply};
use super::upload_file::UploadFile;
use crate::core::error::{ApiResult, Error, ErrorKind};
use crate::model::{
    Converter, DeleteStatus, Filter, FilterInformation, FilterParameters, ReportHistoryItem,
    TaskRef, TestCaseExecution, TestCaseExecutionLink, UploadReport, UploadStatus,
};
use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Converter that ingests the JSON rendition of an `UploadReport`.
pub const JSON2ATX_CONVERTER: &str = "json2atx";

const REPORTS: &str = "api/report/reports";
const EXECUTION: &str = "api/report/testCaseExecution";
const EXECUTIONS_BY_FILTER: &str = "api/report/testCaseExecutions/filter";
const FILTERS: &str = "api/report/filters";

pub struct ReportManagement<'a> {
    client: &'a Client,
}

impl<'a> ReportManagement<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get_converters(&self) -> ApiResult<Reply<Vec<Converter>>> {
        self.client.fetch(ApiRequest::get("api/report/converter"))
    }

    /// Zips the report file and hands it to `converter_id`; the server processes it asynchronously.
    pub fn upload_report(
        &self,
        project_id: i64,
        converter_id: &str,
        report_path: impl AsRef<Path>,
    ) -> ApiResult<Reply<TaskRef>> {
        let mut file = UploadFile::open(report_path)?;
        let name = file.file_name().to_string();
        let archive = zip_entry(&name, &mut file).map_err(|err| err.with_path(file.path()))?;
        drop(file);
        self.post_archive(project_id, converter_id, archive)
    }

    /// Uploads a structured report through the `json2atx` converter.
    pub fn upload_report_typed(
        &self,
        project_id: i64,
        report: &UploadReport,
    ) -> ApiResult<Reply<TaskRef>> {
        let json = serde_json::to_vec_pretty(report).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode report")
                .with_source(err)
        })?;
        let archive = zip_entry("report.json", &mut json.as_slice())?;
        self.post_archive(project_id, JSON2ATX_CONVERTER, archive)
    }

    pub fn delete_report(&self, report_id: i64) -> ApiResult<Reply<TaskRef>> {
        self.client
            .fetch(ApiRequest::delete(REPORTS).segment(report_id))
    }

    pub fn get_test_case_executions(
        &self,
        report_id: i64,
    ) -> ApiResult<Reply<Vec<TestCaseExecutionLink>>> {
        self.client.fetch(ApiRequest::get(REPORTS).segment(report_id))
    }

    pub fn get_test_case_execution(&self, tce_id: i64) -> ApiResult<Reply<TestCaseExecution>> {
        self.client.fetch(ApiRequest::get(EXECUTION).segment(tce_id))
    }

    pub fn get_upload_status(&self, task_id: &str) -> ApiResult<Reply<UploadStatus>> {
        self.client.fetch(
            ApiRequest::get(REPORTS)
                .segment("uploadstatus")
                .segment(task_id),
        )
    }

    pub fn get_delete_status(&self, task_id: &str) -> ApiResult<Reply<DeleteStatus>> {
        self.client.fetch(
            ApiRequest::get(REPORTS)
                .segment("deletestatus")
                .segment(task_id),
        )
    }

    /// Upload metadata for reports uploaded between `start` and `end`.
    pub fn get_history(
        &self,
        project_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
        offset: u32,
        limit: u32,
    ) -> ApiResult<Reply<Vec<ReportHistoryItem>>> {
        let request = ApiRequest::get(REPORTS)
            .segment("history")
            .query("projectId", project_id)
            .query("startDate", rfc3339(start)?)
            .query("endDate", rfc3339(end)?)
            .query("offset", offset)
            .query("limit", limit);
        self.client.fetch(request)
    }

    /// Attaches a file to an existing execution; empty `comment`/`category` are not sent.
    pub fn add_artifact(
        &self,
        tce_id: i64,
        file_path: impl AsRef<Path>,
        comment: &str,
        category: &str,
    ) -> ApiResult<Reply<()>> {
        let file = UploadFile::open(file_path)?;
        let form = MultipartForm::new(file)?
            .text("comment", comment)
            .text("category", category);
        let request = ApiRequest::put(EXECUTION)
            .segment(tce_id)
            .segment("artifacts")
            .multipart(form);
        self.client.send(request)
    }

    pub fn get_filters(
        &self,
        project_id: i64,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResult<Reply<Vec<FilterInformation>>> {
        let request = ApiRequest::get(FILTERS)
            .query("projectId", project_id)
            .query_opt("offset", offset)
            .query_opt("limit", limit);
        self.client.fetch(request)
    }

    pub fn get_filter(&self, filter_id: i64) -> ApiResult<Reply<Filter>> {
        self.client.fetch(ApiRequest::get(FILTERS).segment(filter_id))
    }

    /// Ad-hoc query; `None` sends no filter body and matches every execution of the project.
    pub fn get_test_case_executions_by_filter(
        &self,
        project_id: i64,
        offset: Option<u32>,
        limit: Option<u32>,
        filter: Option<&FilterParameters>,
    ) -> ApiResult<Reply<Vec<TestCaseExecution>>> {
        let mut request = ApiRequest::post(EXECUTIONS_BY_FILTER)
            .query("projectId", project_id)
            .query_opt("offset", offset)
            .query_opt("limit", limit);
        if let Some(filter) = filter {
            request = request.json(filter)?;
        }
        self.client.fetch(request)
    }

    /// Executions matching a filter saved in the project.
    pub fn get_test_case_executions_by_project_filter(
        &self,
        filter_id: i64,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResult<Reply<Vec<TestCaseExecution>>> {
        let request = ApiRequest::get(EXECUTIONS_BY_FILTER)
            .segment(filter_id)
            .query_opt("offset", offset)
            .query_opt("limit", limit);
        self.client.fetch(request)
    }

    fn post_archive(
        &self,
        project_id: i64,
        converter_id: &str,
        archive: Vec<u8>,
    ) -> ApiResult<Reply<TaskRef>> {
        let request = ApiRequest::post(REPORTS)
            .query("projectId", project_id)
            .query("converterId", converter_id)
            .bytes("application/zip", archive);
        self.client.fetch(request)
    }
}

fn zip_entry(name: &str, contents: &mut dyn Read) -> ApiResult<Vec<u8>> {
    let zip_error = |err: zip::result::ZipError| {
        Error::new(ErrorKind::File)
            .with_message("failed to build report archive")
            .with_source(err)
    };
    let io_error = |err: io::Error| {
        Error::new(ErrorKind::File)
            .with_message("failed to write report archive")
            .with_source(err)
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(name, options).map_err(zip_error)?;
    io::copy(contents, &mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    let cursor = writer.finish().map_err(zip_error)?;
    Ok(cursor.into_inner())
}

fn rfc3339(at: OffsetDateTime) -> ApiResult<String> {
    at.format(&Rfc3339).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("date cannot be formatted as RFC 3339")
            .with_source(err)
    })
}
