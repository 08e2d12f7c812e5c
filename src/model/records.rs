//! Purpose: Flat request/response records of the test.guide REST API.
//! Exports: One struct per wire object; all decode structurally.
//! Role: Payloads for the service façades. `TestCaseExecution` is the one record that embeds a
//!       variant family; its step tree decodes through the `TestStep` family.
//! Invariants: Timestamps are RFC 3339; a JSON `null` list decodes as empty.

use super::enums::{
    Direction, ProjectDeletedState, ReportStatus, ReviewVerdict, UserActivationStatus, UserType,
    ValidityConstraint, Verdict,
};
use super::steps::TestSteps;
use crate::core::body::{FromJson, decode_json, null_as_default, structural_json};
use crate::core::error::ApiResult;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use time::OffsetDateTime;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    pub direction: Direction,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub hash: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_date: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_access_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub uploader: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attribute_list: Vec<ArtifactAttribute>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares: Vec<ArtifactShare>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locked_by: Vec<LockedArtifactGroup>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArtifactAttribute {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArtifactCreatedResponse {
    #[serde(rename = "artifactId", default)]
    pub id: String,
}

/// Reference to an already uploaded artifact from a test case.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r#ref: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub md5: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactShare {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<OffsetDateTime>,
}

/// Key with either a single value or a value list.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            values: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

impl Constant {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            values: Vec::new(),
        }
    }
}

/// An X2ATX converter available on the server.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Converter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub detailed_message: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depository {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project_id: i64,
    #[serde(default)]
    pub active_storage: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DepositoryIdResponse {
    #[serde(default)]
    pub id: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub rel_path: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub file_hash: String,
    #[serde(default)]
    pub file_path: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub filter_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<FilterParameters>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInformation {
    #[serde(default)]
    pub filter_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ad-hoc test case execution query; every unset criterion is left out of the request.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case_tag_set_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub test_suite_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub test_case_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub parameter_set_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub test_environments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub attributes: Vec<KeyValuesFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub constants: Vec<KeyValuesFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub planned_test_case_folder: Vec<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_from: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_to: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub archive_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_argument_expr: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub test_argument_directions: Vec<Direction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub atx_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub verdicts: Vec<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_exists: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_obsolete_reviews: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub review_verdicts: Vec<ReviewVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_runs: Option<ValidityConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_defect_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_defect_priority: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub review_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_custom_evaluation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub review_tickets: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeyValuesFilter {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negated: Option<bool>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LockedArtifactGroup {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "projectId", default)]
    pub id: i64,
    #[serde(rename = "projectName", default)]
    pub name: String,
    #[serde(rename = "projectDescription", default)]
    pub description: String,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(default)]
    pub deleted: ProjectDeletedState,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProjectRole {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(default)]
    pub name: String,
    pub direction: Direction,
    #[serde(default)]
    pub file_hash: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHistoryItem {
    #[serde(default)]
    pub report_id: i64,
    #[serde(default)]
    pub test_plan_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_date: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub file_size: i64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub project_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<FileReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_evaluation: Option<String>,
    #[serde(default)]
    pub reviewer: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_date: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub contacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub tickets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defect_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defect_priority: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invalid_run: bool,
}

/// Handle of an asynchronous server task (upload, delete).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    #[serde(default)]
    pub task_id: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageNumberResponse {
    #[serde(default)]
    pub storage_number: i64,
}

/// One executed test case with its environment and step tree.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseExecution {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub project_id: i64,
    #[serde(default)]
    pub report_id: i64,
    #[serde(default)]
    pub test_suite_name: String,
    #[serde(default)]
    pub test_case_name: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default)]
    pub effective_verdict: Verdict,
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_environments: Vec<TestEnvironment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constants: Vec<Constant>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: Vec<Argument>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recordings: Vec<Recording>,
    #[serde(default)]
    pub parameter_set: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_steps: Option<TestSteps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<Review>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<FileReference>,
    #[serde(default)]
    pub execution_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub releases: Vec<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionStepTree {
    #[serde(default)]
    test_steps: Option<Box<RawValue>>,
}

impl FromJson for TestCaseExecution {
    fn from_json(body: &str) -> ApiResult<Self> {
        decode_json(body, "TestCaseExecution").or_else(|err| {
            let tree: ExecutionStepTree = decode_json(body, "TestCaseExecution")?;
            if let Some(raw) = tree.test_steps {
                TestSteps::from_json(raw.get())?;
            }
            Err(err)
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseExecutionLink {
    #[serde(default)]
    pub tce_id: i64,
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestEnvironment {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub associated_projects: Vec<UserProjectContext>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_groups: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub global_permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub confirmed_disclaimer_version: i64,
    /// Coarse "last seen" indication (weeks, months) as reported by the server.
    #[serde(default)]
    pub last_seen: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjectContext {
    #[serde(default)]
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_status: Option<UserActivationStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub individual_permissions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_roles: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub individual_project_roles: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_group_project_roles: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub effective_permissions: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub upload_result: UploadResult,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    #[serde(default)]
    pub upload_return_code: i64,
    #[serde(default)]
    pub report_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result_messages: Vec<String>,
    #[serde(default)]
    pub is_double_upload: bool,
}

structural_json!(
    Artifact,
    ArtifactCreatedResponse,
    Converter,
    DeleteStatus,
    Depository,
    DepositoryIdResponse,
    Filter,
    FilterInformation,
    Project,
    ProjectRole,
    ReportHistoryItem,
    StorageNumberResponse,
    TaskRef,
    TestCaseExecutionLink,
    UploadStatus,
    User,
);

#[cfg(test)]
mod tests {
    use super::{Artifact, Project, TestCaseExecution, UploadStatus};
    use crate::core::body::FromJson;
    use crate::core::error::ErrorKind;
    use crate::model::enums::{ProjectDeletedState, Verdict};
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn project_uses_prefixed_field_names() {
        let project = Project::from_json(
            r#"{"projectId":7,"projectName":"demo","projectDescription":"d","isActive":true,"deleted":"IN_PROGRESS"}"#,
        )
        .expect("decode");
        assert_eq!(project.id, 7);
        assert_eq!(project.name, "demo");
        assert!(project.is_active);
        assert_eq!(project.deleted, ProjectDeletedState::InProgress);
    }

    #[test]
    fn artifact_times_and_null_lists() {
        let artifact = Artifact::from_json(
            r#"{"id":"a1","fileName":"log.txt","uploadDate":"2024-03-01T12:30:00Z","shares":null}"#,
        )
        .expect("decode");
        assert_eq!(artifact.upload_date, Some(datetime!(2024-03-01 12:30:00 UTC)));
        assert!(artifact.shares.is_empty());
        assert!(artifact.last_access_date.is_none());
    }

    #[test]
    fn upload_status_nested_result() {
        let status = UploadStatus::from_json(
            r#"{"status":"FINISHED","uploadResult":{"uploadReturnCode":0,"reportId":12,"resultMessages":["ok"],"isDoubleUpload":false}}"#,
        )
        .expect("decode");
        assert_eq!(status.upload_result.report_id, 12);
        assert_eq!(status.upload_result.result_messages, vec!["ok".to_string()]);
    }

    #[test]
    fn execution_decodes_step_tree_through_family() {
        let body = json!({
            "id": 99,
            "testCaseName": "tc",
            "verdict": "PASSED",
            "testSteps": {
                "setup": [],
                "execution": [
                    {"dType": "TestStepFolder", "name": "f", "teststeps": [
                        {"dType": "TestStep", "name": "s1", "verdict": "PASSED"}
                    ]},
                    {"dType": "TestStep", "name": "s2"}
                ],
                "teardown": null
            }
        });
        let execution = TestCaseExecution::from_json(&body.to_string()).expect("decode");
        assert_eq!(execution.verdict, Verdict::Passed);
        let steps = execution.test_steps.expect("steps");
        assert_eq!(steps.execution.len(), 2);
        assert_eq!(steps.execution[1].name(), "s2");
        let folder = steps.execution[0].as_folder().expect("folder");
        assert_eq!(folder.test_steps[0].name(), "s1");
    }

    #[test]
    fn execution_step_errors_keep_their_kind() {
        let body = json!({
            "id": 1,
            "testSteps": {"execution": [{"name": "untagged"}]}
        });
        let err = TestCaseExecution::from_json(&body.to_string()).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
        assert_eq!(err.family(), Some("TestStep"));
    }

    #[test]
    fn plain_serde_keeps_the_step_tree() {
        let body = r#"{"id":7,"testSteps":{
            "setup":[{"dType":"TestStep","name":"prep"}],
            "execution":[{"@type":"teststepfolder","name":"f","teststeps":[{"dType":"TestStep"}]}]
        }}"#;
        let execution: TestCaseExecution = serde_json::from_str(body).expect("decode");
        let steps = execution.test_steps.expect("steps");
        assert_eq!(steps.setup.len(), 1);
        let folder = steps.execution[0].as_folder().expect("folder");
        assert_eq!(folder.test_steps.len(), 1);

        let unknown = r#"{"id":7,"testSteps":{"setup":[{"dType":"TestStepGroup"}]}}"#;
        assert!(serde_json::from_str::<TestCaseExecution>(unknown).is_err());
    }

    #[test]
    fn execution_without_steps() {
        let execution =
            TestCaseExecution::from_json(r#"{"id":5,"testSteps":null}"#).expect("decode");
        assert!(execution.test_steps.is_none());
        let list = Vec::<TestCaseExecution>::from_json(r#"[{"id":1},{"id":2}]"#).expect("decode");
        assert_eq!(list.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
