//! Purpose: Drive report upload and execution queries against a loopback server.
//! Exports: None (integration tests).
//! Role: Checks zipped report bodies, query shapes and step-tree decoding of execution replies.
//! Invariants: Report uploads are single-entry zip archives posted as `application/zip`.
mod support;

use fs2::FileExt;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use support::{MockServer, TestResult};
use testguide::ErrorKind;
use testguide::api::JSON2ATX_CONVERTER;
use testguide::model::{
    FilterParameters, TestStepType, UploadReport, UploadTestCase, UploadTestCaseFolder, Verdict,
};
use time::macros::datetime;

fn single_entry(body: &[u8]) -> TestResult<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(body.to_vec()))?;
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_index(0)?;
    let name = entry.name().to_string();
    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok((name, contents))
}

#[test]
fn upload_report_posts_zipped_file() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond("POST", "/api/report/reports", 202, r#"{"taskId":"up-1"}"#);
    let client = server.client()?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("results.xml");
    File::create(&path)?.write_all(b"<testsuite/>")?;

    let task = client
        .report_management()
        .upload_report(12, "junit", &path)?;
    assert_eq!(task.status, 202);
    assert_eq!(task.value.task_id, "up-1");

    let handle = File::open(&path)?;
    handle.try_lock_exclusive()?;
    handle.unlock()?;

    let request = server.last_request()?;
    assert_eq!(request.query.as_deref(), Some("projectId=12&converterId=junit"));
    assert_eq!(request.header("content-type"), Some("application/zip"));
    let (name, contents) = single_entry(&request.body)?;
    assert_eq!(name, "results.xml");
    assert_eq!(contents, "<testsuite/>");
    Ok(())
}

#[test]
fn typed_report_goes_through_json2atx() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond("POST", "/api/report/reports", 202, r#"{"taskId":"up-2"}"#);
    let client = server.client()?;

    let report = UploadReport::new("nightly", 1_700_000_000_000)
        .with_test_case(UploadTestCase::new("boot", Verdict::Passed, 1_700_000_000_100))
        .with_test_case(UploadTestCaseFolder::new(
            "network",
            vec![UploadTestCase::new("ping", Verdict::Failed, 1_700_000_000_200).into()],
        ));
    client.report_management().upload_report_typed(12, &report)?;

    let request = server.last_request()?;
    assert_eq!(
        request.query,
        Some(format!("projectId=12&converterId={JSON2ATX_CONVERTER}"))
    );
    let (name, contents) = single_entry(&request.body)?;
    assert_eq!(name, "report.json");
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    assert_eq!(json["name"], "nightly");
    assert_eq!(json["testcases"][0]["@type"], "testcase");
    assert_eq!(json["testcases"][0]["verdict"], "PASSED");
    assert_eq!(json["testcases"][1]["@type"], "testcasefolder");
    assert_eq!(json["testcases"][1]["testcases"][0]["name"], "ping");
    Ok(())
}

#[test]
fn execution_reply_decodes_step_tree() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond(
        "GET",
        "/api/report/testCaseExecution/31",
        200,
        r#"{
          "id": 31, "projectId": 1, "reportId": 4, "testCaseName": "boot",
          "executionTimestamp": "2024-05-01T08:00:00Z", "verdict": "FAILED",
          "testSteps": {
            "setup": [{"dType": "TestStep", "name": "power on", "verdict": "PASSED"}],
            "execution": [
              {"dType": "TestStepFolder", "name": "checks", "teststeps": [
                {"dType": "TestStep", "name": "voltage", "verdict": "FAILED"},
                {"@type": "teststep", "name": "current"}
              ]}
            ],
            "teardown": null
          }
        }"#,
    );
    let client = server.client()?;

    let execution = client
        .report_management()
        .get_test_case_execution(31)?
        .into_value();
    assert_eq!(execution.id, 31);
    assert_eq!(execution.verdict, Verdict::Failed);
    assert_eq!(
        execution.execution_timestamp,
        Some(datetime!(2024-05-01 08:00:00 UTC))
    );

    let steps = execution.test_steps.ok_or("step tree present")?;
    assert_eq!(steps.setup.len(), 1);
    assert_eq!(steps.setup[0].verdict(), Some(Verdict::Passed));
    assert!(steps.teardown.is_empty());

    let folder = steps.execution[0].as_folder().ok_or("folder first")?;
    let kinds: Vec<TestStepType> = folder.test_steps.iter().map(|s| s.step_type()).collect();
    assert_eq!(kinds, vec![TestStepType::Step, TestStepType::Step]);
    assert_eq!(folder.test_steps[1].name(), "current");
    Ok(())
}

#[test]
fn unknown_step_kind_fails_the_whole_execution() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond(
        "GET",
        "/api/report/testCaseExecution/32",
        200,
        r#"{"id":32,"testSteps":{"execution":[{"dType":"TestStepGroup","name":"x"}]}}"#,
    );
    let client = server.client()?;

    let err = client
        .report_management()
        .get_test_case_execution(32)
        .expect_err("unknown step kind");
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    assert_eq!(err.family(), Some("TestStep"));
    assert_eq!(err.variant(), Some("TestStepGroup"));
    Ok(())
}

#[test]
fn history_query_carries_rfc3339_window() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond(
        "GET",
        "/api/report/reports/history",
        200,
        r#"[{"reportId":4,"testPlanName":"plan","status":"COMPLETE","fileSize":10}]"#,
    );
    let client = server.client()?;

    let history = client
        .report_management()
        .get_history(
            3,
            datetime!(2024-05-01 00:00:00 UTC),
            datetime!(2024-05-02 00:00:00 UTC),
            0,
            50,
        )?
        .into_value();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].report_id, 4);

    let request = server.last_request()?;
    assert_eq!(
        request.query.as_deref(),
        Some(
            "projectId=3&startDate=2024-05-01T00%3A00%3A00Z&endDate=2024-05-02T00%3A00%3A00Z&offset=0&limit=50"
        )
    );
    Ok(())
}

#[test]
fn add_artifact_sends_comment_and_skips_empty_category() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond("PUT", "/api/report/testCaseExecution/31/artifacts", 200, "");
    let client = server.client()?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("screen.png");
    File::create(&path)?.write_all(b"PNG")?;

    client
        .report_management()
        .add_artifact(31, &path, "nightly run", "")?;

    let request = server.last_request()?;
    let body = request.body_text();
    assert!(body.contains("name=\"comment\"\r\n\r\nnightly run\r\n"));
    assert!(!body.contains("name=\"category\""));
    assert!(body.contains("filename=\"screen.png\""));
    Ok(())
}

#[test]
fn filter_queries() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond("POST", "/api/report/testCaseExecutions/filter", 200, "[]");
    server.respond("GET", "/api/report/testCaseExecutions/filter/8", 200, r#"[{"id":1}]"#);
    let client = server.client()?;
    let reports = client.report_management();

    let all = reports.get_test_case_executions_by_filter(2, None, Some(10), None)?;
    assert!(all.value.is_empty());
    let request = server.last_request()?;
    assert_eq!(request.query.as_deref(), Some("projectId=2&limit=10"));
    assert!(request.body.is_empty());

    let filter = FilterParameters {
        test_case_name: vec!["boot".to_string()],
        verdicts: vec![Verdict::Failed],
        ..FilterParameters::default()
    };
    reports.get_test_case_executions_by_filter(2, Some(5), None, Some(&filter))?;
    let body = server.last_request()?.body_json()?;
    assert_eq!(body["testCaseName"][0], "boot");
    assert_eq!(body["verdicts"][0], "FAILED");

    let saved = reports.get_test_case_executions_by_project_filter(8, None, None)?;
    assert_eq!(saved.value.len(), 1);
    assert_eq!(server.last_request()?.query, None);
    Ok(())
}

#[test]
fn task_status_paths() -> TestResult<()> {
    let server = MockServer::start()?;
    server.respond(
        "GET",
        "/api/report/reports/uploadstatus/up-1",
        200,
        r#"{"status":"finished","uploadResult":{"reportId":4,"resultMessages":null}}"#,
    );
    server.respond(
        "GET",
        "/api/report/reports/deletestatus/del-1",
        200,
        r#"{"status":"running"}"#,
    );
    let client = server.client()?;

    let upload = client
        .report_management()
        .get_upload_status("up-1")?
        .into_value();
    assert_eq!(upload.status, "finished");
    assert_eq!(upload.upload_result.report_id, 4);
    assert!(upload.upload_result.result_messages.is_empty());
    let deletion = client
        .report_management()
        .get_delete_status("del-1")?
        .into_value();
    assert_eq!(deletion.status, "running");
    Ok(())
}
