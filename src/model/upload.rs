//! Purpose: Structured report payload for typed report uploads.
//! Exports: `UploadReport`, `UploadTestCaseNode`, `UploadTestCase`, `UploadTestCaseFolder`.
//! Role: Write-path tree built by callers, serialized once and zipped by the report façade.
//! Invariants: Every node carries `@type` (`testcase` / `testcasefolder`) on encode.
//! Invariants: Folder children and step lists keep insertion order.

use super::enums::Verdict;
use super::records::{
    Argument, ArtifactRef, Attribute, Constant, Recording, Review, TestEnvironment,
};
use super::steps::TestStepNode;
use crate::core::body::{FromJson, decode_tree, null_as_default, variant_json};
use crate::core::error::ApiResult;
use crate::core::variant::{Discriminator, VariantFamily, structural_tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum UploadTestCaseType {
    TestCase,
    Folder,
}

impl UploadTestCaseType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "testcase" => Some(Self::TestCase),
            "testcasefolder" => Some(Self::Folder),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::TestCase => "testcase",
            Self::Folder => "testcasefolder",
        }
    }
}

const AT_TYPE: Discriminator<UploadTestCaseType> = Discriminator {
    field: "@type",
    resolve: UploadTestCaseType::from_tag,
    tag: UploadTestCaseType::tag,
};

/// Report root: a named, timestamped list of test cases and folders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "testcases", default, deserialize_with = "null_as_default")]
    pub test_cases: Vec<UploadTestCaseNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_report_identifier: Option<String>,
}

impl UploadReport {
    pub fn new(name: impl Into<String>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            timestamp,
            test_cases: Vec::new(),
            optional_report_identifier: None,
        }
    }

    pub fn with_test_case(mut self, node: impl Into<UploadTestCaseNode>) -> Self {
        self.test_cases.push(node.into());
        self
    }
}

impl FromJson for UploadReport {
    fn from_json(body: &str) -> ApiResult<Self> {
        decode_tree::<Self, UploadTestCaseNode>(body, "UploadReport", &["testcases"])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTestCase {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<Constant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub setup_test_steps: Vec<TestStepNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub execution_test_steps: Vec<TestStepNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub teardown_test_steps: Vec<TestStepNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Argument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifact_refs: Vec<ArtifactRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_set: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<TestEnvironment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recordings: Vec<Recording>,
}

impl UploadTestCase {
    pub fn new(name: impl Into<String>, verdict: Verdict, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            verdict,
            timestamp,
            ..Self::default()
        }
    }
}

const STEP_FIELDS: [&str; 3] = ["setupTestSteps", "executionTestSteps", "teardownTestSteps"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadTestCaseFolder {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "testcases", default, deserialize_with = "null_as_default")]
    pub test_cases: Vec<UploadTestCaseNode>,
}

impl UploadTestCaseFolder {
    pub fn new(name: impl Into<String>, test_cases: Vec<UploadTestCaseNode>) -> Self {
        Self {
            name: name.into(),
            test_cases,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UploadTestCaseNode {
    TestCase(UploadTestCase),
    Folder(UploadTestCaseFolder),
}

impl UploadTestCaseNode {
    pub fn node_type(&self) -> UploadTestCaseType {
        match self {
            Self::TestCase(_) => UploadTestCaseType::TestCase,
            Self::Folder(_) => UploadTestCaseType::Folder,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::TestCase(case) => &case.name,
            Self::Folder(folder) => &folder.name,
        }
    }

    pub fn as_test_case(&self) -> Option<&UploadTestCase> {
        match self {
            Self::TestCase(case) => Some(case),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&UploadTestCaseFolder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::TestCase(_) => None,
        }
    }
}

impl From<UploadTestCase> for UploadTestCaseNode {
    fn from(case: UploadTestCase) -> Self {
        Self::TestCase(case)
    }
}

impl From<UploadTestCaseFolder> for UploadTestCaseNode {
    fn from(folder: UploadTestCaseFolder) -> Self {
        Self::Folder(folder)
    }
}

impl VariantFamily for UploadTestCaseNode {
    type Kind = UploadTestCaseType;

    const FAMILY: &'static str = "UploadTestCase";
    const DECODE: &'static [Discriminator<UploadTestCaseType>] = &[AT_TYPE];
    const ENCODE: Discriminator<UploadTestCaseType> = AT_TYPE;

    fn kind(&self) -> UploadTestCaseType {
        self.node_type()
    }

    fn decode_kind(kind: UploadTestCaseType, raw: &RawValue) -> ApiResult<Self> {
        match kind {
            UploadTestCaseType::TestCase => {
                let case = structural_tree::<Self, TestStepNode, _>(kind, raw, &STEP_FIELDS)?;
                Ok(Self::TestCase(case))
            }
            UploadTestCaseType::Folder => {
                let folder = structural_tree::<Self, Self, _>(kind, raw, &["testcases"])?;
                Ok(Self::Folder(folder))
            }
        }
    }

    fn encode_fields(&self) -> serde_json::Result<Value> {
        match self {
            Self::TestCase(case) => serde_json::to_value(case),
            Self::Folder(folder) => serde_json::to_value(folder),
        }
    }
}

variant_json!(UploadTestCaseNode);
