//! Purpose: Test-step trees attached to executed test cases.
//! Exports: `TestStepNode`, `TestStep`, `TestStepFolder`, `TestStepType`, `TestSteps`.
//! Role: Recursive variant family; folders hold ordered children decoded through the same family.
//! Invariants: Decode prefers `dType` (PascalCase) and falls back to `@type` (lower-case).
//! Invariants: Encode always writes `@type` in lower-case.
//! Invariants: Child order is the document order at every depth.

use crate::core::body::{FromJson, decode_tree, null_as_default, variant_json};
use crate::core::error::ApiResult;
use crate::core::variant::{Discriminator, VariantFamily, structural, structural_tree};
use crate::model::enums::Verdict;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TestStepType {
    Step,
    Folder,
}

impl TestStepType {
    /// Tag as the service sends it in `dType`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Step => "TestStep",
            Self::Folder => "TestStepFolder",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "TestStep" => Some(Self::Step),
            "TestStepFolder" => Some(Self::Folder),
            _ => None,
        }
    }

    /// Tag as written to `@type`.
    pub fn encoded_tag(self) -> &'static str {
        match self {
            Self::Step => "teststep",
            Self::Folder => "teststepfolder",
        }
    }

    pub fn from_encoded_tag(tag: &str) -> Option<Self> {
        match tag {
            "teststep" => Some(Self::Step),
            "teststepfolder" => Some(Self::Folder),
            _ => None,
        }
    }
}

const D_TYPE: Discriminator<TestStepType> = Discriminator {
    field: "dType",
    resolve: TestStepType::from_tag,
    tag: TestStepType::tag,
};

const AT_TYPE: Discriminator<TestStepType> = Discriminator {
    field: "@type",
    resolve: TestStepType::from_encoded_tag,
    tag: TestStepType::encoded_tag,
};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
}

impl TestStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStepFolder {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(rename = "teststeps", default, deserialize_with = "null_as_default")]
    pub test_steps: Vec<TestStepNode>,
}

impl TestStepFolder {
    pub fn new(name: impl Into<String>, test_steps: Vec<TestStepNode>) -> Self {
        Self {
            name: name.into(),
            test_steps,
            ..Self::default()
        }
    }
}

/// One node of a test-step tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestStepNode {
    Step(TestStep),
    Folder(TestStepFolder),
}

impl TestStepNode {
    pub fn step_type(&self) -> TestStepType {
        match self {
            Self::Step(_) => TestStepType::Step,
            Self::Folder(_) => TestStepType::Folder,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Step(step) => &step.name,
            Self::Folder(folder) => &folder.name,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Step(step) => step.verdict,
            Self::Folder(folder) => folder.verdict,
        }
    }

    pub fn as_step(&self) -> Option<&TestStep> {
        match self {
            Self::Step(step) => Some(step),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&TestStepFolder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Step(_) => None,
        }
    }
}

impl From<TestStep> for TestStepNode {
    fn from(step: TestStep) -> Self {
        Self::Step(step)
    }
}

impl From<TestStepFolder> for TestStepNode {
    fn from(folder: TestStepFolder) -> Self {
        Self::Folder(folder)
    }
}

impl VariantFamily for TestStepNode {
    type Kind = TestStepType;

    const FAMILY: &'static str = "TestStep";
    const DECODE: &'static [Discriminator<TestStepType>] = &[D_TYPE, AT_TYPE];
    const ENCODE: Discriminator<TestStepType> = AT_TYPE;

    fn kind(&self) -> TestStepType {
        self.step_type()
    }

    fn decode_kind(kind: TestStepType, raw: &RawValue) -> ApiResult<Self> {
        match kind {
            TestStepType::Step => Ok(Self::Step(structural::<Self, _>(kind, raw)?)),
            TestStepType::Folder => {
                let folder = structural_tree::<Self, Self, _>(kind, raw, &["teststeps"])?;
                Ok(Self::Folder(folder))
            }
        }
    }

    fn encode_fields(&self) -> serde_json::Result<Value> {
        match self {
            Self::Step(step) => serde_json::to_value(step),
            Self::Folder(folder) => serde_json::to_value(folder),
        }
    }
}

variant_json!(TestStepNode);

/// The three phases of an executed test case.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestSteps {
    #[serde(default, deserialize_with = "null_as_default")]
    pub setup: Vec<TestStepNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub execution: Vec<TestStepNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teardown: Vec<TestStepNode>,
}

impl FromJson for TestSteps {
    fn from_json(body: &str) -> ApiResult<Self> {
        decode_tree::<Self, TestStepNode>(body, "TestSteps", &["setup", "execution", "teardown"])
    }
}
