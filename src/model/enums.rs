//! Closed string enums used by records and storages, with their exact wire spellings.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AwsS3StorageClass {
    #[serde(rename = "STANDARD")]
    Standard,
    #[serde(rename = "REDUCED_REDUNDANCY")]
    ReducedRedundancy,
    #[serde(rename = "GLACIER")]
    Glacier,
    #[serde(rename = "STANDARD_IA")]
    StandardInfrequentAccess,
    #[serde(rename = "ONEZONE_IA")]
    OneZoneInfrequentAccess,
    #[serde(rename = "INTELLIGENT_TIERING")]
    IntelligentTiering,
    #[serde(rename = "DEEP_ARCHIVE")]
    DeepArchive,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
    #[serde(rename = "INOUT")]
    InOut,
}

/// Deletion state of a project; the server sends an empty string while the project is live.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ProjectDeletedState {
    #[default]
    #[serde(rename = "")]
    Active,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "FINISHED")]
    Finished,
}

impl fmt::Display for ProjectDeletedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "ACTIVE",
            Self::InProgress => "IN_PROGRESS",
            Self::Finished => "FINISHED",
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Complete,
    CompleteWithError,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewVerdict {
    None,
    Passed,
    Inconclusive,
    Failed,
    Error,
    NoVerdict,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SmbDialect {
    #[serde(rename = "SMB_2_0_2")]
    Smb202,
    #[serde(rename = "SMB_2_1")]
    Smb21,
    #[serde(rename = "SMB_2XX")]
    Smb2xx,
    #[serde(rename = "SMB_3_0")]
    Smb30,
    #[serde(rename = "SMB_3_0_2")]
    Smb302,
    #[serde(rename = "SMB_3_1_1")]
    Smb311,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserActivationStatus {
    Activated,
    InProgress,
    Deactivated,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Regular,
    Technical,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityConstraint {
    NoConstraint,
    OnlyValid,
    OnlyInvalid,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    #[default]
    None,
    Passed,
    Inconclusive,
    Failed,
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Passed => "PASSED",
            Self::Inconclusive => "INCONCLUSIVE",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
        })
    }
}
