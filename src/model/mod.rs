// Wire types of the test.guide REST API: enums, flat records and the variant families.
pub mod auth;
pub mod enums;
pub mod records;
pub mod steps;
pub mod storage;
pub mod upload;

pub use auth::{
    AzureAuthenticationInfo, AzureAuthenticationType, AzureBasicAuthentication,
    AzureSasAuthentication, AzureSharedKeyAuthentication, SftpAuthenticationInfo,
    SftpAuthenticationType, SftpBasicAuthentication, SftpSshKeyAuthentication,
};
pub use enums::{
    AwsS3StorageClass, Direction, ProjectDeletedState, ReportStatus, ReviewVerdict, SmbDialect,
    UserActivationStatus, UserType, ValidityConstraint, Verdict,
};
pub use records::{
    Argument, Artifact, ArtifactAttribute, ArtifactCreatedResponse, ArtifactRef, ArtifactShare,
    Attribute, Constant, Converter, DeleteStatus, Depository, DepositoryIdResponse, FileReference,
    Filter, FilterInformation, FilterParameters, KeyValuesFilter, LockedArtifactGroup, Project,
    ProjectRole, Recording, ReportHistoryItem, Review, StorageNumberResponse, TaskRef,
    TestCaseExecution, TestCaseExecutionLink, TestEnvironment, UploadResult, UploadStatus, User,
    UserProjectContext,
};
pub use steps::{TestStep, TestStepFolder, TestStepNode, TestStepType, TestSteps};
pub use storage::{
    ArtifactoryStorage, AwsS3Storage, AzureBlobStorage, FileStorage, SftpStorage, SmbStorage,
    Storage, StorageBase, StorageConnectionCheck, StorageOptions, StorageQuota, StorageType,
};
pub use upload::{
    UploadReport, UploadTestCase, UploadTestCaseFolder, UploadTestCaseNode, UploadTestCaseType,
};
