//! Purpose: Depository storage backends as one closed variant family keyed by `storageType`.
//! Exports: `Storage`, `StorageType`, `StorageBase`, `StorageOptions`, the six backend structs.
//! Role: Read path for storage listings and write path for storage creation payloads.
//! Invariants: `storageType` is injected on encode from the variant, never stored as a field.
//! Invariants: SFTP and Azure Blob decode their nested `authenticationInfo` through their own
//!             family.

use super::auth::{AzureAuthenticationInfo, SftpAuthenticationInfo};
use super::enums::{AwsS3StorageClass, SmbDialect};
use crate::core::body::variant_json;
use crate::core::error::ApiResult;
use crate::core::variant::{Discriminator, VariantFamily, decode_raw, structural};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StorageType {
    File,
    Smb,
    Artifactory,
    AwsS3,
    Sftp,
    AzureBlob,
}

impl StorageType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "fileStorage" => Some(Self::File),
            "smbStorage" => Some(Self::Smb),
            "artifactoryStorage" => Some(Self::Artifactory),
            "awsS3Storage" => Some(Self::AwsS3),
            "sftpStorage" => Some(Self::Sftp),
            "azureBlobStorage" => Some(Self::AzureBlob),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::File => "fileStorage",
            Self::Smb => "smbStorage",
            Self::Artifactory => "artifactoryStorage",
            Self::AwsS3 => "awsS3Storage",
            Self::Sftp => "sftpStorage",
            Self::AzureBlob => "azureBlobStorage",
        }
    }
}

const STORAGE_TYPE: Discriminator<StorageType> = Discriminator {
    field: "storageType",
    resolve: StorageType::from_tag,
    tag: StorageType::tag,
};

/// Fields every storage backend carries.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBase {
    #[serde(default)]
    pub storage_number: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keep_file_in_storage_when_deleting_artifact: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<StorageQuota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_check: Option<StorageConnectionCheck>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageQuota {
    #[serde(rename = "limitInGiB", default)]
    pub limit_in_gib: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_upload: Option<bool>,
    #[serde(default)]
    pub notify_depository_manager_threshold_in_percent: i64,
    #[serde(default)]
    pub notify_depository_users_threshold_in_percent: i64,
}

/// Schedule for the server-side connectivity check of a storage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConnectionCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_project_managers_on_failure: Option<bool>,
}

/// Optional base settings applied when building a storage creation payload.
#[derive(Clone, Debug, Default)]
pub struct StorageOptions {
    keep_file_in_storage_when_deleting_artifact: bool,
    quota: Option<StorageQuota>,
    connection_check: Option<StorageConnectionCheck>,
}

impl StorageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_file_in_storage_when_deleting_artifact(mut self, keep: bool) -> Self {
        self.keep_file_in_storage_when_deleting_artifact = keep;
        self
    }

    pub fn quota(mut self, quota: StorageQuota) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn connection_check(mut self, connection_check: StorageConnectionCheck) -> Self {
        self.connection_check = Some(connection_check);
        self
    }

    fn into_base(self, name: String) -> StorageBase {
        StorageBase {
            storage_number: 0,
            name,
            keep_file_in_storage_when_deleting_artifact: self
                .keep_file_in_storage_when_deleting_artifact,
            migration_role: None,
            deletion_state: None,
            quota: self.quota,
            connection_check: self.connection_check,
        }
    }
}

/// Backing storage in a local folder of the server.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileStorage {
    #[serde(flatten)]
    pub base: StorageBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl FileStorage {
    pub fn new(
        name: impl Into<String>,
        folder: impl Into<String>,
        options: StorageOptions,
    ) -> Self {
        Self {
            base: options.into_base(name.into()),
            folder: Some(folder.into()),
        }
    }
}

/// Backing storage on an SMB share.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmbStorage {
    #[serde(flatten)]
    pub base: StorageBase,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<String>,
    #[serde(default)]
    pub folder_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dfs_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<SmbDialect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_encryption_enabled: Option<bool>,
}

impl SmbStorage {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        folder_path: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
        options: StorageOptions,
    ) -> Self {
        Self {
            base: options.into_base(name.into()),
            user_name: user_name.into(),
            password: password.into(),
            domain: None,
            host: host.into(),
            port: None,
            share: None,
            folder_path: folder_path.into(),
            dfs_enabled: None,
            dialect: None,
            transport_encryption_enabled: None,
        }
    }
}

/// Backing storage in a JFrog Artifactory repository.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactoryStorage {
    #[serde(flatten)]
    pub base: StorageBase,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub repo_key: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_timeout: Option<i64>,
}

impl ArtifactoryStorage {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        repo_key: impl Into<String>,
        user_name: impl Into<String>,
        api_key: impl Into<String>,
        options: StorageOptions,
    ) -> Self {
        Self {
            base: options.into_base(name.into()),
            url: url.into(),
            repo_key: repo_key.into(),
            user_name: user_name.into(),
            api_key: api_key.into(),
            connection_timeout: None,
            socket_timeout: None,
        }
    }
}

/// Backing storage in an AWS S3 (or S3-compatible) bucket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsS3Storage {
    #[serde(flatten)]
    pub base: StorageBase,
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub custom_endpoint: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub object_key_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<AwsS3StorageClass>,
    #[serde(default)]
    pub aws_region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_timeout: Option<i64>,
}

impl AwsS3Storage {
    pub fn new(
        name: impl Into<String>,
        bucket_name: impl Into<String>,
        aws_region: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
        options: StorageOptions,
    ) -> Self {
        Self {
            base: options.into_base(name.into()),
            bucket_name: bucket_name.into(),
            custom_endpoint: String::new(),
            user_name: user_name.into(),
            password: password.into(),
            object_key_prefix: String::new(),
            storage_class: None,
            aws_region: aws_region.into(),
            connection_timeout: None,
            socket_timeout: None,
        }
    }
}

/// Backing storage on an SFTP server.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SftpStorage {
    #[serde(flatten)]
    pub base: StorageBase,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub authentication_info: SftpAuthenticationInfo,
    pub folder_path: String,
}

impl SftpStorage {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        folder_path: impl Into<String>,
        authentication_info: SftpAuthenticationInfo,
        options: StorageOptions,
    ) -> Self {
        Self {
            base: options.into_base(name.into()),
            host: host.into(),
            port: None,
            authentication_info,
            folder_path: folder_path.into(),
        }
    }
}

/// Backing storage in an Azure Blob container.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBlobStorage {
    #[serde(flatten)]
    pub base: StorageBase,
    pub storage_account: String,
    pub container_name: String,
    pub blob_name_prefix: String,
    pub authentication_info: AzureAuthenticationInfo,
}

impl AzureBlobStorage {
    pub fn new(
        name: impl Into<String>,
        storage_account: impl Into<String>,
        container_name: impl Into<String>,
        blob_name_prefix: impl Into<String>,
        authentication_info: AzureAuthenticationInfo,
        options: StorageOptions,
    ) -> Self {
        Self {
            base: options.into_base(name.into()),
            storage_account: storage_account.into(),
            container_name: container_name.into(),
            blob_name_prefix: blob_name_prefix.into(),
            authentication_info,
        }
    }
}

// Flat fields of the backends with a nested auth family; the auth object is decoded separately.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SftpFields {
    #[serde(flatten)]
    base: StorageBase,
    #[serde(default)]
    host: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    folder_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureBlobFields {
    #[serde(flatten)]
    base: StorageBase,
    #[serde(default)]
    storage_account: String,
    #[serde(default)]
    container_name: String,
    #[serde(default)]
    blob_name_prefix: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthEnvelope {
    authentication_info: Box<RawValue>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Storage {
    File(FileStorage),
    Smb(SmbStorage),
    Artifactory(ArtifactoryStorage),
    AwsS3(AwsS3Storage),
    Sftp(SftpStorage),
    AzureBlob(AzureBlobStorage),
}

impl Storage {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::File(_) => StorageType::File,
            Self::Smb(_) => StorageType::Smb,
            Self::Artifactory(_) => StorageType::Artifactory,
            Self::AwsS3(_) => StorageType::AwsS3,
            Self::Sftp(_) => StorageType::Sftp,
            Self::AzureBlob(_) => StorageType::AzureBlob,
        }
    }

    pub fn base(&self) -> &StorageBase {
        match self {
            Self::File(s) => &s.base,
            Self::Smb(s) => &s.base,
            Self::Artifactory(s) => &s.base,
            Self::AwsS3(s) => &s.base,
            Self::Sftp(s) => &s.base,
            Self::AzureBlob(s) => &s.base,
        }
    }

    pub fn storage_number(&self) -> i64 {
        self.base().storage_number
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn as_file(&self) -> Option<&FileStorage> {
        match self {
            Self::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_smb(&self) -> Option<&SmbStorage> {
        match self {
            Self::Smb(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_artifactory(&self) -> Option<&ArtifactoryStorage> {
        match self {
            Self::Artifactory(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_aws_s3(&self) -> Option<&AwsS3Storage> {
        match self {
            Self::AwsS3(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sftp(&self) -> Option<&SftpStorage> {
        match self {
            Self::Sftp(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_azure_blob(&self) -> Option<&AzureBlobStorage> {
        match self {
            Self::AzureBlob(s) => Some(s),
            _ => None,
        }
    }
}

impl From<FileStorage> for Storage {
    fn from(storage: FileStorage) -> Self {
        Self::File(storage)
    }
}

impl From<SmbStorage> for Storage {
    fn from(storage: SmbStorage) -> Self {
        Self::Smb(storage)
    }
}

impl From<ArtifactoryStorage> for Storage {
    fn from(storage: ArtifactoryStorage) -> Self {
        Self::Artifactory(storage)
    }
}

impl From<AwsS3Storage> for Storage {
    fn from(storage: AwsS3Storage) -> Self {
        Self::AwsS3(storage)
    }
}

impl From<SftpStorage> for Storage {
    fn from(storage: SftpStorage) -> Self {
        Self::Sftp(storage)
    }
}

impl From<AzureBlobStorage> for Storage {
    fn from(storage: AzureBlobStorage) -> Self {
        Self::AzureBlob(storage)
    }
}

impl VariantFamily for Storage {
    type Kind = StorageType;

    const FAMILY: &'static str = "Storage";
    const DECODE: &'static [Discriminator<StorageType>] = &[STORAGE_TYPE];
    const ENCODE: Discriminator<StorageType> = STORAGE_TYPE;

    fn kind(&self) -> StorageType {
        self.storage_type()
    }

    fn decode_kind(kind: StorageType, raw: &RawValue) -> ApiResult<Self> {
        Ok(match kind {
            StorageType::File => Self::File(structural::<Self, _>(kind, raw)?),
            StorageType::Smb => Self::Smb(structural::<Self, _>(kind, raw)?),
            StorageType::Artifactory => Self::Artifactory(structural::<Self, _>(kind, raw)?),
            StorageType::AwsS3 => Self::AwsS3(structural::<Self, _>(kind, raw)?),
            StorageType::Sftp => {
                let fields: SftpFields = structural::<Self, _>(kind, raw)?;
                let auth: AuthEnvelope = structural::<Self, _>(kind, raw)?;
                Self::Sftp(SftpStorage {
                    base: fields.base,
                    host: fields.host,
                    port: fields.port,
                    authentication_info: decode_raw(&auth.authentication_info)?,
                    folder_path: fields.folder_path,
                })
            }
            StorageType::AzureBlob => {
                let fields: AzureBlobFields = structural::<Self, _>(kind, raw)?;
                let auth: AuthEnvelope = structural::<Self, _>(kind, raw)?;
                Self::AzureBlob(AzureBlobStorage {
                    base: fields.base,
                    storage_account: fields.storage_account,
                    container_name: fields.container_name,
                    blob_name_prefix: fields.blob_name_prefix,
                    authentication_info: decode_raw(&auth.authentication_info)?,
                })
            }
        })
    }

    fn encode_fields(&self) -> serde_json::Result<Value> {
        match self {
            Self::File(s) => serde_json::to_value(s),
            Self::Smb(s) => serde_json::to_value(s),
            Self::Artifactory(s) => serde_json::to_value(s),
            Self::AwsS3(s) => serde_json::to_value(s),
            Self::Sftp(s) => serde_json::to_value(s),
            Self::AzureBlob(s) => serde_json::to_value(s),
        }
    }
}

variant_json!(Storage);
