//! Purpose: Authentication sub-objects nested inside SFTP and Azure Blob storages.
//! Exports: `SftpAuthenticationInfo`, `AzureAuthenticationInfo` and their variants/tags.
//! Role: Two independent variant families, both discriminated by an upper-snake `type` field.
//! Invariants: The SFTP and Azure tag tables are separate even where tag strings coincide.

use crate::core::body::variant_json;
use crate::core::error::ApiResult;
use crate::core::variant::{Discriminator, VariantFamily, structural};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SftpAuthenticationType {
    Basic,
    SshKey,
}

impl SftpAuthenticationType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BASIC" => Some(Self::Basic),
            "SSH_KEY" => Some(Self::SshKey),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::SshKey => "SSH_KEY",
        }
    }
}

const SFTP_AUTH_TYPE: Discriminator<SftpAuthenticationType> = Discriminator {
    field: "type",
    resolve: SftpAuthenticationType::from_tag,
    tag: SftpAuthenticationType::tag,
};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SftpBasicAuthentication {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SftpSshKeyAuthentication {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub private_key: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SftpAuthenticationInfo {
    Basic(SftpBasicAuthentication),
    SshKey(SftpSshKeyAuthentication),
}

impl SftpAuthenticationInfo {
    pub fn basic(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic(SftpBasicAuthentication {
            user_name: user_name.into(),
            password: password.into(),
        })
    }

    pub fn ssh_key(user_name: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self::SshKey(SftpSshKeyAuthentication {
            user_name: user_name.into(),
            private_key: private_key.into(),
        })
    }

    pub fn auth_type(&self) -> SftpAuthenticationType {
        match self {
            Self::Basic(_) => SftpAuthenticationType::Basic,
            Self::SshKey(_) => SftpAuthenticationType::SshKey,
        }
    }

    pub fn user_name(&self) -> &str {
        match self {
            Self::Basic(auth) => &auth.user_name,
            Self::SshKey(auth) => &auth.user_name,
        }
    }

    pub fn as_basic(&self) -> Option<&SftpBasicAuthentication> {
        match self {
            Self::Basic(auth) => Some(auth),
            _ => None,
        }
    }

    pub fn as_ssh_key(&self) -> Option<&SftpSshKeyAuthentication> {
        match self {
            Self::SshKey(auth) => Some(auth),
            _ => None,
        }
    }
}

impl VariantFamily for SftpAuthenticationInfo {
    type Kind = SftpAuthenticationType;

    const FAMILY: &'static str = "SftpAuthenticationInfo";
    const DECODE: &'static [Discriminator<SftpAuthenticationType>] = &[SFTP_AUTH_TYPE];
    const ENCODE: Discriminator<SftpAuthenticationType> = SFTP_AUTH_TYPE;

    fn kind(&self) -> SftpAuthenticationType {
        self.auth_type()
    }

    fn decode_kind(kind: SftpAuthenticationType, raw: &RawValue) -> ApiResult<Self> {
        Ok(match kind {
            SftpAuthenticationType::Basic => Self::Basic(structural::<Self, _>(kind, raw)?),
            SftpAuthenticationType::SshKey => Self::SshKey(structural::<Self, _>(kind, raw)?),
        })
    }

    fn encode_fields(&self) -> serde_json::Result<Value> {
        match self {
            Self::Basic(auth) => serde_json::to_value(auth),
            Self::SshKey(auth) => serde_json::to_value(auth),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AzureAuthenticationType {
    Basic,
    Sas,
    SharedKey,
}

impl AzureAuthenticationType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BASIC" => Some(Self::Basic),
            "SAS" => Some(Self::Sas),
            "SHARED_KEY" => Some(Self::SharedKey),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Sas => "SAS",
            Self::SharedKey => "SHARED_KEY",
        }
    }
}

const AZURE_AUTH_TYPE: Discriminator<AzureAuthenticationType> = Discriminator {
    field: "type",
    resolve: AzureAuthenticationType::from_tag,
    tag: AzureAuthenticationType::tag,
};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBasicAuthentication {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AzureSasAuthentication {
    #[serde(default)]
    pub token: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureSharedKeyAuthentication {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_key: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AzureAuthenticationInfo {
    Basic(AzureBasicAuthentication),
    Sas(AzureSasAuthentication),
    SharedKey(AzureSharedKeyAuthentication),
}

impl AzureAuthenticationInfo {
    pub fn basic(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic(AzureBasicAuthentication {
            user_name: user_name.into(),
            password: password.into(),
        })
    }

    pub fn sas(token: impl Into<String>) -> Self {
        Self::Sas(AzureSasAuthentication {
            token: token.into(),
        })
    }

    pub fn shared_key(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self::SharedKey(AzureSharedKeyAuthentication {
            account_name: account_name.into(),
            account_key: account_key.into(),
        })
    }

    pub fn auth_type(&self) -> AzureAuthenticationType {
        match self {
            Self::Basic(_) => AzureAuthenticationType::Basic,
            Self::Sas(_) => AzureAuthenticationType::Sas,
            Self::SharedKey(_) => AzureAuthenticationType::SharedKey,
        }
    }

    pub fn as_basic(&self) -> Option<&AzureBasicAuthentication> {
        match self {
            Self::Basic(auth) => Some(auth),
            _ => None,
        }
    }

    pub fn as_sas(&self) -> Option<&AzureSasAuthentication> {
        match self {
            Self::Sas(auth) => Some(auth),
            _ => None,
        }
    }

    pub fn as_shared_key(&self) -> Option<&AzureSharedKeyAuthentication> {
        match self {
            Self::SharedKey(auth) => Some(auth),
            _ => None,
        }
    }
}

impl VariantFamily for AzureAuthenticationInfo {
    type Kind = AzureAuthenticationType;

    const FAMILY: &'static str = "AzureAuthenticationInfo";
    const DECODE: &'static [Discriminator<AzureAuthenticationType>] = &[AZURE_AUTH_TYPE];
    const ENCODE: Discriminator<AzureAuthenticationType> = AZURE_AUTH_TYPE;

    fn kind(&self) -> AzureAuthenticationType {
        self.auth_type()
    }

    fn decode_kind(kind: AzureAuthenticationType, raw: &RawValue) -> ApiResult<Self> {
        Ok(match kind {
            AzureAuthenticationType::Basic => Self::Basic(structural::<Self, _>(kind, raw)?),
            AzureAuthenticationType::Sas => Self::Sas(structural::<Self, _>(kind, raw)?),
            AzureAuthenticationType::SharedKey => {
                Self::SharedKey(structural::<Self, _>(kind, raw)?)
            }
        })
    }

    fn encode_fields(&self) -> serde_json::Result<Value> {
        match self {
            Self::Basic(auth) => serde_json::to_value(auth),
            Self::Sas(auth) => serde_json::to_value(auth),
            Self::SharedKey(auth) => serde_json::to_value(auth),
        }
    }
}

variant_json!(SftpAuthenticationInfo, AzureAuthenticationInfo);
