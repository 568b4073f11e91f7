use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Github,
    Gitlab,
    Bitbucket,
    AzureDevops,
    Forgejo,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown git provider: {0}")]
pub struct UnknownProvider(pub String);

impl ProviderId {
    /// Canonical order; every payload enumerates providers in this order.
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Github,
        ProviderId::Gitlab,
        ProviderId::Bitbucket,
        ProviderId::AzureDevops,
        ProviderId::Forgejo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Bitbucket => "bitbucket",
            Self::AzureDevops => "azure_devops",
            Self::Forgejo => "forgejo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Gitlab => "GitLab",
            Self::Bitbucket => "Bitbucket",
            Self::AzureDevops => "Azure DevOps",
            Self::Forgejo => "Forgejo",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Github => 0,
            Self::Gitlab => 1,
            Self::Bitbucket => 2,
            Self::AzureDevops => 3,
            Self::Forgejo => 4,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        ProviderId::ALL
            .into_iter()
            .find(|provider| provider.as_str() == normalized)
            .ok_or_else(|| UnknownProvider(value.to_string()))
    }
}
