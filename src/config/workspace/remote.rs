//! RemoteConfig: repository host endpoint, credentials and commit templates.

use crate::error::ApiError;
use crate::materialize::CommitMessages;
use crate::remote::github::DEFAULT_API_BASE;
use crate::remote::Visibility;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Fallback source for the access token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_user_agent() -> String {
    format!("scaffold/{}", env!("CARGO_PKG_VERSION"))
}

/// Remote host configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Access token. Prefer `GITHUB_TOKEN` over writing it to a file.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Visibility of created repositories
    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub commit_messages: CommitMessages,
}

impl RemoteConfig {
    /// Configured token, falling back to `GITHUB_TOKEN`.
    pub fn resolve_token(&self) -> Result<SecretString, ApiError> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()))
            .map(SecretString::from)
            .ok_or_else(|| {
                ApiError::ConfigError(format!(
                    "No access token configured: set remote.token or {}",
                    TOKEN_ENV
                ))
            })
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: None,
            visibility: Visibility::default(),
            user_agent: default_user_agent(),
            commit_messages: CommitMessages::default(),
        }
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_base_url", &self.api_base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("visibility", &self.visibility)
            .field("user_agent", &self.user_agent)
            .field("commit_messages", &self.commit_messages)
            .finish()
    }
}
