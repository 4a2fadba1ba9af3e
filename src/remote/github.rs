//! GitHub REST API host.
//!
//! - `POST /user/repos` creates a repository owned by the token's user.
//! - `PUT /repos/{owner}/{repo}/contents/{path}` creates one file per commit.

use super::{NewRepository, RepoHandle, RepositoryHost};
use crate::error::RemoteError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Deserialize)]
struct RepositoryResponse {
    name: String,
    full_name: String,
    html_url: String,
    owner: OwnerResponse,
}

#[derive(Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// Repository host backed by the GitHub REST API.
pub struct GitHubHost {
    client: reqwest::Client,
    api_base: Url,
    token: SecretString,
}

impl GitHubHost {
    pub fn new(api_base: &str, token: SecretString, user_agent: &str) -> Result<Self, RemoteError> {
        let api_base = Url::parse(api_base)
            .map_err(|e| RemoteError::Network(format!("Invalid API base URL {}: {}", api_base, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(RemoteError::Network(format!(
                "Invalid API base URL {}: cannot be a base",
                api_base
            )));
        }
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| RemoteError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_base,
            token,
        })
    }

    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url, RemoteError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Network(format!("Invalid API base URL {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(self.token.expose_secret())
    }
}

impl std::fmt::Debug for GitHubHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubHost")
            .field("api_base", &self.api_base.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    async fn create_repository(&self, request: &NewRepository) -> Result<RepoHandle, RemoteError> {
        let url = self.endpoint(["user", "repos"])?;
        let body = json!({
            "name": request.name,
            "private": request.visibility.is_private(),
            "description": request.description,
            "auto_init": false,
        });

        tracing::debug!(url = %url, repository = %request.name, "Creating repository");
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let response = match check_status(response).await {
            Err(RemoteError::Api { status: 422, message })
                if message.contains("already exists") =>
            {
                return Err(RemoteError::AlreadyExists(request.name.clone()));
            }
            other => other?,
        };

        let repo: RepositoryResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        tracing::info!(repository = %repo.full_name, url = %repo.html_url, "Repository created");
        Ok(RepoHandle {
            owner: repo.owner.login,
            name: repo.name,
            full_name: repo.full_name,
            html_url: repo.html_url,
        })
    }

    async fn create_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        commit_message: &str,
        content: &str,
    ) -> Result<(), RemoteError> {
        let segments = ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
            .into_iter()
            .chain(path.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(segments)?;
        let body = json!({
            "message": commit_message,
            "content": BASE64.encode(content.as_bytes()),
        });

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }
}

/// Map non-success responses onto [`RemoteError`].
async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && rate_limit_exhausted(&response))
    {
        return Err(RemoteError::RateLimited {
            retry_after_secs: retry_after_secs(&response),
        });
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(RemoteError::Authentication(
            "GitHub API authentication failed - check access token".to_string(),
        ));
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(parsed) if parsed.errors.is_empty() => parsed.message,
        Ok(parsed) => format!(
            "{}: {}",
            parsed.message,
            serde_json::Value::Array(parsed.errors)
        ),
        Err(_) if text.is_empty() => format!("HTTP {}", status),
        Err(_) => text,
    };
    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

fn header_value<'r>(response: &'r Response, name: &str) -> Option<&'r str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

fn rate_limit_exhausted(response: &Response) -> bool {
    header_value(response, "x-ratelimit-remaining") == Some("0")
        || header_value(response, "retry-after").is_some()
}

fn retry_after_secs(response: &Response) -> u64 {
    if let Some(secs) = header_value(response, "retry-after").and_then(|v| v.parse().ok()) {
        return secs;
    }
    if let Some(reset) = header_value(response, "x-ratelimit-reset").and_then(|v| v.parse::<i64>().ok()) {
        let now = chrono::Utc::now().timestamp();
        return u64::try_from(reset.saturating_sub(now)).unwrap_or(0);
    }
    DEFAULT_RETRY_AFTER_SECS
}
