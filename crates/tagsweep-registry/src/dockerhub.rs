//! Docker Hub adapter.
//!
//! Docker Hub has no untagged versions: every listing row is one tag. Login
//! happens up front against `/v2/users/login` and yields a bearer token; a
//! failed login skips this registry's cleanup for the run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tagsweep_policy::Artifact;

use crate::config::DockerHubConfig;
use crate::error::{RegistryError, Result};
use crate::executor::{DeleteTarget, RegistryBackend};

const PAGE_SIZE: usize = 100;

/// Client for the Docker Hub repository API, logged in.
#[derive(Debug)]
pub struct DockerHubClient {
    config: DockerHubConfig,
    http: reqwest::Client,
    token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// One page of the tag listing.
#[derive(Debug, Deserialize)]
struct TagPage {
    next: Option<String>,
    #[serde(default)]
    results: Vec<TagRow>,
}

/// One tag row: Docker Hub artifacts always have exactly one tag.
#[derive(Debug, Deserialize)]
struct TagRow {
    name: String,
    last_updated: DateTime<Utc>,
}

impl TagRow {
    fn into_artifact(self) -> Artifact {
        Artifact::new(self.name.clone(), self.last_updated).with_tags(vec![self.name])
    }
}

impl DockerHubClient {
    /// Logs in to Docker Hub and returns a ready client.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LoginFailed`] when authentication is
    /// rejected; callers skip this registry's cleanup in that case.
    pub async fn login(config: DockerHubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::ConnectionFailed {
                url: config.api_base.clone(),
                source: e,
            })?;

        let url = format!("{}/v2/users/login", config.api_base);
        let response = http
            .post(&url)
            .json(&LoginRequest {
                username: &config.username,
                password: &config.password,
            })
            .send()
            .await
            .map_err(|e| RegistryError::LoginFailed {
                registry: "docker hub".to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RegistryError::LoginFailed {
                registry: "docker hub".to_string(),
                message: format!("HTTP {}", response.status().as_u16()),
            });
        }

        let login: LoginResponse =
            response
                .json()
                .await
                .map_err(|e| RegistryError::LoginFailed {
                    registry: "docker hub".to_string(),
                    message: e.to_string(),
                })?;

        tracing::debug!(username = %config.username, "logged in to docker hub");

        Ok(Self {
            config,
            http,
            token: login.token,
        })
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.token)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// Lists all repository tags as normalized single-tag artifacts.
    ///
    /// Follows `next` links to completion; a failed page is logged and the
    /// listing returns whatever was retrieved so far.
    pub async fn list_artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = Vec::new();
        let mut url = format!(
            "{}/v2/repositories/{}/{}/tags?page_size={PAGE_SIZE}",
            self.config.api_base, self.config.namespace, self.config.repository,
        );

        loop {
            match self.fetch_page(&url).await {
                Ok(page) => {
                    artifacts.extend(page.results.into_iter().map(TagRow::into_artifact));
                    match page.next {
                        Some(next) => url = next,
                        None => break,
                    }
                }
                Err(err) => {
                    tracing::error!(
                        %url,
                        fetched = artifacts.len(),
                        error = %err,
                        "docker hub page fetch failed; continuing with partial listing"
                    );
                    break;
                }
            }
        }

        tracing::debug!(count = artifacts.len(), "listed docker hub tags");
        artifacts
    }

    async fn fetch_page(&self, url: &str) -> Result<TagPage> {
        let response = self
            .http
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::HttpStatus {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response.json().await.map_err(Into::into)
    }

    /// Deletes one tag by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::HttpStatus`] on a non-success response, so
    /// callers can retry 429/5xx.
    pub async fn delete_tag(&self, name: &str) -> Result<()> {
        let url = format!(
            "{}/v2/repositories/{}/{}/tags/{name}/",
            self.config.api_base, self.config.namespace, self.config.repository,
        );

        let response = self
            .http
            .delete(&url)
            .headers(self.auth_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::HttpStatus {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl RegistryBackend for DockerHubClient {
    fn name(&self) -> &'static str {
        "docker hub"
    }

    async fn delete(&self, target: &DeleteTarget) -> Result<()> {
        match target {
            DeleteTarget::Tag { name } => self.delete_tag(name).await,
            DeleteTarget::Version { id, .. } => Err(RegistryError::DeleteFailed {
                target: format!("version '{id}'"),
                message: "docker hub deletes by tag name, not version id".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_page_parsing() {
        let json = r#"{
            "count": 3,
            "next": "https://hub.docker.com/v2/repositories/acme/api/tags?page=2",
            "previous": null,
            "results": [
                { "name": "latest", "last_updated": "2024-03-01T12:00:00Z" },
                { "name": "v1.2.3", "last_updated": "2024-02-20T08:30:00Z" }
            ]
        }"#;

        let page: TagPage = serde_json::from_str(json).unwrap();
        assert!(page.next.is_some());
        assert_eq!(page.results.len(), 2);

        let artifact = page.results.into_iter().next().unwrap().into_artifact();
        assert_eq!(artifact.id, "latest");
        assert_eq!(artifact.tags, vec!["latest"]);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let json = r#"{ "next": null, "results": [] }"#;
        let page: TagPage = serde_json::from_str(json).unwrap();
        assert!(page.next.is_none());
    }

    #[test]
    fn test_login_response_parsing() {
        let json = r#"{ "token": "eyJhbGciOi..." }"#;
        let login: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(login.token, "eyJhbGciOi...");
    }
}
