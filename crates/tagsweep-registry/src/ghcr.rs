//! GitHub Container Registry adapter.
//!
//! Lists container package versions through the GitHub packages API and
//! deletes them by version id. Versions can carry several tags or none at
//! all; both shapes normalize into the shared [`Artifact`] model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tagsweep_policy::Artifact;

use crate::config::GhcrConfig;
use crate::error::{RegistryError, Result};
use crate::executor::{DeleteTarget, RegistryBackend};

const PAGE_SIZE: usize = 100;

/// Client for the GHCR packages API.
#[derive(Debug)]
pub struct GhcrClient {
    config: GhcrConfig,
    http: reqwest::Client,
}

/// One package version row as returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct GhcrVersion {
    id: u64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: GhcrMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct GhcrMetadata {
    #[serde(default)]
    container: GhcrContainerMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct GhcrContainerMetadata {
    #[serde(default)]
    tags: Vec<String>,
}

impl GhcrVersion {
    fn into_artifact(self) -> Artifact {
        let timestamp = self.updated_at.unwrap_or(self.created_at);
        Artifact::new(self.id.to_string(), timestamp).with_tags(self.metadata.container.tags)
    }
}

impl GhcrClient {
    /// Creates a new GHCR client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GhcrConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::ConnectionFailed {
                url: config.api_base.clone(),
                source: e,
            })?;

        Ok(Self { config, http })
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.config.token)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers
    }

    fn versions_url(&self, page: usize) -> String {
        format!(
            "{}/{}/{}/packages/container/{}/versions?per_page={PAGE_SIZE}&page={page}",
            self.config.api_base,
            self.config.owner_type.path_segment(),
            self.config.owner,
            self.config.package,
        )
    }

    /// Lists all package versions as normalized artifacts.
    ///
    /// Pagination runs to completion; a failed page is logged and the
    /// listing returns whatever was retrieved so far, so the run proceeds
    /// on partial data rather than aborting.
    pub async fn list_artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = Vec::new();
        let mut page = 1;

        loop {
            match self.fetch_page(page).await {
                Ok(rows) => {
                    let count = rows.len();
                    artifacts.extend(rows.into_iter().map(GhcrVersion::into_artifact));
                    if count < PAGE_SIZE {
                        break;
                    }
                    page += 1;
                }
                Err(err) => {
                    tracing::error!(
                        page,
                        fetched = artifacts.len(),
                        error = %err,
                        "GHCR page fetch failed; continuing with partial listing"
                    );
                    break;
                }
            }
        }

        tracing::debug!(count = artifacts.len(), "listed GHCR package versions");
        artifacts
    }

    async fn fetch_page(&self, page: usize) -> Result<Vec<GhcrVersion>> {
        let url = self.versions_url(page);
        let response = self
            .http
            .get(&url)
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

    /// Deletes one package version by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::HttpStatus`] on a non-success response, so
    /// callers can retry 429/5xx.
    pub async fn delete_version(&self, id: &str) -> Result<()> {
        let url = format!(
            "{}/{}/{}/packages/container/{}/versions/{id}",
            self.config.api_base,
            self.config.owner_type.path_segment(),
            self.config.owner,
            self.config.package,
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
impl RegistryBackend for GhcrClient {
    fn name(&self) -> &'static str {
        "ghcr"
    }

    async fn delete(&self, target: &DeleteTarget) -> Result<()> {
        match target {
            DeleteTarget::Version { id, .. } => self.delete_version(id).await,
            DeleteTarget::Tag { name } => Err(RegistryError::DeleteFailed {
                target: format!("tag '{name}'"),
                message: "GHCR deletes by version id, not tag name".to_string(),
            }),
        }
    }
}
