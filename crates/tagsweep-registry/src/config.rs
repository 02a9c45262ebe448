//! Configuration types for the registry adapters.

use std::str::FromStr;
use std::time::Duration;

use crate::error::RegistryError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_user_agent() -> String {
    format!("tagsweep/{}", env!("CARGO_PKG_VERSION"))
}

/// Whether a GHCR package is owned by a user or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerType {
    /// A user-owned package.
    User,

    /// An organization-owned package.
    Organization,
}

impl OwnerType {
    /// Returns the API path segment for this owner type.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Organization => "orgs",
        }
    }
}

impl FromStr for OwnerType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "users" => Ok(Self::User),
            "org" | "orgs" | "organization" => Ok(Self::Organization),
            other => Err(RegistryError::InvalidConfig {
                reason: format!("unknown owner type '{other}': expected 'user' or 'org'"),
            }),
        }
    }
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Organization => write!(f, "org"),
        }
    }
}

/// Configuration for the GHCR adapter.
#[derive(Debug, Clone)]
pub struct GhcrConfig {
    /// Package owner (user or organization name).
    pub owner: String,

    /// Owner type, selecting the API path.
    pub owner_type: OwnerType,

    /// Container package name.
    pub package: String,

    /// Token with `read:packages` and `delete:packages` scopes.
    pub token: String,

    /// API base URL.
    pub api_base: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl GhcrConfig {
    /// Creates a GHCR configuration against the public GitHub API.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        owner_type: OwnerType,
        package: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            owner_type,
            package: package.into(),
            token: token.into(),
            api_base: "https://api.github.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for the Docker Hub adapter.
#[derive(Debug, Clone)]
pub struct DockerHubConfig {
    /// Repository namespace (user or organization).
    pub namespace: String,

    /// Repository name.
    pub repository: String,

    /// Docker Hub username.
    pub username: String,

    /// Docker Hub password or personal access token.
    pub password: String,

    /// API base URL.
    pub api_base: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl DockerHubConfig {
    /// Creates a Docker Hub configuration against the public Hub API.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        repository: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            repository: repository.into(),
            username: username.into(),
            password: password.into(),
            api_base: "https://hub.docker.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
