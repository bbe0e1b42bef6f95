//! Dashboard configuration
//!
//! Resolution order: built-in defaults, then the TOML file, then
//! `AGENTDASH_*` environment variables. Command-line flags are applied by the
//! binaries on top of that.

use crate::error::{Error, Result};
use crate::source::{DASHBOARD_PAGE_SIZE, LIST_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mock backend the dashboard ships against
pub const DEFAULT_API_BASE_URL: &str = "https://39e3f01b-925f-4bbb-afa9-33401131cb97.mock.pstmn.io";

/// Candidate team-list endpoints, tried in order
pub const DEFAULT_TEAM_ENDPOINTS: [&str; 3] = ["/teams/all", "/all-teams", "/teams/my-teams"];

pub const ENV_API_URL: &str = "AGENTDASH_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "AGENTDASH_TIMEOUT_SECS";
pub const ENV_SOURCE: &str = "AGENTDASH_SOURCE";

/// Where the surfaces get their data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The HTTP backend at `api_base_url`
    #[default]
    Remote,
    /// Built-in demo data, no network
    Fixtures,
}

impl SourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "api" => Some(SourceKind::Remote),
            "fixtures" | "demo" | "mock" => Some(SourceKind::Fixtures),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Remote => "remote",
            SourceKind::Fixtures => "fixtures",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base_url: String,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub dashboard_page_size: u32,
    pub list_page_size: u32,
    pub team_endpoints: Vec<String>,
    pub source: SourceKind,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            dashboard_page_size: DASHBOARD_PAGE_SIZE,
            list_page_size: LIST_PAGE_SIZE,
            team_endpoints: DEFAULT_TEAM_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source: SourceKind::Remote,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// `<config dir>/agentdash/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("agentdash").join("config.toml"))
    }

    /// Load `path`, or the default path if it exists, or fall back to
    /// defaults; then apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("Loading config from {}", path.display());
                    Self::load(&path)?
                }
                None => Self::default(),
            },
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `AGENTDASH_*` variables.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }

        if let Ok(raw) = std::env::var(ENV_SOURCE) {
            self.source = SourceKind::parse(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "{} must be 'remote' or 'fixtures', got '{}'",
                    ENV_SOURCE, raw
                ))
            })?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.source == SourceKind::Remote && self.api_base_url.trim().is_empty() {
            return Err(Error::Config("api_base_url is empty".to_string()));
        }
        if self.dashboard_page_size == 0 || self.list_page_size == 0 {
            return Err(Error::Config("page sizes must be positive".to_string()));
        }
        if self.team_endpoints.is_empty() {
            return Err(Error::Config("team_endpoints is empty".to_string()));
        }
        Ok(())
    }
}
