// Configuration loading.
// Layers defaults, an optional TOML file, and REPOCARDS_* environment variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL;
use crate::error::{RepoCardsError, Result};
use crate::github::Endpoints;
use crate::github::endpoints::GITHUB_API_BASE;
use crate::scheduler::DEFAULT_INTERVAL;

/// Shortest allowed update interval.
const MIN_INTERVAL_SECS: u64 = 5;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Account owning the tracked repositories.
    pub owner: String,
    /// Repository the site itself is built from; defaults to `<owner>.github.io`.
    pub site_repo: Option<String>,
    pub site_title: Option<String>,
    /// Tracked repositories, in card order.
    #[serde(default)]
    pub projects: Vec<String>,
    pub cache_ttl_secs: u64,
    pub update_interval_secs: u64,
    pub api_base: String,
    pub github_token: Option<String>,
    /// Where the rendered page goes; stdout when unset.
    pub output_path: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("owner", &self.owner)
            .field("site_repo", &self.site_repo)
            .field("site_title", &self.site_title)
            .field("projects", &self.projects)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("update_interval_secs", &self.update_interval_secs)
            .field("api_base", &self.api_base)
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("output_path", &self.output_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: String::new(),
            site_repo: None,
            site_title: None,
            projects: Vec::new(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            update_interval_secs: DEFAULT_INTERVAL.as_secs(),
            api_base: GITHUB_API_BASE.to_string(),
            github_token: None,
            output_path: None,
        }
    }
}

impl Config {
    /// Load from `path` (or the default config file), then the environment.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_file = path.or_else(default_config_path);
        Self::from_figment(figment(config_file.as_deref()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(RepoCardsError::InvalidConfig(
                "owner must be set".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(RepoCardsError::InvalidConfig(
                "cache_ttl_secs must be positive".to_string(),
            ));
        }
        if self.projects.iter().any(|p| p.trim().is_empty()) {
            return Err(RepoCardsError::InvalidConfig(
                "project names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn site_repo(&self) -> String {
        self.site_repo
            .clone()
            .unwrap_or_else(|| format!("{}.github.io", self.owner))
    }

    pub fn site_title(&self) -> String {
        self.site_title
            .clone()
            .unwrap_or_else(|| format!("{} / projects", self.owner))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Update interval, never shorter than a few seconds.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs.max(MIN_INTERVAL_SECS))
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.api_base, &self.owner, self.site_repo())
    }
}

fn figment(config_file: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(file) = config_file {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    figment.merge(Env::prefixed("REPOCARDS_")).merge(
        Env::raw()
            .only(&["GITHUB_TOKEN"])
            .map(|_| "github_token".into()),
    )
}

/// `config.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "repocards").map(|dirs| dirs.config_dir().join("config.toml"))
}
