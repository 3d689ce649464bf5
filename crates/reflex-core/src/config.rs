use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between attempts (e.g. 0.5 = 500ms).
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 3.0,
        }
    }
}

/// Global configuration loaded from `~/.config/reflex/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflexConfig {
    /// Number of scan workers per domain (capped by the number of eligible URLs).
    pub concurrency: usize,
    /// Per-attempt HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Base URL of the archive CDX index.
    pub archive_endpoint: String,
    /// Client identities; one is picked at random for every request.
    pub user_agents: Vec<String>,
    /// Path extensions (with leading dot) whose URLs are dropped before scanning.
    pub denied_extensions: Vec<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

pub const DEFAULT_ARCHIVE_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";

pub const DEFAULT_USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:54.0) Gecko/20100101 Firefox/54.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/603.3.8 Safari/603.3.8",
];

pub const DEFAULT_DENIED_EXTENSIONS: [&str; 17] = [
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".svg", ".json", ".css", ".js", ".webp", ".woff",
    ".woff2", ".eot", ".ttf", ".otf", ".mp4", ".txt",
];

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout_secs: 10,
            archive_endpoint: DEFAULT_ARCHIVE_ENDPOINT.to_string(),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            denied_extensions: DEFAULT_DENIED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            retry: None,
        }
    }
}

impl ReflexConfig {
    /// Retry policy from the `[retry]` section, or the built-in default.
    pub fn retry_policy(&self) -> RetryPolicy {
        match &self.retry {
            Some(r) => RetryPolicy {
                max_attempts: r.max_attempts.max(1),
                delay: Duration::from_secs_f64(r.delay_secs.max(0.0)),
            },
            None => RetryPolicy::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            anyhow::bail!("user_agents must contain at least one entry");
        }
        if self.archive_endpoint.trim().is_empty() {
            anyhow::bail!("archive_endpoint must not be empty");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reflex")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReflexConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReflexConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<ReflexConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: ReflexConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
