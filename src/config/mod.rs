mod defaults;
mod validation;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use validation::expand_env_var_in_string;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Endpoint handed to the transport factory by `connect_configured`.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Page budget for one listing. `0` disables the limit.
    #[serde(default = "defaults::default_max_pages")]
    pub max_pages: usize,
}

impl PaginationConfig {
    pub fn max_pages(&self) -> Option<usize> {
        if self.max_pages == 0 {
            None
        } else {
            Some(self.max_pages)
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl ClientConfig {
    /// Load the first config file found, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::get_config_paths()
            .into_iter()
            .find(|path| path.exists())
            .map(|path| Self::load_from(&path))
            .transpose()?
            .unwrap_or_default();

        config.apply_env()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        tracing::debug!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    /// Environment variables win over file values.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("EASY_MCP_SERVER_URL") {
            self.server.url = Some(url);
        }

        if let Ok(raw) = env::var("EASY_MCP_MAX_PAGES") {
            self.pagination.max_pages = raw
                .trim()
                .parse()
                .with_context(|| format!("EASY_MCP_MAX_PAGES is not a page count: {}", raw))?;
        }

        Ok(())
    }

    /// The configured server URL with `${VAR}` references expanded.
    pub fn server_url(&self) -> Option<String> {
        self.server
            .url
            .as_deref()
            .map(expand_env_var_in_string)
            .filter(|url| !url.is_empty())
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".easy-mcp.yaml"),
            PathBuf::from(".easy-mcp.yml"),
            PathBuf::from(".easy-mcp.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("easy-mcp");
            paths.push(config_dir.join("easy-mcp.yaml"));
            paths.push(config_dir.join("easy-mcp.yml"));
            paths.push(config_dir.join("easy-mcp.json"));
        }

        paths
    }
}
