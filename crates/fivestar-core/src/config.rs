use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_QUOTE_URL: &str = "https://api.quotable.io/random";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub quote_url: Option<String>,
    /// Tab URL used when none is given on the command line
    pub default_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config file and apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_default_url(url: &str) -> Result<()> {
        let mut config = Self::load_from(&Self::get_config_path()?).unwrap_or_else(|_| Self::new());
        config.default_url = Some(url.to_string());
        config.save()
    }

    /// Apply `FIVESTAR_BACKEND_URL` / `FIVESTAR_QUOTE_URL` as looked up by `var`.
    /// Empty values are ignored.
    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = non_empty(var("FIVESTAR_BACKEND_URL")) {
            self.backend_url = Some(url);
        }
        if let Some(url) = non_empty(var("FIVESTAR_QUOTE_URL")) {
            self.quote_url = Some(url);
        }
    }

    /// Command-line flags win over both the file and the environment.
    pub fn with_overrides(mut self, backend_url: Option<String>, quote_url: Option<String>) -> Self {
        if let Some(url) = non_empty(backend_url) {
            self.backend_url = Some(url);
        }
        if let Some(url) = non_empty(quote_url) {
            self.quote_url = Some(url);
        }
        self
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn quote_url(&self) -> &str {
        self.quote_url.as_deref().unwrap_or(DEFAULT_QUOTE_URL)
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("fivestar"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
