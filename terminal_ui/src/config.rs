use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "todomaster";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub data_dir: Option<PathBuf>,
    /// Where exports land; defaults to the current directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .context("Could not determine data directory")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Environment first, then command-line flags.
    pub fn with_overrides(mut self, api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Ok(url) = std::env::var("TODOMASTER_API_URL") {
            self.api_base_url = url;
        }
        if let Ok(dir) = std::env::var("TODOMASTER_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        if let Some(dir) = data_dir {
            self.data_dir = Some(dir);
        }
        self
    }
}

pub fn config_file() -> Result<PathBuf> {
    // TODOMASTER_CONFIG_PATH points straight at a config file
    if let Ok(path) = std::env::var("TODOMASTER_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME).join("config.toml"))
        .context("Could not determine config directory")
}

pub fn load() -> Result<Config> {
    let path = config_file()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&contents).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = parse("data_dir = \"/tmp/todomaster\"\n").unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/todomaster")));
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn flags_override_file() {
        let config = Config::default().with_overrides(Some("http://tasks.internal/api/v1".into()), None);
        assert_eq!(config.api_base_url, "http://tasks.internal/api/v1");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("api_base_url = [").is_err());
    }
}
