use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::remote::DEFAULT_API_URL;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote page configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// Integration token
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Page synced on startup
    pub page_id: Option<String>,
    /// API base URL (default: https://api.notion.com/v1)
    pub api_url: Option<String>,
}

impl RemoteConfig {
    /// Returns true if both a token and a page are set
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.page_id.is_some()
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Local markdown file kept in sync
    pub markdown_file: ConfigValue<PathBuf>,
    /// Address the server binds to
    pub host: ConfigValue<String>,
    pub port: ConfigValue<u16>,
    /// How often the markdown file is checked for outside edits
    pub poll_interval_ms: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub remote: RemoteConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    markdown_file: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    poll_interval_ms: Option<u64>,
    remote: Option<RemoteConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading environment variables through `env`.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut markdown_file = ConfigValue::new(
            Self::default_data_dir().join("note.md"),
            ConfigSource::Default,
        );
        let mut host = ConfigValue::new("127.0.0.1".to_string(), ConfigSource::Default);
        let mut port = ConfigValue::new(8000, ConfigSource::Default);
        let mut poll_interval_ms = ConfigValue::new(1000, ConfigSource::Default);
        let mut config_file = None;
        let mut remote = RemoteConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(file) = file_config.markdown_file {
                // Resolve relative paths against config file's directory
                let resolved = if file.is_relative() {
                    path.parent().map(|p| p.join(&file)).unwrap_or(file)
                } else {
                    file
                };
                markdown_file = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(value) = file_config.host {
                host = ConfigValue::new(value, ConfigSource::File);
            }
            if let Some(value) = file_config.port {
                port = ConfigValue::new(value, ConfigSource::File);
            }
            if let Some(value) = file_config.poll_interval_ms {
                poll_interval_ms = ConfigValue::new(value, ConfigSource::File);
            }
            if let Some(value) = file_config.remote {
                remote = value;
            }
        }

        // Apply environment variable overrides
        if let Some(value) = env("MDSYNC_MARKDOWN_FILE") {
            markdown_file = ConfigValue::new(PathBuf::from(value), ConfigSource::Environment);
        }
        if let Some(value) = env("MDSYNC_HOST") {
            host = ConfigValue::new(value, ConfigSource::Environment);
        }
        if let Some(value) = env("MDSYNC_PORT") {
            port = ConfigValue::new(parse_env("MDSYNC_PORT", value)?, ConfigSource::Environment);
        }
        if let Some(value) = env("MDSYNC_POLL_INTERVAL_MS") {
            poll_interval_ms = ConfigValue::new(
                parse_env("MDSYNC_POLL_INTERVAL_MS", value)?,
                ConfigSource::Environment,
            );
        }
        if let Some(value) = env("MDSYNC_NOTION_TOKEN") {
            remote.token = Some(value);
        }
        if let Some(value) = env("MDSYNC_NOTION_PAGE_ID") {
            remote.page_id = Some(value);
        }
        if let Some(value) = env("MDSYNC_NOTION_API_URL") {
            remote.api_url = Some(value);
        }

        Ok(Self {
            markdown_file,
            host,
            port,
            poll_interval_ms,
            config_file,
            remote,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/mdsync/
    /// - macOS: ~/Library/Application Support/mdsync/
    /// - Windows: %APPDATA%/mdsync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mdsync")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/mdsync/
    /// - macOS: ~/Library/Application Support/mdsync/
    /// - Windows: %APPDATA%/mdsync/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mdsync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv(key.to_string(), value))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    /// Environment variable with a value of the wrong type
    InvalidEnv(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(key, value) => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError(_, e) => Some(e),
            ConfigError::ParseError(_, e) => Some(e),
            ConfigError::InvalidEnv(..) => None,
        }
    }
}
