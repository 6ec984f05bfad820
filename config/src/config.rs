// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

pub(crate) const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";
pub(crate) const DEFAULT_CONFIG_FILE: &str = "photorelay.toml";
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub server: ServerConfig,
  pub telegram: TelegramSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  pub max_body_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "0.0.0.0".to_string(),
      port: 8080,
      max_body_bytes: DEFAULT_MAX_BODY_BYTES,
    }
  }
}

impl ServerConfig {
  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
  pub api_base: String,
  pub json_timeout_secs: u64,
  pub upload_timeout_secs: u64,
}

impl Default for TelegramSettings {
  fn default() -> Self {
    Self {
      api_base: "https://api.telegram.org".to_string(),
      json_timeout_secs: 10,
      upload_timeout_secs: 20,
    }
  }
}

impl TelegramSettings {
  pub fn json_timeout(&self) -> Duration {
    Duration::from_secs(self.json_timeout_secs)
  }

  pub fn upload_timeout(&self) -> Duration {
    Duration::from_secs(self.upload_timeout_secs)
  }
}

impl Config {
  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    let content = fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content)
      .map_err(|e| Error::ConfigError(format!("Invalid configuration file: {}", e)))?;
    debug!("Loaded configuration successfully");
    Ok(config)
  }

  /// Reads `$RELAY_CONFIG`, then `photorelay.toml`, then falls back to the
  /// built-in defaults. Environment overrides are applied last.
  pub fn load() -> Result<Self, Error> {
    Self::load_with(|key| std::env::var(key).ok())
  }

  pub fn load_with<F>(lookup: F) -> Result<Self, Error>
  where
    F: Fn(&str) -> Option<String>,
  {
    let path = lookup(CONFIG_PATH_ENV)
      .map(PathBuf::from)
      .or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
      });

    let mut config = match path {
      Some(path) => {
        debug!("Reading configuration from {}", path.display());
        Self::from_file(&path)?
      }
      None => Self::default(),
    };

    config.apply_overrides(lookup)?;
    config.validate()?;
    Ok(config)
  }

  pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), Error>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(host) = lookup("HOST") {
      self.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
      self.server.port = parse_var("PORT", &port)?;
    }
    if let Some(limit) = lookup("MAX_BODY_BYTES") {
      self.server.max_body_bytes = parse_var("MAX_BODY_BYTES", &limit)?;
    }
    if let Some(api_base) = lookup("TELEGRAM_API_BASE") {
      self.telegram.api_base = api_base;
    }
    Ok(())
  }

  pub fn validate(&self) -> Result<(), Error> {
    if self.server.port == 0 {
      return Err(Error::ConfigError("server.port must be non-zero".into()));
    }
    if self.server.max_body_bytes == 0 {
      return Err(Error::ConfigError(
        "server.max_body_bytes must be positive".into(),
      ));
    }
    if self.telegram.json_timeout_secs == 0 || self.telegram.upload_timeout_secs == 0 {
      return Err(Error::ConfigError("telegram timeouts must be positive".into()));
    }
    let base = self.telegram.api_base.as_str();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
      return Err(Error::ConfigError(format!(
        "telegram.api_base must be an http(s) URL, got {}",
        base
      )));
    }
    Ok(())
  }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, Error> {
  value
    .trim()
    .parse()
    .map_err(|_| Error::ConfigError(format!("{} has an invalid value: {}", name, value)))
}
