// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!(
        "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub app_base_url: String,
  /// Load demo categories and products into the store at startup.
  pub seed_demo_data: bool,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = lookup("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let app_base_url = lookup("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));

    let seed_demo_data = lookup("SEED_DEMO_DATA")
      .unwrap_or_else(|| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DEMO_DATA value: {}", e)))?;
    let log_format = match lookup("LOG_FORMAT") {
      Some(raw) => raw.parse()?,
      None => LogFormat::Pretty,
    };

    Ok(Self {
      server_host,
      server_port,
      app_base_url,
      seed_demo_data,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_nothing_is_set() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:8080");
    assert_eq!(config.app_base_url, "http://127.0.0.1:8080");
    assert!(config.seed_demo_data);
    assert_eq!(config.log_format, LogFormat::Pretty);
  }

  #[test]
  fn explicit_values_override_defaults() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("SERVER_HOST", "0.0.0.0"),
      ("SERVER_PORT", "9090"),
      ("SEED_DEMO_DATA", "false"),
      ("LOG_FORMAT", "JSON"),
    ]))
    .unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:9090");
    assert_eq!(config.app_base_url, "http://0.0.0.0:9090");
    assert!(!config.seed_demo_data);
    assert_eq!(config.log_format, LogFormat::Json);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    for pairs in [
      [("SERVER_PORT", "eighty")],
      [("SEED_DEMO_DATA", "maybe")],
      [("LOG_FORMAT", "xml")],
    ] {
      let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
      assert!(matches!(err, AppError::Config(_)), "{:?}", err);
    }
  }
}
