//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file, then
//! `FERROVIS_*` environment variables (`FERROVIS_PORT=9000`,
//! `FERROVIS_ALLOWED_ORIGINS=https://a.example,https://b.example`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Free-form deployment label, logged at startup.
  pub environment:     String,
  /// CORS origins. A `*` entry allows any origin.
  pub allowed_origins: Vec<String>,
}

impl ServerConfig {
  /// Load configuration, reading `path` if it exists.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080)?
      .set_default("store_path", "ferrovis.db")?
      .set_default("environment", "development")?
      .set_default("allowed_origins", vec!["*"])?
      .add_source(File::from(path.to_path_buf()).required(false))
      .add_source(
        Environment::with_prefix("FERROVIS")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("allowed_origins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn allows_any_origin(&self) -> bool { self.allowed_origins.iter().any(|o| o == "*") }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/ferrovis.toml")).unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.store_path, PathBuf::from("ferrovis.db"));
    assert_eq!(cfg.environment, "development");
    assert!(cfg.allows_any_origin());
  }

  #[test]
  fn file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      "port = 9090\nallowed_origins = [\"https://app.ferrovis.example\"]\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();

    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.allowed_origins, ["https://app.ferrovis.example"]);
    assert!(!cfg.allows_any_origin());
  }
}
