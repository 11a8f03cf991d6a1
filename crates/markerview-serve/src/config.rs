//! Configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Bind address for web server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding index.html and the wasm bundle
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
    /// Directory of compiled marker datasets, served under /targets
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,
    /// TLS configuration (optional - enables HTTPS when present).
    /// Phones only grant camera access to secure origins.
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            web_root: default_web_root(),
            dataset_dir: default_dataset_dir(),
            tls: None,
        }
    }
}

/// TLS/HTTPS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM format)
    pub cert: String,
    /// Path to private key file (PEM format)
    pub key: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_web_root() -> PathBuf {
    PathBuf::from("web")
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("web/targets")
}

/// Load configuration from file, or defaults if it does not exist
pub fn load_config(path: &Path) -> Result<ServeConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: ServeConfig = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(ServeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("markerview.toml")).unwrap();
        assert_eq!(config, ServeConfig::default());
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_load_with_tls() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("markerview.toml");
        std::fs::write(
            &path,
            r#"
bind = "127.0.0.1:8443"
dataset_dir = "/srv/targets"

[tls]
cert = "cert.pem"
key = "key.pem"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.bind, "127.0.0.1:8443");
        assert_eq!(config.web_root, PathBuf::from("web"));
        assert_eq!(config.dataset_dir, PathBuf::from("/srv/targets"));
        assert_eq!(config.tls.unwrap().key, "key.pem");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("markerview.toml");
        std::fs::write(&path, "bind = [").unwrap();
        assert!(load_config(&path).is_err());
    }
}
