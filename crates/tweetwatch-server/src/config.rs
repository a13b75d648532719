//! Server configuration

use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tweetwatch_classifiers::ArtifactPaths;
use tweetwatch_core::{Error, Result};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artifact locations
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    /// Echo the submitted text on the result page
    #[serde(default = "default_true")]
    pub echo_text: bool,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("invalid config {config_path}: {e}")))?
        } else {
            Self::default()
        };

        config.apply_overrides(cli);
        Ok(config)
    }

    /// Apply CLI overrides on top of file values
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            self.port = port;
        }

        if let Some(classifier) = &cli.classifier {
            self.artifacts.classifier = classifier.clone();
        }

        if let Some(vectorizer) = &cli.vectorizer {
            self.artifacts.vectorizer = vectorizer.clone();
        }

        if cli.no_echo {
            self.echo_text = false;
        }
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .map_err(|e| {
                Error::config(format!(
                    "invalid listen address {}:{}: {e}",
                    self.listen, self.port
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            artifacts: ArtifactPaths::default(),
            echo_text: true,
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("/nonexistent/tweetwatch.yaml", &Cli::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 5000);
        assert!(config.echo_text);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ServerConfig = serde_yaml::from_str(
            "port: 8080\nartifacts:\n  classifier: models/lr.yaml\n",
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.listen, "127.0.0.1");
        assert_eq!(config.artifacts.classifier, PathBuf::from("models/lr.yaml"));
        assert_eq!(
            config.artifacts.vectorizer,
            PathBuf::from("Models/tfidf_vectorizer.json")
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweetwatch.yaml");
        std::fs::write(&path, "listen: 0.0.0.0\nport: 9000\necho_text: true\n").unwrap();

        let cli = Cli {
            port: Some(9100),
            vectorizer: Some(PathBuf::from("other/vec.json")),
            no_echo: true,
            ..Default::default()
        };
        let config = ServerConfig::load(path.to_str().unwrap(), &cli).unwrap();

        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert_eq!(config.artifacts.vectorizer, PathBuf::from("other/vec.json"));
        assert!(!config.echo_text);
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "port: [not a port").unwrap();

        let err = ServerConfig::load(path.to_str().unwrap(), &Cli::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_listen_address() {
        let config = ServerConfig {
            listen: "not an address".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
