// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::info;

pub const DEFAULT_SNAPSHOT_URL: &str = "https://api.brightdata.com/datasets/v3/snapshot";
const DEFAULT_PORT: u16 = 3000;

/// Runtime settings for the exporter. Values come from `config.yaml`
/// (environment-specific sections) with per-field environment variable
/// overrides; the bearer token is environment-only.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub trigger_url: String,
    pub snapshot_url: String,
    pub dataset_id: String,
    pub api_token: String,
    pub port: u16,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct FileSection {
    trigger_url: Option<String>,
    snapshot_url: Option<String>,
    dataset_id: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSection,
    #[serde(default)]
    production: FileSection,
}

impl ExporterConfig {
    /// Load configuration from `config.yaml` in the working directory,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yaml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());

        let section = if path.exists() {
            info!(
                "Loading configuration from {} for environment: {}",
                path.display(),
                environment
            );
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            match environment.as_str() {
                "production" => file.production,
                _ => file.local,
            }
        } else {
            FileSection::default()
        };

        let trigger_url = env::var("BD_API_URL")
            .ok()
            .or(section.trigger_url)
            .context("BD_API_URL not set and no trigger_url in config.yaml")?;

        let snapshot_url = env::var("BD_SNAPSHOT_URL")
            .ok()
            .or(section.snapshot_url)
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_URL.to_string());

        let dataset_id = env::var("DATASET_ID")
            .ok()
            .or(section.dataset_id)
            .context("DATASET_ID not set and no dataset_id in config.yaml")?;

        // Never read the token from the file: it is a secret.
        let api_token = env::var("BD_TOKEN").context("BD_TOKEN environment variable not set")?;

        let port = match env::var("PORT").ok() {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => section.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            trigger_url,
            snapshot_url,
            dataset_id,
            api_token,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns every BD_* variable: scenarios run sequentially so
    // parallel test threads never race on process environment.
    #[test]
    fn test_layered_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "local:\n  trigger_url: https://file.example/trigger\n  port: 4000\nproduction:\n  trigger_url: https://prod.example/trigger\n",
        )
        .expect("write config");

        for key in ["ENVIRONMENT", "BD_API_URL", "BD_SNAPSHOT_URL", "PORT"] {
            env::remove_var(key);
        }
        env::set_var("BD_TOKEN", "test-token");
        env::set_var("DATASET_ID", "gd_test");

        // File value used when no env override is present.
        let config = ExporterConfig::load_from(&config_path).expect("load");
        assert_eq!(config.trigger_url, "https://file.example/trigger");
        assert_eq!(config.snapshot_url, DEFAULT_SNAPSHOT_URL);
        assert_eq!(config.port, 4000);
        assert_eq!(config.api_token, "test-token");

        // Env var beats the file.
        env::set_var("BD_API_URL", "https://env.example/trigger");
        env::set_var("PORT", "5001");
        let config = ExporterConfig::load_from(&config_path).expect("load");
        assert_eq!(config.trigger_url, "https://env.example/trigger");
        assert_eq!(config.port, 5001);

        // ENVIRONMENT selects the file section.
        env::remove_var("BD_API_URL");
        env::remove_var("PORT");
        env::set_var("ENVIRONMENT", "production");
        let config = ExporterConfig::load_from(&config_path).expect("load");
        assert_eq!(config.trigger_url, "https://prod.example/trigger");
        assert_eq!(config.port, DEFAULT_PORT);

        // No file at all: env vars alone are enough.
        env::remove_var("ENVIRONMENT");
        env::set_var("BD_API_URL", "https://env.example/trigger");
        let config =
            ExporterConfig::load_from(&dir.path().join("missing.yaml")).expect("load without file");
        assert_eq!(config.trigger_url, "https://env.example/trigger");
        assert_eq!(config.port, DEFAULT_PORT);

        // Missing trigger URL fails with context.
        env::remove_var("BD_API_URL");
        let err = ExporterConfig::load_from(&dir.path().join("missing.yaml"))
            .expect_err("should require BD_API_URL");
        assert!(err.to_string().contains("BD_API_URL"));

        for key in ["BD_TOKEN", "DATASET_ID", "BD_API_URL", "BD_SNAPSHOT_URL", "PORT"] {
            env::remove_var(key);
        }
    }
}
