//! Layered configuration: built-in defaults, then a TOML file, then
//! `PRODTRACK_*` environment variables (`__` separates sections, e.g.
//! `PRODTRACK_FIREBASE__PROJECT_ID`).

use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{ProdtrackError, Result};

/// Environment variable prefix
const ENV_PREFIX: &str = "PRODTRACK";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub firebase: FirebaseConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: Option<String>,
    pub database: String,
    pub collection: String,
    /// Firestore REST root; point at an emulator for local testing
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Where production records are read from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Firestore,
    /// Directory of JSON exports (`*.json`, each an array of records)
    Json,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Firestore => "firestore",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            firebase: FirebaseConfig {
                project_id: "sizukaproduct".to_string(),
                api_key: None,
                database: "(default)".to_string(),
                collection: "productions".to_string(),
                base_url: "https://firestore.googleapis.com/v1".to_string(),
                timeout_secs: 10,
            },
            source: SourceConfig {
                kind: SourceKind::Firestore,
                data_dir: None,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

impl Config {
    /// Load from `path` if given (must exist), else from the default
    /// location if present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder().add_source(
            ConfigBuilder::try_from(&Config::default()).map_err(config_error)?,
        );

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: Config = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file (~/.prodtrack/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".prodtrack").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.source.kind == SourceKind::Json && self.source.data_dir.is_none() {
            return Err(ProdtrackError::Config(
                "source.kind = \"json\" requires source.data_dir".into(),
            ));
        }
        if self.source.kind == SourceKind::Firestore && self.firebase.project_id.trim().is_empty()
        {
            return Err(ProdtrackError::Config(
                "firebase.project_id must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Settings as (name, display value) pairs. Secrets show only
    /// "set"/"unset".
    pub fn status_rows(&self) -> Vec<(&'static str, String)> {
        let set_or_unset = |v: &Option<String>| {
            if v.as_deref().is_some_and(|s| !s.is_empty()) {
                "set".to_string()
            } else {
                "unset".to_string()
            }
        };

        vec![
            ("source.kind", self.source.kind.label().to_string()),
            (
                "source.data_dir",
                self.source
                    .data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "unset".to_string()),
            ),
            ("firebase.project_id", self.firebase.project_id.clone()),
            ("firebase.api_key", set_or_unset(&self.firebase.api_key)),
            ("firebase.database", self.firebase.database.clone()),
            ("firebase.collection", self.firebase.collection.clone()),
            ("firebase.base_url", self.firebase.base_url.clone()),
            (
                "firebase.timeout_secs",
                self.firebase.timeout_secs.to_string(),
            ),
            ("logging.level", self.logging.level.clone()),
        ]
    }
}

fn config_error(e: config::ConfigError) -> ProdtrackError {
    ProdtrackError::Config(e.to_string())
}
