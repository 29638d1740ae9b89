use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

/// Settings for `salecast serve`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HTTP worker threads; actix picks one per physical core when unset.
    pub workers: Option<usize>,
    pub artifact_path: PathBuf,
    pub service_name: String,
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from("0.0.0.0"),
            port: 8000,
            workers: None,
            artifact_path: PathBuf::from("XgBoost_SalePrediction.json"),
            service_name: String::from("XGBoost seasonal API"),
            max_payload_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Read a JSON config file. Fields that are missing or fail to parse keep
    /// their default value and are reported with a warning.
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Config file is not valid JSON: {:?}", config_path))?;
        let mut config = ServerConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            stringify!($field), config.$field
                        );
                    }
                } else {
                    log::warn!(
                        "Config Missing field '{}', using default: {:?}",
                        stringify!($field), config.$field
                    );
                }
            };
        }

        load_or_default!(host);
        load_or_default!(port);
        load_or_default!(workers);
        load_or_default!(artifact_path);
        load_or_default!(service_name);
        load_or_default!(max_payload_bytes);

        Ok(config)
    }

    /// Build the config for `serve`: optional file first, then CLI overrides.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(artifact) = matches.get_one::<PathBuf>("artifact") {
            config.artifact_path = artifact.clone();
        }
        if let Some(host) = matches.get_one::<String>("host") {
            config.host = host.clone();
        }
        if let Some(port) = matches.get_one::<u16>("port") {
            config.port = *port;
        }
        if let Some(workers) = matches.get_one::<usize>("workers") {
            config.workers = Some(*workers);
        }

        Ok(config)
    }
}
