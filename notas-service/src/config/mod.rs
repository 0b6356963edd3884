use cobranza_core::config as core_config;
use cobranza_core::error::AppError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct NotasConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the JSON record store.
    pub data_dir: String,
    /// Directory holding one document blob per nota.
    pub docs_dir: String,
}

impl NotasConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(NotasConfig {
            common,
            storage: StorageConfig {
                data_dir: get_env("DATA_DIR", Some("data"), is_prod)?,
                docs_dir: get_env("DOCS_DIR", Some("data/docs"), is_prod)?,
            },
        })
    }

    /// Path of the JSON record store file.
    pub fn notas_file(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("notas.json")
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::Config(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::Config(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
