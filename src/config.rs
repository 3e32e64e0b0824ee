use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const TREASURY_BASE_URL: &str = "https://api.fiscaldata.treasury.gov";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TreasuryProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub treasury: Option<TreasuryProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            treasury: Some(TreasuryProviderConfig {
                base_url: TREASURY_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Snapshot file for recorded transactions; defaults to the platform
    /// data directory.
    #[serde(default)]
    pub storage: Option<PathBuf>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "txbook", "txbook")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "txbook", "txbook")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolved snapshot path, creating the default data directory when no
    /// explicit `storage` path is configured.
    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.storage {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = Self::default_data_path()?;
                fs::create_dir_all(&data_dir)
                    .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;
                Ok(data_dir.join("transactions.json"))
            }
        }
    }
}
