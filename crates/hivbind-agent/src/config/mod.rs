//! Configuration loading for hivbind.
//! Reads hivbind.toml from the current directory or the path in HIVBIND_CONFIG.
//! Every field has a default, so running without a config file is fine.

use hivbind_common::sandbox;
use hivbind_molecules::ligand::PUBCHEM_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "hivbind.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pubchem: PubChemConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubChemConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url()     -> String { PUBCHEM_API_URL.to_string() }
fn default_timeout_secs() -> u64    { 10 }

impl Default for PubChemConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
}

fn default_model_path()  -> PathBuf { PathBuf::from("models/rf_model.json") }
fn default_scaler_path() -> PathBuf { PathBuf::from("models/scaler.json") }

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
        }
    }
}


impl Config {
    /// Load configuration.
    /// An explicit path (flag or HIVBIND_CONFIG) must exist; the default
    /// hivbind.toml is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("HIVBIND_CONFIG").map(PathBuf::from));

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Config file not found: {}\n\
                         Copy hivbind.example.toml to hivbind.toml and edit it.",
                        path.display()
                    );
                }
                path
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.pubchem.timeout_secs == 0 {
            anyhow::bail!("pubchem.timeout_secs must be greater than zero");
        }
        if !sandbox::is_permitted(&config.pubchem.base_url) {
            anyhow::bail!(
                "pubchem.base_url {} is not reachable: requests are limited to {}",
                config.pubchem.base_url,
                sandbox::ALLOWED_HOSTS.join(", ")
            );
        }
        Ok(config)
    }

    /// Point both artifact paths at `dir`, keeping their file names.
    pub fn set_models_dir(&mut self, dir: &Path) {
        self.artifacts.model_path = dir.join("rf_model.json");
        self.artifacts.scaler_path = dir.join("scaler.json");
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.pubchem.timeout_secs)
    }
}
