use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::donations::DonationTable;
use crate::registry::npmrc::Npmrc;
use crate::registry::{with_trailing_slash, RegistrySettings, DEFAULT_REGISTRY_URL};

/// Root configuration structure, deserialized from `.thanks/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Extra donation entries, merged over the built-in table.
    #[serde(default)]
    pub donations: DonationsConfig,
}

/// Where to find the registry and the download statistics API.
#[derive(Debug, Default, Deserialize)]
pub struct RegistryConfig {
    /// Registry base URL. Falls back to `.npmrc`, then the public registry.
    pub url: Option<String>,
    pub downloads_url: Option<String>,
    /// Per-request timeout. Defaults to 30 seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DonationsConfig {
    /// npm username → donate page.
    #[serde(default)]
    pub authors: IndexMap<String, String>,
    /// npm package name → donate page.
    #[serde(default)]
    pub packages: IndexMap<String, String>,
}

impl Config {
    /// The built-in donation table with this config's entries applied on top.
    pub fn donation_table(&self) -> DonationTable {
        let mut table = DonationTable::default();
        table.extend(
            self.donations.authors.clone(),
            self.donations.packages.clone(),
        );
        table
    }

    /// Resolve registry settings. The registry URL comes from, in order:
    /// `cli_registry`, `[registry].url`, `registry=` in `.npmrc`, then the
    /// public npm registry. The credential always comes from `.npmrc`.
    pub fn registry_settings(&self, cli_registry: Option<&str>, npmrc: &Npmrc) -> RegistrySettings {
        let defaults = RegistrySettings::default();

        let registry_url = cli_registry
            .or(self.registry.url.as_deref())
            .or(npmrc.registry.as_deref())
            .map(with_trailing_slash)
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());

        let downloads_url = self
            .registry
            .downloads_url
            .as_deref()
            .map(with_trailing_slash)
            .unwrap_or(defaults.downloads_url);

        let timeout = self
            .registry
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        RegistrySettings {
            auth: npmrc.auth_for(&registry_url),
            registry_url,
            downloads_url,
            timeout,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.thanks/config.toml`
/// 3. `~/.config/thanks/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".thanks").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("thanks").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    log::debug!(target: "thanks::config", "Loaded {}", path.display());
    Ok(config)
}
