use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::content::builtin_deck;
use crate::deck::Deck;
use crate::error::CodePathError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub presentation: PresentationConfig,
    pub reporting: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Deck file to present instead of the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<PathBuf>,
    pub start_page: usize,
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub store_reports: bool,
    pub human_summary: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub report_dir: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            presentation: PresentationConfig {
                deck: None,
                start_page: 0,
                tick_rate_ms: 250,
            },
            reporting: ReportConfig {
                store_reports: false,
                human_summary: true,
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    /// The deck named by `override_path`, else the configured one, else the built-in deck.
    pub fn resolve_deck(&self, override_path: Option<&Path>) -> Result<Deck> {
        match override_path.or(self.presentation.deck.as_deref()) {
            Some(path) => Deck::load(path),
            None => builtin_deck(),
        }
    }

    fn validate(&self) -> Result<(), CodePathError> {
        if self.presentation.tick_rate_ms == 0 {
            return Err(CodePathError::InvalidConfig(
                "presentation.tick_rate_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "codepath", "codepath")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        let config_dir = project_dirs.config_dir();
        let data_dir = project_dirs.data_dir();
        Ok(Self {
            config_path: config_dir.join("config.toml"),
            data_dir: data_dir.to_path_buf(),
            report_dir: data_dir.join("reports"),
        })
    }
}
