use crate::clean::CleanProfile;
use crate::errors::ToolkitError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = ".avd-toolkit.yaml";

/// Settings read from the YAML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    pub clean: CleanProfile,
}

impl ToolkitConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ToolkitError> {
        if content.trim().is_empty() {
            return Ok(ToolkitConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Loads `path` when given, failing if it cannot be read. Otherwise looks
    /// for the default file in the working directory, then the home
    /// directory, and falls back to built-in defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self, ToolkitError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match find_default_config() {
                Some(path) => path,
                None => {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(ToolkitConfig::default());
                }
            },
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolkitError::FileReadError(path.display().to_string(), e.to_string()))?;
        let config = Self::from_yaml(&content).map_err(|e| {
            ToolkitError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        info!("Using config file: {}", path.display());
        Ok(config)
    }
}

fn find_default_config() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
