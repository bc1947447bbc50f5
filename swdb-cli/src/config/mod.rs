//! Connection properties for the database and the web API
//!
//! Properties come from a JSON file (the same `properties.json` the web
//! application reads) and can be overridden from the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Properties file looked up relative to the working directory
const LOCAL_PROPERTIES: &str = "config/properties.json";

/// Application directory under the user config dir
const CONFIG_DIR_NAME: &str = "swdb";

const PROPERTIES_FILE_NAME: &str = "properties.json";

/// Environment variables overriding file values
pub mod env {
    pub const DATABASE_URL: &str = "SWDB_DATABASE_URL";
    pub const API_URL: &str = "SWDB_API_URL";
    pub const WEB_URL: &str = "SWDB_WEB_URL";
    pub const USERNAME: &str = "SWDB_USERNAME";
    pub const PASSWORD: &str = "SWDB_PASSWORD";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Document database connection string
    #[serde(default, alias = "mongodbUrl", skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Base URL of the REST API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Base URL of the web application (login endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Config {
    /// Load from `path`, or from the first default location that exists
    ///
    /// A missing default file is not an error; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    bail!("Properties file does not exist: {}", p.display());
                }
                Some(p.to_path_buf())
            }
            None => default_locations().into_iter().find(|p| p.exists()),
        };

        let mut config = match file {
            Some(file) => {
                log::info!("Loading properties from {}", file.display());
                Self::from_file(&file)?
            }
            None => {
                log::debug!("No properties file found, using environment only");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read properties file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse properties file: {}", path.display()))
    }

    /// Override values with whatever `lookup` returns for the env keys
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        };
        set(&mut self.database_url, env::DATABASE_URL);
        set(&mut self.api_url, env::API_URL);
        set(&mut self.web_url, env::WEB_URL);
        set(&mut self.username, env::USERNAME);
        set(&mut self.password, env::PASSWORD);
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("No database connection string configured (databaseUrl or SWDB_DATABASE_URL)")
    }

    pub fn require_api_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .context("No API base URL configured (apiUrl or SWDB_API_URL)")
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_PROPERTIES)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_DIR_NAME).join(PROPERTIES_FILE_NAME));
    }
    paths
}
