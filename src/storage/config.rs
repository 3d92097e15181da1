use super::Result;
use crate::api::client::{DEFAULT_TIMEOUT_SECS, ResourcePaths};
use crate::display::escape::EscapePolicy;
use crate::error::{ConfigError, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8001";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub gateway_url: String,
    pub timeout_seconds: Option<u64>,
    pub escape_html: Option<bool>,
    pub paths: Option<ResourcePaths>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_seconds: None,
            escape_html: None,
            paths: None,
        }
    }
}

impl Profile {
    pub fn timeout(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn escape_policy(&self) -> EscapePolicy {
        EscapePolicy::from_flag(self.escape_html.unwrap_or(false))
    }

    pub fn resource_paths(&self) -> ResourcePaths {
        self.paths.clone().unwrap_or_default()
    }

    /// Keys accepted by [`Profile::set`]
    pub const KEYS: [&'static str; 7] = [
        "gateway_url",
        "timeout_seconds",
        "escape_html",
        "paths.home",
        "paths.about",
        "paths.all",
        "paths.one",
    ];

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "gateway_url" => self.gateway_url = value.trim_end_matches('/').to_string(),
            "timeout_seconds" => {
                let secs: u64 = value.parse().map_err(|_| invalid("expected seconds"))?;
                if secs == 0 {
                    return Err(invalid("timeout must be greater than 0"));
                }
                self.timeout_seconds = Some(secs);
            }
            "escape_html" => {
                let flag: bool = value.parse().map_err(|_| invalid("expected true or false"))?;
                self.escape_html = Some(flag);
            }
            path_key if path_key.starts_with("paths.") => {
                if !value.starts_with('/') {
                    return Err(invalid("paths must start with '/'"));
                }
                let paths = self.paths.get_or_insert_with(ResourcePaths::default);
                match &path_key["paths.".len()..] {
                    "home" => paths.home = value.to_string(),
                    "about" => paths.about = value.to_string(),
                    "all" => paths.all = value.to_string(),
                    "one" => paths.one = value.to_string(),
                    _ => {
                        return Err(ConfigError::UnknownKey {
                            key: key.to_string(),
                        });
                    }
                }
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: e.to_string(),
            })?;

        Ok(config)
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigSaveFailed {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;

        let app_config_dir = config_dir.join("persona-view");
        let config_file = app_config_dir.join("config.toml");

        Ok(config_file)
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Profile to use: explicit name, then `default_profile`, then `"default"`.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".to_string())
    }

    /// Set `key` on profile `name`, creating the profile if needed.
    pub fn set_value(
        &mut self,
        name: &str,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let profile = self.profiles.entry(name.to_string()).or_default();
        profile.set(key, value)?;
        if self.default_profile.is_none() {
            self.default_profile = Some(name.to_string());
        }
        Ok(())
    }
}
