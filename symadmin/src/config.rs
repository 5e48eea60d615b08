// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
    SaveError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
            ConfigError::SaveError(msg) => write!(f, "Configuration save error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Public URL of the site; the admin lives at `url + admin.path`.
    pub url: String,
}

fn default_app_name() -> String {
    "Symphony".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "default_admin_path")]
    pub path: String,
    #[serde(default = "default_cookie_prefix")]
    pub cookie_prefix: String,
    pub cookie_secret: String,
}

fn default_admin_path() -> String {
    "/symphony".to_string()
}

fn default_cookie_prefix() -> String {
    "sym-".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegionConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_datetime_separator")]
    pub datetime_separator: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_format: default_time_format(),
            datetime_separator: default_datetime_separator(),
        }
    }
}

impl RegionConfig {
    pub fn datetime_format(&self) -> String {
        format!(
            "{}{}{}",
            self.date_format, self.datetime_separator, self.time_format
        )
    }
}

fn default_date_format() -> String {
    "m/d/Y".to_string()
}

fn default_time_format() -> String {
    "H:i".to_string()
}

fn default_datetime_separator() -> String {
    " ".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryCaching {
    On,
    Off,
    #[default]
    Default,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite file, relative to the runtime root unless absolute.
    #[serde(default = "default_database_path")]
    pub path: String,
    #[serde(default = "default_tbl_prefix")]
    pub tbl_prefix: String,
    #[serde(default)]
    pub query_caching: QueryCaching,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            tbl_prefix: default_tbl_prefix(),
            query_caching: QueryCaching::default(),
        }
    }
}

fn default_database_path() -> String {
    "symphony.db".to_string()
}

fn default_tbl_prefix() -> String {
    "tbl_".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub archive: bool,
    /// Activity log size limit in bytes; 0 disables rotation.
    #[serde(default = "default_log_maxsize")]
    pub maxsize: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            archive: false,
            maxsize: default_log_maxsize(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_maxsize() -> u64 {
    102400
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SymphonyConfig {
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for SymphonyConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub app: AppConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub symphony: SymphonyConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub admin: AdminConfig,
    pub region: RegionConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub symphony: SymphonyConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE_NAME);
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_app(&self.app)?;
        Self::validate_admin(&self.admin)?;
        Self::validate_database(&self.database)?;
        Self::validate_log(&self.log)?;

        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            admin: self.admin,
            region: self.region,
            database: self.database,
            log: self.log,
            symphony: self.symphony,
        })
    }

    fn validate_app(app: &AppConfig) -> Result<(), ConfigError> {
        if !app.url.starts_with("http://") && !app.url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "app.url must start with http:// or https://, got: {}",
                app.url
            )));
        }
        Ok(())
    }

    fn validate_admin(admin: &AdminConfig) -> Result<(), ConfigError> {
        if !admin.path.starts_with('/') || admin.path.len() < 2 || admin.path.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "admin.path must start with '/' and must not end with '/', got: {}",
                admin.path
            )));
        }
        if admin.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "admin.cookie_secret must be at least {} bytes long",
                MIN_COOKIE_SECRET_LEN
            )));
        }
        if admin
            .cookie_prefix
            .chars()
            .any(|ch| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'))
        {
            return Err(ConfigError::ValidationError(format!(
                "admin.cookie_prefix may only contain letters, digits, '-' and '_', got: {}",
                admin.cookie_prefix
            )));
        }
        Ok(())
    }

    fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
        if database.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.path must not be empty".to_string(),
            ));
        }
        if database
            .tbl_prefix
            .chars()
            .any(|ch| !(ch.is_ascii_alphanumeric() || ch == '_'))
        {
            return Err(ConfigError::ValidationError(format!(
                "database.tbl_prefix may only contain letters, digits and '_', got: {}",
                database.tbl_prefix
            )));
        }
        Ok(())
    }

    fn validate_log(log: &LogConfig) -> Result<(), ConfigError> {
        match log.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => warn!("Unknown log level '{}', falling back to info", other),
        }
        Ok(())
    }
}

impl From<&ValidatedConfig> for Config {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            server: config.server.clone(),
            app: config.app.clone(),
            admin: config.admin.clone(),
            region: config.region.clone(),
            database: config.database.clone(),
            log: config.log.clone(),
            symphony: config.symphony.clone(),
        }
    }
}

impl ValidatedConfig {
    /// Path component of `app.url`, normalised to start with `/` and carry no
    /// trailing slash. Used as the session cookie path.
    pub fn cookie_path(&self) -> String {
        let after_scheme = self
            .app
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.app.url);
        let path = after_scheme
            .find('/')
            .map(|index| &after_scheme[index..])
            .unwrap_or("");
        let path = path.split(['?', '#']).next().unwrap_or("");
        format!("/{}", path.trim_matches('/'))
    }

    /// Absolute URL of the admin root, without a trailing slash.
    pub fn admin_url(&self) -> String {
        format!("{}{}", self.app.url.trim_end_matches('/'), self.admin.path)
    }

    pub fn database_path(&self, root: &Path) -> PathBuf {
        let path = PathBuf::from(&self.database.path);
        if path.is_absolute() {
            path
        } else {
            root.join(path)
        }
    }

    /// Writes the configuration back to `path`, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(&Config::from(self))
            .map_err(|e| ConfigError::SaveError(format!("Failed to serialize config: {}", e)))?;
        write_atomically(path, &content)
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let parent = path
        .parent()
        .ok_or_else(|| ConfigError::SaveError("Config path has no parent directory".to_string()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| ConfigError::SaveError("Config path has no file name".to_string()))?
        .to_string_lossy();
    let temp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        if let Ok(metadata) = fs::metadata(path) {
            file.set_permissions(metadata.permissions())?;
        }
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ConfigError::SaveError(format!(
            "Failed to write config file '{}': {}",
            path.display(),
            e
        ))
    })
}
