// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! First-run setup of a runtime root: config, directories, database schema,
//! page descriptors and an initial developer account.

use crate::config::{Config, ConfigError, ValidatedConfig};
use crate::database::{Database, DatabaseError, create_schema, schema_exists};
use crate::runtime_paths::RuntimePaths;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod config;
pub mod descriptors;
pub mod users;

pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub database: Database,
    pub created_config: bool,
    pub created_schema: bool,
    /// Password of the developer account created on this run.
    pub created_admin: Option<String>,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Database(DatabaseError),
    Io(io::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Database(err) => write!(f, "Bootstrap database error: {}", err),
            BootstrapError::Io(err) => write!(f, "Bootstrap I/O error: {}", err),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::Database(err) => Some(err),
            BootstrapError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<DatabaseError> for BootstrapError {
    fn from(err: DatabaseError) -> Self {
        BootstrapError::Database(err)
    }
}

impl From<io::Error> for BootstrapError {
    fn from(err: io::Error) -> Self {
        BootstrapError::Io(err)
    }
}

pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    let root_path = normalize_root(root)?;

    let created_config = config::ensure_config(&root_path)?;
    let validated_config = Config::load_and_validate(&root_path)?;
    let runtime_paths = RuntimePaths::from_root(&root_path, &validated_config)?;

    let database = Database::open(&runtime_paths.database_file, &validated_config.database)?;
    let created_schema = if schema_exists(&database)? {
        false
    } else {
        create_schema(&database)?;
        log_action(format!(
            "created database schema in {}",
            runtime_paths.database_file.display()
        ));
        true
    };

    descriptors::ensure_page_descriptors(&runtime_paths)?;
    let created_admin = users::ensure_admin_author(&database)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        database,
        created_config,
        created_schema,
        created_admin,
    })
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!("created runtime root directory {}", root_path.display()));
    Ok(root_path)
}

// Bootstrap runs before the logger exists, so it reports on stderr.
pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}

pub(crate) fn log_warning(message: impl AsRef<str>) {
    eprintln!("[bootstrap] WARNING: {}", message.as_ref());
}
