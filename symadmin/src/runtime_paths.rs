// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{CONFIG_FILE_NAME, ConfigError, ValidatedConfig};
use std::fs;
use std::path::{Path, PathBuf};

pub const ACTIVITY_LOG_FILE_NAME: &str = "main.log";

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
    /// Page descriptors for the built-in backend pages.
    pub content_dir: PathBuf,
    /// One directory per extension; page descriptors live in `<ext>/content`.
    pub extensions_dir: PathBuf,
    /// Optional overrides for the error page templates.
    pub templates_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl RuntimePaths {
    pub fn from_root(root: &Path, config: &ValidatedConfig) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        if !root_path.exists() {
            fs::create_dir_all(&root_path).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Failed to create runtime root '{}': {}",
                    root_path.display(),
                    e
                ))
            })?;
        }

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        let paths = Self::layout(&root_canonical, config);
        paths.ensure_dirs()?;
        Ok(paths)
    }

    /// Computes the layout under `root` without touching the filesystem.
    pub fn layout(root: &Path, config: &ValidatedConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config_file: root.join(CONFIG_FILE_NAME),
            database_file: config.database_path(root),
            content_dir: root.join("content"),
            extensions_dir: root.join("extensions"),
            templates_dir: root.join("templates"),
            logs_dir: root.join("logs"),
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [
            &self.content_dir,
            &self.extensions_dir,
            &self.templates_dir,
            &self.logs_dir,
        ] {
            ensure_dir_exists(dir)?;
        }
        Ok(())
    }

    pub fn activity_log_file(&self) -> PathBuf {
        self.logs_dir.join(ACTIVITY_LOG_FILE_NAME)
    }

    /// Content directory of one extension.
    pub fn extension_content_dir(&self, extension: &str) -> PathBuf {
        self.extensions_dir.join(extension).join("content")
    }
}

fn ensure_dir_exists(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "Expected directory at '{}'",
                path.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| {
        ConfigError::ValidationError(format!(
            "Failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_config::TestConfigBuilder;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn from_root_creates_the_layout() {
        let fixture = TestFixtureRoot::new_unique("runtime-paths").unwrap();
        let config = TestConfigBuilder::new().build();
        let paths = RuntimePaths::from_root(fixture.path(), &config).expect("paths");

        assert!(paths.content_dir.is_dir());
        assert!(paths.extensions_dir.is_dir());
        assert!(paths.templates_dir.is_dir());
        assert!(paths.logs_dir.is_dir());
        assert_eq!(paths.config_file, paths.root.join("config.yaml"));
        assert_eq!(paths.database_file, paths.root.join("symphony.db"));
        assert_eq!(
            paths.extension_content_dir("markdown"),
            paths.root.join("extensions/markdown/content")
        );
    }

    #[test]
    fn from_root_rejects_file_in_place_of_directory() {
        let fixture = TestFixtureRoot::new_unique("runtime-paths-file").unwrap();
        fs::write(fixture.path().join("content"), "not a dir").unwrap();
        let config = TestConfigBuilder::new().build();
        assert!(RuntimePaths::from_root(fixture.path(), &config).is_err());
    }
}
