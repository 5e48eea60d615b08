// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::{ConfigError, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;

#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_fixed(name: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let name = format!("{}-{}", prefix, Uuid::new_v4());
        Self::new_fixed(&name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn runtime_paths(&self, config: &ValidatedConfig) -> Result<RuntimePaths, ConfigError> {
        RuntimePaths::from_root(&self.path, config)
    }

    /// Drops an empty page descriptor so the resolver finds `driver`.
    pub fn add_page_descriptor(&self, driver: &str) -> std::io::Result<()> {
        let dir = self.path.join("content");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("content.{}.yaml", driver)), "")
    }

    pub fn add_extension_page_descriptor(&self, extension: &str, driver: &str) -> std::io::Result<()> {
        let dir = self.path.join("extensions").join(extension).join("content");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("content.{}.yaml", driver)), "")
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}
