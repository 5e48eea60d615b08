// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action, normalize_root};
use crate::config::CONFIG_FILE_NAME;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKERS: u16 = 2;

/// Writes a default `config.yaml` unless one exists. Returns whether a file
/// was created.
pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml(&generate_cookie_secret());

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created {} (admin at http://localhost:{}/symphony)",
        CONFIG_FILE_NAME, DEFAULT_PORT
    ));

    Ok(true)
}

fn generate_cookie_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn default_config_yaml(cookie_secret: &str) -> String {
    format!(
        "server:\n  host: \"127.0.0.1\"\n  port: {port}\n  workers: {workers}\n\napp:\n  name: \"Symphony\"\n  url: \"http://localhost:{port}\"\n\nadmin:\n  path: \"/symphony\"\n  cookie_prefix: \"sym-\"\n  cookie_secret: \"{cookie_secret}\"\n\nregion:\n  date_format: \"m/d/Y\"\n  time_format: \"H:i\"\n  datetime_separator: \" \"\n\ndatabase:\n  path: \"symphony.db\"\n  tbl_prefix: \"tbl_\"\n  query_caching: \"default\"\n\nlog:\n  level: \"info\"\n  archive: false\n  maxsize: 102400\n\nsymphony:\n  lang: \"en\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        cookie_secret = cookie_secret,
    )
}
