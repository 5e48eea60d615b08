// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Environment, Error, ErrorKind, Value, default_auto_escape_callback};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;

    /// Whether `template_name` can be loaded at all.
    fn has_template(&self, template_name: &str) -> bool;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Embedded templates only.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Files in `dir` take precedence over the embedded templates of the same name.
    pub fn with_override_dir(dir: PathBuf) -> Self {
        Self::build(Some(dir))
    }

    fn build(override_dir: Option<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(move |name| {
            if let Some(dir) = override_dir.as_deref()
                && let Some(content) = load_override(dir, name)?
            {
                return Ok(Some(content));
            }
            embedded_template_loader(name)
        });
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }

    fn has_template(&self, template_name: &str) -> bool {
        match self.env.get_template(template_name) {
            Ok(_) => true,
            Err(err) if err.kind() == ErrorKind::TemplateNotFound => false,
            Err(err) => {
                log::error!("Template '{}' failed to load: {}", template_name, err);
                false
            }
        }
    }
}

fn load_override(dir: &Path, name: &str) -> Result<Option<String>, Error> {
    if name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Ok(None);
    }
    match fs::read_to_string(dir.join(name)) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("Failed to read template '{}': {}", name, err),
        )),
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, Error> {
    let template_content = match name {
        "usererror.generic.html" => Some(include_str!("html/usererror.generic.html")),
        "usererror.error.html" => Some(include_str!("html/usererror.error.html")),
        "fatalerror.database.html" => Some(include_str!("html/fatalerror.database.html")),
        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}
