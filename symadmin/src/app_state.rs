// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::admin::error::ErrorRenderer;
use crate::admin::page::PageRegistry;
use crate::config::ValidatedConfig;
use crate::database::Database;
use crate::extensions::ExtensionManager;
use crate::runtime_paths::RuntimePaths;
use crate::templates::{MiniJinjaEngine, TemplateEngine};

/// Process-wide state shared by every request.
pub struct AppState {
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub database: Database,
    pub templates: Arc<dyn TemplateEngine>,
    pub error_renderer: ErrorRenderer,
    pub pages: PageRegistry,
    pub extensions: ExtensionManager,
}

impl AppState {
    pub fn new(
        config: ValidatedConfig,
        runtime_paths: RuntimePaths,
        database: Database,
        extensions: ExtensionManager,
    ) -> Self {
        let templates: Arc<dyn TemplateEngine> = Arc::new(MiniJinjaEngine::with_override_dir(
            runtime_paths.templates_dir.clone(),
        ));
        let error_renderer = ErrorRenderer::new(
            config.app.name.clone(),
            config.admin_url(),
            templates.clone(),
        );
        let mut pages = PageRegistry::with_builtin_pages();
        extensions.register_pages(&mut pages);

        Self {
            config: Arc::new(config),
            runtime_paths,
            database,
            templates,
            error_renderer,
            pages,
            extensions,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory database with the schema in place.
    pub fn new_for_tests(
        config: ValidatedConfig,
        runtime_paths: RuntimePaths,
        extensions: ExtensionManager,
    ) -> Self {
        let database = Database::open_in_memory(&config.database).expect("test database");
        crate::database::create_schema(&database).expect("test schema");
        Self::new(config, runtime_paths, database, extensions)
    }
}
