// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::Value;

mod context;
mod engine;

pub use context::{DatabaseErrorContext, ErrorPageContext, QueryLine};
pub use engine::{MiniJinjaEngine, TemplateEngine};

pub const DATABASE_ERROR_TEMPLATE: &str = "fatalerror.database.html";

/// File name of a user error template, e.g. `usererror.generic.html`.
pub fn user_error_template_name(template: &str) -> String {
    format!("usererror.{}.html", template)
}

/// Render a minijinja template with the given context
pub fn render_minijinja_template(
    engine: &dyn TemplateEngine,
    template_name: &str,
    context: Value,
) -> Result<String, minijinja::Error> {
    engine.render(template_name, context)
}
