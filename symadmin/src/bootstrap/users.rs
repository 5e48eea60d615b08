// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action, log_warning};
use crate::iam::{AuthorManager, NewAuthor, generate_password};
use crate::database::Database;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@example.com";

/// Creates a developer account when the authors table is empty. Returns the
/// generated password so the caller can report it.
pub fn ensure_admin_author(db: &Database) -> Result<Option<String>, BootstrapError> {
    let authors = AuthorManager::new(db);
    if authors.count()? > 0 {
        return Ok(None);
    }

    let password = generate_password();
    let author = NewAuthor::new(ADMIN_USERNAME, &password)
        .developer()
        .with_name("Admin", "")
        .with_email(ADMIN_EMAIL);
    let id = authors.create(&author)?;

    log_action(format!("created developer account '{}' (id {})", ADMIN_USERNAME, id));
    log_warning(format!(
        "{} password: {} (change this immediately)",
        ADMIN_USERNAME, password
    ));

    Ok(Some(password))
}
