// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::admin::pages::BUILTIN_PAGE_DRIVERS;
use crate::admin::resolver::descriptor_file_name;
use crate::runtime_paths::RuntimePaths;
use std::fs;

/// Seeds an empty `content.<driver>.yaml` for every built-in page that has
/// none. Returns the number of files written.
pub fn ensure_page_descriptors(paths: &RuntimePaths) -> Result<usize, BootstrapError> {
    let mut created = 0;
    for driver in BUILTIN_PAGE_DRIVERS {
        let descriptor = paths.content_dir.join(descriptor_file_name(driver));
        if descriptor.exists() {
            continue;
        }
        fs::write(&descriptor, format!("driver: {}\n", driver))?;
        created += 1;
    }
    if created > 0 {
        log_action(format!(
            "created {} page descriptor(s) in {}",
            created,
            paths.content_dir.display()
        ));
    }
    Ok(created)
}
