// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;
use std::path::PathBuf;

/// Parsed context handed to a page's `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    /// Free-form path segments following the page root.
    Segments(Vec<String>),
    Publish {
        section_handle: String,
        page: String,
        entry_id: Option<i64>,
        flag: Option<String>,
    },
}

impl PageContext {
    pub fn empty() -> Self {
        PageContext::Segments(Vec::new())
    }

    pub fn segments(&self) -> &[String] {
        match self {
            PageContext::Segments(segments) => segments,
            PageContext::Publish { .. } => &[],
        }
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments().get(index).map(String::as_str)
    }
}

impl Default for PageContext {
    fn default() -> Self {
        Self::empty()
    }
}

/// Where a backend path leads: the resolved page and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCallback {
    pub driver: String,
    pub context: PageContext,
    pub classname: String,
    pub pageroot: String,
    /// Directory holding the page descriptor, for extension pages.
    pub driver_location: Option<PathBuf>,
}

impl PageCallback {
    pub fn is_login(&self) -> bool {
        self.driver == "login"
    }
}
