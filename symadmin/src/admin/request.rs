// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

/// The parts of an HTTP request the dispatcher looks at.
#[derive(Debug, Clone, Default)]
pub struct AdminRequest {
    /// Page path below the admin root, e.g. `/publish/articles/`.
    pub path: String,
    pub method: RequestMethod,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
}

impl AdminRequest {
    pub fn get(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn post(path: &str, form: HashMap<String, String>) -> Self {
        Self {
            path: path.to_string(),
            method: RequestMethod::Post,
            form,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn is_post(&self) -> bool {
        self.method == RequestMethod::Post
    }

    /// Form value, falling back to the query string.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.form
            .get(name)
            .or_else(|| self.query.get(name))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_values_shadow_query_values() {
        let mut form = HashMap::new();
        form.insert("mode".to_string(), "form".to_string());
        let request = AdminRequest::post("/login/", form)
            .with_query("mode", "query")
            .with_query("auth-token", "abcdef");
        assert!(request.is_post());
        assert_eq!(request.param("mode"), Some("form"));
        assert_eq!(request.param("auth-token"), Some("abcdef"));
        assert_eq!(request.param("missing"), None);
    }
}
