// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Value, context};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ErrorPageContext {
    app_name: String,
    admin_url: String,
    heading: String,
    message_html: String,
}

impl ErrorPageContext {
    /// `message_html` is inserted unescaped.
    pub fn new(app_name: &str, admin_url: &str, heading: &str, message_html: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            admin_url: admin_url.to_string(),
            heading: heading.to_string(),
            message_html: message_html.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            admin_url => &self.admin_url,
            heading => &self.heading,
            message => Value::from_safe_string(self.message_html.clone())
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryLine {
    pub query: String,
    pub time: String,
    pub odd: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseErrorContext {
    app_name: String,
    message: String,
    query: String,
    queries: Vec<QueryLine>,
}

impl DatabaseErrorContext {
    pub fn new(app_name: &str, message: &str, query: &str, queries: Vec<QueryLine>) -> Self {
        Self {
            app_name: app_name.to_string(),
            message: message.to_string(),
            query: query.to_string(),
            queries,
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            message => &self.message,
            query => &self.query,
            queries => &self.queries
        }
    }
}
