// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Halting conditions of the dispatcher and their rendering as HTML pages.

use crate::database::{DatabaseError, QueryRecord};
use crate::templates::{
    DATABASE_ERROR_TEMPLATE, DatabaseErrorContext, ErrorPageContext, QueryLine, TemplateEngine,
    render_minijinja_template, user_error_template_name,
};
use crate::toolkit::XmlElement;
use crate::toolkit::general::encode_special_chars;
use std::sync::Arc;

pub const DEFAULT_ERROR_HEADING: &str = "Symphony Fatal Error";
pub const DEFAULT_ERROR_TEMPLATE: &str = "generic";

/// Error page text, either plain or prebuilt markup.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorMessage {
    Text(String),
    Markup(String),
}

impl ErrorMessage {
    pub fn to_html(&self) -> String {
        match self {
            ErrorMessage::Text(text) => encode_special_chars(text),
            ErrorMessage::Markup(markup) => markup.clone(),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        ErrorMessage::Text(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        ErrorMessage::Text(text)
    }
}

impl From<&XmlElement> for ErrorMessage {
    fn from(element: &XmlElement) -> Self {
        ErrorMessage::Markup(element.generate(false))
    }
}

impl From<XmlElement> for ErrorMessage {
    fn from(element: XmlElement) -> Self {
        ErrorMessage::from(&element)
    }
}

/// Extra information for an error page: response status and headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorAdditional {
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
}

impl ErrorAdditional {
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPage {
    pub heading: String,
    pub message: ErrorMessage,
    pub template: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ErrorPage {
    pub fn new(heading: &str, message: impl Into<ErrorMessage>) -> Self {
        Self {
            heading: heading.to_string(),
            message: message.into(),
            template: DEFAULT_ERROR_TEMPLATE.to_string(),
            status: 500,
            headers: Vec::new(),
        }
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    pub fn with_additional(mut self, additional: ErrorAdditional) -> Self {
        if let Some(status) = additional.status {
            self.status = status;
        }
        self.headers.extend(additional.headers);
        self
    }

    pub fn not_found() -> Self {
        Self::new("Page Not Found", "The page you requested does not exist.")
            .with_template("error")
            .with_additional(ErrorAdditional::with_status(404))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminError {
    NotFound,
    Database(DatabaseError),
    Custom(ErrorPage),
}

impl AdminError {
    pub fn custom(heading: &str, message: impl Into<ErrorMessage>) -> Self {
        AdminError::Custom(ErrorPage::new(heading, message))
    }

    pub fn status(&self) -> u16 {
        match self {
            AdminError::NotFound => 404,
            AdminError::Database(_) => 500,
            AdminError::Custom(page) => page.status,
        }
    }
}

impl std::fmt::Display for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminError::NotFound => write!(f, "Page not found"),
            AdminError::Database(err) => write!(f, "{}", err),
            AdminError::Custom(page) => write!(f, "{}: {}", page.heading, page.message.to_html()),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<DatabaseError> for AdminError {
    fn from(err: DatabaseError) -> Self {
        AdminError::Database(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedError {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Clone)]
pub struct ErrorRenderer {
    app_name: String,
    admin_url: String,
    templates: Arc<dyn TemplateEngine>,
}

impl ErrorRenderer {
    pub fn new(app_name: String, admin_url: String, templates: Arc<dyn TemplateEngine>) -> Self {
        Self {
            app_name,
            admin_url,
            templates,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// `queries` is the database query log of the failing request.
    pub fn render(&self, error: &AdminError, queries: &[QueryRecord]) -> RenderedError {
        match error {
            AdminError::NotFound => self.render_page(&ErrorPage::not_found()),
            AdminError::Custom(page) => self.render_page(page),
            AdminError::Database(err) => RenderedError {
                status: 500,
                headers: Vec::new(),
                body: self.render_database(err, queries),
            },
        }
    }

    fn render_page(&self, page: &ErrorPage) -> RenderedError {
        let message_html = page.message.to_html();
        let template_name = user_error_template_name(&page.template);
        let body = if self.templates.has_template(&template_name) {
            let context =
                ErrorPageContext::new(&self.app_name, &self.admin_url, &page.heading, &message_html)
                    .to_value();
            match render_minijinja_template(self.templates.as_ref(), &template_name, context) {
                Ok(html) => html,
                Err(e) => {
                    log::error!("Failed to render error template '{}': {}", template_name, e);
                    inline_error_html(&message_html)
                }
            }
        } else {
            inline_error_html(&message_html)
        };

        RenderedError {
            status: page.status,
            headers: page.headers.clone(),
            body,
        }
    }

    fn render_database(&self, err: &DatabaseError, queries: &[QueryRecord]) -> String {
        let lines = queries
            .iter()
            .enumerate()
            .map(|(index, record)| QueryLine {
                query: record.query.clone(),
                time: format!("{:.4}", record.time),
                odd: index % 2 == 0,
            })
            .collect();
        let context = DatabaseErrorContext::new(
            &self.app_name,
            err.message(),
            err.failed_query().unwrap_or(""),
            lines,
        )
        .to_value();

        match render_minijinja_template(self.templates.as_ref(), DATABASE_ERROR_TEMPLATE, context) {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to render database error template: {}", e);
                inline_error_html(&encode_special_chars(err.message()))
            }
        }
    }
}

fn inline_error_html(message_html: &str) -> String {
    format!("<h1>{}</h1><p>{}</p>", DEFAULT_ERROR_HEADING, message_html)
}
