// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! The backend dispatcher.
//!
//! `render` resolves a page path to a page, checks the session, builds the
//! page and generates its markup, with extension delegates fired before and
//! after generation.

use super::callback::{PageCallback, PageContext};
use super::error::{AdminError, ErrorPage};
use super::page::{ContentPage, PageEnv, PageFlow};
use super::request::AdminRequest;
use super::resolver::{LOGIN_CLASSNAME, page_namespace, resolve_page};
use crate::app_state::AppState;
use crate::config::ConfigError;
use crate::engine::Engine;
use crate::extensions::{BACKEND_PAGE, Delegate, DelegatePayload};
use crate::iam::{AUTHOR_TOKEN_LEN, RESET_TOKEN_LEN, SectionManager};
use crate::session::SessionCookie;
use crate::toolkit::general::collapse_slashes;
use std::sync::Arc;

const AUTH_TOKEN_PARAM: &str = "auth-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutput {
    Html(String),
    Redirect(String),
}

pub struct Administration {
    engine: Engine,
    request: AdminRequest,
    callback: Option<PageCallback>,
    current_page: Option<String>,
    page: Option<Box<dyn ContentPage>>,
}

impl Administration {
    pub fn new(state: Arc<AppState>, request: AdminRequest, cookie: SessionCookie) -> Self {
        Self {
            engine: Engine::new(state, cookie),
            request,
            callback: None,
            current_page: None,
            page: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn request(&self) -> &AdminRequest {
        &self.request
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Absolute URL of the page last passed to [`Administration::page_callback`].
    pub fn current_page_url(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    pub fn page_namespace(&self) -> Option<String> {
        page_namespace(&self.request.path, self.request.param("mode").is_some())
    }

    /// An `auth-token` request parameter of token length takes precedence over
    /// the session cookie.
    pub fn is_logged_in(&mut self) -> Result<bool, AdminError> {
        if self.engine.author().is_some() {
            return Ok(true);
        }
        if let Some(token) = self.request.param(AUTH_TOKEN_PARAM)
            && matches!(token.len(), RESET_TOKEN_LEN | AUTHOR_TOKEN_LEN)
        {
            let token = token.to_string();
            return Ok(self.engine.login_from_token(&token)?);
        }
        Ok(self.engine.is_logged_in()?)
    }

    /// Resolves `page`, or returns the cached callback when `page` is `None`.
    pub fn page_callback(&mut self, page: Option<&str>) -> Result<Option<PageCallback>, AdminError> {
        let Some(page) = page.filter(|page| !page.is_empty()) else {
            return match &self.callback {
                Some(callback) => Ok(Some(callback.clone())),
                None => Err(AdminError::custom(
                    "Symphony Fatal Error",
                    "Cannot request a page callback without first specifying the page.",
                )),
            };
        };

        self.current_page = Some(format!(
            "{}{}",
            self.engine.config().app.url.trim_end_matches('/'),
            collapse_slashes(&format!("{}{}", self.engine.config().admin.path, page))
        ));

        let callback = resolve_page(page, &self.engine.state().runtime_paths);
        if let Some(callback) = &callback {
            self.callback = Some(callback.clone());
        }
        Ok(callback)
    }

    /// Builds the page for `path`. An empty path either shows the login page or
    /// redirects to the author's default area.
    pub fn resolve(&mut self, path: &str) -> Result<PageFlow, AdminError> {
        let mut page_path = path.to_string();
        if page_path.trim_matches('/').is_empty() {
            if !self.is_logged_in()? {
                page_path = "/login".to_string();
            } else {
                return Ok(PageFlow::Redirect(self.default_area_url()?));
            }
        }

        let Some(callback) = self.page_callback(Some(&page_path))? else {
            return Err(self.error_page_not_found());
        };
        let state = self.engine.state().clone();
        let mut page = state
            .pages
            .instantiate(&callback.classname)
            .ok_or(AdminError::NotFound)?;

        let authorised = self.is_logged_in()? || callback.is_login();
        let mut env = PageEnv {
            engine: &mut self.engine,
            request: &self.request,
            callback: &callback,
        };

        let flow = if authorised {
            page.build(&mut env, &callback.context)?
        } else {
            match page.handle_failed_authorisation(&mut env) {
                Some(result) => result?,
                None => {
                    log::debug!("No session for '{}'; showing login", callback.pageroot);
                    page = state
                        .pages
                        .instantiate(LOGIN_CLASSNAME)
                        .ok_or(AdminError::NotFound)?;
                    page.build(&mut env, &PageContext::empty())?
                }
            }
        };

        self.page = Some(page);
        Ok(flow)
    }

    /// Resolves and generates `path`.
    pub fn render(&mut self, path: &str) -> Result<AdminOutput, AdminError> {
        if let PageFlow::Redirect(location) = self.resolve(path)? {
            return Ok(AdminOutput::Redirect(location));
        }
        let state = self.engine.state().clone();
        let page = self.page.as_mut().ok_or(AdminError::NotFound)?;

        state.extensions.notify_members(
            Delegate::AdminPagePreGenerate,
            BACKEND_PAGE,
            &mut DelegatePayload::Page(&mut **page),
        );

        let mut output = page.generate();

        state.extensions.notify_members(
            Delegate::AdminPagePostGenerate,
            BACKEND_PAGE,
            &mut DelegatePayload::Output(&mut output),
        );

        Ok(AdminOutput::Html(output))
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        let path = &self.engine.state().runtime_paths.config_file;
        self.engine.config().save(path)?;
        log::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn error_page_not_found(&self) -> AdminError {
        AdminError::Custom(ErrorPage::not_found())
    }

    fn default_area_url(&self) -> Result<String, AdminError> {
        let admin_url = self.engine.config().admin_url();
        let author = self.engine.author().ok_or(AdminError::NotFound)?;

        let default_area = match author
            .default_area
            .as_deref()
            .map(str::trim)
            .filter(|area| !area.is_empty())
        {
            Some(area) => match area.parse::<i64>() {
                Ok(section_id) => {
                    let sections = SectionManager::new(self.engine.database());
                    let handle = match sections.handle_by_id(section_id)? {
                        Some(handle) => Some(handle),
                        None => sections.first_handle()?,
                    };
                    handle.map(|handle| format!("/publish/{}/", handle))
                }
                Err(_) => Some(strip_prefix_ignore_case(area, &admin_url).to_string()),
            },
            None => None,
        };

        Ok(match default_area {
            Some(area) => format!("{}{}", admin_url, area),
            None if author.is_developer() => format!("{}/blueprints/sections/", admin_url),
            None => format!("{}/system/authors/edit/{}/", admin_url, author.id),
        })
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}
