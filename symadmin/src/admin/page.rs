// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::callback::{PageCallback, PageContext};
use super::error::AdminError;
use super::request::AdminRequest;
use crate::engine::Engine;
use crate::toolkit::XmlElement;
use std::collections::HashMap;
use std::sync::Arc;

/// What a page asks the dispatcher to do once it has been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFlow {
    Render,
    Redirect(String),
}

/// Everything a page may touch while building.
pub struct PageEnv<'a> {
    pub engine: &'a mut Engine,
    pub request: &'a AdminRequest,
    pub callback: &'a PageCallback,
}

impl PageEnv<'_> {
    /// Absolute admin URL for `path` (which should start with `/`).
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}{}", self.engine.config().admin_url(), path)
    }
}

/// One backend screen.
pub trait ContentPage {
    fn build(&mut self, env: &mut PageEnv<'_>, context: &PageContext)
    -> Result<PageFlow, AdminError>;

    fn generate(&mut self) -> String;

    /// Recovery for a request that reached this page without a session.
    /// `None` means the page has no hook and the login page is shown instead.
    fn handle_failed_authorisation(
        &mut self,
        _env: &mut PageEnv<'_>,
    ) -> Option<Result<PageFlow, AdminError>> {
        None
    }

    fn title(&self) -> &str;

    fn body_mut(&mut self) -> &mut XmlElement;
}

pub type PageConstructor = Arc<dyn Fn() -> Box<dyn ContentPage> + Send + Sync>;

/// Class name to page constructor.
#[derive(Clone, Default)]
pub struct PageRegistry {
    pages: HashMap<String, PageConstructor>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_pages() -> Self {
        let mut registry = Self::new();
        super::pages::register_builtin_pages(&mut registry);
        registry
    }

    pub fn register<F>(&mut self, classname: &str, constructor: F)
    where
        F: Fn() -> Box<dyn ContentPage> + Send + Sync + 'static,
    {
        if self
            .pages
            .insert(classname.to_string(), Arc::new(constructor))
            .is_some()
        {
            log::warn!("Page '{}' registered twice; keeping the latest", classname);
        }
    }

    pub fn contains(&self, classname: &str) -> bool {
        self.pages.contains_key(classname)
    }

    pub fn instantiate(&self, classname: &str) -> Option<Box<dyn ContentPage>> {
        self.pages.get(classname).map(|constructor| constructor())
    }

    pub fn classnames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
