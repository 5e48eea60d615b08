// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Extension hooks ("delegates") fired around page generation.

use crate::admin::page::{ContentPage, PageRegistry};
use std::sync::Arc;

/// Page context the admin dispatcher broadcasts under.
pub const BACKEND_PAGE: &str = "/backend/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delegate {
    AdminPagePreGenerate,
    AdminPagePostGenerate,
}

impl Delegate {
    pub fn name(self) -> &'static str {
        match self {
            Delegate::AdminPagePreGenerate => "AdminPagePreGenerate",
            Delegate::AdminPagePostGenerate => "AdminPagePostGenerate",
        }
    }
}

/// Mutable data handed to subscribers.
pub enum DelegatePayload<'a> {
    Page(&'a mut dyn ContentPage),
    Output(&'a mut String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub page: String,
    pub delegate: Delegate,
}

impl Subscription {
    pub fn backend(delegate: Delegate) -> Self {
        Self {
            page: BACKEND_PAGE.to_string(),
            delegate,
        }
    }
}

pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn subscribed_delegates(&self) -> Vec<Subscription> {
        Vec::new()
    }

    fn notify(&self, _delegate: Delegate, _page: &str, _payload: &mut DelegatePayload<'_>) {}

    /// Adds the extension's own pages, named `Extension<Name><Page>`.
    fn register_pages(&self, _registry: &mut PageRegistry) {}
}

#[derive(Clone, Default)]
pub struct ExtensionManager {
    extensions: Vec<Arc<dyn Extension>>,
}

impl ExtensionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, extension: Arc<dyn Extension>) {
        log::info!("Extension '{}' installed", extension.name());
        self.extensions.push(extension);
    }

    pub fn with_extension(mut self, extension: Arc<dyn Extension>) -> Self {
        self.install(extension);
        self
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn register_pages(&self, registry: &mut PageRegistry) {
        for extension in &self.extensions {
            extension.register_pages(registry);
        }
    }

    /// Calls every extension subscribed to `delegate` on `page`, in install
    /// order. Returns how many were notified.
    pub fn notify_members(
        &self,
        delegate: Delegate,
        page: &str,
        payload: &mut DelegatePayload<'_>,
    ) -> usize {
        let mut notified = 0;
        for extension in &self.extensions {
            let subscribed = extension
                .subscribed_delegates()
                .iter()
                .any(|subscription| subscription.delegate == delegate && subscription.page == page);
            if subscribed {
                log::debug!("Notifying '{}' of {}", extension.name(), delegate.name());
                extension.notify(delegate, page, payload);
                notified += 1;
            }
        }
        notified
    }
}
