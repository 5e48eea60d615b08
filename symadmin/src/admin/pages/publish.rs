// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::admin_shell;
use crate::admin::callback::PageContext;
use crate::admin::error::AdminError;
use crate::admin::page::{ContentPage, PageEnv, PageFlow};
use crate::iam::SectionManager;
use crate::toolkit::{HtmlPage, XmlElement};

/// Entry listing and editing for one section.
pub struct PublishPage {
    page: HtmlPage,
}

impl PublishPage {
    pub fn new() -> Self {
        Self {
            page: HtmlPage::new(),
        }
    }
}

impl Default for PublishPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentPage for PublishPage {
    fn build(
        &mut self,
        env: &mut PageEnv<'_>,
        context: &PageContext,
    ) -> Result<PageFlow, AdminError> {
        let PageContext::Publish {
            section_handle,
            page,
            entry_id,
            flag,
        } = context
        else {
            return Err(AdminError::NotFound);
        };

        let section = SectionManager::new(env.engine.database())
            .fetch_by_handle(section_handle)?
            .ok_or(AdminError::NotFound)?;

        self.page = admin_shell(env, &section.name, "publish");

        let mut details = XmlElement::new("dl").with_attribute("class", "publish-context");
        let mut add_detail = |term: &str, description: &str| {
            details.append_child(XmlElement::new("dt").with_text(term));
            details.append_child(XmlElement::new("dd").with_text(description));
        };
        add_detail("Page", page.as_str());
        if let Some(entry_id) = entry_id {
            add_detail("Entry", &entry_id.to_string());
        }
        if let Some(flag) = flag {
            add_detail("Flag", flag.as_str());
        }

        let mut context_element = XmlElement::new("div").with_attribute("id", "context");
        context_element.append_child(XmlElement::new("h2").with_text(&section.name));
        self.page.body_mut().append_child(context_element);
        self.page.body_mut().append_child(
            XmlElement::new("div")
                .with_attribute("id", "contents")
                .with_attribute("data-section", &section.handle)
                .with_child(details),
        );
        Ok(PageFlow::Render)
    }

    fn generate(&mut self) -> String {
        self.page.generate()
    }

    fn title(&self) -> &str {
        self.page.title()
    }

    fn body_mut(&mut self) -> &mut XmlElement {
        self.page.body_mut()
    }
}
