// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{admin_shell, data_table, link_cell, text_cell};
use crate::admin::callback::PageContext;
use crate::admin::error::AdminError;
use crate::admin::page::{ContentPage, PageEnv, PageFlow};
use crate::iam::SectionManager;
use crate::toolkit::{HtmlPage, XmlElement};

pub struct BlueprintsSectionsPage {
    page: HtmlPage,
}

impl BlueprintsSectionsPage {
    pub fn new() -> Self {
        Self {
            page: HtmlPage::new(),
        }
    }
}

impl Default for BlueprintsSectionsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentPage for BlueprintsSectionsPage {
    fn build(
        &mut self,
        env: &mut PageEnv<'_>,
        _context: &PageContext,
    ) -> Result<PageFlow, AdminError> {
        let sections = SectionManager::new(env.engine.database()).fetch_all()?;
        self.page = admin_shell(env, "Sections", "blueprints-sections");
        self.page
            .body_mut()
            .append_child(XmlElement::new("h2").with_text("Sections"));

        if sections.is_empty() {
            self.page.body_mut().append_child(
                XmlElement::new("p")
                    .with_attribute("class", "inactive")
                    .with_text("None found."),
            );
            return Ok(PageFlow::Render);
        }

        let rows = sections
            .iter()
            .map(|section| {
                vec![
                    link_cell(
                        &env.admin_url(&format!("/publish/{}/", section.handle)),
                        &section.name,
                    ),
                    text_cell(&section.handle),
                    text_cell(&section.sortorder.to_string()),
                ]
            })
            .collect();
        self.page
            .body_mut()
            .append_child(data_table(&["Name", "Handle", "Sort Order"], rows));
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
