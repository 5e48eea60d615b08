// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{admin_shell, author_display_name, data_table, display_timestamp, link_cell, text_cell};
use crate::admin::callback::PageContext;
use crate::admin::error::AdminError;
use crate::admin::page::{ContentPage, PageEnv, PageFlow};
use crate::iam::AuthorManager;
use crate::toolkit::general::leading_integer;
use crate::toolkit::{HtmlPage, XmlElement};

/// Author list, and `edit/<id>` for a single author.
pub struct SystemAuthorsPage {
    page: HtmlPage,
}

impl SystemAuthorsPage {
    pub fn new() -> Self {
        Self {
            page: HtmlPage::new(),
        }
    }

    fn build_index(&mut self, env: &PageEnv<'_>) -> Result<(), AdminError> {
        let authors = AuthorManager::new(env.engine.database()).fetch_all()?;
        self.page = admin_shell(env, "Authors", "system-authors");
        self.page
            .body_mut()
            .append_child(XmlElement::new("h2").with_text("Authors"));

        let rows = authors
            .iter()
            .map(|author| {
                vec![
                    link_cell(
                        &env.admin_url(&format!("/system/authors/edit/{}/", author.id)),
                        &author_display_name(author),
                    ),
                    text_cell(&author.username),
                    text_cell(&author.email),
                    text_cell(&display_timestamp(env, author.last_seen.as_deref())),
                    text_cell(author.user_type.as_str()),
                ]
            })
            .collect();
        self.page.body_mut().append_child(data_table(
            &["Name", "Username", "Email Address", "Last Seen", "User Type"],
            rows,
        ));
        Ok(())
    }

    fn build_edit(&mut self, env: &PageEnv<'_>, id: i64) -> Result<(), AdminError> {
        let author = AuthorManager::new(env.engine.database())
            .fetch_by_id(id)?
            .ok_or(AdminError::NotFound)?;
        let name = author_display_name(&author);
        self.page = admin_shell(env, &name, "system-authors");
        self.page
            .body_mut()
            .append_child(XmlElement::new("h2").with_text(&name));

        let mut details = XmlElement::new("dl").with_attribute("class", "author-details");
        let fields = [
            ("Username", author.username.clone()),
            ("Email Address", author.email.clone()),
            ("User Type", author.user_type.as_str().to_string()),
            (
                "Default Area",
                author.default_area.clone().unwrap_or_default(),
            ),
            (
                "Token Login",
                if author.auth_token_active { "Yes" } else { "No" }.to_string(),
            ),
            (
                "Last Seen",
                display_timestamp(env, author.last_seen.as_deref()),
            ),
        ];
        for (term, description) in fields {
            details.append_child(XmlElement::new("dt").with_text(term));
            details.append_child(XmlElement::new("dd").with_text(&description));
        }
        self.page.body_mut().append_child(details);
        Ok(())
    }
}

impl Default for SystemAuthorsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentPage for SystemAuthorsPage {
    fn build(
        &mut self,
        env: &mut PageEnv<'_>,
        context: &PageContext,
    ) -> Result<PageFlow, AdminError> {
        match (context.segment(0), context.segment(1)) {
            (None, _) => self.build_index(env)?,
            (Some("edit"), Some(id)) => self.build_edit(env, leading_integer(id))?,
            _ => return Err(AdminError::NotFound),
        }
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
