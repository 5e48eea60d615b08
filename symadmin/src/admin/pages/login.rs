// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::admin_shell;
use crate::admin::callback::PageContext;
use crate::admin::error::AdminError;
use crate::admin::page::{ContentPage, PageEnv, PageFlow};
use crate::toolkit::{HtmlPage, XmlElement};

const REJECTED_MESSAGE: &str = "The supplied password was rejected.";

pub struct LoginPage {
    page: HtmlPage,
    rejected: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            page: HtmlPage::new(),
            rejected: false,
        }
    }

    fn login_form(&self, env: &PageEnv<'_>, username: &str) -> XmlElement {
        let mut fieldset = XmlElement::new("fieldset");
        fieldset.append_child(XmlElement::new("legend").with_text("Login"));
        if self.rejected {
            fieldset.append_child(
                XmlElement::new("p")
                    .with_attribute("class", "invalid")
                    .with_text(REJECTED_MESSAGE),
            );
        }
        fieldset.append_child(
            XmlElement::new("label").with_text("Username").with_child(
                XmlElement::new("input")
                    .with_attribute("name", "username")
                    .with_attribute("type", "text")
                    .with_attribute("value", username),
            ),
        );
        let mut password_label = XmlElement::new("label").with_text("Password").with_child(
            XmlElement::new("input")
                .with_attribute("name", "password")
                .with_attribute("type", "password"),
        );
        if self.rejected {
            password_label.add_class("invalid");
        }
        fieldset.append_child(password_label);

        let actions = XmlElement::new("div")
            .with_attribute("class", "actions")
            .with_child(
                XmlElement::new("button")
                    .with_attribute("name", "action[login]")
                    .with_attribute("type", "submit")
                    .with_text("Login"),
            );

        XmlElement::new("form")
            .with_attribute("action", env.admin_url("/login/"))
            .with_attribute("method", "post")
            .with_child(fieldset)
            .with_child(actions)
    }
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentPage for LoginPage {
    fn build(
        &mut self,
        env: &mut PageEnv<'_>,
        context: &PageContext,
    ) -> Result<PageFlow, AdminError> {
        if context.segment(0) == Some("logout") {
            env.engine.logout();
            return Ok(PageFlow::Redirect(env.admin_url("/login/")));
        }

        let request = env.request;
        let mut username = String::new();
        if request.is_post() && request.param("username").is_some() {
            username = request.param("username").unwrap_or("").to_string();
            let password = request.param("password").unwrap_or("");
            if env.engine.login(&username, password, false)? {
                return Ok(PageFlow::Redirect(env.admin_url("/")));
            }
            self.rejected = true;
        } else if env.engine.author().is_some() {
            return Ok(PageFlow::Redirect(env.admin_url("/")));
        }

        self.page = admin_shell(env, "Login", "login");
        let form = self.login_form(env, &username);
        self.page.body_mut().append_child(form);
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
