// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Built-in backend pages.

mod blueprints_sections;
mod login;
mod publish;
mod system_authors;

pub use blueprints_sections::BlueprintsSectionsPage;
pub use login::LoginPage;
pub use publish::PublishPage;
pub use system_authors::SystemAuthorsPage;

use super::page::{PageEnv, PageRegistry};
use crate::iam::Author;
use crate::toolkit::general::create_handle;
use crate::toolkit::{HtmlPage, XmlElement, format_region_date};
use chrono::NaiveDateTime;

/// Drivers of the built-in pages; each needs a `content.<driver>.yaml`.
pub const BUILTIN_PAGE_DRIVERS: &[&str] = &["login", "publish", "blueprintssections", "systemauthors"];

pub fn register_builtin_pages(registry: &mut PageRegistry) {
    registry.register("Login", || Box::new(LoginPage::new()));
    registry.register("Publish", || Box::new(PublishPage::new()));
    registry.register("BlueprintsSections", || Box::new(BlueprintsSectionsPage::new()));
    registry.register("SystemAuthors", || Box::new(SystemAuthorsPage::new()));
}

/// Page skeleton shared by the built-in screens: title, header with the site
/// name and, for a logged-in author, the navigation.
pub(crate) fn admin_shell(env: &PageEnv<'_>, title: &str, body_id: &str) -> HtmlPage {
    let config = env.engine.config();
    let mut page = HtmlPage::new();
    page.set_title(format!("{} | {}", title, config.app.name));
    page.add_element_to_head(
        XmlElement::new("meta")
            .with_attribute("name", "robots")
            .with_attribute("content", "noindex"),
    );
    page.body_mut().set_attribute("id", body_id);

    let mut header = XmlElement::new("header").with_attribute("id", "header");
    header.append_child(
        XmlElement::new("h1").with_child(
            XmlElement::new("a")
                .with_attribute("href", env.admin_url("/"))
                .with_text(&config.app.name),
        ),
    );

    if let Some(author) = env.engine.author() {
        let mut nav = XmlElement::new("ul").with_attribute("id", "nav");
        if author.is_developer() {
            nav.append_child(nav_item(&env.admin_url("/blueprints/sections/"), "Sections"));
        }
        nav.append_child(nav_item(&env.admin_url("/system/authors/"), "Authors"));
        nav.append_child(nav_item(&env.admin_url("/login/logout/"), "Log out"));
        header.append_child(nav);

        header.append_child(
            XmlElement::new("p")
                .with_attribute("class", "author")
                .with_text(&author_display_name(author)),
        );
    }

    page.body_mut().append_child(header);
    page
}

/// Full name, or the username when no name is on record.
pub(crate) fn author_display_name(author: &Author) -> String {
    match author.full_name() {
        name if name.is_empty() => author.username.clone(),
        name => name,
    }
}

fn nav_item(href: &str, label: &str) -> XmlElement {
    let mut item = XmlElement::new("li");
    item.set_attribute("class", create_handle(label));
    item.with_child(
        XmlElement::new("a")
            .with_attribute("href", href)
            .with_text(label),
    )
}

/// `<table>` with a header row; each row is a list of `<td>` contents.
pub(crate) fn data_table(headings: &[&str], rows: Vec<Vec<XmlElement>>) -> XmlElement {
    let mut head_row = XmlElement::new("tr");
    for heading in headings {
        head_row.append_child(XmlElement::new("th").with_text(heading));
    }

    let mut body = XmlElement::new("tbody");
    for (index, cells) in rows.into_iter().enumerate() {
        let mut row = XmlElement::new("tr");
        if index % 2 == 0 {
            row.add_class("odd");
        }
        row.append_child_array(
            cells
                .into_iter()
                .map(|cell| XmlElement::new("td").with_child(cell)),
        );
        body.append_child(row);
    }

    XmlElement::new("table")
        .with_attribute("class", "selectable")
        .with_child(XmlElement::new("thead").with_child(head_row))
        .with_child(body)
}

pub(crate) fn text_cell(text: &str) -> XmlElement {
    XmlElement::new("span").with_text(text)
}

pub(crate) fn link_cell(href: &str, text: &str) -> XmlElement {
    XmlElement::new("a")
        .with_attribute("href", href)
        .with_text(text)
}

/// `last_seen` column value in the configured region format.
pub(crate) fn display_timestamp(env: &PageEnv<'_>, value: Option<&str>) -> String {
    let Some(value) = value else {
        return "Unknown".to_string();
    };
    match NaiveDateTime::parse_from_str(value, crate::iam::LAST_SEEN_FORMAT) {
        Ok(at) => format_region_date(&at, &env.engine.config().region.datetime_format()),
        Err(_) => value.to_string(),
    }
}
