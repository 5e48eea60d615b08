// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::xml_element::{ElementStyle, XmlElement};

/// An HTML5 document shell assembled from `XmlElement`s.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    html: XmlElement,
    head: XmlElement,
    body: XmlElement,
    title: String,
}

impl HtmlPage {
    pub fn new() -> Self {
        let mut html = XmlElement::new("html");
        html.set_attribute("lang", "en");
        let mut head = XmlElement::new("head");
        head.append_child(XmlElement::new("meta").with_attribute("charset", "utf-8"));
        Self {
            html,
            head,
            body: XmlElement::new("body"),
            title: String::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn html_mut(&mut self) -> &mut XmlElement {
        &mut self.html
    }

    pub fn add_element_to_head(&mut self, element: XmlElement) {
        self.head.append_child(element);
    }

    pub fn add_stylesheet_to_head(&mut self, href: &str) {
        self.add_element_to_head(
            XmlElement::new("link")
                .with_attribute("rel", "stylesheet")
                .with_attribute("type", "text/css")
                .with_attribute("href", href),
        );
    }

    pub fn body(&self) -> &XmlElement {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut XmlElement {
        &mut self.body
    }

    pub fn generate(&self) -> String {
        let mut head = self.head.clone();
        if !self.title.is_empty() {
            head.insert_child_at(1, XmlElement::new("title").with_text(&self.title));
        }

        let mut html = self.html.clone();
        html.set_dtd("<!DOCTYPE html>");
        html.set_element_style(ElementStyle::Html);
        html.append_child(head);
        html.append_child(self.body.clone());
        html.generate(true)
    }
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_an_html5_document() {
        let mut page = HtmlPage::new();
        page.set_title("Sections & Fields");
        page.body_mut()
            .append_child(XmlElement::new("h1").with_text("Sections"));

        let html = page.generate();
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("\t\t<meta charset=\"utf-8\">\n"));
        assert!(html.contains("<title>Sections &amp; Fields</title>"));
        assert!(html.contains("<h1>Sections</h1>"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
