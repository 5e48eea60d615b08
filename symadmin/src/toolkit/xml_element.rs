// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! In-memory markup tree that serializes to XML or HTML.
//!
//! An `XmlElement` owns its children. Nodes move between parents only through
//! the explicit detach (`remove_child_at`, `replace_child_at`) and insert
//! operations, so a tree can never share a node between two parents.
//!
//! Values are stored as raw markup and emitted verbatim. Use
//! [`XmlElement::set_text`] for untrusted text: it strips characters XML does
//! not permit and escapes the markup-significant ones. Attribute values are
//! always escaped when the tree is serialized.

use std::fmt;

use super::general::{create_handle, encode_special_chars};

/// HTML elements that never take a closing tag.
pub const NO_END_TAGS: [&str; 10] = [
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta", "param",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementStyle {
    #[default]
    Xml,
    Html,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    value: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    processing_instructions: Vec<String>,
    dtd: Option<String>,
    encoding: String,
    version: String,
    element_style: ElementStyle,
    include_header: bool,
    self_closing: bool,
    allow_empty_attributes: bool,
    value_after_children: bool,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
            processing_instructions: Vec::new(),
            dtd: None,
            encoding: "utf-8".to_string(),
            version: "1.0".to_string(),
            element_style: ElementStyle::Xml,
            include_header: false,
            self_closing: true,
            allow_empty_attributes: true,
            value_after_children: false,
        }
    }

    /// Creates an element whose name is the handle form of `label`.
    pub fn from_handle(label: &str) -> Self {
        Self::new(create_handle(label))
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.append_child(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn child(&self, position: isize) -> Option<&XmlElement> {
        self.real_index(position)
            .and_then(|index| self.children.get(index))
    }

    pub fn child_mut(&mut self, position: isize) -> Option<&mut XmlElement> {
        self.real_index(position)
            .and_then(|index| self.children.get_mut(index))
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// The `position`-th child named `name`, counting only children with that name.
    pub fn child_by_name(&self, name: &str, position: usize) -> Option<&XmlElement> {
        self.children
            .iter()
            .filter(|child| child.name == name)
            .nth(position)
    }

    /// Children named `name`, paired with their index among all children.
    pub fn children_by_name(&self, name: &str) -> Vec<(usize, &XmlElement)> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.name == name)
            .collect()
    }

    pub fn add_processing_instruction(&mut self, instruction: impl Into<String>) {
        self.processing_instructions.push(instruction.into());
    }

    pub fn set_dtd(&mut self, dtd: impl Into<String>) {
        self.dtd = Some(dtd.into());
    }

    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.encoding = encoding.into();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn set_element_style(&mut self, style: ElementStyle) {
        self.element_style = style;
    }

    pub fn element_style(&self) -> ElementStyle {
        self.element_style
    }

    pub fn set_include_header(&mut self, include: bool) {
        self.include_header = include;
    }

    pub fn set_self_closing_tag(&mut self, self_closing: bool) {
        self.self_closing = self_closing;
    }

    pub fn set_allow_empty_attributes(&mut self, allow: bool) {
        self.allow_empty_attributes = allow;
    }

    /// Emits the value after the children instead of before them.
    pub fn set_value_after_children(&mut self, after: bool) {
        self.value_after_children = after;
    }

    /// Stores raw markup as the value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Serializes `element` and stores the result as this element's value.
    pub fn set_value_element(&mut self, element: &XmlElement) {
        self.value = Some(element.generate(false));
    }

    /// Stores untrusted text as the value, sanitized and escaped.
    pub fn set_text(&mut self, text: &str) {
        let sanitized = strip_invalid_xml_characters(text);
        self.value = Some(encode_special_chars(&sanitized));
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn set_attribute_array<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in attributes {
            self.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Adds each whitespace-separated token of `class` that is not already present.
    pub fn add_class(&mut self, class: &str) {
        let mut tokens: Vec<String> = self
            .attribute("class")
            .map(|current| current.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        for token in class.split_whitespace() {
            if !tokens.iter().any(|existing| existing == token) {
                tokens.push(token.to_string());
            }
        }
        self.set_attribute("class", tokens.join(" "));
    }

    /// Removes each whitespace-separated token of `class`. The attribute goes
    /// away entirely once no token is left.
    pub fn remove_class(&mut self, class: &str) {
        let Some(current) = self.attribute("class") else {
            return;
        };
        let removed: Vec<&str> = class.split_whitespace().collect();
        let remaining: Vec<String> = current
            .split_whitespace()
            .filter(|token| !removed.contains(token))
            .map(str::to_string)
            .collect();
        if remaining.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", remaining.join(" "));
        }
    }

    pub fn set_children(&mut self, children: Vec<XmlElement>) {
        self.children = children;
    }

    pub fn append_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn append_child_array(&mut self, children: impl IntoIterator<Item = XmlElement>) {
        self.children.extend(children);
    }

    pub fn prepend_child(&mut self, child: XmlElement) {
        self.children.insert(0, child);
    }

    pub fn number_of_children(&self) -> usize {
        self.children.len()
    }

    /// Detaches and returns the child at `index`. Negative indices count from
    /// the end, so `-1` is the last child.
    pub fn remove_child_at(&mut self, index: isize) -> Option<XmlElement> {
        let index = self.real_index(index)?;
        if index >= self.children.len() {
            return None;
        }
        Some(self.children.remove(index))
    }

    /// Inserts `child` before the child currently at `index`. Indices past the
    /// end append; negative indices count from the end.
    pub fn insert_child_at(&mut self, index: isize, child: XmlElement) {
        let index = self.real_index(index).unwrap_or(0);
        if index >= self.children.len() {
            self.children.push(child);
        } else {
            self.children.insert(index, child);
        }
    }

    /// Swaps `child` in at `index` and returns the detached previous child.
    /// When no child exists at `index`, `child` is handed back as the error.
    pub fn replace_child_at(
        &mut self,
        index: isize,
        child: XmlElement,
    ) -> Result<XmlElement, XmlElement> {
        match self.real_index(index) {
            Some(index) if index < self.children.len() => {
                Ok(std::mem::replace(&mut self.children[index], child))
            }
            _ => Err(child),
        }
    }

    fn real_index(&self, index: isize) -> Option<usize> {
        if index >= 0 {
            return Some(index.unsigned_abs());
        }
        let len = self.children.len() as isize;
        let real = len + index;
        (real >= 0).then_some(real.unsigned_abs())
    }

    /// Serializes the tree. With `indent`, every element goes on its own line
    /// indented by tabs.
    pub fn generate(&self, indent: bool) -> String {
        let mut output = String::new();
        self.write_document_prolog(&mut output, indent);
        self.write_element(&mut output, indent, 0, self.element_style);
        output
    }

    fn write_document_prolog(&self, output: &mut String, indent: bool) {
        let newline = if indent { "\n" } else { "" };
        if self.include_header {
            output.push_str(&format!(
                "<?xml version=\"{}\" encoding=\"{}\" ?>{}",
                self.version, self.encoding, newline
            ));
        }
        if let Some(dtd) = self.dtd.as_deref().filter(|dtd| !dtd.is_empty()) {
            output.push_str(dtd);
            output.push_str(newline);
        }
        if !self.processing_instructions.is_empty() {
            output.push_str(&self.processing_instructions.join("\n"));
        }
    }

    fn write_element(&self, output: &mut String, indent: bool, depth: usize, style: ElementStyle) {
        let newline = if indent { "\n" } else { "" };
        if indent {
            output.push_str(&"\t".repeat(depth));
        }

        output.push('<');
        output.push_str(&self.name);
        for (name, value) in &self.attributes {
            if !value.is_empty() || self.allow_empty_attributes {
                output.push_str(&format!(" {}=\"{}\"", name, encode_special_chars(value)));
            }
        }

        let value = self.value.as_deref().filter(|value| !value.is_empty());
        // `!--` names write an HTML comment.
        let is_void = NO_END_TAGS.contains(&self.name.as_str()) || self.name.starts_with("!--");
        let is_empty = self.children.is_empty() && value.is_none();

        if is_empty && style == ElementStyle::Html && is_void {
            output.push('>');
            output.push_str(newline);
            return;
        }

        if is_empty && self.self_closing {
            match style {
                ElementStyle::Xml => output.push_str(" />"),
                ElementStyle::Html => output.push_str(&format!("></{}>", self.name)),
            }
            output.push_str(newline);
            return;
        }

        output.push('>');

        if let Some(value) = value
            && !self.value_after_children
        {
            output.push_str(value);
        }

        if !self.children.is_empty() {
            output.push_str(newline);
            for child in &self.children {
                child.write_element(output, indent, depth + 1, style);
            }
            if indent {
                output.push_str(&"\t".repeat(depth));
            }
        }

        if let Some(value) = value
            && self.value_after_children
        {
            if indent {
                output.push_str(&"\t".repeat(depth.max(1)));
            }
            output.push_str(value);
            output.push_str(newline);
        }

        output.push_str(&format!("</{}>", self.name));
        output.push_str(newline);
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.generate(false))
    }
}

/// Replaces every run of characters XML 1.0 does not permit with a single space.
pub fn strip_invalid_xml_characters(value: &str) -> String {
    let mut cleaned = String::with_capacity(value.len());
    let mut in_invalid_run = false;
    for ch in value.chars() {
        if is_xml_char(ch) {
            cleaned.push(ch);
            in_invalid_run = false;
        } else if !in_invalid_run {
            cleaned.push(' ');
            in_invalid_run = true;
        }
    }
    cleaned
}

fn is_xml_char(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(count: usize) -> XmlElement {
        let mut list = XmlElement::new("ul");
        for index in 0..count {
            list.append_child(XmlElement::new("li").with_value(index.to_string()));
        }
        list
    }

    fn values(element: &XmlElement) -> Vec<&str> {
        element
            .children()
            .iter()
            .map(|child| child.value().unwrap_or(""))
            .collect()
    }

    #[test]
    fn add_class_appends_tokens_once() {
        let mut p = XmlElement::new("p").with_attribute("class", "a");
        p.add_class("b");
        p.add_class("b");
        p.add_class("a c");
        assert_eq!(p.attribute("class"), Some("a b c"));
    }

    #[test]
    fn add_class_creates_missing_attribute() {
        let mut div = XmlElement::new("div");
        div.add_class("  panel  ");
        assert_eq!(div.attribute("class"), Some("panel"));
    }

    #[test]
    fn remove_class_drops_attribute_when_empty() {
        let mut div = XmlElement::new("div").with_attribute("class", "a b");
        div.remove_class("a");
        assert_eq!(div.attribute("class"), Some("b"));
        div.remove_class("b");
        assert_eq!(div.attribute("class"), None);
        div.remove_class("missing");
        assert!(div.attributes().is_empty());
    }

    #[test]
    fn set_attribute_keeps_insertion_order() {
        let mut input = XmlElement::new("input");
        input.set_attribute("name", "q");
        input.set_attribute("type", "text");
        input.set_attribute("name", "search");
        let names: Vec<&str> = input.attributes().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["name", "type"]);
        assert_eq!(input.attribute("name"), Some("search"));
    }

    #[test]
    fn negative_indices_wrap_from_the_end() {
        let mut by_negative = list_with(3);
        let mut by_positive = list_with(3);
        assert_eq!(
            by_negative.remove_child_at(-1),
            by_positive.remove_child_at(2)
        );
        assert_eq!(values(&by_negative), values(&by_positive));

        let mut by_negative = list_with(3);
        let mut by_positive = list_with(3);
        by_negative.insert_child_at(-1, XmlElement::new("li").with_value("x"));
        by_positive.insert_child_at(2, XmlElement::new("li").with_value("x"));
        assert_eq!(values(&by_negative), vec!["0", "1", "x", "2"]);
        assert_eq!(values(&by_negative), values(&by_positive));

        let mut by_negative = list_with(3);
        let mut by_positive = list_with(3);
        let old_negative = by_negative
            .replace_child_at(-1, XmlElement::new("li").with_value("y"))
            .expect("replace last");
        let old_positive = by_positive
            .replace_child_at(2, XmlElement::new("li").with_value("y"))
            .expect("replace index 2");
        assert_eq!(old_negative, old_positive);
        assert_eq!(values(&by_negative), vec!["0", "1", "y"]);
    }

    #[test]
    fn child_operations_track_the_count() {
        let mut list = list_with(2);
        list.prepend_child(XmlElement::new("li").with_value("first"));
        list.insert_child_at(10, XmlElement::new("li").with_value("last"));
        assert_eq!(list.number_of_children(), 4);
        assert!(list.remove_child_at(7).is_none());
        assert!(list.remove_child_at(-9).is_none());
        assert_eq!(list.number_of_children(), 4);
        assert!(list.remove_child_at(0).is_some());
        assert_eq!(list.number_of_children(), 3);
        assert_eq!(values(&list), vec!["0", "1", "last"]);
    }

    #[test]
    fn replace_child_at_hands_back_child_when_out_of_range() {
        let mut list = list_with(1);
        let rejected = list
            .replace_child_at(3, XmlElement::new("li").with_value("z"))
            .expect_err("index 3 does not exist");
        assert_eq!(rejected.value(), Some("z"));
        assert_eq!(list.number_of_children(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let mut form = XmlElement::new("form");
        form.append_child(XmlElement::new("input").with_attribute("name", "a"));
        form.append_child(XmlElement::new("label"));
        form.append_child(XmlElement::new("input").with_attribute("name", "b"));

        let second = form.child_by_name("input", 1).expect("second input");
        assert_eq!(second.attribute("name"), Some("b"));
        let indices: Vec<usize> = form
            .children_by_name("input")
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(form.child(-2).map(XmlElement::name), Some("label"));
    }

    #[test]
    fn xml_style_self_closes_empty_elements() {
        assert_eq!(XmlElement::new("p").generate(false), "<p />");
        let mut p = XmlElement::new("p");
        p.set_self_closing_tag(false);
        assert_eq!(p.generate(false), "<p></p>");
    }

    #[test]
    fn html_style_void_elements_have_no_end_tag() {
        let mut br = XmlElement::new("br");
        br.set_element_style(ElementStyle::Html);
        assert_eq!(br.generate(false), "<br>");
        br.set_self_closing_tag(false);
        assert_eq!(br.generate(false), "<br>");

        let mut div = XmlElement::new("div");
        div.set_element_style(ElementStyle::Html);
        assert_eq!(div.generate(false), "<div></div>");
    }

    #[test]
    fn html_style_comment_names_have_no_end_tag() {
        let mut body = XmlElement::new("body");
        body.set_element_style(ElementStyle::Html);
        body.append_child(XmlElement::new("!-- built at 12:00 --"));
        assert_eq!(body.generate(false), "<body><!-- built at 12:00 --></body>");
    }

    #[test]
    fn children_inherit_the_root_style() {
        let mut p = XmlElement::new("p");
        p.set_element_style(ElementStyle::Html);
        p.append_child(XmlElement::new("img").with_attribute("src", "a.png"));
        p.append_child(XmlElement::new("span"));
        assert_eq!(
            p.generate(false),
            r#"<p><img src="a.png"><span></span></p>"#
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let a = XmlElement::new("a")
            .with_attribute("title", r#"Tom & "Jerry" <3"#)
            .with_value("x");
        assert_eq!(
            a.generate(false),
            r#"<a title="Tom &amp; &quot;Jerry&quot; &lt;3">x</a>"#
        );
    }

    #[test]
    fn empty_attributes_can_be_suppressed() {
        let mut option = XmlElement::new("option")
            .with_attribute("selected", "")
            .with_value("One");
        assert_eq!(option.generate(false), r#"<option selected="">One</option>"#);
        option.set_allow_empty_attributes(false);
        assert_eq!(option.generate(false), "<option>One</option>");
    }

    #[test]
    fn header_dtd_and_instructions_precede_the_root() {
        let mut data = XmlElement::new("data").with_value("1");
        data.set_include_header(true);
        data.set_dtd("<!DOCTYPE data>");
        assert_eq!(
            data.generate(true),
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<!DOCTYPE data>\n<data>1</data>\n"
        );

        let mut styled = XmlElement::new("data");
        styled.add_processing_instruction(r#"<?xml-stylesheet href="a.xsl"?>"#);
        assert_eq!(
            styled.generate(false),
            r#"<?xml-stylesheet href="a.xsl"?><data />"#
        );
    }

    #[test]
    fn indented_output_uses_tabs() {
        let list = list_with(2);
        assert_eq!(
            list.generate(true),
            "<ul>\n\t<li>0</li>\n\t<li>1</li>\n</ul>\n"
        );
    }

    #[test]
    fn value_can_follow_children() {
        let mut p = XmlElement::new("p").with_value("tail");
        p.append_child(XmlElement::new("b").with_value("bold"));
        assert_eq!(p.generate(false), "<p>tail<b>bold</b></p>");
        p.set_value_after_children(true);
        assert_eq!(p.generate(false), "<p><b>bold</b>tail</p>");
    }

    #[test]
    fn element_values_are_serialized_before_embedding() {
        let inner = XmlElement::new("em").with_value("hi");
        let mut p = XmlElement::new("p");
        p.set_value_element(&inner);
        assert_eq!(p.value(), Some("<em>hi</em>"));
        assert_eq!(p.number_of_children(), 0);
        assert_eq!(p.generate(false), "<p><em>hi</em></p>");
    }

    #[test]
    fn set_text_sanitizes_and_escapes() {
        let mut p = XmlElement::new("p");
        p.set_text("a\u{1}\u{2}b <c> & d");
        assert_eq!(p.value(), Some("a b &lt;c&gt; &amp; d"));
    }

    #[test]
    fn strip_invalid_xml_characters_keeps_permitted_ranges() {
        assert_eq!(strip_invalid_xml_characters("tab\there\r\n"), "tab\there\r\n");
        assert_eq!(strip_invalid_xml_characters("a\u{0}\u{b}b"), "a b");
        assert_eq!(strip_invalid_xml_characters("\u{FFFE}x"), " x");
        assert_eq!(strip_invalid_xml_characters("emoji \u{1F600}"), "emoji \u{1F600}");
    }

    #[test]
    fn from_handle_normalizes_the_name() {
        assert_eq!(XmlElement::from_handle("Entry Title").name(), "entry-title");
    }
}
