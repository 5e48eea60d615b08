// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod date_time;
pub mod general;
pub mod html_page;
pub mod xml_element;

pub use date_time::format_region_date;
pub use html_page::HtmlPage;
pub use xml_element::{ElementStyle, NO_END_TAGS, XmlElement, strip_invalid_xml_characters};
