// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Backend path to page resolution.
//!
//! Paths are split into at most three segments. `login`, `extension` and
//! `publish` have their own rules; anything else names a page by joining the
//! first two segments (`/system/authors/` is `SystemAuthors`). Pages other than
//! login and publish only resolve when their descriptor file
//! `content.<driver>.yaml` exists.

use super::callback::{PageCallback, PageContext};
use crate::runtime_paths::RuntimePaths;
use crate::toolkit::general::{collapse_slashes, leading_integer, ucfirst};
use std::path::Path;

pub const LOGIN_CLASSNAME: &str = "Login";
pub const PUBLISH_CLASSNAME: &str = "Publish";

pub fn descriptor_file_name(driver: &str) -> String {
    format!("content.{}.yaml", driver)
}

pub fn resolve_page(page: &str, paths: &RuntimePaths) -> Option<PageCallback> {
    let bits = split_limit(page, 3);
    let first = bits.first().map(String::as_str)?;

    match first {
        "login" => Some(login_callback(&bits)),
        "extension" if bits.len() > 1 => extension_callback(&bits, paths),
        "publish" => publish_callback(&bits),
        _ => named_callback(&bits, &paths.content_dir),
    }
}

/// `/publish`, `/login`, `/<a>/<b>` or `/extension/<ext>/<page>`, without any
/// per-setup value such as a section handle.
pub fn page_namespace(page: &str, has_mode_param: bool) -> Option<String> {
    let page = page.trim_matches('/');
    if page.starts_with("publish") {
        return Some("/publish".to_string());
    }
    if page.is_empty() {
        return has_mode_param.then(|| "/login".to_string());
    }

    let bits: Vec<&str> = page.split('/').collect();
    let bit = |index: usize| bits.get(index).copied().unwrap_or("");
    if bit(0) == "extension" {
        Some(format!("/{}/{}/{}", bit(0), bit(1), bit(2)))
    } else {
        Some(format!("/{}/{}", bit(0), bit(1)))
    }
}

fn login_callback(bits: &[String]) -> PageCallback {
    PageCallback {
        driver: "login".to_string(),
        context: PageContext::Segments(split_all(&bits[1..].join("/"))),
        classname: LOGIN_CLASSNAME.to_string(),
        pageroot: "/login/".to_string(),
        driver_location: None,
    }
}

fn extension_callback(bits: &[String], paths: &RuntimePaths) -> Option<PageCallback> {
    let extension = bits[1].as_str();
    if !is_safe_segment(extension) {
        return None;
    }
    let rest = bits.get(2).map(|rest| split_limit(rest, 2)).unwrap_or_default();

    let driver_location = paths.extension_content_dir(extension);
    let mut pageroot = format!("/extension/{}/", extension);
    let driver = match rest.first() {
        Some(sub) => {
            pageroot.push_str(sub);
            pageroot.push('/');
            sub.clone()
        }
        None => "index".to_string(),
    };
    let context = rest
        .get(1)
        .map(|tail| split_all(tail))
        .unwrap_or_default();

    if !is_safe_segment(&driver) || !descriptor_exists(&driver_location, &driver) {
        return None;
    }

    Some(PageCallback {
        classname: format!("Extension{}{}", ucfirst(extension), ucfirst(&driver)),
        driver,
        context: PageContext::Segments(context),
        pageroot,
        driver_location: Some(driver_location),
    })
}

fn publish_callback(bits: &[String]) -> Option<PageCallback> {
    let section_handle = bits.get(1)?.clone();
    let pageroot = format!("/publish/{}/", section_handle);

    let extras = bits.get(2).map(|rest| split_all(rest)).unwrap_or_default();
    let page = extras
        .first()
        .cloned()
        .unwrap_or_else(|| "index".to_string());
    let entry_id = extras.get(1).map(|id| leading_integer(id));
    let flag = extras.get(2).cloned();

    Some(PageCallback {
        driver: "publish".to_string(),
        context: PageContext::Publish {
            section_handle,
            page,
            entry_id,
            flag,
        },
        classname: PUBLISH_CLASSNAME.to_string(),
        pageroot,
        driver_location: None,
    })
}

fn named_callback(bits: &[String], content_dir: &Path) -> Option<PageCallback> {
    let mut classname = ucfirst(&bits[0]);
    let mut pageroot = format!("/{}/", bits[0]);
    if let Some(second) = bits.get(1) {
        classname.push_str(&ucfirst(second));
        pageroot.push_str(second);
        pageroot.push('/');
    }
    let context = bits.get(2).map(|rest| split_all(rest)).unwrap_or_default();
    let driver = classname.to_lowercase();

    if !is_safe_segment(&driver) || !descriptor_exists(content_dir, &driver) {
        return None;
    }

    Some(PageCallback {
        driver,
        context: PageContext::Segments(context),
        classname,
        pageroot,
        driver_location: None,
    })
}

fn descriptor_exists(dir: &Path, driver: &str) -> bool {
    dir.join(descriptor_file_name(driver)).is_file()
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Non-empty segments of `value`, the last one holding any remainder.
fn split_limit(value: &str, limit: usize) -> Vec<String> {
    let collapsed = collapse_slashes(value);
    let trimmed = collapsed.trim_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.splitn(limit, '/').map(str::to_string).collect()
}

fn split_all(value: &str) -> Vec<String> {
    value
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
