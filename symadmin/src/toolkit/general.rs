// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Small string helpers shared by the markup builder and the dispatcher.

/// Escapes the characters that are significant inside element text and
/// double-quoted attribute values.
pub fn encode_special_chars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Turns a label into a URL-safe handle: lowercase alphanumerics joined by `-`.
pub fn create_handle(value: &str) -> String {
    let mut handle = String::with_capacity(value.len());
    let mut pending_separator = false;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !handle.is_empty() {
                handle.push('-');
            }
            pending_separator = false;
            handle.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    handle
}

/// Uppercases the first character and leaves the rest untouched.
pub fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Removes control characters from user supplied input.
pub fn clean_value(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_control()).collect()
}

/// Reads the integer at the start of `value` the way a lenient numeric cast
/// would: optional sign, then digits. Anything else yields 0, and values out
/// of range saturate at `i64::MAX` or `i64::MIN`.
pub fn leading_integer(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut parsed: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        let next = parsed.checked_mul(10).and_then(|value| {
            if negative {
                value.checked_sub(digit)
            } else {
                value.checked_add(digit)
            }
        });
        match next {
            Some(value) => parsed = value,
            None if negative => return i64::MIN,
            None => return i64::MAX,
        }
    }
    parsed
}

/// Collapses runs of `/` into a single slash.
pub fn collapse_slashes(value: &str) -> String {
    let mut collapsed = String::with_capacity(value.len());
    let mut previous_slash = false;
    for ch in value.chars() {
        if ch == '/' {
            if !previous_slash {
                collapsed.push(ch);
            }
            previous_slash = true;
        } else {
            collapsed.push(ch);
            previous_slash = false;
        }
    }
    collapsed
}
