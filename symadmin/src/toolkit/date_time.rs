// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Dates rendered with the `region` format strings (`m/d/Y`, `H:i`, ...).

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Formats `at` with a format string in the `d`, `m`, `Y`, `H`, `i` letter
/// style. A backslash makes the next character literal; letters without a
/// meaning are copied through.
pub fn format_region_date(at: &NaiveDateTime, format: &str) -> String {
    let mut output = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(literal) = chars.next() {
                    output.push(literal);
                }
            }
            'd' => output.push_str(&format!("{:02}", at.day())),
            'j' => output.push_str(&at.day().to_string()),
            'm' => output.push_str(&format!("{:02}", at.month())),
            'n' => output.push_str(&at.month().to_string()),
            'Y' => output.push_str(&at.year().to_string()),
            'y' => output.push_str(&format!("{:02}", at.year().rem_euclid(100))),
            'M' => output.push_str(&at.format("%b").to_string()),
            'F' => output.push_str(&at.format("%B").to_string()),
            'D' => output.push_str(&at.format("%a").to_string()),
            'l' => output.push_str(&at.format("%A").to_string()),
            'H' => output.push_str(&format!("{:02}", at.hour())),
            'G' => output.push_str(&at.hour().to_string()),
            'h' => output.push_str(&format!("{:02}", twelve_hour(at.hour()))),
            'g' => output.push_str(&twelve_hour(at.hour()).to_string()),
            'i' => output.push_str(&format!("{:02}", at.minute())),
            's' => output.push_str(&format!("{:02}", at.second())),
            'A' => output.push_str(if at.hour() < 12 { "AM" } else { "PM" }),
            'a' => output.push_str(if at.hour() < 12 { "am" } else { "pm" }),
            other => output.push(other),
        }
    }
    output
}

fn twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}
