// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use sha1::{Digest, Sha1};
use uuid::Uuid;

pub const AUTHOR_TOKEN_LEN: usize = 8;
pub const RESET_TOKEN_LEN: usize = 6;

/// Stored password form: lowercase hex SHA-1 of the plain text.
pub fn hash_password(plain: &str) -> String {
    sha1_hex(plain.as_bytes())
}

/// Login token of an author: a prefix of SHA-1(username ‖ password hash).
pub fn author_token(username: &str, password_hash: &str) -> String {
    let mut digest = sha1_hex(format!("{}{}", username, password_hash).as_bytes());
    digest.truncate(AUTHOR_TOKEN_LEN);
    digest
}

pub fn generate_reset_token() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(RESET_TOKEN_LEN)
        .collect()
}

pub fn generate_password() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(16)
        .collect()
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
