// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{Database, DatabaseError};

pub fn create_schema(db: &Database) -> Result<(), DatabaseError> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {authors} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            last_seen TEXT,
            user_type TEXT NOT NULL DEFAULT 'author' CHECK (user_type IN ('author', 'developer')),
            default_area TEXT,
            auth_token_active TEXT NOT NULL DEFAULT 'no' CHECK (auth_token_active IN ('yes', 'no')),
            language TEXT
        );

        CREATE TABLE IF NOT EXISTS {sections} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            handle TEXT NOT NULL UNIQUE,
            sortorder INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS {forgotpass} (
            author_id INTEGER NOT NULL REFERENCES {authors}(id) ON DELETE CASCADE,
            token TEXT NOT NULL,
            expiry TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS {forgotpass}_token ON {forgotpass}(token);",
        authors = db.table("authors"),
        sections = db.table("sections"),
        forgotpass = db.table("forgotpass"),
    );
    db.execute_batch(&sql)
}

pub fn schema_exists(db: &Database) -> Result<bool, DatabaseError> {
    let count: Option<i64> = db.fetch_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [db.table("authors")],
        |row| row.get(0),
    )?;
    Ok(count.unwrap_or(0) > 0)
}
