// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::password::hash_password;
use super::types::{Author, NewAuthor, UserType};
use crate::database::{Database, DatabaseError};
use chrono::Utc;
use rusqlite::{Row, params};

const AUTHOR_COLUMNS: &str = "id, username, password, first_name, last_name, email, last_seen, \
     user_type, default_area, auth_token_active, language";

/// `last_seen` column format, always UTC.
pub const LAST_SEEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct AuthorManager<'a> {
    db: &'a Database,
}

impl<'a> AuthorManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn fetch_by_id(&self, id: i64) -> Result<Option<Author>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1 LIMIT 1",
            AUTHOR_COLUMNS,
            self.db.table("authors")
        );
        self.db.fetch_row(&sql, [id], author_from_row)
    }

    pub fn fetch_all(&self) -> Result<Vec<Author>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            AUTHOR_COLUMNS,
            self.db.table("authors")
        );
        self.db.fetch_all(&sql, [], author_from_row)
    }

    /// Id of the author whose username and stored hash both match.
    pub fn id_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<i64>, DatabaseError> {
        let sql = format!(
            "SELECT id FROM {} WHERE username = ?1 AND password = ?2 LIMIT 1",
            self.db.table("authors")
        );
        self.db
            .fetch_row(&sql, params![username, password_hash], |row| row.get(0))
    }

    /// `(id, username, password)` of every author allowed to use token login.
    pub fn token_login_candidates(&self) -> Result<Vec<(i64, String, String)>, DatabaseError> {
        let sql = format!(
            "SELECT id, username, password FROM {} WHERE auth_token_active = 'yes' ORDER BY id",
            self.db.table("authors")
        );
        self.db
            .fetch_all(&sql, [], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
    }

    pub fn create(&self, author: &NewAuthor) -> Result<i64, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (username, password, first_name, last_name, email, user_type, \
             default_area, auth_token_active) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            self.db.table("authors")
        );
        self.db.insert(
            &sql,
            params![
                author.username,
                hash_password(&author.password),
                author.first_name,
                author.last_name,
                author.email,
                author.user_type.as_str(),
                author.default_area,
                if author.auth_token_active { "yes" } else { "no" },
            ],
        )
    }

    pub fn count(&self) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.db.table("authors"));
        Ok(self.db.fetch_row(&sql, [], |row| row.get(0))?.unwrap_or(0))
    }

    pub fn touch_last_seen(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!(
            "UPDATE {} SET last_seen = ?1 WHERE id = ?2",
            self.db.table("authors")
        );
        let now = Utc::now().format(LAST_SEEN_FORMAT).to_string();
        self.db.execute(&sql, params![now, id])?;
        Ok(())
    }
}

fn author_from_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    let user_type: String = row.get(7)?;
    let auth_token_active: String = row.get(9)?;
    Ok(Author {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        email: row.get(5)?,
        last_seen: row.get(6)?,
        user_type: UserType::from_column(&user_type),
        default_area: row.get(8)?,
        auth_token_active: auth_token_active == "yes",
        language: row.get(10)?,
    })
}
