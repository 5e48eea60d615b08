// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Short-lived password reset tokens (the `forgotpass` table).

use crate::database::{Database, DatabaseError};
use chrono::{DateTime, Duration, Utc};
use rusqlite::params;

/// Expiry column format. Lexical order equals chronological order.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

pub fn format_expiry(at: DateTime<Utc>) -> String {
    at.format(EXPIRY_FORMAT).to_string()
}

pub struct ResetTokenStore<'a> {
    db: &'a Database,
}

impl<'a> ResetTokenStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, author_id: i64, token: &str, ttl: Duration) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (author_id, token, expiry) VALUES (?1, ?2, ?3)",
            self.db.table("forgotpass")
        );
        self.db.execute(
            &sql,
            params![author_id, token, format_expiry(Utc::now() + ttl)],
        )?;
        Ok(())
    }

    /// Looks up the author owning a live `token` and deletes the token either way.
    /// Returns `(id, username, password)`.
    pub fn consume(&self, token: &str) -> Result<Option<(i64, String, String)>, DatabaseError> {
        let sql = format!(
            "SELECT a.id, a.username, a.password FROM {} AS a, {} AS f \
             WHERE a.id = f.author_id AND f.expiry > ?1 AND f.token = ?2 LIMIT 1",
            self.db.table("authors"),
            self.db.table("forgotpass")
        );
        let row = self.db.fetch_row(
            &sql,
            params![format_expiry(Utc::now()), token],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let delete = format!(
            "DELETE FROM {} WHERE token = ?1",
            self.db.table("forgotpass")
        );
        self.db.execute(&delete, [token])?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::create_schema;
    use crate::iam::{AuthorManager, NewAuthor};

    fn db_with_author() -> (Database, i64) {
        let db = Database::open_in_memory(&DatabaseConfig::default()).unwrap();
        create_schema(&db).unwrap();
        let id = AuthorManager::new(&db)
            .create(&NewAuthor::new("alice", "secret"))
            .unwrap();
        (db, id)
    }

    #[test]
    fn token_is_single_use() {
        let (db, id) = db_with_author();
        let store = ResetTokenStore::new(&db);
        store.insert(id, "abc123", Duration::hours(1)).unwrap();

        let row = store.consume("abc123").unwrap().unwrap();
        assert_eq!(row.0, id);
        assert_eq!(row.1, "alice");
        assert!(store.consume("abc123").unwrap().is_none());
    }

    #[test]
    fn expired_token_is_rejected_and_removed() {
        let (db, id) = db_with_author();
        let store = ResetTokenStore::new(&db);
        store.insert(id, "old999", Duration::hours(-1)).unwrap();

        assert!(store.consume("old999").unwrap().is_none());
        let remaining: Option<i64> = db
            .fetch_row("SELECT COUNT(*) FROM tbl_forgotpass", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, Some(0));
    }
}
