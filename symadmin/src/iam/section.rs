// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::Section;
use crate::database::{Database, DatabaseError};
use rusqlite::params;

pub struct SectionManager<'a> {
    db: &'a Database,
}

impl<'a> SectionManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn fetch_by_handle(&self, handle: &str) -> Result<Option<Section>, DatabaseError> {
        let sql = format!(
            "SELECT id, name, handle, sortorder FROM {} WHERE handle = ?1 LIMIT 1",
            self.db.table("sections")
        );
        self.db.fetch_row(&sql, [handle], section_from_row)
    }

    pub fn handle_by_id(&self, id: i64) -> Result<Option<String>, DatabaseError> {
        let sql = format!(
            "SELECT handle FROM {} WHERE id = ?1 LIMIT 1",
            self.db.table("sections")
        );
        self.db.fetch_row(&sql, [id], |row| row.get(0))
    }

    /// Handle of the first section by sort order.
    pub fn first_handle(&self) -> Result<Option<String>, DatabaseError> {
        let sql = format!(
            "SELECT handle FROM {} ORDER BY sortorder, id LIMIT 1",
            self.db.table("sections")
        );
        self.db.fetch_row(&sql, [], |row| row.get(0))
    }

    pub fn fetch_all(&self) -> Result<Vec<Section>, DatabaseError> {
        let sql = format!(
            "SELECT id, name, handle, sortorder FROM {} ORDER BY sortorder, id",
            self.db.table("sections")
        );
        self.db.fetch_all(&sql, [], section_from_row)
    }

    pub fn create(&self, name: &str, handle: &str, sortorder: i64) -> Result<i64, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (name, handle, sortorder) VALUES (?1, ?2, ?3)",
            self.db.table("sections")
        );
        self.db.insert(&sql, params![name, handle, sortorder])
    }
}

fn section_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        name: row.get(1)?,
        handle: row.get(2)?,
        sortorder: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::create_schema;

    #[test]
    fn first_handle_follows_sortorder() {
        let db = Database::open_in_memory(&DatabaseConfig::default()).unwrap();
        create_schema(&db).unwrap();
        let sections = SectionManager::new(&db);
        assert_eq!(sections.first_handle().unwrap(), None);

        let articles = sections.create("Articles", "articles", 2).unwrap();
        sections.create("Pages", "pages", 1).unwrap();

        assert_eq!(sections.first_handle().unwrap().as_deref(), Some("pages"));
        assert_eq!(
            sections.handle_by_id(articles).unwrap().as_deref(),
            Some("articles")
        );
        let handles: Vec<String> = sections
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|section| section.handle)
            .collect();
        assert_eq!(handles, vec!["pages", "articles"]);
        assert_eq!(
            sections.fetch_by_handle("articles").unwrap().map(|s| s.name),
            Some("Articles".to_string())
        );
    }
}
