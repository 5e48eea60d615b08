// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Author,
    Developer,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Author => "author",
            UserType::Developer => "developer",
        }
    }

    /// Anything but `developer` is a plain author.
    pub fn from_column(value: &str) -> Self {
        if value == "developer" {
            UserType::Developer
        } else {
            UserType::Author
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub last_seen: Option<String>,
    pub user_type: UserType,
    /// Section id (numeric) or an admin path.
    pub default_area: Option<String>,
    pub auth_token_active: bool,
    pub language: Option<String>,
}

impl Author {
    pub fn is_developer(&self) -> bool {
        self.user_type == UserType::Developer
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Values for a new author row. `password` is the plain text.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_type: UserType,
    pub default_area: Option<String>,
    pub auth_token_active: bool,
}

impl NewAuthor {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            user_type: UserType::Author,
            default_area: None,
            auth_token_active: false,
        }
    }

    pub fn developer(mut self) -> Self {
        self.user_type = UserType::Developer;
        self
    }

    pub fn with_name(mut self, first: &str, last: &str) -> Self {
        self.first_name = first.to_string();
        self.last_name = last.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_default_area(mut self, area: &str) -> Self {
        self.default_area = Some(area.to_string());
        self
    }

    pub fn with_auth_token(mut self) -> Self {
        self.auth_token_active = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub handle: String,
    pub sortorder: i64,
}
