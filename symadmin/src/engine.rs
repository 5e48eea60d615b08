// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Per-request engine: configuration snapshot, session cookie and the
//! logged-in author.

use crate::admin::error::{AdminError, ErrorAdditional, ErrorMessage, ErrorPage};
use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::database::{Database, DatabaseError};
use crate::iam::{
    Author, AuthorManager, RESET_TOKEN_LEN, ResetTokenStore, author_token, generate_reset_token,
    hash_password,
};
use crate::session::SessionCookie;
use crate::toolkit::general::clean_value;
use std::sync::Arc;

const COOKIE_USERNAME: &str = "username";
const COOKIE_PASSWORD: &str = "pass";

pub struct Engine {
    state: Arc<AppState>,
    config: ValidatedConfig,
    database: Database,
    cookie: SessionCookie,
    author: Option<Author>,
}

impl Engine {
    pub fn new(state: Arc<AppState>, cookie: SessionCookie) -> Self {
        let config = state.config.as_ref().clone();
        let database = state.database.for_request();
        Self {
            state,
            config,
            database,
            cookie,
            author: None,
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Changes here only reach disk through `Administration::save_config`.
    pub fn config_mut(&mut self) -> &mut ValidatedConfig {
        &mut self.config
    }

    /// This request's database handle; its query log starts empty.
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    /// Checks a username and password against the authors table. With
    /// `is_hash` the password is taken to be the stored hash already.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        is_hash: bool,
    ) -> Result<bool, DatabaseError> {
        let username = clean_value(username);
        let password = clean_value(password);
        if username.trim().is_empty() || password.trim().is_empty() {
            return Ok(false);
        }

        let password = if is_hash {
            password
        } else {
            hash_password(&password)
        };

        let authors = AuthorManager::new(&self.database);
        let Some(id) = authors.id_by_credentials(&username, &password)? else {
            log::info!("Rejected login for '{}'", username);
            return Ok(false);
        };

        self.author = authors.fetch_by_id(id)?;
        self.cookie.set(COOKIE_USERNAME, &username);
        self.cookie.set(COOKIE_PASSWORD, &password);
        authors.touch_last_seen(id)?;
        log::info!("Author '{}' logged in", username);
        Ok(self.author.is_some())
    }

    /// Logs in with a 6 character reset token (single use) or an 8 character
    /// author token.
    pub fn login_from_token(&mut self, token: &str) -> Result<bool, DatabaseError> {
        let token = clean_value(token);
        let token = token.trim();
        if token.is_empty() {
            return Ok(false);
        }

        let row = if token.len() == RESET_TOKEN_LEN {
            ResetTokenStore::new(&self.database).consume(token)?
        } else {
            AuthorManager::new(&self.database)
                .token_login_candidates()?
                .into_iter()
                .find(|(_, username, password)| author_token(username, password) == token)
        };

        let Some((id, username, password)) = row else {
            log::info!("Rejected token login");
            return Ok(false);
        };

        let authors = AuthorManager::new(&self.database);
        self.author = authors.fetch_by_id(id)?;
        self.cookie.set(COOKIE_USERNAME, &username);
        self.cookie.set(COOKIE_PASSWORD, &password);
        authors.touch_last_seen(id)?;
        log::info!("Author '{}' logged in with a token", username);
        Ok(self.author.is_some())
    }

    pub fn logout(&mut self) {
        if let Some(author) = self.author.take() {
            log::info!("Author '{}' logged out", author.username);
        }
        self.cookie.expire();
    }

    /// Restores the author from the session cookie. A cookie that no longer
    /// matches an author is expired.
    pub fn is_logged_in(&mut self) -> Result<bool, DatabaseError> {
        if self.author.is_some() {
            return Ok(true);
        }

        let username = clean_value(self.cookie.get(COOKIE_USERNAME).unwrap_or(""));
        let password = clean_value(self.cookie.get(COOKIE_PASSWORD).unwrap_or(""));

        if !username.trim().is_empty() && !password.trim().is_empty() {
            let authors = AuthorManager::new(&self.database);
            if let Some(id) = authors.id_by_credentials(&username, &password)? {
                authors.touch_last_seen(id)?;
                self.author = authors.fetch_by_id(id)?;
                if self.author.is_some() {
                    return Ok(true);
                }
            }
        }

        self.cookie.expire();
        Ok(false)
    }

    pub fn custom_error(
        &self,
        heading: &str,
        message: impl Into<ErrorMessage>,
        template: &str,
        additional: ErrorAdditional,
    ) -> AdminError {
        AdminError::Custom(
            ErrorPage::new(heading, message)
                .with_template(template)
                .with_additional(additional),
        )
    }

    /// Stores a fresh single-use reset token for `author_id`.
    pub fn issue_reset_token(
        &self,
        author_id: i64,
        ttl: chrono::Duration,
    ) -> Result<String, DatabaseError> {
        let token = generate_reset_token();
        ResetTokenStore::new(&self.database).insert(author_id, &token, ttl)?;
        Ok(token)
    }

    pub fn author_token(author: &Author) -> String {
        author_token(&author.username, &author.password)
    }

    pub fn into_cookie(self) -> SessionCookie {
        self.cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::ExtensionManager;
    use crate::iam::{LAST_SEEN_FORMAT, NewAuthor};
    use crate::util::test_config::test_config;
    use crate::util::test_fixtures::TestFixtureRoot;

    fn state(fixture: &TestFixtureRoot) -> Arc<AppState> {
        let config = test_config();
        let paths = fixture.runtime_paths(&config).unwrap();
        Arc::new(AppState::new_for_tests(config, paths, ExtensionManager::new()))
    }

    fn add_alice(state: &AppState, token_login: bool) -> i64 {
        let mut author = NewAuthor::new("alice", "secret");
        if token_login {
            author = author.with_auth_token();
        }
        AuthorManager::new(&state.database).create(&author).unwrap()
    }

    fn engine(state: &Arc<AppState>) -> Engine {
        Engine::new(state.clone(), SessionCookie::new(&state.config))
    }

    #[test]
    fn login_with_hash_then_cookie_replay() {
        let fixture = TestFixtureRoot::new_unique("engine-login").unwrap();
        let state = state(&fixture);
        add_alice(&state, false);

        let mut first = engine(&state);
        assert!(first.login("alice", &hash_password("secret"), true).unwrap());
        assert_eq!(first.author().unwrap().username, "alice");
        let outbound = first.into_cookie().pending().unwrap();

        let mut replay = Engine::new(
            state.clone(),
            SessionCookie::from_request(&state.config, Some(outbound.value())),
        );
        assert!(replay.is_logged_in().unwrap());
        assert_eq!(replay.author().unwrap().username, "alice");
        assert!(replay.cookie().pending().is_none());
    }

    #[test]
    fn wrong_password_leaves_no_author() {
        let fixture = TestFixtureRoot::new_unique("engine-wrong").unwrap();
        let state = state(&fixture);
        add_alice(&state, false);

        let mut engine = engine(&state);
        assert!(!engine.login("alice", "wrong", false).unwrap());
        assert!(engine.author().is_none());
        assert!(!engine.login("  ", "secret", false).unwrap());
        assert!(engine.cookie().pending().is_none());
    }

    #[test]
    fn invalid_cookie_is_expired() {
        let fixture = TestFixtureRoot::new_unique("engine-expire").unwrap();
        let state = state(&fixture);
        let mut engine = engine(&state);
        assert!(!engine.is_logged_in().unwrap());
        assert_eq!(engine.cookie().pending().unwrap().value(), "");
    }

    #[test]
    fn author_token_login_updates_the_matched_author() {
        let fixture = TestFixtureRoot::new_unique("engine-token").unwrap();
        let state = state(&fixture);
        let id = add_alice(&state, true);
        let alice = AuthorManager::new(&state.database)
            .fetch_by_id(id)
            .unwrap()
            .unwrap();

        let mut engine = engine(&state);
        assert!(engine.login_from_token(&Engine::author_token(&alice)).unwrap());
        assert_eq!(engine.author().unwrap().id, id);

        let seen = AuthorManager::new(&state.database)
            .fetch_by_id(id)
            .unwrap()
            .unwrap()
            .last_seen
            .unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(&seen, LAST_SEEN_FORMAT).is_ok());
    }

    #[test]
    fn author_token_requires_token_login_enabled() {
        let fixture = TestFixtureRoot::new_unique("engine-token-off").unwrap();
        let state = state(&fixture);
        let id = add_alice(&state, false);
        let alice = AuthorManager::new(&state.database)
            .fetch_by_id(id)
            .unwrap()
            .unwrap();

        let mut engine = engine(&state);
        assert!(!engine.login_from_token(&Engine::author_token(&alice)).unwrap());
    }

    #[test]
    fn reset_token_works_once() {
        let fixture = TestFixtureRoot::new_unique("engine-reset").unwrap();
        let state = state(&fixture);
        let id = add_alice(&state, false);

        let issuer = engine(&state);
        let token = issuer
            .issue_reset_token(id, chrono::Duration::hours(2))
            .unwrap();

        let mut first = engine(&state);
        assert!(first.login_from_token(&token).unwrap());
        let mut second = engine(&state);
        assert!(!second.login_from_token(&token).unwrap());
    }

    #[test]
    fn logout_expires_the_cookie() {
        let fixture = TestFixtureRoot::new_unique("engine-logout").unwrap();
        let state = state(&fixture);
        add_alice(&state, false);

        let mut engine = engine(&state);
        assert!(engine.login("alice", "secret", false).unwrap());
        engine.logout();
        assert!(engine.author().is_none());
        assert_eq!(engine.cookie().pending().unwrap().value(), "");
    }
}
