// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use std::sync::Arc;
use symadmin::admin::handlers;
use symadmin::app_state::AppState;
use symadmin::bootstrap::descriptors::ensure_page_descriptors;
use symadmin::database::{Database, create_schema};
use symadmin::engine::Engine;
use symadmin::extensions::ExtensionManager;
use symadmin::iam::{AuthorManager, NewAuthor, SectionManager};
use symadmin::util::test_config;
use symadmin::util::test_fixtures::TestFixtureRoot;

pub const ADMIN_PATH: &str = "/symphony";
pub const DEVELOPER_USERNAME: &str = "dev";
pub const DEVELOPER_PASSWORD: &str = "dev-password";
pub const AUTHOR_USERNAME: &str = "writer";
pub const AUTHOR_PASSWORD: &str = "writer-password";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub state: Arc<AppState>,
    pub developer_id: i64,
    pub author_id: i64,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_extensions(ExtensionManager::new(), |_| {})
    }

    /// `prepare` runs against the fixture root before the state is built, so
    /// it can drop extension descriptors or template overrides in place.
    pub fn with_extensions(
        extensions: ExtensionManager,
        prepare: impl FnOnce(&TestFixtureRoot),
    ) -> Self {
        let fixture = TestFixtureRoot::new_unique("symadmin-it").expect("fixture root");
        prepare(&fixture);

        let config = test_config();
        let runtime_paths = fixture.runtime_paths(&config).expect("runtime paths");
        ensure_page_descriptors(&runtime_paths).expect("page descriptors");

        let database = Database::open_in_memory(&config.database).expect("database");
        create_schema(&database).expect("schema");

        let authors = AuthorManager::new(&database);
        let developer_id = authors
            .create(
                &NewAuthor::new(DEVELOPER_USERNAME, DEVELOPER_PASSWORD)
                    .developer()
                    .with_name("Dana", "Developer")
                    .with_email("dev@example.com"),
            )
            .expect("developer");
        let author_id = authors
            .create(
                &NewAuthor::new(AUTHOR_USERNAME, AUTHOR_PASSWORD)
                    .with_name("Wes", "Writer")
                    .with_email("writer@example.com")
                    .with_auth_token(),
            )
            .expect("author");

        let sections = SectionManager::new(&database);
        sections.create("Articles", "articles", 1).expect("section");
        sections.create("Comments", "comments", 2).expect("section");

        let state = Arc::new(AppState::new(config, runtime_paths, database, extensions));
        Self {
            fixture,
            state,
            developer_id,
            author_id,
        }
    }

    pub fn admin_uri(&self, path: &str) -> String {
        format!("{}{}", ADMIN_PATH, path)
    }

    /// `auth-token=<token>` query for the token-enabled author.
    pub fn author_token_query(&self) -> String {
        let author = AuthorManager::new(&self.state.database)
            .fetch_by_id(self.author_id)
            .expect("author lookup")
            .expect("author exists");
        format!("auth-token={}", Engine::author_token(&author))
    }

    pub fn cookie_name(&self) -> String {
        symadmin::session::session_cookie_name(&self.state.config)
    }
}

pub fn build_test_app(
    state: Arc<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let admin_path = state.config.admin.path.clone();
    App::new()
        .app_data(web::Data::from(state))
        .configure(move |cfg| handlers::configure(cfg, &admin_path))
}

/// The session cookie set on `resp`, if any.
pub fn session_cookie(resp: &ServiceResponse, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

pub fn location(resp: &ServiceResponse) -> Option<String> {
    resp.headers()
        .get("Location")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
