// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::cookie::Cookie;
use actix_web::{http::StatusCode, test};
use symadmin::engine::Engine;
use symadmin::iam::{AuthorManager, ResetTokenStore, generate_reset_token};

async fn body_string(resp: actix_web::dev::ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).expect("utf8 body")
}

#[actix_web::test]
async fn login_sets_session_cookie_that_replays() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&harness.admin_uri("/login/"))
        .set_form([
            ("username", common::DEVELOPER_USERNAME),
            ("password", common::DEVELOPER_PASSWORD),
            ("action[login]", "Login"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        common::location(&resp).as_deref(),
        Some("http://localhost:5466/symphony/")
    );

    let cookie = common::session_cookie(&resp, &harness.cookie_name()).expect("session cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert!(!cookie.value().contains(common::DEVELOPER_PASSWORD));

    let req = test::TestRequest::get()
        .uri(&harness.admin_uri("/system/authors/"))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // A valid session is left alone.
    assert!(common::session_cookie(&resp, &harness.cookie_name()).is_none());
    assert!(body_string(resp).await.contains("<title>Authors | Test Site</title>"));

    let developer = AuthorManager::new(&harness.state.database)
        .fetch_by_id(harness.developer_id)
        .unwrap()
        .unwrap();
    assert!(developer.last_seen.is_some());
}

#[actix_web::test]
async fn auth_token_of_other_length_falls_back_to_cookie() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;
    let req = test::TestRequest::post()
        .uri(&harness.admin_uri("/login/"))
        .set_form([
            ("username", common::DEVELOPER_USERNAME),
            ("password", common::DEVELOPER_PASSWORD),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = common::session_cookie(&resp, &harness.cookie_name()).expect("session cookie");

    let req = test::TestRequest::get()
        .uri(&format!(
            "{}?auth-token=abcdefg",
            harness.admin_uri("/system/authors/")
        ))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("<title>Authors | Test Site</title>"));
}

#[actix_web::test]
async fn unknown_auth_token_of_token_length_ignores_cookie() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;
    let req = test::TestRequest::post()
        .uri(&harness.admin_uri("/login/"))
        .set_form([
            ("username", common::DEVELOPER_USERNAME),
            ("password", common::DEVELOPER_PASSWORD),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = common::session_cookie(&resp, &harness.cookie_name()).expect("session cookie");

    let req = test::TestRequest::get()
        .uri(&format!(
            "{}?auth-token=abcdefgh",
            harness.admin_uri("/system/authors/")
        ))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("name=\"username\""));
    assert!(!body.contains("<title>Authors | Test Site</title>"));
}

#[actix_web::test]
async fn wrong_password_is_rejected() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&harness.admin_uri("/login/"))
        .set_form([
            ("username", common::DEVELOPER_USERNAME),
            ("password", "not-the-password"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = common::session_cookie(&resp, &harness.cookie_name()).expect("removal cookie");
    assert!(cookie.value().is_empty());

    let body = body_string(resp).await;
    assert!(body.contains("The supplied password was rejected."));
    assert!(body.contains(&format!("value=\"{}\"", common::DEVELOPER_USERNAME)));
}

#[actix_web::test]
async fn tampered_cookie_is_expired() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let forged = Cookie::new(harness.cookie_name(), "eyJ1c2VybmFtZSI6ImRldiJ9");
    let req = test::TestRequest::get()
        .uri(&harness.admin_uri("/blueprints/sections/"))
        .cookie(forged)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = common::session_cookie(&resp, &harness.cookie_name()).expect("removal cookie");
    assert!(cookie.value().is_empty());
    assert!(body_string(resp).await.contains("name=\"username\""));
}

#[actix_web::test]
async fn logout_expires_the_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&harness.admin_uri("/login/"))
        .set_form([
            ("username", common::AUTHOR_USERNAME),
            ("password", common::AUTHOR_PASSWORD),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = common::session_cookie(&resp, &harness.cookie_name()).expect("session cookie");

    let req = test::TestRequest::get()
        .uri(&harness.admin_uri("/login/logout/"))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        common::location(&resp).as_deref(),
        Some("http://localhost:5466/symphony/login/")
    );
    let removal = common::session_cookie(&resp, &harness.cookie_name()).expect("removal cookie");
    assert!(removal.value().is_empty());
}

#[actix_web::test]
async fn author_token_logs_in_from_query() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let author = AuthorManager::new(&harness.state.database)
        .fetch_by_id(harness.author_id)
        .unwrap()
        .unwrap();
    let token = Engine::author_token(&author);

    let req = test::TestRequest::get()
        .uri(&format!(
            "{}?auth-token={}",
            harness.admin_uri("/system/authors/"),
            token
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::session_cookie(&resp, &harness.cookie_name()).is_some());
    assert!(body_string(resp).await.contains("<title>Authors | Test Site</title>"));
}

#[actix_web::test]
async fn author_token_requires_token_login_to_be_enabled() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let developer = AuthorManager::new(&harness.state.database)
        .fetch_by_id(harness.developer_id)
        .unwrap()
        .unwrap();
    let token = Engine::author_token(&developer);

    let req = test::TestRequest::get()
        .uri(&format!(
            "{}?auth-token={}",
            harness.admin_uri("/system/authors/"),
            token
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("<title>Login | Test Site</title>"));
}

#[actix_web::test]
async fn reset_token_works_once() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.state.clone())).await;

    let token = generate_reset_token();
    ResetTokenStore::new(&harness.state.database)
        .insert(harness.author_id, &token, chrono::Duration::hours(1))
        .unwrap();
    let uri = format!("{}?auth-token={}", harness.admin_uri("/system/authors/"), token);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(body_string(resp).await.contains("<title>Authors | Test Site</title>"));

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(body_string(resp).await.contains("<title>Login | Test Site</title>"));
}
