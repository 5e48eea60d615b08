// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Actix glue: turns an HTTP request into an [`Administration`] run and the
//! result back into a response.

use super::administration::{AdminOutput, Administration};
use super::request::{AdminRequest, RequestMethod};
use crate::app_state::AppState;
use crate::session::SessionCookie;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, web};
use std::collections::HashMap;
use std::sync::Arc;

const NO_CACHE: &str = "no-cache, no-store, must-revalidate";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

pub fn configure(cfg: &mut web::ServiceConfig, admin_path: &str) {
    let root = admin_path.trim_end_matches('/');
    cfg.service(
        web::resource(root.to_string())
            .route(web::get().to(admin_entry))
            .route(web::post().to(admin_entry)),
    )
    .service(
        web::resource(format!("{}/{{tail:.*}}", root))
            .route(web::get().to(admin_entry))
            .route(web::post().to(admin_entry)),
    );
}

async fn admin_entry(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: Option<web::Form<HashMap<String, String>>>,
) -> HttpResponse {
    let state = state.into_inner();
    let request = admin_request(&req, form.map(web::Form::into_inner));
    let cookie = SessionCookie::from_request(
        &state.config,
        req.cookie(&crate::session::session_cookie_name(&state.config))
            .as_ref()
            .map(|cookie| cookie.value()),
    );

    log::debug!("{} {}{}", req.method(), state.config.admin.path, request.path);

    let path = request.path.clone();
    let mut admin = Administration::new(Arc::clone(&state), request, cookie);
    let outcome = admin.render(&path);
    let engine = admin.into_engine();
    let queries = if outcome.is_err() {
        engine.database().debug()
    } else {
        Vec::new()
    };
    let pending = engine.into_cookie().pending();

    let mut response = match outcome {
        Ok(AdminOutput::Html(body)) => html_response(StatusCode::OK).body(body),
        Ok(AdminOutput::Redirect(location)) => {
            let mut builder = html_response(StatusCode::FOUND);
            builder.insert_header(("Location", location));
            builder.finish()
        }
        Err(err) => {
            if err.status() >= 500 {
                log::error!("Admin request for '{}' failed: {}", path, err);
            } else {
                log::debug!("Admin request for '{}' ended with {}", path, err.status());
            }
            let rendered = state.error_renderer.render(&err, &queries);
            let status =
                StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut builder = html_response(status);
            for (name, value) in rendered.headers {
                builder.insert_header((name, value));
            }
            builder.body(rendered.body)
        }
    };

    if let Some(cookie) = pending
        && let Err(e) = response.add_cookie(&cookie)
    {
        log::warn!("Failed to attach session cookie: {}", e);
    }
    response
}

fn html_response(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder
        .content_type(HTML_CONTENT_TYPE)
        .insert_header(("Cache-Control", NO_CACHE));
    builder
}

fn admin_request(req: &HttpRequest, form: Option<HashMap<String, String>>) -> AdminRequest {
    let tail = req.match_info().get("tail").unwrap_or("");
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let method = if req.method() == actix_web::http::Method::POST {
        RequestMethod::Post
    } else {
        RequestMethod::Get
    };

    AdminRequest {
        path: if tail.is_empty() {
            String::new()
        } else {
            format!("/{}", tail)
        },
        method,
        query,
        form: form.unwrap_or_default(),
    }
}
