// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! The signed admin session cookie.
//!
//! Holds a small string map (`username`, `pass`) encoded as base64 JSON and
//! signed with a key derived from `admin.cookie_secret`. Anything that fails
//! verification reads as an empty session.

use crate::config::ValidatedConfig;
use actix_web::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use std::collections::BTreeMap;

pub const SESSION_COOKIE_SUFFIX: &str = "admin";
/// Two weeks.
pub const SESSION_LIFETIME_SECONDS: i64 = 14 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CookieState {
    Unchanged,
    Updated,
    Expired,
}

pub struct SessionCookie {
    name: String,
    path: String,
    secure: bool,
    key: Key,
    values: BTreeMap<String, String>,
    state: CookieState,
}

impl SessionCookie {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            name: session_cookie_name(config),
            path: config.cookie_path(),
            secure: config.app.url.starts_with("https://"),
            key: Key::derive_from(config.admin.cookie_secret.as_bytes()),
            values: BTreeMap::new(),
            state: CookieState::Unchanged,
        }
    }

    /// Restores the session from the raw inbound cookie value.
    pub fn from_request(config: &ValidatedConfig, raw: Option<&str>) -> Self {
        let mut cookie = Self::new(config);
        if let Some(raw) = raw {
            cookie.values = cookie.verify(raw).unwrap_or_default();
        }
        cookie
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.state = CookieState::Updated;
    }

    pub fn expire(&mut self) {
        self.values.clear();
        self.state = CookieState::Expired;
    }

    /// Outbound cookie, if the session changed during this request.
    pub fn pending(&self) -> Option<Cookie<'static>> {
        match self.state {
            CookieState::Unchanged => None,
            CookieState::Updated => Some(self.signed_cookie()),
            CookieState::Expired => Some(self.removal_cookie()),
        }
    }

    fn verify(&self, raw: &str) -> Option<BTreeMap<String, String>> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(self.name.clone(), raw.to_string()));
        let verified = jar.signed(&self.key).get(&self.name)?;
        let decoded = URL_SAFE_NO_PAD.decode(verified.value()).ok()?;
        serde_json::from_slice(&decoded).ok()
    }

    fn encoded_values(&self) -> String {
        let json = serde_json::to_vec(&self.values).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    fn signed_cookie(&self) -> Cookie<'static> {
        let expires =
            OffsetDateTime::from_unix_timestamp(Utc::now().timestamp() + SESSION_LIFETIME_SECONDS)
                .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let cookie = Cookie::build(self.name.clone(), self.encoded_values())
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(SESSION_LIFETIME_SECONDS))
            .expires(expires)
            .finish();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie.clone());
        jar.get(&self.name).cloned().unwrap_or(cookie)
    }

    fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(self.name.clone(), "")
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(0))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .finish()
    }
}

pub fn session_cookie_name(config: &ValidatedConfig) -> String {
    format!("{}{}", config.admin.cookie_prefix, SESSION_COOKIE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_config::{TestConfigBuilder, test_config};

    #[test]
    fn untouched_session_sends_nothing() {
        let cookie = SessionCookie::new(&test_config());
        assert_eq!(cookie.name(), "sym-admin");
        assert!(cookie.pending().is_none());
    }

    #[test]
    fn signed_values_survive_a_round_trip() {
        let config = test_config();
        let mut cookie = SessionCookie::new(&config);
        cookie.set("username", "alice");
        cookie.set("pass", "abc");

        let outbound = cookie.pending().unwrap();
        assert_eq!(outbound.path(), Some("/"));
        assert_eq!(
            outbound.max_age(),
            Some(CookieDuration::seconds(14 * 24 * 3600))
        );

        let restored = SessionCookie::from_request(&config, Some(outbound.value()));
        assert_eq!(restored.get("username"), Some("alice"));
        assert_eq!(restored.get("pass"), Some("abc"));
    }

    #[test]
    fn tampered_value_reads_as_empty() {
        let config = test_config();
        let mut cookie = SessionCookie::new(&config);
        cookie.set("username", "alice");
        let outbound = cookie.pending().unwrap();
        let forged = format!("{}x", outbound.value());

        let restored = SessionCookie::from_request(&config, Some(&forged));
        assert!(restored.get("username").is_none());

        let unsigned = SessionCookie::from_request(&config, Some("eyJ1c2VybmFtZSI6ImFsaWNlIn0"));
        assert!(unsigned.get("username").is_none());
    }

    #[test]
    fn expire_produces_removal_cookie_on_app_path() {
        let config = TestConfigBuilder::new()
            .with_app_url("https://example.com/site/")
            .build();
        let mut cookie = SessionCookie::new(&config);
        cookie.set("username", "alice");
        cookie.expire();

        let outbound = cookie.pending().unwrap();
        assert_eq!(outbound.value(), "");
        assert_eq!(outbound.path(), Some("/site"));
        assert_eq!(outbound.secure(), Some(true));
        assert_eq!(outbound.max_age(), Some(CookieDuration::seconds(0)));
        assert!(cookie.get("username").is_none());
    }
}
