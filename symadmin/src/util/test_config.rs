// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AdminConfig, AppConfig, DatabaseConfig, LogConfig, QueryCaching, RegionConfig, ServerConfig,
    SymphonyConfig, ValidatedConfig,
};

pub const TEST_COOKIE_SECRET: &str = "test-cookie-secret-0123456789-abcdefghij";

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                app: AppConfig {
                    name: "Test Site".to_string(),
                    url: "http://localhost:5466".to_string(),
                },
                admin: AdminConfig {
                    path: "/symphony".to_string(),
                    cookie_prefix: "sym-".to_string(),
                    cookie_secret: TEST_COOKIE_SECRET.to_string(),
                },
                region: RegionConfig::default(),
                database: DatabaseConfig {
                    path: "symphony.db".to_string(),
                    tbl_prefix: "tbl_".to_string(),
                    query_caching: QueryCaching::Default,
                },
                log: LogConfig::default(),
                symphony: SymphonyConfig::default(),
            },
        }
    }

    pub fn with_app_url(mut self, url: &str) -> Self {
        self.config.app.url = url.to_string();
        self
    }

    pub fn with_admin_path(mut self, path: &str) -> Self {
        self.config.admin.path = path.to_string();
        self
    }

    pub fn with_tbl_prefix(mut self, prefix: &str) -> Self {
        self.config.database.tbl_prefix = prefix.to_string();
        self
    }

    pub fn with_query_caching(mut self, caching: QueryCaching) -> Self {
        self.config.database.query_caching = caching;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
