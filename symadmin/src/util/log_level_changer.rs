// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Re-levels records whose target starts with `target_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    pub target_prefix: String,
    pub from: Level,
    pub to: Level,
}

impl LevelRule {
    pub fn new(target_prefix: &str, from: Level, to: Level) -> Self {
        Self {
            target_prefix: target_prefix.to_string(),
            from,
            to,
        }
    }
}

/// actix announces every worker start at info; that belongs in debug output.
pub fn default_rules() -> Vec<LevelRule> {
    vec![
        LevelRule::new("actix_server", Level::Info, Level::Debug),
        LevelRule::new("actix_web::middleware", Level::Info, Level::Debug),
    ]
}

/// Maps the `log.level` configuration string onto a filter.
pub fn level_filter_from_config(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

struct RelevellingLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl RelevellingLogger {
    fn level_for(&self, target: &str, original: Level) -> Level {
        self.rules
            .iter()
            .find(|rule| rule.from == original && target.starts_with(&rule.target_prefix))
            .map(|rule| rule.to)
            .unwrap_or(original)
    }
}

impl Log for RelevellingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = self.level_for(metadata.target(), metadata.level());
        let relevelled = Metadata::builder()
            .level(level)
            .target(metadata.target())
            .build();
        self.inner.enabled(&relevelled)
    }

    fn log(&self, record: &Record) {
        let level = self.level_for(record.target(), record.level());
        let relevelled = Record::builder()
            .level(level)
            .target(record.target())
            .args(*record.args())
            .module_path(record.module_path())
            .file(record.file())
            .line(record.line())
            .build();
        self.inner.log(&relevelled);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn init_logger(rules: Vec<LevelRule>, logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(RelevellingLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger_with(rules: Vec<LevelRule>) -> RelevellingLogger {
        RelevellingLogger {
            inner: env_logger::Builder::new()
                .filter_level(LevelFilter::Info)
                .build(),
            rules,
        }
    }

    #[test]
    fn matching_prefix_is_relevelled() {
        let logger = logger_with(default_rules());
        assert_eq!(
            logger.level_for("actix_server::builder", Level::Info),
            Level::Debug
        );
        assert_eq!(
            logger.level_for("actix_server::builder", Level::Warn),
            Level::Warn
        );
        assert_eq!(logger.level_for("symadmin::engine", Level::Info), Level::Info);
    }

    #[test]
    fn relevelled_records_respect_inner_filter() {
        let logger = logger_with(default_rules());
        let metadata = Metadata::builder()
            .level(Level::Info)
            .target("actix_server::worker")
            .build();
        assert!(!logger.enabled(&metadata));
    }

    #[test]
    fn config_levels_map_to_filters() {
        assert_eq!(level_filter_from_config("DEBUG"), LevelFilter::Debug);
        assert_eq!(level_filter_from_config("warning"), LevelFilter::Warn);
        assert_eq!(level_filter_from_config("nonsense"), LevelFilter::Info);
    }
}
