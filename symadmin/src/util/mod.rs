// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod log_level_changer;
pub mod log_rotation;
pub mod test_config;
pub mod test_fixtures;

pub use log_level_changer::{LevelRule, default_rules, init_logger, level_filter_from_config};
pub use log_rotation::{ActivityLogSettings, ActivityLogWriter};
pub use test_config::{TestConfigBuilder, test_config};
