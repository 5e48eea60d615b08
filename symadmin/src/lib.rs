// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod admin;
pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod engine;
pub mod extensions;
pub mod iam;
pub mod runtime_paths;
pub mod session;
pub mod templates;
pub mod toolkit;
pub mod util;
