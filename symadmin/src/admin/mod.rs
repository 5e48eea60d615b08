// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Backend administration: page resolution, dispatch and error pages.

pub mod administration;
pub mod callback;
pub mod error;
pub mod handlers;
pub mod page;
pub mod pages;
pub mod request;
pub mod resolver;

pub use administration::{AdminOutput, Administration};
pub use callback::{PageCallback, PageContext};
pub use error::{AdminError, ErrorAdditional, ErrorMessage, ErrorPage, ErrorRenderer, RenderedError};
pub use page::{ContentPage, PageEnv, PageFlow, PageRegistry};
pub use request::{AdminRequest, RequestMethod};
pub use resolver::{page_namespace, resolve_page};
