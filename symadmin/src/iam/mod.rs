// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod author;
mod password;
mod reset_token;
mod section;
mod types;

pub use author::{AuthorManager, LAST_SEEN_FORMAT};
pub use password::{
    AUTHOR_TOKEN_LEN, RESET_TOKEN_LEN, author_token, generate_password, generate_reset_token,
    hash_password,
};
pub use reset_token::{EXPIRY_FORMAT, ResetTokenStore, format_expiry};
pub use section::SectionManager;
pub use types::{Author, NewAuthor, Section, UserType};
