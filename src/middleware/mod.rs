// SPDX-License-Identifier: MIT

//! HTTP middleware.

pub mod guard;

pub use guard::{require_anonymous, require_auth, CurrentUser};
