// SPDX-License-Identifier: MIT

//! Persistent and in-memory stores for the session subsystem.

pub mod collections;
pub mod cookie;
pub mod session_store;

pub use collections::{CollectionCache, Resettable, StoreError};
pub use cookie::{removal_cookie, session_cookie};
pub use session_store::SessionStore;
