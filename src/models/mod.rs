// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod account;
pub mod category;
pub mod transaction;
pub mod user;

pub use account::Account;
pub use category::Category;
pub use transaction::Transaction;
pub use user::{Credentials, LoginResponse, RegisterResponse, Registration, UserProfile};
