//! Transaction model cached from the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single ledger entry on an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Signed amount: negative for expenses
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}
