//! Account model cached from the backend.

use serde::{Deserialize, Serialize};

/// A financial account owned by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Backend account kind, e.g. "checking", "savings", "credit"
    pub account_type: String,
    pub balance: f64,
    #[serde(default)]
    pub currency: Option<String>,
}
