//! Category model cached from the backend.

use serde::{Deserialize, Serialize};

/// A transaction category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// "income" or "expense"
    pub category_type: String,
}
