//! Index model

use serde::{Deserialize, Serialize};

/// A secondary index. Column order is semantically significant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexModel {
    pub index_name: String,
    pub table_name: String,
    pub column_names: Vec<String>,
    pub unique: bool,
    /// Optional partial-index predicate.
    pub where_clause: Option<String>,
    /// Optional storage-type hint (e.g. BTREE, HASH).
    pub index_type: Option<String>,
}
