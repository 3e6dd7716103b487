//! Sequence and table-generator definitions

use serde::{Deserialize, Serialize};

/// A database sequence definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SequenceModel {
    pub name: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub initial_value: i64,
    pub allocation_size: i64,
    pub cache: i64,
    pub min_value: i64,
    pub max_value: i64,
}

impl Default for SequenceModel {
    fn default() -> Self {
        SequenceModel {
            name: String::new(),
            schema: None,
            catalog: None,
            initial_value: 1,
            allocation_size: 50,
            cache: 0,
            min_value: i64::MIN,
            max_value: i64::MAX,
        }
    }
}

/// A table-backed id generator: one row per generator key in a dedicated
/// table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableGeneratorModel {
    pub name: String,
    pub table: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub pk_column_name: String,
    pub value_column_name: String,
    pub pk_column_value: String,
    pub initial_value: i64,
    pub allocation_size: i64,
}

impl Default for TableGeneratorModel {
    fn default() -> Self {
        TableGeneratorModel {
            name: String::new(),
            table: String::new(),
            schema: None,
            catalog: None,
            pk_column_name: "pk_column".to_string(),
            value_column_name: "value_column".to_string(),
            pk_column_value: String::new(),
            initial_value: 0,
            allocation_size: 50,
        }
    }
}
