//! Snapshot root and entity types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    ColumnModel, ConstraintModel, IndexModel, RelationshipModel, SequenceModel,
    TableGeneratorModel,
};

/// One point-in-time snapshot of the mapped schema.
///
/// Maps are `BTreeMap` so that serialization order is stable across runs;
/// key order carries no meaning for diffing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaModel {
    pub version: String,
    pub entities: BTreeMap<String, EntityModel>,
    pub sequences: BTreeMap<String, SequenceModel>,
    pub table_generators: BTreeMap<String, TableGeneratorModel>,
}

/// One mapped entity (table) within a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityModel {
    pub entity_name: String,
    pub table_name: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub comment: Option<String>,
    /// Entity key in the previous snapshot when the extraction layer signals
    /// a rename. Renames are never inferred from shape similarity.
    pub renamed_from: Option<String>,
    pub columns: BTreeMap<String, ColumnModel>,
    pub indexes: BTreeMap<String, IndexModel>,
    pub constraints: Vec<ConstraintModel>,
    pub relationships: Vec<RelationshipModel>,
}

impl EntityModel {
    /// Column names of the primary key, in declaration order.
    pub fn primary_key_columns(&self) -> Vec<String> {
        self.columns
            .values()
            .filter(|c| c.primary_key)
            .map(|c| c.column_name.clone())
            .collect()
    }
}
