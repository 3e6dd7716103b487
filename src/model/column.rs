//! Column model and column-level enums

use serde::{Deserialize, Serialize};

/// How a column's value is generated on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStrategy {
    #[default]
    None,
    Identity,
    Sequence,
    Table,
    Uuid,
    Auto,
}

/// Temporal precision marker for date/time columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalKind {
    Date,
    Time,
    Timestamp,
}

/// One column of an entity.
///
/// Only a narrow subset of these attributes participates in diff equality
/// (see [`ColumnModel::diff_eq`]); the rest is carried for DDL rendering and
/// change-detail reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnModel {
    pub column_name: String,
    /// Logical (source-language) type the column was mapped from.
    pub java_type: String,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    /// Column carries an inline PRIMARY KEY clause instead of a table-level one.
    pub manual_primary_key: bool,
    pub generation: GenerationStrategy,
    pub sequence_name: Option<String>,
    pub table_generator_name: Option<String>,
    pub length: u32,
    pub precision: u32,
    pub scale: u32,
    pub default_value: Option<String>,
    pub lob: bool,
    pub version_column: bool,
    pub temporal: Option<TemporalKind>,
    pub conversion_class: Option<String>,
    pub enum_string_mapping: bool,
    pub enum_values: Vec<String>,
    pub sql_type_override: Option<String>,
    pub comment: Option<String>,
    /// Column name in the previous snapshot when the extraction layer signals
    /// a rename.
    pub renamed_from: Option<String>,
}

impl Default for ColumnModel {
    fn default() -> Self {
        ColumnModel {
            column_name: String::new(),
            java_type: String::new(),
            nullable: true,
            unique: false,
            primary_key: false,
            manual_primary_key: false,
            generation: GenerationStrategy::None,
            sequence_name: None,
            table_generator_name: None,
            length: 255,
            precision: 0,
            scale: 0,
            default_value: None,
            lob: false,
            version_column: false,
            temporal: None,
            conversion_class: None,
            enum_string_mapping: false,
            enum_values: Vec::new(),
            sql_type_override: None,
            comment: None,
            renamed_from: None,
        }
    }
}

impl ColumnModel {
    /// Diff equality on the comparable subset: type, nullability, uniqueness
    /// and length. Attributes outside this subset never produce a MODIFIED
    /// diff on their own.
    pub fn diff_eq(&self, other: &ColumnModel) -> bool {
        self.java_type == other.java_type
            && self.nullable == other.nullable
            && self.unique == other.unique
            && self.length == other.length
    }
}
