//! Relationship (foreign key) model

use serde::{Deserialize, Serialize};

use super::{OnDeleteAction, OnUpdateAction};

/// Relationship mapping kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    ManyToOne,
    OneToOne,
    OneToMany,
    ManyToMany,
    JoinedInheritance,
    ElementCollection,
}

/// Persistence cascade option carried for change reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeKind {
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

/// Fetch strategy carried for change reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchKind {
    Eager,
    #[default]
    Lazy,
}

/// One owned relationship: the foreign key lives on `table_name.columns` and
/// points at `referenced_table.referenced_columns`. FK column order is
/// significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipModel {
    pub type_kind: RelationshipType,
    pub table_name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub constraint_name: Option<String>,
    pub on_delete: OnDeleteAction,
    pub on_update: OnUpdateAction,
    /// FK columns double as (part of) the primary key.
    pub maps_id: bool,
    /// Skip FK constraint emission for this relationship.
    pub no_constraint: bool,
    pub cascade_types: Vec<CascadeKind>,
    pub orphan_removal: bool,
    pub fetch: FetchKind,
    pub source_attribute: Option<String>,
}

impl Default for RelationshipModel {
    fn default() -> Self {
        RelationshipModel {
            type_kind: RelationshipType::ManyToOne,
            table_name: String::new(),
            columns: Vec::new(),
            referenced_table: String::new(),
            referenced_columns: Vec::new(),
            constraint_name: None,
            on_delete: OnDeleteAction::NoAction,
            on_update: OnUpdateAction::NoAction,
            maps_id: false,
            no_constraint: false,
            cascade_types: Vec::new(),
            orphan_removal: false,
            fetch: FetchKind::Lazy,
            source_attribute: None,
        }
    }
}
