//! Constraint model and referential actions

use serde::{Deserialize, Serialize};

/// Constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    Unique,
    Check,
    PrimaryKey,
    ForeignKey,
    NotNull,
    Default,
    Index,
    Auto,
}

/// ON DELETE referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnDeleteAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

/// ON UPDATE referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnUpdateAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

impl OnDeleteAction {
    /// SQL keyword spelling of the action.
    pub fn sql(&self) -> &'static str {
        match self {
            OnDeleteAction::NoAction => "NO ACTION",
            OnDeleteAction::Cascade => "CASCADE",
            OnDeleteAction::SetNull => "SET NULL",
            OnDeleteAction::SetDefault => "SET DEFAULT",
            OnDeleteAction::Restrict => "RESTRICT",
        }
    }
}

impl OnUpdateAction {
    pub fn sql(&self) -> &'static str {
        match self {
            OnUpdateAction::NoAction => "NO ACTION",
            OnUpdateAction::Cascade => "CASCADE",
            OnUpdateAction::SetNull => "SET NULL",
            OnUpdateAction::SetDefault => "SET DEFAULT",
            OnUpdateAction::Restrict => "RESTRICT",
        }
    }
}

/// A named table constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintModel {
    pub name: String,
    pub schema: Option<String>,
    pub table_name: String,
    pub type_kind: ConstraintType,
    pub columns: Vec<String>,
    pub check_clause: Option<String>,
    pub referenced_table: Option<String>,
    pub referenced_columns: Vec<String>,
    pub on_delete: OnDeleteAction,
    pub on_update: OnUpdateAction,
    pub options: Option<String>,
}

impl Default for ConstraintModel {
    fn default() -> Self {
        ConstraintModel {
            name: String::new(),
            schema: None,
            table_name: String::new(),
            type_kind: ConstraintType::Auto,
            columns: Vec::new(),
            check_clause: None,
            referenced_table: None,
            referenced_columns: Vec::new(),
            on_delete: OnDeleteAction::NoAction,
            on_update: OnUpdateAction::NoAction,
            options: None,
        }
    }
}
