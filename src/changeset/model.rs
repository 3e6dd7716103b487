//! Changeset document model
//!
//! Serializable shape of the changeset-format changelog. Serde's external
//! enum tagging renders each [`Change`] as a single-key map
//! (`createTable: {...}`), which is exactly the changelog wire format.

use serde::Serialize;

/// Root changelog document.
#[derive(Debug, Serialize)]
pub struct ChangeLog {
    #[serde(rename = "databaseChangeLog")]
    pub database_change_log: Vec<ChangeSetWrapper>,
}

#[derive(Debug, Serialize)]
pub struct ChangeSetWrapper {
    #[serde(rename = "changeSet")]
    pub change_set: ChangeSet,
}

/// One atomic, independently identified migration operation.
#[derive(Debug, Serialize)]
pub struct ChangeSet {
    pub id: String,
    pub author: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Change {
    CreateTable(CreateTableChange),
    DropTable(DropTableChange),
    RenameTable(RenameTableChange),
    AddColumn(AddColumnChange),
    DropColumn(DropColumnChange),
    ModifyDataType(ModifyDataTypeChange),
    RenameColumn(RenameColumnChange),
    AddNotNullConstraint(NotNullConstraintChange),
    DropNotNullConstraint(NotNullConstraintChange),
    AddUniqueConstraint(AddUniqueConstraintChange),
    DropUniqueConstraint(DropUniqueConstraintChange),
    AddCheckConstraint(AddCheckConstraintChange),
    DropCheckConstraint(DropCheckConstraintChange),
    AddForeignKeyConstraint(AddForeignKeyConstraintChange),
    DropForeignKeyConstraint(DropForeignKeyConstraintChange),
    CreateIndex(CreateIndexChange),
    DropIndex(DropIndexChange),
    AddPrimaryKey(AddPrimaryKeyChange),
    DropPrimaryKey(DropPrimaryKeyChange),
    CreateSequence(CreateSequenceChange),
    DropSequence(DropSequenceChange),
    Insert(InsertChange),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableChange {
    pub table_name: String,
    pub columns: Vec<ColumnWrapper>,
}

#[derive(Debug, Serialize)]
pub struct ColumnWrapper {
    pub column: ColumnConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_constraint_name: Option<String>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.primary_key.is_none()
            && self.primary_key_name.is_none()
            && self.nullable.is_none()
            && self.unique.is_none()
            && self.unique_constraint_name.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTableChange {
    pub table_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTableChange {
    pub old_table_name: String,
    pub new_table_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnChange {
    pub table_name: String,
    pub columns: Vec<ColumnWrapper>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropColumnChange {
    pub table_name: String,
    pub column_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyDataTypeChange {
    pub table_name: String,
    pub column_name: String,
    pub new_data_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameColumnChange {
    pub table_name: String,
    pub old_column_name: String,
    pub new_column_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotNullConstraintChange {
    pub table_name: String,
    pub column_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_data_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUniqueConstraintChange {
    pub table_name: String,
    pub column_names: String,
    pub constraint_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropUniqueConstraintChange {
    pub table_name: String,
    pub constraint_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCheckConstraintChange {
    pub table_name: String,
    pub constraint_name: String,
    pub check_condition: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropCheckConstraintChange {
    pub table_name: String,
    pub constraint_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddForeignKeyConstraintChange {
    pub constraint_name: String,
    pub base_table_name: String,
    pub base_column_names: String,
    pub referenced_table_name: String,
    pub referenced_column_names: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropForeignKeyConstraintChange {
    pub base_table_name: String,
    pub constraint_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexChange {
    pub index_name: String,
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    pub columns: Vec<ColumnWrapper>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIndexChange {
    pub index_name: String,
    pub table_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPrimaryKeyChange {
    pub table_name: String,
    pub column_names: String,
    pub constraint_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropPrimaryKeyChange {
    pub table_name: String,
    pub constraint_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSequenceChange {
    pub sequence_name: String,
    pub start_value: String,
    pub increment_by: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropSequenceChange {
    pub sequence_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertChange {
    pub table_name: String,
    pub columns: Vec<ColumnWrapper>,
}
