//! ALTER TABLE builder

use crate::dialect::Dialect;
use crate::error::SchemaDiffError;
use crate::model::{ColumnModel, ConstraintModel, IndexModel, RelationshipModel};

/// One atomic alteration of a table, tagged with its rendering priority.
#[derive(Debug)]
pub enum AlterContributor<'a> {
    TableRename {
        old_table: &'a str,
        new_table: &'a str,
    },
    PrimaryKeyComplexDrop {
        current_columns: Vec<&'a ColumnModel>,
    },
    ColumnDrop(&'a ColumnModel),
    RelationshipDrop(&'a RelationshipModel),
    ConstraintDrop(&'a ConstraintModel),
    IndexDrop(&'a IndexModel),
    ColumnAdd(&'a ColumnModel),
    ColumnModify {
        new: &'a ColumnModel,
        old: &'a ColumnModel,
    },
    ColumnRename {
        new: &'a ColumnModel,
        old: &'a ColumnModel,
    },
    ConstraintAdd(&'a ConstraintModel),
    IndexAdd(&'a IndexModel),
    RelationshipAdd(&'a RelationshipModel),
    PrimaryKeyAdd {
        pk_columns: Vec<String>,
    },
}

impl AlterContributor<'_> {
    /// Rendering priority. The destructive band mirrors the DROP-phase
    /// contract: foreign keys go first, then secondary indexes and
    /// constraints, then columns, then renames, so that nothing is dropped
    /// while a constraint still references it.
    pub fn priority(&self) -> i32 {
        match self {
            AlterContributor::TableRename { .. } => 10,
            AlterContributor::RelationshipDrop(_) => 20,
            AlterContributor::ConstraintDrop(_) => 25,
            AlterContributor::IndexDrop(_) => 25,
            AlterContributor::PrimaryKeyComplexDrop { .. } => 30,
            AlterContributor::ColumnDrop(_) => 35,
            AlterContributor::ColumnAdd(_) => 40,
            AlterContributor::ColumnModify { .. } => 50,
            AlterContributor::ColumnRename { .. } => 50,
            AlterContributor::ConstraintAdd(_) => 60,
            AlterContributor::IndexAdd(_) => 60,
            AlterContributor::RelationshipAdd(_) => 60,
            AlterContributor::PrimaryKeyAdd { .. } => 90,
        }
    }

    fn contribute(
        &self,
        sql: &mut String,
        dialect: &dyn Dialect,
        table: &str,
    ) -> Result<(), SchemaDiffError> {
        match self {
            AlterContributor::TableRename {
                old_table,
                new_table,
            } => sql.push_str(&dialect.rename_table_sql(old_table, new_table)),
            AlterContributor::PrimaryKeyComplexDrop { current_columns } => {
                sql.push_str(&dialect.drop_primary_key_sql(table, current_columns))
            }
            AlterContributor::ColumnDrop(column) => {
                sql.push_str(&dialect.drop_column_sql(table, column))
            }
            AlterContributor::RelationshipDrop(rel) => {
                sql.push_str(&dialect.drop_relationship_sql(table, rel))
            }
            AlterContributor::ConstraintDrop(constraint) => {
                sql.push_str(&dialect.drop_constraint_sql(table, constraint)?)
            }
            AlterContributor::IndexDrop(index) => {
                sql.push_str(&dialect.drop_index_sql(table, &index.index_name)?)
            }
            AlterContributor::ColumnAdd(column) => {
                sql.push_str(&dialect.add_column_sql(table, column))
            }
            AlterContributor::ColumnModify { new, old } => {
                sql.push_str(&dialect.modify_column_sql(table, new, old))
            }
            AlterContributor::ColumnRename { new, old } => {
                sql.push_str(&dialect.rename_column_sql(table, new, old))
            }
            AlterContributor::ConstraintAdd(constraint) => {
                sql.push_str(&dialect.add_constraint_sql(table, constraint)?)
            }
            AlterContributor::IndexAdd(index) => {
                sql.push_str(&dialect.index_statement_sql(index, table)?)
            }
            AlterContributor::RelationshipAdd(rel) => {
                sql.push_str(&dialect.add_relationship_sql(table, rel))
            }
            AlterContributor::PrimaryKeyAdd { pk_columns } => {
                sql.push_str(&dialect.add_primary_key_sql(table, pk_columns))
            }
        }
        Ok(())
    }
}

/// Accumulates alterations for one table and renders them in priority order.
pub struct AlterTableBuilder<'a> {
    table: &'a str,
    dialect: &'a dyn Dialect,
    units: Vec<AlterContributor<'a>>,
}

impl<'a> AlterTableBuilder<'a> {
    pub fn new(table: &'a str, dialect: &'a dyn Dialect) -> Self {
        AlterTableBuilder {
            table,
            dialect,
            units: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        self.table
    }

    pub fn add(&mut self, unit: AlterContributor<'a>) -> &mut Self {
        self.units.push(unit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn build(&mut self) -> Result<String, SchemaDiffError> {
        let mut sql = String::new();
        self.units.sort_by_key(AlterContributor::priority);
        for unit in &self.units {
            unit.contribute(&mut sql, self.dialect, self.table)?;
        }
        Ok(sql.trim().to_string())
    }
}
