//! Migration SQL generation
//!
//! Assembles one migration script from a diff by walking the ordered
//! application protocol: pre-objects (sequences, generator tables), then the
//! destructive half (per-table DROP phase, dropped tables, renames), then
//! the constructive half (created tables, per-table ALTER phase), then FK
//! additions, then post-object drops. The order is a correctness contract,
//! not a style choice.

use log::debug;

use crate::builder::{
    AlterContributor, AlterTableBuilder, DropContributor, DropTableBuilder, TableGeneratorBuilder,
    TableGeneratorContributor,
};
use crate::dialect::DialectBundle;
use crate::diff::{
    DiffKind, DiffResult, ModifiedEntity, TableChange, TableContentPhase, TableOp, TablePhase,
};
use crate::error::SchemaDiffError;
use crate::model::ColumnModel;

/// Renders a [`DiffResult`] as ordered SQL statement text for one dialect.
pub struct MigrationGenerator<'a> {
    bundle: &'a DialectBundle,
}

impl<'a> MigrationGenerator<'a> {
    pub fn new(bundle: &'a DialectBundle) -> Self {
        MigrationGenerator { bundle }
    }

    pub fn generate_sql(&self, diff: &DiffResult) -> Result<String, SchemaDiffError> {
        let ddl = self.bundle.ddl();
        let mut out = String::new();

        // 0) Pre-objects: sequences and generator tables that later DDL may
        // reference.
        if let Some(sequences) = ddl.sequences() {
            let mut sql = String::new();
            for seq_diff in &diff.sequence_diffs {
                match seq_diff.kind {
                    DiffKind::Added => {
                        sql.push_str(&sequences.create_sequence_sql(seq_diff.sequence))
                    }
                    DiffKind::Modified => {
                        if let Some(old) = seq_diff.old_sequence {
                            sql.push_str(&sequences.alter_sequence_sql(seq_diff.sequence, old));
                        }
                    }
                    _ => {}
                }
            }
            push_block(&mut out, sql.trim());
        }
        if let Some(table_generators) = ddl.table_generators() {
            let mut builder = TableGeneratorBuilder::new(table_generators);
            for tg_diff in &diff.table_generator_diffs {
                match tg_diff.kind {
                    DiffKind::Added => {
                        builder.add(TableGeneratorContributor::Add(tg_diff.table_generator));
                    }
                    DiffKind::Modified => {
                        if let Some(old_tg) = tg_diff.old_table_generator {
                            builder.add(TableGeneratorContributor::Modify {
                                new_tg: tg_diff.table_generator,
                                old_tg,
                            });
                        }
                    }
                    _ => {}
                }
            }
            if !builder.is_empty() {
                let sql = builder.build()?;
                push_block(&mut out, &sql);
            }
        }

        // 1) Destructive changes: per-table DROP phase, then dropped and
        // renamed tables.
        for modified in &diff.modified_tables {
            let sql = self.content_phase_sql(modified, TableContentPhase::Drop)?;
            push_block(&mut out, &sql);
        }
        if !diff.dropped_tables.is_empty() {
            let mut builder = DropTableBuilder::new(ddl);
            for op in diff.tables_for_phase(TablePhase::Dropped) {
                if let TableOp::Dropped(entity) = op {
                    builder.add(DropContributor::TableDrop(&entity.table_name));
                }
            }
            let sql = builder.build()?;
            push_block(&mut out, &sql);
        }
        for op in diff.tables_for_phase(TablePhase::Renamed) {
            if let TableOp::Renamed(renamed) = op {
                let sql = ddl.rename_table_sql(
                    &renamed.old_entity.table_name,
                    &renamed.new_entity.table_name,
                );
                push_block(&mut out, sql.trim());
            }
        }

        // 2) Constructive changes: created tables, then per-table ALTER
        // phase.
        for op in diff.tables_for_phase(TablePhase::Added) {
            if let TableOp::Added(entity) = op {
                let sql = ddl.create_table_sql(entity)?;
                push_block(&mut out, sql.trim());
            }
        }
        for modified in &diff.modified_tables {
            let sql = self.content_phase_sql(modified, TableContentPhase::Alter)?;
            push_block(&mut out, &sql);
        }

        // 3) FK additions, last, so every referenced column exists. Added
        // tables emit their relationships here for the same reason.
        for modified in &diff.modified_tables {
            let sql = self.content_phase_sql(modified, TableContentPhase::FkAdd)?;
            push_block(&mut out, &sql);
        }
        for entity in &diff.added_tables {
            let mut sql = String::new();
            for rel in &entity.relationships {
                sql.push_str(&ddl.add_relationship_sql(&entity.table_name, rel));
            }
            push_block(&mut out, sql.trim());
        }

        // 4) Post-objects: sequence and generator-table drops.
        if let Some(sequences) = ddl.sequences() {
            let mut sql = String::new();
            for seq_diff in &diff.sequence_diffs {
                if seq_diff.kind == DiffKind::Dropped {
                    sql.push_str(&sequences.drop_sequence_sql(seq_diff.sequence));
                }
            }
            push_block(&mut out, sql.trim());
        }
        if let Some(table_generators) = ddl.table_generators() {
            let mut builder = TableGeneratorBuilder::new(table_generators);
            for tg_diff in &diff.table_generator_diffs {
                if tg_diff.kind == DiffKind::Dropped {
                    builder.add(TableGeneratorContributor::Drop(tg_diff.table_generator));
                }
            }
            if !builder.is_empty() {
                let sql = builder.build()?;
                push_block(&mut out, &sql);
            }
        }

        debug!("generated {} bytes of migration SQL", out.len());
        Ok(out.trim().to_string())
    }

    /// Renders one content phase of one modified table through the alter
    /// builder.
    fn content_phase_sql(
        &self,
        modified: &ModifiedEntity,
        phase: TableContentPhase,
    ) -> Result<String, SchemaDiffError> {
        let ddl = self.bundle.ddl();
        let table = &modified.new_entity.table_name;
        let current_columns: Vec<&ColumnModel> = modified.new_entity.columns.values().collect();
        let pk_columns = modified.new_entity.primary_key_columns();

        let mut builder = AlterTableBuilder::new(table, ddl);
        for change in modified.changes_for_phase(phase) {
            match change {
                TableChange::DropRelationship(rel) => {
                    builder.add(AlterContributor::RelationshipDrop(rel));
                }
                TableChange::DropIndex(index) => {
                    builder.add(AlterContributor::IndexDrop(index));
                }
                TableChange::DropConstraint(constraint) => {
                    builder.add(AlterContributor::ConstraintDrop(constraint));
                }
                TableChange::DropColumn(column) => {
                    builder.add(AlterContributor::ColumnDrop(column));
                }
                TableChange::RenameColumn { new, old } => {
                    // Renaming a PK participant needs the key dropped around
                    // the rename.
                    if old.primary_key {
                        builder.add(AlterContributor::PrimaryKeyComplexDrop {
                            current_columns: current_columns.clone(),
                        });
                        builder.add(AlterContributor::ColumnRename { new, old });
                        builder.add(AlterContributor::PrimaryKeyAdd {
                            pk_columns: pk_columns.clone(),
                        });
                    } else {
                        builder.add(AlterContributor::ColumnRename { new, old });
                    }
                }
                TableChange::AddColumn(column) => {
                    builder.add(AlterContributor::ColumnAdd(column));
                }
                TableChange::ModifyColumn { new, old } => {
                    if old.primary_key || new.primary_key {
                        builder.add(AlterContributor::PrimaryKeyComplexDrop {
                            current_columns: current_columns.clone(),
                        });
                        builder.add(AlterContributor::PrimaryKeyAdd {
                            pk_columns: pk_columns.clone(),
                        });
                    }
                    builder.add(AlterContributor::ColumnModify { new, old });
                }
                TableChange::AddIndex(index) => {
                    builder.add(AlterContributor::IndexAdd(index));
                }
                TableChange::AddConstraint(constraint) => {
                    builder.add(AlterContributor::ConstraintAdd(constraint));
                }
                TableChange::AddRelationship(rel) => {
                    builder.add(AlterContributor::RelationshipAdd(rel));
                }
            }
        }
        builder.build()
    }
}

fn push_block(out: &mut String, block: &str) {
    if !block.is_empty() {
        out.push_str(block);
        out.push('\n');
    }
}
