//! Changeset generation
//!
//! Alternative output: one globally-ordered list of atomic changesets for
//! the whole diff, instead of one SQL string per table. The collector walks
//! the same per-table phase protocol as the SQL generator and files every
//! emitted operation into a typed bucket; assembly concatenates the buckets
//! in a fixed order regardless of which table produced them, because a
//! cross-table FK drop must precede a same-table column drop elsewhere in
//! the same migration.

mod id;
mod model;

pub use id::ChangeSetIdGenerator;
pub use model::*;

use crate::dialect::{Dialect, DialectBundle};
use crate::diff::{
    DiffKind, DiffResult, ModifiedEntity, TableChange, TableContentPhase, TableOp, TablePhase,
};
use crate::error::SchemaDiffError;
use crate::model::{
    ColumnModel, ConstraintType, EntityModel, GenerationStrategy, IndexModel, RelationshipModel,
    TableGeneratorModel,
};

/// Renders a [`DiffResult`] as an ordered changeset changelog.
pub struct ChangesetGenerator<'a> {
    bundle: &'a DialectBundle,
}

impl<'a> ChangesetGenerator<'a> {
    pub fn new(bundle: &'a DialectBundle) -> Self {
        ChangesetGenerator { bundle }
    }

    pub fn generate(&self, diff: &DiffResult) -> Result<ChangeLog, SchemaDiffError> {
        self.generate_with_ids(diff, ChangeSetIdGenerator::new())
    }

    pub fn generate_with_ids(
        &self,
        diff: &DiffResult,
        ids: ChangeSetIdGenerator,
    ) -> Result<ChangeLog, SchemaDiffError> {
        let mut collector = Collector::new(self.bundle.ddl(), ids);

        for seq_diff in &diff.sequence_diffs {
            collector.visit_sequence(seq_diff.kind, seq_diff.sequence, seq_diff.old_sequence);
        }
        for tg_diff in &diff.table_generator_diffs {
            collector.visit_table_generator(
                tg_diff.kind,
                tg_diff.table_generator,
                tg_diff.old_table_generator,
            );
        }
        for op in diff.tables_for_phase(TablePhase::Dropped) {
            if let TableOp::Dropped(entity) = op {
                collector.visit_dropped_table(entity);
            }
        }
        for modified in &diff.modified_tables {
            collector.visit_content_phase(modified, TableContentPhase::Drop)?;
        }
        for op in diff.tables_for_phase(TablePhase::Renamed) {
            if let TableOp::Renamed(renamed) = op {
                collector.visit_renamed_table(renamed.old_entity, renamed.new_entity);
            }
        }
        for op in diff.tables_for_phase(TablePhase::Added) {
            if let TableOp::Added(entity) = op {
                collector.visit_added_table(entity)?;
            }
        }
        for modified in &diff.modified_tables {
            collector.visit_content_phase(modified, TableContentPhase::Alter)?;
        }
        for modified in &diff.modified_tables {
            collector.visit_content_phase(modified, TableContentPhase::FkAdd)?;
        }

        Ok(ChangeLog {
            database_change_log: collector.assemble(),
        })
    }
}

/// Typed buckets, concatenated in declaration order at assembly time.
struct Collector<'a> {
    dialect: &'a dyn Dialect,
    ids: ChangeSetIdGenerator,
    sequence_changes: Vec<ChangeSetWrapper>,
    table_drop_changes: Vec<ChangeSetWrapper>,
    fk_drop_changes: Vec<ChangeSetWrapper>,
    constraint_drop_changes: Vec<ChangeSetWrapper>,
    index_drop_changes: Vec<ChangeSetWrapper>,
    rename_changes: Vec<ChangeSetWrapper>,
    table_create_changes: Vec<ChangeSetWrapper>,
    column_changes: Vec<ChangeSetWrapper>,
    primary_key_changes: Vec<ChangeSetWrapper>,
    index_create_changes: Vec<ChangeSetWrapper>,
    constraint_add_changes: Vec<ChangeSetWrapper>,
    fk_add_changes: Vec<ChangeSetWrapper>,
}

impl<'a> Collector<'a> {
    fn new(dialect: &'a dyn Dialect, ids: ChangeSetIdGenerator) -> Self {
        Collector {
            dialect,
            ids,
            sequence_changes: Vec::new(),
            table_drop_changes: Vec::new(),
            fk_drop_changes: Vec::new(),
            constraint_drop_changes: Vec::new(),
            index_drop_changes: Vec::new(),
            rename_changes: Vec::new(),
            table_create_changes: Vec::new(),
            column_changes: Vec::new(),
            primary_key_changes: Vec::new(),
            index_create_changes: Vec::new(),
            constraint_add_changes: Vec::new(),
            fk_add_changes: Vec::new(),
        }
    }

    fn assemble(self) -> Vec<ChangeSetWrapper> {
        let mut all = Vec::new();
        all.extend(self.sequence_changes);
        all.extend(self.table_drop_changes);
        all.extend(self.fk_drop_changes);
        all.extend(self.constraint_drop_changes);
        all.extend(self.index_drop_changes);
        all.extend(self.rename_changes);
        all.extend(self.table_create_changes);
        all.extend(self.column_changes);
        all.extend(self.primary_key_changes);
        all.extend(self.index_create_changes);
        all.extend(self.constraint_add_changes);
        all.extend(self.fk_add_changes);
        all
    }

    fn changeset(&mut self, changes: Vec<Change>) -> ChangeSetWrapper {
        ChangeSetWrapper {
            change_set: ChangeSet {
                id: self.ids.next_id(),
                author: "auto-generated".to_string(),
                changes,
            },
        }
    }

    fn type_name(&self, column: &ColumnModel) -> String {
        match self.dialect.changesets() {
            Some(changesets) => changesets.changeset_type_name(column),
            None => self
                .dialect
                .type_mapper()
                .map(&column.java_type)
                .sql_type(column.length, column.precision, column.scale),
        }
    }

    fn column_config(&self, table: &str, column: &ColumnModel) -> ColumnConfig {
        let policy = self.dialect.identifier_policy();
        let constraints = Constraints {
            primary_key: (column.primary_key || column.manual_primary_key).then_some(true),
            primary_key_name: column.primary_key.then(|| {
                crate::dialect::shorten("pk", policy, &[table, column.column_name.as_str()])
            }),
            nullable: (!column.nullable).then_some(false),
            unique: column.unique.then_some(true),
            unique_constraint_name: column.unique.then(|| {
                crate::dialect::shorten("uk", policy, &[table, column.column_name.as_str()])
            }),
        };
        ColumnConfig {
            name: column.column_name.clone(),
            type_name: Some(self.type_name(column)),
            default_value: column.default_value.clone(),
            value: None,
            auto_increment: (column.generation == GenerationStrategy::Identity).then_some(true),
            constraints: (!constraints.is_empty()).then_some(constraints),
        }
    }

    fn visit_sequence(
        &mut self,
        kind: DiffKind,
        sequence: &crate::model::SequenceModel,
        old_sequence: Option<&crate::model::SequenceModel>,
    ) {
        let create = |seq: &crate::model::SequenceModel| {
            Change::CreateSequence(CreateSequenceChange {
                sequence_name: seq.name.clone(),
                start_value: seq.initial_value.to_string(),
                increment_by: seq.allocation_size.to_string(),
            })
        };
        match kind {
            DiffKind::Added => {
                let change = create(sequence);
                let cs = self.changeset(vec![change]);
                self.sequence_changes.push(cs);
            }
            DiffKind::Dropped => {
                let change = Change::DropSequence(DropSequenceChange {
                    sequence_name: sequence.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.sequence_changes.push(cs);
            }
            DiffKind::Modified => {
                if let Some(old) = old_sequence {
                    let drop = Change::DropSequence(DropSequenceChange {
                        sequence_name: old.name.clone(),
                    });
                    let cs = self.changeset(vec![drop]);
                    self.sequence_changes.push(cs);
                }
                let change = create(sequence);
                let cs = self.changeset(vec![change]);
                self.sequence_changes.push(cs);
            }
            DiffKind::Renamed => {}
        }
    }

    fn visit_table_generator(
        &mut self,
        kind: DiffKind,
        tg: &TableGeneratorModel,
        old_tg: Option<&TableGeneratorModel>,
    ) {
        match kind {
            DiffKind::Added => {
                let cs = self.table_generator_create_changeset(tg);
                self.table_create_changes.push(cs);
            }
            DiffKind::Dropped => {
                let change = Change::DropTable(DropTableChange {
                    table_name: tg.table.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.table_drop_changes.push(cs);
            }
            DiffKind::Modified => {
                let Some(old) = old_tg else { return };
                // Layout changes are applied as drop + create; value-only
                // changes leave the live allocation table alone.
                let layout_changed = tg.table != old.table
                    || tg.pk_column_name != old.pk_column_name
                    || tg.value_column_name != old.value_column_name;
                if layout_changed {
                    let change = Change::DropTable(DropTableChange {
                        table_name: old.table.clone(),
                    });
                    let cs = self.changeset(vec![change]);
                    self.table_drop_changes.push(cs);
                    let cs = self.table_generator_create_changeset(tg);
                    self.table_create_changes.push(cs);
                }
            }
            DiffKind::Renamed => {}
        }
    }

    /// Generator table creation plus its seed row, as one atomic changeset.
    fn table_generator_create_changeset(&mut self, tg: &TableGeneratorModel) -> ChangeSetWrapper {
        let key_value = if tg.pk_column_value.is_empty() {
            tg.name.clone()
        } else {
            tg.pk_column_value.clone()
        };
        let create = Change::CreateTable(CreateTableChange {
            table_name: tg.table.clone(),
            columns: vec![
                ColumnWrapper {
                    column: ColumnConfig {
                        name: tg.pk_column_name.clone(),
                        type_name: Some("VARCHAR(255)".to_string()),
                        default_value: None,
                        value: None,
                        auto_increment: None,
                        constraints: Some(Constraints {
                            primary_key: Some(true),
                            nullable: Some(false),
                            ..Constraints::default()
                        }),
                    },
                },
                ColumnWrapper {
                    column: ColumnConfig {
                        name: tg.value_column_name.clone(),
                        type_name: Some("BIGINT".to_string()),
                        default_value: None,
                        value: None,
                        auto_increment: None,
                        constraints: Some(Constraints {
                            nullable: Some(false),
                            ..Constraints::default()
                        }),
                    },
                },
            ],
        });
        let seed = Change::Insert(InsertChange {
            table_name: tg.table.clone(),
            columns: vec![
                ColumnWrapper {
                    column: ColumnConfig {
                        name: tg.pk_column_name.clone(),
                        type_name: None,
                        default_value: None,
                        value: Some(key_value),
                        auto_increment: None,
                        constraints: None,
                    },
                },
                ColumnWrapper {
                    column: ColumnConfig {
                        name: tg.value_column_name.clone(),
                        type_name: None,
                        default_value: None,
                        value: Some(tg.initial_value.to_string()),
                        auto_increment: None,
                        constraints: None,
                    },
                },
            ],
        });
        self.changeset(vec![create, seed])
    }

    fn visit_dropped_table(&mut self, entity: &EntityModel) {
        let change = Change::DropTable(DropTableChange {
            table_name: entity.table_name.clone(),
        });
        let cs = self.changeset(vec![change]);
        self.table_drop_changes.push(cs);
    }

    fn visit_renamed_table(&mut self, old_entity: &EntityModel, new_entity: &EntityModel) {
        let change = Change::RenameTable(RenameTableChange {
            old_table_name: old_entity.table_name.clone(),
            new_table_name: new_entity.table_name.clone(),
        });
        let cs = self.changeset(vec![change]);
        self.rename_changes.push(cs);
    }

    fn visit_added_table(&mut self, entity: &EntityModel) -> Result<(), SchemaDiffError> {
        let table = &entity.table_name;
        let columns: Vec<ColumnWrapper> = entity
            .columns
            .values()
            .map(|column| ColumnWrapper {
                column: self.column_config(table, column),
            })
            .collect();
        let change = Change::CreateTable(CreateTableChange {
            table_name: table.clone(),
            columns,
        });
        let cs = self.changeset(vec![change]);
        self.table_create_changes.push(cs);

        for index in entity.indexes.values() {
            self.add_index(table, index)?;
        }
        for rel in &entity.relationships {
            self.add_relationship(table, rel);
        }
        Ok(())
    }

    fn visit_content_phase(
        &mut self,
        modified: &ModifiedEntity,
        phase: TableContentPhase,
    ) -> Result<(), SchemaDiffError> {
        let table = &modified.new_entity.table_name;
        for change in modified.changes_for_phase(phase) {
            match change {
                TableChange::DropRelationship(rel) => self.drop_relationship(table, rel),
                TableChange::DropIndex(index) => {
                    let change = Change::DropIndex(DropIndexChange {
                        index_name: index.index_name.clone(),
                        table_name: table.clone(),
                    });
                    let cs = self.changeset(vec![change]);
                    self.index_drop_changes.push(cs);
                }
                TableChange::DropConstraint(constraint) => {
                    self.drop_constraint(table, constraint)?
                }
                TableChange::DropColumn(column) => {
                    let change = Change::DropColumn(DropColumnChange {
                        table_name: table.clone(),
                        column_name: column.column_name.clone(),
                    });
                    let cs = self.changeset(vec![change]);
                    self.column_changes.push(cs);
                }
                TableChange::RenameColumn { new, old } => {
                    let change = Change::RenameColumn(RenameColumnChange {
                        table_name: table.clone(),
                        old_column_name: old.column_name.clone(),
                        new_column_name: new.column_name.clone(),
                    });
                    let cs = self.changeset(vec![change]);
                    self.column_changes.push(cs);
                }
                TableChange::AddColumn(column) => {
                    let change = Change::AddColumn(AddColumnChange {
                        table_name: table.clone(),
                        columns: vec![ColumnWrapper {
                            column: self.column_config(table, column),
                        }],
                    });
                    let cs = self.changeset(vec![change]);
                    self.column_changes.push(cs);
                }
                TableChange::ModifyColumn { new, old } => self.modify_column(table, new, old),
                TableChange::AddIndex(index) => self.add_index(table, index)?,
                TableChange::AddConstraint(constraint) => self.add_constraint(table, constraint)?,
                TableChange::AddRelationship(rel) => self.add_relationship(table, rel),
            }
        }
        Ok(())
    }

    fn modify_column(&mut self, table: &str, new: &ColumnModel, old: &ColumnModel) {
        let policy = self.dialect.identifier_policy();
        let mut changes = Vec::new();

        if new.java_type != old.java_type || new.length != old.length {
            changes.push(Change::ModifyDataType(ModifyDataTypeChange {
                table_name: table.to_string(),
                column_name: new.column_name.clone(),
                new_data_type: self.type_name(new),
            }));
        }
        if new.nullable != old.nullable {
            let change = NotNullConstraintChange {
                table_name: table.to_string(),
                column_name: new.column_name.clone(),
                column_data_type: Some(self.type_name(new)),
            };
            changes.push(if new.nullable {
                Change::DropNotNullConstraint(change)
            } else {
                Change::AddNotNullConstraint(change)
            });
        }
        if !changes.is_empty() {
            let cs = self.changeset(changes);
            self.column_changes.push(cs);
        }

        // The unique flag is backed by a named constraint; toggles route
        // through the constraint buckets so the global ordering holds.
        if new.unique != old.unique {
            let constraint_name =
                crate::dialect::shorten("uk", policy, &[table, new.column_name.as_str()]);
            if new.unique {
                let change = Change::AddUniqueConstraint(AddUniqueConstraintChange {
                    table_name: table.to_string(),
                    column_names: new.column_name.clone(),
                    constraint_name,
                });
                let cs = self.changeset(vec![change]);
                self.constraint_add_changes.push(cs);
            } else {
                let change = Change::DropUniqueConstraint(DropUniqueConstraintChange {
                    table_name: table.to_string(),
                    constraint_name,
                });
                let cs = self.changeset(vec![change]);
                self.constraint_drop_changes.push(cs);
            }
        }
    }

    fn add_index(&mut self, table: &str, index: &IndexModel) -> Result<(), SchemaDiffError> {
        if index.index_name.trim().is_empty() {
            return Err(SchemaDiffError::BlankIndexName {
                table: table.to_string(),
            });
        }
        let columns = index
            .column_names
            .iter()
            .map(|name| ColumnWrapper {
                column: ColumnConfig {
                    name: name.clone(),
                    type_name: None,
                    default_value: None,
                    value: None,
                    auto_increment: None,
                    constraints: None,
                },
            })
            .collect();
        let change = Change::CreateIndex(CreateIndexChange {
            index_name: index.index_name.clone(),
            table_name: table.to_string(),
            unique: index.unique.then_some(true),
            columns,
        });
        let cs = self.changeset(vec![change]);
        self.index_create_changes.push(cs);
        Ok(())
    }

    fn add_constraint(
        &mut self,
        table: &str,
        constraint: &crate::model::ConstraintModel,
    ) -> Result<(), SchemaDiffError> {
        if constraint.name.trim().is_empty() {
            return Err(SchemaDiffError::BlankConstraintName {
                table: table.to_string(),
            });
        }
        match constraint.type_kind {
            ConstraintType::Unique => {
                let change = Change::AddUniqueConstraint(AddUniqueConstraintChange {
                    table_name: table.to_string(),
                    column_names: constraint.columns.join(","),
                    constraint_name: constraint.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.constraint_add_changes.push(cs);
            }
            ConstraintType::Check => {
                let change = Change::AddCheckConstraint(AddCheckConstraintChange {
                    table_name: table.to_string(),
                    constraint_name: constraint.name.clone(),
                    check_condition: constraint.check_clause.clone().unwrap_or_default(),
                });
                let cs = self.changeset(vec![change]);
                self.constraint_add_changes.push(cs);
            }
            ConstraintType::PrimaryKey => {
                let change = Change::AddPrimaryKey(AddPrimaryKeyChange {
                    table_name: table.to_string(),
                    column_names: constraint.columns.join(","),
                    constraint_name: constraint.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.primary_key_changes.push(cs);
            }
            ConstraintType::ForeignKey => {
                let change = Change::AddForeignKeyConstraint(AddForeignKeyConstraintChange {
                    constraint_name: constraint.name.clone(),
                    base_table_name: table.to_string(),
                    base_column_names: constraint.columns.join(","),
                    referenced_table_name: constraint
                        .referenced_table
                        .clone()
                        .unwrap_or_default(),
                    referenced_column_names: constraint.referenced_columns.join(","),
                    on_delete: (constraint.on_delete
                        != crate::model::OnDeleteAction::NoAction)
                        .then(|| constraint.on_delete.sql().to_string()),
                    on_update: (constraint.on_update
                        != crate::model::OnUpdateAction::NoAction)
                        .then(|| constraint.on_update.sql().to_string()),
                });
                let cs = self.changeset(vec![change]);
                self.fk_add_changes.push(cs);
            }
            ConstraintType::Index => {
                let index = IndexModel {
                    index_name: constraint.name.clone(),
                    table_name: table.to_string(),
                    column_names: constraint.columns.clone(),
                    ..IndexModel::default()
                };
                self.add_index(table, &index)?;
            }
            ConstraintType::Default | ConstraintType::NotNull | ConstraintType::Auto => {}
        }
        Ok(())
    }

    fn drop_constraint(
        &mut self,
        table: &str,
        constraint: &crate::model::ConstraintModel,
    ) -> Result<(), SchemaDiffError> {
        if constraint.name.trim().is_empty() {
            return Err(SchemaDiffError::BlankConstraintName {
                table: table.to_string(),
            });
        }
        match constraint.type_kind {
            ConstraintType::Unique => {
                let change = Change::DropUniqueConstraint(DropUniqueConstraintChange {
                    table_name: table.to_string(),
                    constraint_name: constraint.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.constraint_drop_changes.push(cs);
            }
            ConstraintType::Check => {
                let change = Change::DropCheckConstraint(DropCheckConstraintChange {
                    table_name: table.to_string(),
                    constraint_name: constraint.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.constraint_drop_changes.push(cs);
            }
            ConstraintType::PrimaryKey => {
                let change = Change::DropPrimaryKey(DropPrimaryKeyChange {
                    table_name: table.to_string(),
                    constraint_name: constraint.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.primary_key_changes.push(cs);
            }
            ConstraintType::ForeignKey => {
                let change = Change::DropForeignKeyConstraint(DropForeignKeyConstraintChange {
                    base_table_name: table.to_string(),
                    constraint_name: constraint.name.clone(),
                });
                let cs = self.changeset(vec![change]);
                self.fk_drop_changes.push(cs);
            }
            ConstraintType::Index => {
                let change = Change::DropIndex(DropIndexChange {
                    index_name: constraint.name.clone(),
                    table_name: table.to_string(),
                });
                let cs = self.changeset(vec![change]);
                self.index_drop_changes.push(cs);
            }
            ConstraintType::Default | ConstraintType::NotNull | ConstraintType::Auto => {}
        }
        Ok(())
    }

    fn add_relationship(&mut self, table: &str, rel: &RelationshipModel) {
        if rel.no_constraint {
            return;
        }
        let base_table = if rel.table_name.is_empty() {
            table
        } else {
            &rel.table_name
        };
        let change = Change::AddForeignKeyConstraint(AddForeignKeyConstraintChange {
            constraint_name: self.dialect.relationship_constraint_name(base_table, rel),
            base_table_name: base_table.to_string(),
            base_column_names: rel.columns.join(","),
            referenced_table_name: rel.referenced_table.clone(),
            referenced_column_names: rel.referenced_columns.join(","),
            on_delete: (rel.on_delete != crate::model::OnDeleteAction::NoAction)
                .then(|| rel.on_delete.sql().to_string()),
            on_update: (rel.on_update != crate::model::OnUpdateAction::NoAction)
                .then(|| rel.on_update.sql().to_string()),
        });
        let cs = self.changeset(vec![change]);
        self.fk_add_changes.push(cs);
    }

    fn drop_relationship(&mut self, table: &str, rel: &RelationshipModel) {
        if rel.no_constraint {
            return;
        }
        let base_table = if rel.table_name.is_empty() {
            table
        } else {
            &rel.table_name
        };
        let change = Change::DropForeignKeyConstraint(DropForeignKeyConstraintChange {
            base_table_name: base_table.to_string(),
            constraint_name: self.dialect.relationship_constraint_name(base_table, rel),
        });
        let cs = self.changeset(vec![change]);
        self.fk_drop_changes.push(cs);
    }
}
