//! Diff result types and the ordered-application protocol
//!
//! The diff output is not a flat list: consumers traverse it through a fixed
//! phase protocol. Per modified table the phases are DROP, then ALTER, then FK_ADD;
//! at the table level the order is DROPPED, then RENAMED, then ADDED. Violating the
//! order produces migrations that dangle references, so the traversal lives
//! here, next to the data, and consumers match exhaustively on the returned
//! [`TableChange`] values.
//!
//! All diff entries borrow from the two snapshots handed to the differ;
//! snapshots are read-only for the lifetime of the result and are never
//! cloned into it.

use crate::model::{
    ColumnModel, ConstraintModel, ConstraintType, EntityModel, IndexModel, RelationshipModel,
    SequenceModel, TableGeneratorModel,
};

/// Structured delta between two schema snapshots.
#[derive(Debug, Default)]
pub struct DiffResult<'a> {
    pub added_tables: Vec<&'a EntityModel>,
    pub dropped_tables: Vec<&'a EntityModel>,
    pub modified_tables: Vec<ModifiedEntity<'a>>,
    pub renamed_tables: Vec<RenamedTable<'a>>,
    pub sequence_diffs: Vec<SequenceDiff<'a>>,
    pub table_generator_diffs: Vec<TableGeneratorDiff<'a>>,
    pub warnings: Vec<String>,
}

impl<'a> DiffResult<'a> {
    /// True when the diff carries no schema change at all.
    pub fn is_empty(&self) -> bool {
        self.added_tables.is_empty()
            && self.dropped_tables.is_empty()
            && self.modified_tables.is_empty()
            && self.renamed_tables.is_empty()
            && self.sequence_diffs.is_empty()
            && self.table_generator_diffs.is_empty()
    }

    /// Table-level operations of one phase. Phases must be applied DROPPED,
    /// then RENAMED, then ADDED so a rename target never collides with a table that
    /// is about to be created.
    pub fn tables_for_phase(&self, phase: TablePhase) -> Vec<TableOp<'_>> {
        match phase {
            TablePhase::Dropped => self
                .dropped_tables
                .iter()
                .map(|&entity| TableOp::Dropped(entity))
                .collect(),
            TablePhase::Renamed => self.renamed_tables.iter().map(TableOp::Renamed).collect(),
            TablePhase::Added => self
                .added_tables
                .iter()
                .map(|&entity| TableOp::Added(entity))
                .collect(),
        }
    }
}

/// One table-level operation yielded by the table phase traversal.
#[derive(Debug)]
pub enum TableOp<'s> {
    Dropped(&'s EntityModel),
    Renamed(&'s RenamedTable<'s>),
    Added(&'s EntityModel),
}

/// Table-level traversal phases, applied in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    Dropped,
    Renamed,
    Added,
}

/// Per-table content phases, applied in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableContentPhase {
    Drop,
    Alter,
    FkAdd,
}

/// An entity present in both snapshots with at least one detected change.
#[derive(Debug)]
pub struct ModifiedEntity<'a> {
    pub old_entity: &'a EntityModel,
    pub new_entity: &'a EntityModel,
    pub column_diffs: Vec<ColumnDiff<'a>>,
    pub index_diffs: Vec<IndexDiff<'a>>,
    pub constraint_diffs: Vec<ConstraintDiff<'a>>,
    pub relationship_diffs: Vec<RelationshipDiff<'a>>,
    pub warnings: Vec<String>,
}

impl<'a> ModifiedEntity<'a> {
    pub fn new(old_entity: &'a EntityModel, new_entity: &'a EntityModel) -> Self {
        ModifiedEntity {
            old_entity,
            new_entity,
            column_diffs: Vec::new(),
            index_diffs: Vec::new(),
            constraint_diffs: Vec::new(),
            relationship_diffs: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.column_diffs.is_empty()
            || !self.index_diffs.is_empty()
            || !self.constraint_diffs.is_empty()
            || !self.relationship_diffs.is_empty()
            || !self.warnings.is_empty()
    }

    /// The ordered changes of one content phase.
    ///
    /// DROP phase: relationships whose FK goes away first, then secondary
    /// indexes and constraints, then dropped columns, then column renames
    /// (after constraint removal so a renamed PK participant cannot violate
    /// an in-flight FK). ALTER phase: column adds/modifies, then index and
    /// non-FK constraint adds. FK_ADD phase: relationship adds, last, so
    /// target columns and tables already exist.
    pub fn changes_for_phase(&self, phase: TableContentPhase) -> Vec<TableChange<'a>> {
        let mut changes = Vec::new();
        match phase {
            TableContentPhase::Drop => {
                for diff in &self.relationship_diffs {
                    match diff.kind {
                        DiffKind::Dropped => {
                            changes.push(TableChange::DropRelationship(diff.relationship))
                        }
                        DiffKind::Modified => {
                            if let Some(old) = diff.old_relationship {
                                changes.push(TableChange::DropRelationship(old));
                            }
                        }
                        _ => {}
                    }
                }
                for diff in &self.index_diffs {
                    match diff.kind {
                        DiffKind::Dropped => changes.push(TableChange::DropIndex(diff.index)),
                        DiffKind::Modified => {
                            if let Some(old) = diff.old_index {
                                changes.push(TableChange::DropIndex(old));
                            }
                        }
                        _ => {}
                    }
                }
                for diff in &self.constraint_diffs {
                    match diff.kind {
                        DiffKind::Dropped => {
                            changes.push(TableChange::DropConstraint(diff.constraint))
                        }
                        DiffKind::Modified => {
                            if let Some(old) = diff.old_constraint {
                                changes.push(TableChange::DropConstraint(old));
                            }
                        }
                        _ => {}
                    }
                }
                for diff in &self.column_diffs {
                    if diff.kind == DiffKind::Dropped {
                        changes.push(TableChange::DropColumn(diff.column));
                    }
                }
                for diff in &self.column_diffs {
                    if diff.kind == DiffKind::Renamed {
                        if let Some(old) = diff.old_column {
                            changes.push(TableChange::RenameColumn {
                                new: diff.column,
                                old,
                            });
                        }
                    }
                }
            }
            TableContentPhase::Alter => {
                for diff in &self.column_diffs {
                    match diff.kind {
                        DiffKind::Added => changes.push(TableChange::AddColumn(diff.column)),
                        DiffKind::Modified => {
                            if let Some(old) = diff.old_column {
                                changes.push(TableChange::ModifyColumn {
                                    new: diff.column,
                                    old,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                for diff in &self.index_diffs {
                    match diff.kind {
                        DiffKind::Added | DiffKind::Modified => {
                            changes.push(TableChange::AddIndex(diff.index))
                        }
                        _ => {}
                    }
                }
                for diff in &self.constraint_diffs {
                    if diff.constraint.type_kind == ConstraintType::ForeignKey {
                        continue;
                    }
                    match diff.kind {
                        DiffKind::Added | DiffKind::Modified => {
                            changes.push(TableChange::AddConstraint(diff.constraint))
                        }
                        _ => {}
                    }
                }
            }
            TableContentPhase::FkAdd => {
                for diff in &self.relationship_diffs {
                    match diff.kind {
                        DiffKind::Added | DiffKind::Modified => {
                            changes.push(TableChange::AddRelationship(diff.relationship))
                        }
                        _ => {}
                    }
                }
                for diff in &self.constraint_diffs {
                    if diff.constraint.type_kind != ConstraintType::ForeignKey {
                        continue;
                    }
                    match diff.kind {
                        DiffKind::Added | DiffKind::Modified => {
                            changes.push(TableChange::AddConstraint(diff.constraint))
                        }
                        _ => {}
                    }
                }
            }
        }
        changes
    }
}

/// One atomic change yielded by the phase traversal.
#[derive(Debug)]
pub enum TableChange<'a> {
    DropRelationship(&'a RelationshipModel),
    DropIndex(&'a IndexModel),
    DropConstraint(&'a ConstraintModel),
    DropColumn(&'a ColumnModel),
    RenameColumn {
        new: &'a ColumnModel,
        old: &'a ColumnModel,
    },
    AddColumn(&'a ColumnModel),
    ModifyColumn {
        new: &'a ColumnModel,
        old: &'a ColumnModel,
    },
    AddIndex(&'a IndexModel),
    AddConstraint(&'a ConstraintModel),
    AddRelationship(&'a RelationshipModel),
}

/// A table rename explicitly signaled by the upstream snapshot producer.
#[derive(Debug)]
pub struct RenamedTable<'a> {
    pub old_entity: &'a EntityModel,
    pub new_entity: &'a EntityModel,
    pub change_detail: String,
}

/// Change category shared by all per-component diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Dropped,
    Modified,
    Renamed,
}

#[derive(Debug)]
pub struct ColumnDiff<'a> {
    pub kind: DiffKind,
    pub column: &'a ColumnModel,
    pub old_column: Option<&'a ColumnModel>,
    pub change_detail: Option<String>,
}

#[derive(Debug)]
pub struct IndexDiff<'a> {
    pub kind: DiffKind,
    pub index: &'a IndexModel,
    pub old_index: Option<&'a IndexModel>,
    pub change_detail: Option<String>,
}

#[derive(Debug)]
pub struct ConstraintDiff<'a> {
    pub kind: DiffKind,
    pub constraint: &'a ConstraintModel,
    pub old_constraint: Option<&'a ConstraintModel>,
    pub change_detail: Option<String>,
}

#[derive(Debug)]
pub struct RelationshipDiff<'a> {
    pub kind: DiffKind,
    pub relationship: &'a RelationshipModel,
    pub old_relationship: Option<&'a RelationshipModel>,
    pub change_detail: Option<String>,
    /// Structural change that must be applied as FK drop + re-add.
    pub requires_drop_add: bool,
}

#[derive(Debug)]
pub struct SequenceDiff<'a> {
    pub kind: DiffKind,
    pub sequence: &'a SequenceModel,
    pub old_sequence: Option<&'a SequenceModel>,
    pub change_detail: Option<String>,
}

impl<'a> SequenceDiff<'a> {
    pub fn added(sequence: &'a SequenceModel) -> Self {
        SequenceDiff {
            kind: DiffKind::Added,
            sequence,
            old_sequence: None,
            change_detail: None,
        }
    }

    pub fn dropped(sequence: &'a SequenceModel) -> Self {
        SequenceDiff {
            kind: DiffKind::Dropped,
            sequence,
            old_sequence: None,
            change_detail: None,
        }
    }
}

#[derive(Debug)]
pub struct TableGeneratorDiff<'a> {
    pub kind: DiffKind,
    pub table_generator: &'a TableGeneratorModel,
    pub old_table_generator: Option<&'a TableGeneratorModel>,
    pub change_detail: Option<String>,
}

impl<'a> TableGeneratorDiff<'a> {
    pub fn added(table_generator: &'a TableGeneratorModel) -> Self {
        TableGeneratorDiff {
            kind: DiffKind::Added,
            table_generator,
            old_table_generator: None,
            change_detail: None,
        }
    }

    pub fn dropped(table_generator: &'a TableGeneratorModel) -> Self {
        TableGeneratorDiff {
            kind: DiffKind::Dropped,
            table_generator,
            old_table_generator: None,
            change_detail: None,
        }
    }
}
