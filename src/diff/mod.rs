//! Schema diffing
//!
//! [`SchemaDiffer::diff`] is a pure function of its two snapshot inputs: no
//! I/O, no randomness, and deterministic output order (maps are ordered, so
//! iteration order is stable across runs).

mod columns;
mod constraints;
mod generators;
mod indexes;
mod relationships;
mod result;
mod tables;

pub use result::{
    ColumnDiff, ConstraintDiff, DiffKind, DiffResult, IndexDiff, ModifiedEntity, RelationshipDiff,
    RenamedTable, SequenceDiff, TableChange, TableContentPhase, TableGeneratorDiff, TableOp,
    TablePhase,
};

use log::debug;

use crate::model::{CaseNormalizer, SchemaModel};

/// Computes the structured delta between two schema snapshots.
#[derive(Debug, Default)]
pub struct SchemaDiffer {
    normalizer: CaseNormalizer,
}

impl SchemaDiffer {
    pub fn new() -> Self {
        SchemaDiffer::default()
    }

    pub fn with_normalizer(normalizer: CaseNormalizer) -> Self {
        SchemaDiffer { normalizer }
    }

    /// Diffs `old` against `new`. Both snapshots are read-only for the
    /// lifetime of the returned result.
    pub fn diff<'a>(&self, old: &'a SchemaModel, new: &'a SchemaModel) -> DiffResult<'a> {
        let mut result = DiffResult::default();

        tables::diff(old, new, &mut result);
        self.diff_modified_entities(old, new, &mut result);
        generators::diff_sequences(old, new, &mut result);
        generators::diff_table_generators(old, new, &mut result);

        debug!(
            "diff: {} added, {} dropped, {} modified, {} renamed tables, {} warnings",
            result.added_tables.len(),
            result.dropped_tables.len(),
            result.modified_tables.len(),
            result.renamed_tables.len(),
            result.warnings.len()
        );
        result
    }

    fn diff_modified_entities<'a>(
        &self,
        old: &'a SchemaModel,
        new: &'a SchemaModel,
        result: &mut DiffResult<'a>,
    ) {
        for (name, new_entity) in &new.entities {
            let Some(old_entity) = old.entities.get(name) else {
                continue;
            };
            let mut modified = ModifiedEntity::new(old_entity, new_entity);

            if old_entity.schema != new_entity.schema {
                modified.warnings.push(format!(
                    "Schema changed from {:?} to {:?} for entity {}",
                    old_entity.schema, new_entity.schema, new_entity.entity_name
                ));
            }
            if old_entity.catalog != new_entity.catalog {
                modified.warnings.push(format!(
                    "Catalog changed from {:?} to {:?} for entity {}",
                    old_entity.catalog, new_entity.catalog, new_entity.entity_name
                ));
            }

            columns::diff(old_entity, new_entity, self.normalizer, &mut modified);
            indexes::diff(old_entity, new_entity, self.normalizer, &mut modified);
            constraints::diff(old_entity, new_entity, self.normalizer, &mut modified);
            relationships::diff(old_entity, new_entity, self.normalizer, &mut modified);

            if modified.has_changes() {
                result.warnings.extend(modified.warnings.iter().cloned());
                result.modified_tables.push(modified);
            }
        }
    }
}
