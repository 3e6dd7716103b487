//! Relationship diffing within a modified entity
//!
//! Relationships are correlated by (type, normalized FK column list) rather
//! than by constraint name, because auto-generated FK names are unstable
//! across snapshots. Two structurally distinct relationships sharing the
//! same FK columns collapse onto one key; that collision is reported as a
//! warning, not resolved by guessing.

use std::collections::BTreeSet;

use crate::model::{CaseNormalizer, EntityModel, RelationshipModel, RelationshipType};

use super::result::{DiffKind, ModifiedEntity, RelationshipDiff};

/// Correlation key for pairing relationships across snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RelationshipKey {
    type_kind: RelationshipType,
    columns: Vec<String>,
}

impl RelationshipKey {
    fn of(rel: &RelationshipModel, normalizer: CaseNormalizer) -> Self {
        RelationshipKey {
            type_kind: rel.type_kind,
            columns: rel.columns.iter().map(|c| normalizer.normalize(c)).collect(),
        }
    }
}

pub(crate) fn diff<'a>(
    old_entity: &'a EntityModel,
    new_entity: &'a EntityModel,
    normalizer: CaseNormalizer,
    result: &mut ModifiedEntity<'a>,
) {
    let old_map = keyed(old_entity, normalizer, result, "old");
    let new_map = keyed(new_entity, normalizer, result, "new");

    for &(ref key, new_rel) in &new_map {
        match old_map.iter().find(|entry| entry.0 == *key).map(|entry| entry.1) {
            None => result.relationship_diffs.push(RelationshipDiff {
                kind: DiffKind::Added,
                relationship: new_rel,
                old_relationship: None,
                change_detail: None,
                requires_drop_add: false,
            }),
            Some(old_rel) => {
                if !relationship_eq(old_rel, new_rel, normalizer) {
                    let requires_drop_add = structurally_changed(old_rel, new_rel, normalizer);
                    result.relationship_diffs.push(RelationshipDiff {
                        kind: DiffKind::Modified,
                        relationship: new_rel,
                        old_relationship: Some(old_rel),
                        change_detail: Some(change_detail(old_rel, new_rel, normalizer)),
                        requires_drop_add,
                    });
                    analyze_changes(old_rel, new_rel, &mut result.warnings);
                }
            }
        }
    }

    for &(ref key, old_rel) in &old_map {
        if !new_map.iter().any(|entry| entry.0 == *key) {
            result.relationship_diffs.push(RelationshipDiff {
                kind: DiffKind::Dropped,
                relationship: old_rel,
                old_relationship: None,
                change_detail: None,
                requires_drop_add: false,
            });
        }
    }
}

fn keyed<'a>(
    entity: &'a EntityModel,
    normalizer: CaseNormalizer,
    result: &mut ModifiedEntity<'a>,
    side: &str,
) -> Vec<(RelationshipKey, &'a RelationshipModel)> {
    let mut map: Vec<(RelationshipKey, &RelationshipModel)> = Vec::new();
    for rel in &entity.relationships {
        let key = RelationshipKey::of(rel, normalizer);
        if let Some((_, existing)) = map.iter_mut().find(|(k, _)| *k == key) {
            result.warnings.push(format!(
                "Duplicate relationships collapsed by key in {} snapshot of entity {}: \
                 columns [{}]; attribute {} overwrites {}",
                side,
                entity.entity_name,
                rel.columns.join(", "),
                rel.source_attribute.as_deref().unwrap_or("unknown"),
                existing.source_attribute.as_deref().unwrap_or("unknown"),
            ));
            *existing = rel;
        } else {
            map.push((key, rel));
        }
    }
    map
}

fn norm_opt(value: Option<&str>, normalizer: CaseNormalizer) -> Option<String> {
    value.map(|v| normalizer.normalize(v))
}

fn norm_cols(columns: &[String], normalizer: CaseNormalizer) -> Vec<String> {
    columns.iter().map(|c| normalizer.normalize(c)).collect()
}

fn cascade_set(rel: &RelationshipModel) -> BTreeSet<crate::model::CascadeKind> {
    rel.cascade_types.iter().copied().collect()
}

/// Structural fields: anything whose change forces an FK drop + re-add.
fn structurally_changed(
    old_rel: &RelationshipModel,
    new_rel: &RelationshipModel,
    normalizer: CaseNormalizer,
) -> bool {
    normalizer.normalize(&old_rel.table_name) != normalizer.normalize(&new_rel.table_name)
        || norm_cols(&old_rel.columns, normalizer) != norm_cols(&new_rel.columns, normalizer)
        || normalizer.normalize(&old_rel.referenced_table)
            != normalizer.normalize(&new_rel.referenced_table)
        || norm_cols(&old_rel.referenced_columns, normalizer)
            != norm_cols(&new_rel.referenced_columns, normalizer)
        || norm_opt(old_rel.constraint_name.as_deref(), normalizer)
            != norm_opt(new_rel.constraint_name.as_deref(), normalizer)
        || old_rel.on_delete != new_rel.on_delete
        || old_rel.on_update != new_rel.on_update
        || old_rel.no_constraint != new_rel.no_constraint
        || old_rel.maps_id != new_rel.maps_id
}

fn relationship_eq(
    old_rel: &RelationshipModel,
    new_rel: &RelationshipModel,
    normalizer: CaseNormalizer,
) -> bool {
    !structurally_changed(old_rel, new_rel, normalizer)
        && old_rel.type_kind == new_rel.type_kind
        && cascade_set(old_rel) == cascade_set(new_rel)
        && old_rel.orphan_removal == new_rel.orphan_removal
        && old_rel.fetch == new_rel.fetch
}

/// Change detail split into structural (DDL-affecting) and behavioral
/// (runtime-only) sections.
fn change_detail(
    old_rel: &RelationshipModel,
    new_rel: &RelationshipModel,
    normalizer: CaseNormalizer,
) -> String {
    let mut structural = Vec::new();
    let mut behavioral = Vec::new();

    if normalizer.normalize(&old_rel.table_name) != normalizer.normalize(&new_rel.table_name) {
        structural.push(format!(
            "tableName changed from {} to {}",
            old_rel.table_name, new_rel.table_name
        ));
    }
    if norm_cols(&old_rel.columns, normalizer) != norm_cols(&new_rel.columns, normalizer) {
        structural.push(format!(
            "columns changed from [{}] to [{}]",
            old_rel.columns.join(","),
            new_rel.columns.join(",")
        ));
    }
    if normalizer.normalize(&old_rel.referenced_table)
        != normalizer.normalize(&new_rel.referenced_table)
    {
        structural.push(format!(
            "referencedTable changed from {} to {}",
            old_rel.referenced_table, new_rel.referenced_table
        ));
    }
    if norm_cols(&old_rel.referenced_columns, normalizer)
        != norm_cols(&new_rel.referenced_columns, normalizer)
    {
        structural.push(format!(
            "referencedColumns changed from [{}] to [{}]",
            old_rel.referenced_columns.join(","),
            new_rel.referenced_columns.join(",")
        ));
    }
    if norm_opt(old_rel.constraint_name.as_deref(), normalizer)
        != norm_opt(new_rel.constraint_name.as_deref(), normalizer)
    {
        structural.push(format!(
            "constraintName changed from {:?} to {:?}",
            old_rel.constraint_name, new_rel.constraint_name
        ));
    }
    if old_rel.on_delete != new_rel.on_delete {
        structural.push(format!(
            "onDelete changed from {} to {}",
            old_rel.on_delete.sql(),
            new_rel.on_delete.sql()
        ));
    }
    if old_rel.on_update != new_rel.on_update {
        structural.push(format!(
            "onUpdate changed from {} to {}",
            old_rel.on_update.sql(),
            new_rel.on_update.sql()
        ));
    }
    if old_rel.no_constraint != new_rel.no_constraint {
        structural.push(format!(
            "noConstraint changed from {} to {}",
            old_rel.no_constraint, new_rel.no_constraint
        ));
    }
    if old_rel.maps_id != new_rel.maps_id {
        structural.push(format!(
            "mapsId changed from {} to {}",
            old_rel.maps_id, new_rel.maps_id
        ));
    }

    if old_rel.type_kind != new_rel.type_kind {
        behavioral.push(format!(
            "type changed from {:?} to {:?}",
            old_rel.type_kind, new_rel.type_kind
        ));
    }
    if cascade_set(old_rel) != cascade_set(new_rel) {
        behavioral.push(format!(
            "cascadeTypes changed from {:?} to {:?}",
            old_rel.cascade_types, new_rel.cascade_types
        ));
    }
    if old_rel.orphan_removal != new_rel.orphan_removal {
        behavioral.push(format!(
            "orphanRemoval changed from {} to {}",
            old_rel.orphan_removal, new_rel.orphan_removal
        ));
    }
    if old_rel.fetch != new_rel.fetch {
        behavioral.push(format!(
            "fetchType changed from {:?} to {:?}",
            old_rel.fetch, new_rel.fetch
        ));
    }

    let mut detail = String::new();
    if !structural.is_empty() {
        detail.push_str("[STRUCTURAL] ");
        detail.push_str(&structural.join("; "));
    }
    if !behavioral.is_empty() {
        if !detail.is_empty() {
            detail.push_str(" | ");
        }
        detail.push_str("[BEHAVIORAL] ");
        detail.push_str(&behavioral.join("; "));
    }
    detail
}

fn analyze_changes(
    old_rel: &RelationshipModel,
    new_rel: &RelationshipModel,
    warnings: &mut Vec<String>,
) {
    let columns = format!("[{}]", new_rel.columns.join(","));
    if old_rel.on_delete != new_rel.on_delete {
        warnings.push(format!(
            "Foreign key ON DELETE action changed for relationship on columns {} from {} to {}; \
             this affects referential integrity behavior.",
            columns,
            old_rel.on_delete.sql(),
            new_rel.on_delete.sql()
        ));
    }
    if old_rel.on_update != new_rel.on_update {
        warnings.push(format!(
            "Foreign key ON UPDATE action changed for relationship on columns {} from {} to {}; \
             this affects referential integrity behavior.",
            columns,
            old_rel.on_update.sql(),
            new_rel.on_update.sql()
        ));
    }
    if old_rel.no_constraint != new_rel.no_constraint {
        if new_rel.no_constraint {
            warnings.push(format!(
                "Foreign key constraint disabled for relationship on columns {}; referential \
                 integrity will no longer be enforced at database level.",
                columns
            ));
        } else {
            warnings.push(format!(
                "Foreign key constraint enabled for relationship on columns {}; validate existing \
                 data consistency before applying this change.",
                columns
            ));
        }
    }
    if old_rel.maps_id != new_rel.maps_id {
        warnings.push(format!(
            "mapsId changed for relationship on columns {}; foreign key participation in the \
             primary key changes and may require data migration.",
            columns
        ));
    }
    if old_rel.fetch != new_rel.fetch {
        warnings.push(format!(
            "Fetch strategy changed for relationship on columns {} from {:?} to {:?}; may impact \
             query performance.",
            columns, old_rel.fetch, new_rel.fetch
        ));
    }
}
