//! Constraint diffing within a modified entity

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CaseNormalizer, ConstraintModel, EntityModel};
use crate::util::eq_sql_expr;

use super::result::{ConstraintDiff, DiffKind, ModifiedEntity};

/// Constraints are matched **by name** across the two snapshots, not by
/// shape: unmatched-new is ADDED, unmatched-old is DROPPED, and a
/// name-matched pair whose shape differs is MODIFIED.
pub(crate) fn diff<'a>(
    old_entity: &'a EntityModel,
    new_entity: &'a EntityModel,
    normalizer: CaseNormalizer,
    result: &mut ModifiedEntity<'a>,
) {
    let old_by_name = by_name(&old_entity.constraints, normalizer, result, "old");
    let new_by_name = by_name(&new_entity.constraints, normalizer, result, "new");

    for (name, &new_cons) in &new_by_name {
        match old_by_name.get(name) {
            None => result.constraint_diffs.push(ConstraintDiff {
                kind: DiffKind::Added,
                constraint: new_cons,
                old_constraint: None,
                change_detail: None,
            }),
            Some(&old_cons) => {
                let detail = change_detail(old_cons, new_cons, normalizer);
                if !detail.is_empty() {
                    result.constraint_diffs.push(ConstraintDiff {
                        kind: DiffKind::Modified,
                        constraint: new_cons,
                        old_constraint: Some(old_cons),
                        change_detail: Some(detail),
                    });
                }
            }
        }
    }

    for (name, &old_cons) in &old_by_name {
        if !new_by_name.contains_key(name) {
            result.constraint_diffs.push(ConstraintDiff {
                kind: DiffKind::Dropped,
                constraint: old_cons,
                old_constraint: None,
                change_detail: None,
            });
        }
    }
}

fn by_name<'a>(
    constraints: &'a [ConstraintModel],
    normalizer: CaseNormalizer,
    result: &mut ModifiedEntity<'a>,
    side: &str,
) -> BTreeMap<String, &'a ConstraintModel> {
    let mut map = BTreeMap::new();
    for cons in constraints {
        let key = normalizer.normalize(&cons.name);
        if map.insert(key, cons).is_some() {
            result.warnings.push(format!(
                "Duplicate constraint name {} in {} snapshot of table {}; later definition wins",
                cons.name, side, cons.table_name
            ));
        }
    }
    map
}

fn column_set(columns: &[String], normalizer: CaseNormalizer) -> BTreeSet<String> {
    columns.iter().map(|c| normalizer.normalize(c)).collect()
}

fn change_detail(
    old_cons: &ConstraintModel,
    new_cons: &ConstraintModel,
    normalizer: CaseNormalizer,
) -> String {
    let mut changes = Vec::new();
    if old_cons.type_kind != new_cons.type_kind {
        changes.push(format!(
            "type changed from {:?} to {:?}",
            old_cons.type_kind, new_cons.type_kind
        ));
    }
    // Set comparison: column order does not matter for constraints.
    if column_set(&old_cons.columns, normalizer) != column_set(&new_cons.columns, normalizer) {
        changes.push(format!(
            "columns changed from [{}] to [{}]",
            old_cons.columns.join(", "),
            new_cons.columns.join(", ")
        ));
    }
    if !eq_sql_expr(
        old_cons.check_clause.as_deref(),
        new_cons.check_clause.as_deref(),
    ) {
        changes.push("checkClause changed".to_string());
    }
    let old_ref = old_cons
        .referenced_table
        .as_deref()
        .map(|t| normalizer.normalize(t));
    let new_ref = new_cons
        .referenced_table
        .as_deref()
        .map(|t| normalizer.normalize(t));
    if old_ref != new_ref {
        changes.push(format!(
            "referencedTable changed from {:?} to {:?}",
            old_cons.referenced_table, new_cons.referenced_table
        ));
    }
    if column_set(&old_cons.referenced_columns, normalizer)
        != column_set(&new_cons.referenced_columns, normalizer)
    {
        changes.push(format!(
            "referencedColumns changed from [{}] to [{}]",
            old_cons.referenced_columns.join(", "),
            new_cons.referenced_columns.join(", ")
        ));
    }
    if old_cons.on_delete != new_cons.on_delete {
        changes.push(format!(
            "onDelete changed from {} to {}",
            old_cons.on_delete.sql(),
            new_cons.on_delete.sql()
        ));
    }
    if old_cons.on_update != new_cons.on_update {
        changes.push(format!(
            "onUpdate changed from {} to {}",
            old_cons.on_update.sql(),
            new_cons.on_update.sql()
        ));
    }
    if old_cons.options != new_cons.options {
        changes.push(format!(
            "options changed from {:?} to {:?}",
            old_cons.options, new_cons.options
        ));
    }
    changes.join("; ")
}
