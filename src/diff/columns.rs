//! Column diffing within a modified entity

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CaseNormalizer, ColumnModel, EntityModel};

use super::result::{ColumnDiff, DiffKind, ModifiedEntity};

/// Added/dropped columns by name presence (under case normalization);
/// present-in-both columns compared on the narrow comparable subset.
/// Renames come only from the explicit `renamed_from` signal.
pub(crate) fn diff<'a>(
    old_entity: &'a EntityModel,
    new_entity: &'a EntityModel,
    normalizer: CaseNormalizer,
    result: &mut ModifiedEntity<'a>,
) {
    let old_by_name: BTreeMap<String, &ColumnModel> = old_entity
        .columns
        .values()
        .map(|c| (normalizer.normalize(&c.column_name), c))
        .collect();
    let new_by_name: BTreeMap<String, &ColumnModel> = new_entity
        .columns
        .values()
        .map(|c| (normalizer.normalize(&c.column_name), c))
        .collect();

    let mut consumed_old: BTreeSet<String> = BTreeSet::new();
    let mut processed_new: BTreeSet<String> = BTreeSet::new();

    // Explicit renames first, so the renamed-away old name is not reported
    // as dropped below.
    for (name, &new_col) in &new_by_name {
        if old_by_name.contains_key(name) {
            continue;
        }
        let Some(from) = new_col.renamed_from.as_deref() else {
            continue;
        };
        let from_key = normalizer.normalize(from);
        if old_by_name.contains_key(&from_key) && !new_by_name.contains_key(&from_key) {
            let old_col = old_by_name[&from_key];
            result.column_diffs.push(ColumnDiff {
                kind: DiffKind::Renamed,
                column: new_col,
                old_column: Some(old_col),
                change_detail: Some(format!(
                    "Column renamed from {} to {}",
                    old_col.column_name, new_col.column_name
                )),
            });
            if !old_col.diff_eq(new_col) {
                result.column_diffs.push(ColumnDiff {
                    kind: DiffKind::Modified,
                    column: new_col,
                    old_column: Some(old_col),
                    change_detail: Some(change_detail(old_col, new_col)),
                });
                analyze_changes(old_col, new_col, &mut result.warnings);
            }
            consumed_old.insert(from_key);
            processed_new.insert(name.clone());
        } else {
            result.warnings.push(format!(
                "Column {} declares renamedFrom={} but no such column was dropped; treating as added",
                new_col.column_name, from
            ));
        }
    }

    for (name, &new_col) in &new_by_name {
        if processed_new.contains(name) {
            continue;
        }
        match old_by_name.get(name) {
            None => result.column_diffs.push(ColumnDiff {
                kind: DiffKind::Added,
                column: new_col,
                old_column: None,
                change_detail: None,
            }),
            Some(&old_col) => {
                consumed_old.insert(name.clone());
                if !old_col.diff_eq(new_col) {
                    result.column_diffs.push(ColumnDiff {
                        kind: DiffKind::Modified,
                        column: new_col,
                        old_column: Some(old_col),
                        change_detail: Some(change_detail(old_col, new_col)),
                    });
                    analyze_changes(old_col, new_col, &mut result.warnings);
                }
            }
        }
    }

    for (name, &old_col) in &old_by_name {
        if !consumed_old.contains(name) {
            result.column_diffs.push(ColumnDiff {
                kind: DiffKind::Dropped,
                column: old_col,
                old_column: None,
                change_detail: None,
            });
        }
    }
}

/// Enumerates the changed comparable fields with old -> new values.
fn change_detail(old_col: &ColumnModel, new_col: &ColumnModel) -> String {
    let mut changes = Vec::new();
    if old_col.java_type != new_col.java_type {
        changes.push(format!(
            "javaType changed from {} to {}",
            old_col.java_type, new_col.java_type
        ));
    }
    if old_col.nullable != new_col.nullable {
        changes.push(format!(
            "nullable changed from {} to {}",
            old_col.nullable, new_col.nullable
        ));
    }
    if old_col.unique != new_col.unique {
        changes.push(format!(
            "unique changed from {} to {}",
            old_col.unique, new_col.unique
        ));
    }
    if old_col.length != new_col.length {
        changes.push(format!(
            "length changed from {} to {}",
            old_col.length, new_col.length
        ));
    }
    changes.join("; ")
}

/// Migration-risk warnings for changes that can bite at apply time.
fn analyze_changes(old_col: &ColumnModel, new_col: &ColumnModel, warnings: &mut Vec<String>) {
    if old_col.nullable && !new_col.nullable {
        warnings.push(format!(
            "Nullable column {} is now NOT NULL; existing null data will violate constraint.",
            new_col.column_name
        ));
    }
    if old_col.length > new_col.length && new_col.length > 0 {
        warnings.push(format!(
            "Dangerous length reduction in column {} from {} to {}; may cause data truncation.",
            new_col.column_name, old_col.length, new_col.length
        ));
    }
    if old_col.java_type != new_col.java_type {
        warnings.push(format!(
            "Type changed in column {} from {} to {}; verify data compatibility.",
            new_col.column_name, old_col.java_type, new_col.java_type
        ));
    }
    if old_col.unique != new_col.unique && new_col.unique {
        warnings.push(format!(
            "Unique constraint added on column {}; verify existing data is distinct.",
            new_col.column_name
        ));
    }
}
