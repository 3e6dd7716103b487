//! Index diffing within a modified entity

use std::collections::BTreeMap;

use crate::model::{CaseNormalizer, EntityModel, IndexModel};
use crate::util::normalize_sql_expr;

use super::result::{DiffKind, IndexDiff, ModifiedEntity};

/// Normalized structural view of an index used for comparison. Column order
/// is preserved; names and the predicate are case/whitespace-folded so
/// cosmetic differences do not register as changes.
struct NormalizedIndex {
    unique: bool,
    columns: Vec<String>,
    where_key: String,
    type_key: String,
}

impl NormalizedIndex {
    fn of(index: &IndexModel, normalizer: CaseNormalizer) -> Self {
        NormalizedIndex {
            unique: index.unique,
            columns: index
                .column_names
                .iter()
                .map(|c| normalizer.normalize(c))
                .collect(),
            where_key: normalize_sql_expr(index.where_clause.as_deref().unwrap_or("")),
            type_key: normalizer.normalize(index.index_type.as_deref().unwrap_or("")),
        }
    }

    fn eq(&self, other: &NormalizedIndex) -> bool {
        self.unique == other.unique
            && self.columns == other.columns
            && self.where_key == other.where_key
            && self.type_key == other.type_key
    }
}

/// Added/dropped indexes by name presence; name-matched pairs compared on
/// the normalized structural key.
pub(crate) fn diff<'a>(
    old_entity: &'a EntityModel,
    new_entity: &'a EntityModel,
    normalizer: CaseNormalizer,
    result: &mut ModifiedEntity<'a>,
) {
    let old_by_name: BTreeMap<String, &IndexModel> = old_entity
        .indexes
        .values()
        .map(|i| (normalizer.normalize(&i.index_name), i))
        .collect();
    let new_by_name: BTreeMap<String, &IndexModel> = new_entity
        .indexes
        .values()
        .map(|i| (normalizer.normalize(&i.index_name), i))
        .collect();

    for (name, &new_index) in &new_by_name {
        match old_by_name.get(name) {
            None => result.index_diffs.push(IndexDiff {
                kind: DiffKind::Added,
                index: new_index,
                old_index: None,
                change_detail: None,
            }),
            Some(&old_index) => {
                let n_old = NormalizedIndex::of(old_index, normalizer);
                let n_new = NormalizedIndex::of(new_index, normalizer);
                if !n_old.eq(&n_new) {
                    result.index_diffs.push(IndexDiff {
                        kind: DiffKind::Modified,
                        index: new_index,
                        old_index: Some(old_index),
                        change_detail: Some(change_detail(old_index, new_index, &n_old, &n_new)),
                    });
                }
            }
        }
    }

    for (name, &old_index) in &old_by_name {
        if !new_by_name.contains_key(name) {
            result.index_diffs.push(IndexDiff {
                kind: DiffKind::Dropped,
                index: old_index,
                old_index: None,
                change_detail: None,
            });
        }
    }
}

fn change_detail(
    old_index: &IndexModel,
    new_index: &IndexModel,
    n_old: &NormalizedIndex,
    n_new: &NormalizedIndex,
) -> String {
    let mut changes = Vec::new();
    if n_old.columns != n_new.columns {
        changes.push(format!(
            "columns changed from [{}] to [{}]",
            old_index.column_names.join(", "),
            new_index.column_names.join(", ")
        ));
    }
    if n_old.unique != n_new.unique {
        changes.push(format!(
            "unique changed from {} to {}",
            n_old.unique, n_new.unique
        ));
    }
    if n_old.where_key != n_new.where_key {
        changes.push("where changed".to_string());
    }
    if n_old.type_key != n_new.type_key {
        changes.push(format!(
            "type changed from {} to {}",
            n_old.type_key, n_new.type_key
        ));
    }
    changes.join("; ")
}
