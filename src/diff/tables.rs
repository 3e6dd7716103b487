//! Table-level diffing: added, dropped and explicitly renamed entities

use std::collections::BTreeSet;

use crate::model::SchemaModel;

use super::result::{DiffResult, RenamedTable};

/// Splits entities into added/dropped by key presence and pairs up renames.
///
/// A rename is taken only from the `renamed_from` signal written by the
/// snapshot producer; no similarity matching happens here. A signal that
/// does not point at a dropped entity is reported as a warning and the
/// entity falls back to being added.
pub(crate) fn diff<'a>(old: &'a SchemaModel, new: &'a SchemaModel, result: &mut DiffResult<'a>) {
    let mut old_only: BTreeSet<&str> = old
        .entities
        .keys()
        .filter(|k| !new.entities.contains_key(*k))
        .map(String::as_str)
        .collect();
    let mut new_only: BTreeSet<&str> = new
        .entities
        .keys()
        .filter(|k| !old.entities.contains_key(*k))
        .map(String::as_str)
        .collect();

    let rename_candidates: Vec<&str> = new_only.iter().copied().collect();
    for name in rename_candidates {
        let new_entity = &new.entities[name];
        let Some(from) = new_entity.renamed_from.as_deref() else {
            continue;
        };
        if old_only.contains(from) {
            let old_entity = &old.entities[from];
            result.renamed_tables.push(RenamedTable {
                old_entity,
                new_entity,
                change_detail: format!(
                    "Table renamed from {} to {}",
                    old_entity.table_name, new_entity.table_name
                ),
            });
            old_only.remove(from);
            new_only.remove(name);
        } else {
            result.warnings.push(format!(
                "Entity {} declares renamedFrom={} but no such entity was dropped; treating as added",
                name, from
            ));
        }
    }

    for name in new_only {
        result.added_tables.push(&new.entities[name]);
    }
    for name in old_only {
        result.dropped_tables.push(&old.entities[name]);
    }
}
