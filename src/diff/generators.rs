//! Sequence and table-generator diffing, matched by generator name

use crate::model::{SchemaModel, SequenceModel, TableGeneratorModel};

use super::result::{DiffKind, DiffResult, SequenceDiff, TableGeneratorDiff};

pub(crate) fn diff_sequences<'a>(
    old: &'a SchemaModel,
    new: &'a SchemaModel,
    result: &mut DiffResult<'a>,
) {
    for (name, seq) in &new.sequences {
        match old.sequences.get(name) {
            None => result.sequence_diffs.push(SequenceDiff::added(seq)),
            Some(old_seq) => {
                if !sequence_eq(old_seq, seq) {
                    result.sequence_diffs.push(SequenceDiff {
                        kind: DiffKind::Modified,
                        sequence: seq,
                        old_sequence: Some(old_seq),
                        change_detail: Some(sequence_change_detail(old_seq, seq)),
                    });
                }
            }
        }
    }
    for (name, seq) in &old.sequences {
        if !new.sequences.contains_key(name) {
            result.sequence_diffs.push(SequenceDiff::dropped(seq));
        }
    }
}

pub(crate) fn diff_table_generators<'a>(
    old: &'a SchemaModel,
    new: &'a SchemaModel,
    result: &mut DiffResult<'a>,
) {
    for (name, tg) in &new.table_generators {
        match old.table_generators.get(name) {
            None => result
                .table_generator_diffs
                .push(TableGeneratorDiff::added(tg)),
            Some(old_tg) => {
                if !table_generator_eq(old_tg, tg) {
                    result.table_generator_diffs.push(TableGeneratorDiff {
                        kind: DiffKind::Modified,
                        table_generator: tg,
                        old_table_generator: Some(old_tg),
                        change_detail: Some(table_generator_change_detail(old_tg, tg)),
                    });
                }
            }
        }
    }
    for (name, tg) in &old.table_generators {
        if !new.table_generators.contains_key(name) {
            result
                .table_generator_diffs
                .push(TableGeneratorDiff::dropped(tg));
        }
    }
}

fn sequence_eq(old_seq: &SequenceModel, new_seq: &SequenceModel) -> bool {
    old_seq.initial_value == new_seq.initial_value
        && old_seq.allocation_size == new_seq.allocation_size
        && old_seq.cache == new_seq.cache
        && old_seq.min_value == new_seq.min_value
        && old_seq.max_value == new_seq.max_value
        && old_seq.schema == new_seq.schema
        && old_seq.catalog == new_seq.catalog
}

fn sequence_change_detail(old_seq: &SequenceModel, new_seq: &SequenceModel) -> String {
    let mut changes = Vec::new();
    if old_seq.initial_value != new_seq.initial_value {
        changes.push(format!(
            "initialValue changed from {} to {}",
            old_seq.initial_value, new_seq.initial_value
        ));
    }
    if old_seq.allocation_size != new_seq.allocation_size {
        changes.push(format!(
            "allocationSize changed from {} to {}",
            old_seq.allocation_size, new_seq.allocation_size
        ));
    }
    if old_seq.cache != new_seq.cache {
        changes.push(format!(
            "cache changed from {} to {}",
            old_seq.cache, new_seq.cache
        ));
    }
    if old_seq.min_value != new_seq.min_value {
        changes.push(format!(
            "minValue changed from {} to {}",
            old_seq.min_value, new_seq.min_value
        ));
    }
    if old_seq.max_value != new_seq.max_value {
        changes.push(format!(
            "maxValue changed from {} to {}",
            old_seq.max_value, new_seq.max_value
        ));
    }
    if old_seq.schema != new_seq.schema {
        changes.push(format!(
            "schema changed from {:?} to {:?}",
            old_seq.schema, new_seq.schema
        ));
    }
    if old_seq.catalog != new_seq.catalog {
        changes.push(format!(
            "catalog changed from {:?} to {:?}",
            old_seq.catalog, new_seq.catalog
        ));
    }
    changes.join("; ")
}

fn table_generator_eq(old_tg: &TableGeneratorModel, new_tg: &TableGeneratorModel) -> bool {
    old_tg.table == new_tg.table
        && old_tg.schema == new_tg.schema
        && old_tg.catalog == new_tg.catalog
        && old_tg.pk_column_name == new_tg.pk_column_name
        && old_tg.value_column_name == new_tg.value_column_name
        && old_tg.pk_column_value == new_tg.pk_column_value
        && old_tg.initial_value == new_tg.initial_value
        && old_tg.allocation_size == new_tg.allocation_size
}

fn table_generator_change_detail(
    old_tg: &TableGeneratorModel,
    new_tg: &TableGeneratorModel,
) -> String {
    let mut changes = Vec::new();
    if old_tg.table != new_tg.table {
        changes.push(format!(
            "table changed from {} to {}",
            old_tg.table, new_tg.table
        ));
    }
    if old_tg.pk_column_name != new_tg.pk_column_name {
        changes.push(format!(
            "pkColumnName changed from {} to {}",
            old_tg.pk_column_name, new_tg.pk_column_name
        ));
    }
    if old_tg.value_column_name != new_tg.value_column_name {
        changes.push(format!(
            "valueColumnName changed from {} to {}",
            old_tg.value_column_name, new_tg.value_column_name
        ));
    }
    if old_tg.pk_column_value != new_tg.pk_column_value {
        changes.push(format!(
            "pkColumnValue changed from {} to {}",
            old_tg.pk_column_value, new_tg.pk_column_value
        ));
    }
    if old_tg.initial_value != new_tg.initial_value {
        changes.push(format!(
            "initialValue changed from {} to {}",
            old_tg.initial_value, new_tg.initial_value
        ));
    }
    if old_tg.allocation_size != new_tg.allocation_size {
        changes.push(format!(
            "allocationSize changed from {} to {}",
            old_tg.allocation_size, new_tg.allocation_size
        ));
    }
    if old_tg.schema != new_tg.schema {
        changes.push(format!(
            "schema changed from {:?} to {:?}",
            old_tg.schema, new_tg.schema
        ));
    }
    if old_tg.catalog != new_tg.catalog {
        changes.push(format!(
            "catalog changed from {:?} to {:?}",
            old_tg.catalog, new_tg.catalog
        ));
    }
    changes.join("; ")
}
