//! Ordered-application protocol tests

use schemadiff::diff::{SchemaDiffer, TableChange, TableContentPhase};
use schemadiff::model::{ColumnModel, ConstraintModel, ConstraintType};

use crate::common::*;

/// A modified entity exercising every diff category at once: a dropped
/// relationship, a dropped index, a dropped constraint, a dropped column,
/// a signaled rename, an added column and an added relationship.
fn busy_schemas() -> (schemadiff::model::SchemaModel, schemadiff::model::SchemaModel) {
    let mut old_entity = entity(
        "User",
        "users",
        vec![
            column("obsolete", "java.lang.String"),
            column("mail", "java.lang.String"),
        ],
    );
    old_entity.indexes.insert(
        "ix_obsolete".to_string(),
        index("ix_obsolete", "users", &["obsolete"], false),
    );
    old_entity
        .constraints
        .push(check_constraint("ck_age", "users", "age >= 18"));
    old_entity
        .relationships
        .push(relationship("users", &["team_id"], "teams", &["id"]));

    let mut new_entity = entity(
        "User",
        "users",
        vec![
            ColumnModel {
                renamed_from: Some("mail".to_string()),
                ..column("email", "java.lang.String")
            },
            column("created_at", "java.time.LocalDateTime"),
        ],
    );
    new_entity
        .relationships
        .push(relationship("users", &["org_id"], "orgs", &["id"]));

    (schema("1", vec![old_entity]), schema("2", vec![new_entity]))
}

#[test]
fn drop_phase_orders_relationships_before_columns_before_renames() {
    let (old, new) = busy_schemas();
    let diff = SchemaDiffer::new().diff(&old, &new);
    let modified = &diff.modified_tables[0];

    let changes = modified.changes_for_phase(TableContentPhase::Drop);
    let positions: Vec<&'static str> = changes
        .iter()
        .map(|c| match c {
            TableChange::DropRelationship(_) => "rel",
            TableChange::DropIndex(_) => "index",
            TableChange::DropConstraint(_) => "constraint",
            TableChange::DropColumn(_) => "column",
            TableChange::RenameColumn { .. } => "rename",
            _ => panic!("unexpected change in DROP phase: {:?}", c),
        })
        .collect();

    assert_eq!(positions, vec!["rel", "index", "constraint", "column", "rename"]);
}

#[test]
fn alter_phase_contains_only_constructive_non_fk_changes() {
    let (old, new) = busy_schemas();
    let diff = SchemaDiffer::new().diff(&old, &new);
    let modified = &diff.modified_tables[0];

    for change in modified.changes_for_phase(TableContentPhase::Alter) {
        match change {
            TableChange::AddColumn(_)
            | TableChange::ModifyColumn { .. }
            | TableChange::AddIndex(_)
            | TableChange::AddConstraint(_) => {}
            other => panic!("unexpected change in ALTER phase: {:?}", other),
        }
    }
}

#[test]
fn fk_add_phase_contains_only_relationship_additions() {
    let (old, new) = busy_schemas();
    let diff = SchemaDiffer::new().diff(&old, &new);
    let modified = &diff.modified_tables[0];

    let changes = modified.changes_for_phase(TableContentPhase::FkAdd);
    assert_eq!(changes.len(), 1);
    assert!(matches!(changes[0], TableChange::AddRelationship(rel) if rel.columns == ["org_id"]));
}

#[test]
fn modified_index_drops_old_and_adds_new_across_phases() {
    let mut old_entity = entity("User", "users", vec![]);
    old_entity.indexes.insert(
        "ix_email".to_string(),
        index("ix_email", "users", &["email"], false),
    );
    let mut new_entity = entity("User", "users", vec![]);
    new_entity.indexes.insert(
        "ix_email".to_string(),
        index("ix_email", "users", &["email"], true),
    );
    let old = schema("1", vec![old_entity]);
    let new = schema("2", vec![new_entity]);

    let diff = SchemaDiffer::new().diff(&old, &new);
    let modified = &diff.modified_tables[0];

    let drops = modified.changes_for_phase(TableContentPhase::Drop);
    assert!(
        matches!(&drops[..], [TableChange::DropIndex(old_index)] if !old_index.unique),
        "DROP phase must drop the old index shape"
    );

    let alters = modified.changes_for_phase(TableContentPhase::Alter);
    assert!(
        matches!(&alters[..], [TableChange::AddIndex(new_index)] if new_index.unique),
        "ALTER phase must add the new index shape"
    );
}

#[test]
fn fk_constraints_route_to_fk_add_phase() {
    let fk = ConstraintModel {
        name: "fk_users_team".to_string(),
        table_name: "users".to_string(),
        type_kind: ConstraintType::ForeignKey,
        columns: vec!["team_id".to_string()],
        referenced_table: Some("teams".to_string()),
        referenced_columns: vec!["id".to_string()],
        ..ConstraintModel::default()
    };
    let mut new_entity = entity("User", "users", vec![]);
    new_entity.constraints.push(fk);
    let old = schema("1", vec![entity("User", "users", vec![])]);
    let new = schema("2", vec![new_entity]);

    let diff = SchemaDiffer::new().diff(&old, &new);
    let modified = &diff.modified_tables[0];

    assert!(modified.changes_for_phase(TableContentPhase::Alter).is_empty());
    let fk_adds = modified.changes_for_phase(TableContentPhase::FkAdd);
    assert!(matches!(&fk_adds[..], [TableChange::AddConstraint(c)] if c.name == "fk_users_team"));
}

#[test]
fn modified_relationship_is_dropped_then_re_added() {
    let mut old_rel = relationship("users", &["team_id"], "teams", &["id"]);
    old_rel.constraint_name = Some("fk_a".to_string());
    let mut new_rel = relationship("users", &["team_id"], "teams", &["id"]);
    new_rel.constraint_name = Some("fk_b".to_string());

    let mut old_entity = entity("User", "users", vec![]);
    old_entity.relationships.push(old_rel);
    let mut new_entity = entity("User", "users", vec![]);
    new_entity.relationships.push(new_rel);
    let old = schema("1", vec![old_entity]);
    let new = schema("2", vec![new_entity]);

    let diff = SchemaDiffer::new().diff(&old, &new);
    let modified = &diff.modified_tables[0];

    let drops = modified.changes_for_phase(TableContentPhase::Drop);
    assert!(matches!(&drops[..], [TableChange::DropRelationship(rel)]
        if rel.constraint_name.as_deref() == Some("fk_a")));

    let adds = modified.changes_for_phase(TableContentPhase::FkAdd);
    assert!(matches!(&adds[..], [TableChange::AddRelationship(rel)]
        if rel.constraint_name.as_deref() == Some("fk_b")));
}
