//! Changeset generation tests

use pretty_assertions::assert_eq;

use schemadiff::changeset::{Change, ChangeLog, ChangeSetIdGenerator, ChangesetGenerator};
use schemadiff::dialect::resolve_dialect;
use schemadiff::diff::SchemaDiffer;
use schemadiff::model::{ColumnModel, SchemaModel};

use crate::common::*;

fn generate(old: &SchemaModel, new: &SchemaModel) -> ChangeLog {
    let bundle = resolve_dialect("mysql").unwrap();
    let diff = SchemaDiffer::new().diff(old, new);
    ChangesetGenerator::new(&bundle)
        .generate_with_ids(&diff, ChangeSetIdGenerator::with_timestamp("20250101120000"))
        .unwrap()
}

fn change_tags(changelog: &ChangeLog) -> Vec<&'static str> {
    changelog
        .database_change_log
        .iter()
        .flat_map(|wrapper| &wrapper.change_set.changes)
        .map(|change| match change {
            Change::CreateTable(_) => "createTable",
            Change::DropTable(_) => "dropTable",
            Change::RenameTable(_) => "renameTable",
            Change::AddColumn(_) => "addColumn",
            Change::DropColumn(_) => "dropColumn",
            Change::ModifyDataType(_) => "modifyDataType",
            Change::RenameColumn(_) => "renameColumn",
            Change::AddNotNullConstraint(_) => "addNotNullConstraint",
            Change::DropNotNullConstraint(_) => "dropNotNullConstraint",
            Change::AddUniqueConstraint(_) => "addUniqueConstraint",
            Change::DropUniqueConstraint(_) => "dropUniqueConstraint",
            Change::AddCheckConstraint(_) => "addCheckConstraint",
            Change::DropCheckConstraint(_) => "dropCheckConstraint",
            Change::AddForeignKeyConstraint(_) => "addForeignKeyConstraint",
            Change::DropForeignKeyConstraint(_) => "dropForeignKeyConstraint",
            Change::CreateIndex(_) => "createIndex",
            Change::DropIndex(_) => "dropIndex",
            Change::AddPrimaryKey(_) => "addPrimaryKey",
            Change::DropPrimaryKey(_) => "dropPrimaryKey",
            Change::CreateSequence(_) => "createSequence",
            Change::DropSequence(_) => "dropSequence",
            Change::Insert(_) => "insert",
        })
        .collect()
}

#[test]
fn empty_diff_produces_empty_changelog() {
    let snapshot = schema("1", vec![entity("User", "users", vec![])]);
    let changelog = generate(&snapshot, &snapshot);
    assert!(changelog.database_change_log.is_empty());
}

#[test]
fn ids_are_timestamp_plus_sequence() {
    let old = schema("1", vec![]);
    let new = schema(
        "2",
        vec![
            entity("A", "a", vec![pk_column("id", "java.lang.Long")]),
            entity("B", "b", vec![pk_column("id", "java.lang.Long")]),
        ],
    );

    let changelog = generate(&old, &new);
    let ids: Vec<&str> = changelog
        .database_change_log
        .iter()
        .map(|wrapper| wrapper.change_set.id.as_str())
        .collect();
    assert_eq!(ids, vec!["20250101120000-1", "20250101120000-2"]);
    assert!(changelog
        .database_change_log
        .iter()
        .all(|wrapper| wrapper.change_set.author == "auto-generated"));
}

#[test]
fn cross_table_fk_drop_precedes_other_tables_column_drop() {
    // Table `orders` drops an FK; table `users` drops a column. The global
    // bucket order must put the FK drop first even though `users` sorts
    // earlier alphabetically.
    let mut old_orders = entity("Order", "orders", vec![column("user_id", "java.lang.Long")]);
    old_orders
        .relationships
        .push(relationship("orders", &["user_id"], "users", &["id"]));
    let old_users = entity(
        "User",
        "users",
        vec![
            pk_column("id", "java.lang.Long"),
            column("obsolete", "java.lang.String"),
        ],
    );
    let new_orders = entity("Order", "orders", vec![column("user_id", "java.lang.Long")]);
    let new_users = entity("User", "users", vec![pk_column("id", "java.lang.Long")]);

    let old = schema("1", vec![old_orders, old_users]);
    let new = schema("2", vec![new_orders, new_users]);

    let tags = change_tags(&generate(&old, &new));
    let fk_drop = tags.iter().position(|t| *t == "dropForeignKeyConstraint").unwrap();
    let column_drop = tags.iter().position(|t| *t == "dropColumn").unwrap();
    assert!(fk_drop < column_drop, "{tags:?}");
}

#[test]
fn added_table_spreads_into_create_index_and_fk_buckets() {
    let mut orders = entity(
        "Order",
        "orders",
        vec![
            pk_column("id", "java.lang.Long"),
            column("user_id", "java.lang.Long"),
        ],
    );
    orders.indexes.insert(
        "ix_user".to_string(),
        index("ix_user", "orders", &["user_id"], false),
    );
    orders
        .relationships
        .push(relationship("orders", &["user_id"], "users", &["id"]));

    let old = schema("1", vec![]);
    let new = schema("2", vec![orders]);

    let tags = change_tags(&generate(&old, &new));
    assert_eq!(tags, vec!["createTable", "createIndex", "addForeignKeyConstraint"]);
}

#[test]
fn unique_toggle_routes_through_constraint_buckets() {
    let old = schema(
        "1",
        vec![entity(
            "User",
            "users",
            vec![ColumnModel {
                unique: true,
                ..column("email", "java.lang.String")
            }],
        )],
    );
    let new = schema(
        "2",
        vec![entity("User", "users", vec![column("email", "java.lang.String")])],
    );

    let changelog = generate(&old, &new);
    let tags = change_tags(&changelog);
    // The unique flag is the only change, so the changelog is exactly the
    // constraint drop.
    assert_eq!(tags, vec!["dropUniqueConstraint"]);
}

#[test]
fn nullable_tightening_emits_not_null_constraint() {
    let old = schema(
        "1",
        vec![entity("User", "users", vec![column("email", "java.lang.String")])],
    );
    let new = schema(
        "2",
        vec![entity(
            "User",
            "users",
            vec![ColumnModel {
                nullable: false,
                ..column("email", "java.lang.String")
            }],
        )],
    );

    let tags = change_tags(&generate(&old, &new));
    assert_eq!(tags, vec!["addNotNullConstraint"]);
}

#[test]
fn sequences_come_first_in_the_changelog() {
    let mut old = schema("1", vec![entity("User", "users", vec![])]);
    old.sequences
        .insert("seq_users".to_string(), sequence("seq_users", 1, 50));
    let mut new = schema(
        "2",
        vec![entity(
            "User",
            "users",
            vec![column("email", "java.lang.String")],
        )],
    );
    new.sequences
        .insert("seq_users".to_string(), sequence("seq_users", 100, 50));

    let tags = change_tags(&generate(&old, &new));
    assert_eq!(tags[0], "dropSequence");
    assert_eq!(tags[1], "createSequence");
    assert!(tags.contains(&"addColumn"));
}

#[test]
fn changelog_serializes_with_external_tags() {
    let old = schema("1", vec![]);
    let new = schema(
        "2",
        vec![entity("User", "users", vec![pk_column("id", "java.lang.Long")])],
    );

    let yaml = serde_yaml::to_string(&generate(&old, &new)).unwrap();
    assert!(yaml.contains("databaseChangeLog:"), "{yaml}");
    assert!(yaml.contains("changeSet:"), "{yaml}");
    assert!(yaml.contains("createTable:"), "{yaml}");
    assert!(yaml.contains("tableName: users"), "{yaml}");
    assert!(yaml.contains("primaryKey: true"), "{yaml}");
}

#[test]
fn table_generator_changeset_creates_table_and_seed_atomically() {
    let mut old = schema("1", vec![]);
    let mut new = schema("2", vec![]);
    old.table_generators
        .insert("legacy".to_string(), table_generator("legacy", "legacy_gen"));
    new.table_generators
        .insert("orders".to_string(), table_generator("orders", "order_gen"));

    let changelog = generate(&old, &new);
    let tags = change_tags(&changelog);
    // Drop bucket precedes the create bucket; create + seed share one
    // changeset.
    assert_eq!(tags, vec!["dropTable", "createTable", "insert"]);
    let create_set = &changelog.database_change_log[1].change_set;
    assert_eq!(create_set.changes.len(), 2);
}
