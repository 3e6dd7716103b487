//! Contributor builder tests

use pretty_assertions::assert_eq;

use schemadiff::builder::{
    AlterContributor, AlterTableBuilder, CreateTableBuilder, DropContributor, DropTableBuilder,
    PostCreateContributor, TableBodyContributor, TableGeneratorBuilder, TableGeneratorContributor,
};
use schemadiff::dialect::{Dialect, MySqlDialect};
use schemadiff::model::ColumnModel;

use crate::common::*;

#[test]
fn alter_builder_sorts_by_priority_not_insertion_order() {
    let dialect = MySqlDialect::new();
    let added = column("nickname", "java.lang.String");
    let dropped = column("obsolete", "java.lang.String");
    let idx = index("ix_obsolete", "users", &["obsolete"], false);

    // Deliberately inserted in reverse priority order.
    let mut builder = AlterTableBuilder::new("users", &dialect);
    builder.add(AlterContributor::ColumnAdd(&added));
    builder.add(AlterContributor::ColumnDrop(&dropped));
    builder.add(AlterContributor::IndexDrop(&idx));

    let sql = builder.build().unwrap();
    let drop_index_pos = sql.find("DROP INDEX `ix_obsolete`").unwrap();
    let drop_column_pos = sql.find("DROP COLUMN `obsolete`").unwrap();
    let add_column_pos = sql.find("ADD COLUMN `nickname`").unwrap();
    assert!(drop_index_pos < drop_column_pos);
    assert!(drop_column_pos < add_column_pos);
}

#[test]
fn primary_key_drop_precedes_rename_and_re_add() {
    let dialect = MySqlDialect::new();
    let old = pk_column("uid", "java.lang.Long");
    let new = pk_column("id", "java.lang.Long");
    let current = vec![&new];

    let mut builder = AlterTableBuilder::new("users", &dialect);
    builder.add(AlterContributor::PrimaryKeyAdd {
        pk_columns: vec!["id".to_string()],
    });
    builder.add(AlterContributor::ColumnRename {
        new: &new,
        old: &old,
    });
    builder.add(AlterContributor::PrimaryKeyComplexDrop {
        current_columns: current,
    });

    let sql = builder.build().unwrap();
    let drop_pk = sql.find("DROP PRIMARY KEY").unwrap();
    let rename = sql.find("RENAME COLUMN `uid` TO `id`").unwrap();
    let add_pk = sql.find("ADD PRIMARY KEY (`id`)").unwrap();
    assert!(drop_pk < rename);
    assert!(rename < add_pk);
}

#[test]
fn empty_alter_builder_renders_nothing() {
    let dialect = MySqlDialect::new();
    let mut builder = AlterTableBuilder::new("users", &dialect);
    assert!(builder.is_empty());
    assert_eq!(builder.build().unwrap(), "");
}

#[test]
fn create_builder_trims_trailing_separator() {
    let dialect = MySqlDialect::new();
    let id = pk_column("id", "java.lang.Long");
    let columns: Vec<&ColumnModel> = vec![&id];

    let mut builder = CreateTableBuilder::new("users", &dialect);
    builder.add_body(TableBodyContributor::Columns {
        pk_columns: vec!["id".to_string()],
        columns,
    });

    let sql = builder.build().unwrap();
    assert!(
        sql.contains("PRIMARY KEY (`id`)\n) ENGINE=InnoDB"),
        "trailing separator not trimmed: {sql}"
    );
}

#[test]
fn create_builder_orders_body_before_post_statements() {
    let dialect = MySqlDialect::new();
    let id = pk_column("id", "java.lang.Long");
    let columns: Vec<&ColumnModel> = vec![&id];
    let cons = unique_constraint("uk_email", "users", &["email"]);
    let idx = index("ix_name", "users", &["name"], false);

    let mut builder = CreateTableBuilder::new("users", &dialect);
    builder.add_post(PostCreateContributor::Index(&idx));
    builder.add_body(TableBodyContributor::Constraint(&cons));
    builder.add_body(TableBodyContributor::Columns {
        pk_columns: vec![],
        columns,
    });

    let sql = builder.build().unwrap();
    let column_pos = sql.find("`id` BIGINT").unwrap();
    let constraint_pos = sql.find("CONSTRAINT `uk_email` UNIQUE").unwrap();
    let close_pos = sql.find("ENGINE=InnoDB").unwrap();
    let index_pos = sql.find("CREATE INDEX `ix_name`").unwrap();
    assert!(column_pos < constraint_pos);
    assert!(constraint_pos < close_pos);
    assert!(close_pos < index_pos);
}

#[test]
fn drop_builder_renders_each_table() {
    let dialect = MySqlDialect::new();
    let mut builder = DropTableBuilder::new(&dialect);
    builder.add(DropContributor::TableDrop("orders"));
    builder.add(DropContributor::TableDrop("users"));

    let sql = builder.build().unwrap();
    assert_eq!(
        sql,
        "DROP TABLE IF EXISTS `orders`;\nDROP TABLE IF EXISTS `users`;"
    );
}

#[test]
fn generator_builder_drops_before_adds() {
    let dialect = MySqlDialect::new();
    let old_tg = table_generator("old_ids", "old_gen");
    let new_tg = table_generator("new_ids", "new_gen");

    let mut builder = TableGeneratorBuilder::new(dialect.table_generators().unwrap());
    builder.add(TableGeneratorContributor::Add(&new_tg));
    builder.add(TableGeneratorContributor::Drop(&old_tg));

    let sql = builder.build().unwrap();
    let drop_pos = sql.find("DROP TABLE IF EXISTS `old_gen`").unwrap();
    let create_pos = sql.find("CREATE TABLE IF NOT EXISTS `new_gen`").unwrap();
    assert!(drop_pos < create_pos);
}
