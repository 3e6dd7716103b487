//! Dialect registry and MySQL clause generation tests

use pretty_assertions::assert_eq;

use schemadiff::dialect::{resolve_dialect, Dialect, MySqlDialect};
use schemadiff::error::SchemaDiffError;
use schemadiff::model::{
    ColumnModel, ConstraintModel, ConstraintType, GenerationStrategy, OnDeleteAction,
    TemporalKind,
};

use crate::common::*;

// ============================================================================
// Registry
// ============================================================================

#[test]
fn mysql_token_resolves() {
    let bundle = resolve_dialect("mysql").unwrap();
    assert_eq!(bundle.database_type().to_string(), "mysql");
}

#[test]
fn dialect_token_is_case_insensitive() {
    assert!(resolve_dialect("MySQL").is_ok());
}

#[test]
fn unknown_token_fails_with_unsupported_dialect() {
    let err = resolve_dialect("oracle").unwrap_err();
    assert!(matches!(err, SchemaDiffError::UnsupportedDialect { .. }));
    assert_eq!(err.to_string(), "Unsupported dialect: oracle");
}

// ============================================================================
// Column definitions
// ============================================================================

#[test]
fn identity_column_definition() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        generation: GenerationStrategy::Identity,
        ..pk_column("id", "java.lang.Long")
    };
    assert_eq!(dialect.column_definition_sql(&col), "`id` BIGINT NOT NULL AUTO_INCREMENT");
}

#[test]
fn varchar_length_and_default() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        length: 100,
        nullable: false,
        default_value: Some("none".to_string()),
        ..column("email", "java.lang.String")
    };
    assert_eq!(
        dialect.column_definition_sql(&col),
        "`email` VARCHAR(100) NOT NULL DEFAULT 'none'"
    );
}

#[test]
fn string_enum_renders_enum_type() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        enum_string_mapping: true,
        enum_values: vec!["ACTIVE".to_string(), "LOCKED".to_string()],
        ..column("status", "java.lang.String")
    };
    assert_eq!(
        dialect.column_definition_sql(&col),
        "`status` ENUM('ACTIVE','LOCKED')"
    );
}

#[test]
fn ordinal_enum_renders_int() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        enum_values: vec!["ACTIVE".to_string(), "LOCKED".to_string()],
        ..column("status", "java.lang.String")
    };
    assert_eq!(dialect.column_definition_sql(&col), "`status` INT");
}

#[test]
fn lob_and_temporal_types() {
    let dialect = MySqlDialect::new();
    let lob = ColumnModel {
        lob: true,
        ..column("body", "java.lang.String")
    };
    assert_eq!(dialect.column_definition_sql(&lob), "`body` TEXT");

    let stamp = ColumnModel {
        temporal: Some(TemporalKind::Timestamp),
        ..column("created", "java.util.Date")
    };
    assert_eq!(dialect.column_definition_sql(&stamp), "`created` DATETIME");
}

#[test]
fn sql_type_override_wins_and_suppresses_duplicates() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        sql_type_override: Some("BIGINT UNSIGNED NOT NULL AUTO_INCREMENT".to_string()),
        generation: GenerationStrategy::Identity,
        nullable: false,
        ..column("id", "java.lang.Long")
    };
    // NOT NULL and AUTO_INCREMENT already live in the override.
    assert_eq!(
        dialect.column_definition_sql(&col),
        "`id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT"
    );
}

#[test]
fn uuid_generation_defaults_to_uuid_function() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        generation: GenerationStrategy::Uuid,
        ..column("id", "java.util.UUID")
    };
    assert_eq!(
        dialect.column_definition_sql(&col),
        "`id` CHAR(36) DEFAULT UUID()"
    );
}

// ============================================================================
// CREATE TABLE and composite keys
// ============================================================================

#[test]
fn create_table_reorders_identity_first_in_composite_pk() {
    let dialect = MySqlDialect::new();
    // Column order puts `account` before `num`; the identity column `num`
    // must still lead the key.
    let entity = entity(
        "Order",
        "orders",
        vec![
            pk_column("account", "java.lang.String"),
            ColumnModel {
                generation: GenerationStrategy::Identity,
                ..pk_column("num", "java.lang.Long")
            },
        ],
    );

    let sql = dialect.create_table_sql(&entity).unwrap();
    assert!(sql.contains("PRIMARY KEY (`num`, `account`)"), "{sql}");
    assert!(sql.starts_with("CREATE TABLE `orders` (\n"), "{sql}");
    assert!(sql.contains("ENGINE=InnoDB"), "{sql}");
}

#[test]
fn create_table_emits_indexes_after_body() {
    let dialect = MySqlDialect::new();
    let mut users = entity("User", "users", vec![pk_column("id", "java.lang.Long")]);
    users.indexes.insert(
        "ix_email".to_string(),
        index("ix_email", "users", &["email"], true),
    );

    let sql = dialect.create_table_sql(&users).unwrap();
    let body_end = sql.find("ENGINE=InnoDB").unwrap();
    let index_pos = sql.find("CREATE UNIQUE INDEX `ix_email`").unwrap();
    assert!(index_pos > body_end, "{sql}");
}

// ============================================================================
// Column mutations
// ============================================================================

#[test]
fn unique_drop_emits_index_drop_before_modify() {
    let dialect = MySqlDialect::new();
    let old = ColumnModel {
        unique: true,
        ..column("email", "java.lang.String")
    };
    let new = column("email", "java.lang.String");

    let sql = dialect.modify_column_sql("users", &new, &old);
    let drop_pos = sql.find("DROP INDEX `uk_users_email`").unwrap();
    let modify_pos = sql.find("MODIFY COLUMN `email`").unwrap();
    assert!(drop_pos < modify_pos, "{sql}");
    assert!(!sql.contains("ADD UNIQUE INDEX"), "{sql}");
}

#[test]
fn unique_add_emits_index_after_modify() {
    let dialect = MySqlDialect::new();
    let old = column("email", "java.lang.String");
    let new = ColumnModel {
        unique: true,
        ..column("email", "java.lang.String")
    };

    let sql = dialect.modify_column_sql("users", &new, &old);
    let modify_pos = sql.find("MODIFY COLUMN `email`").unwrap();
    let add_pos = sql.find("ADD UNIQUE INDEX `uk_users_email`").unwrap();
    assert!(modify_pos < add_pos, "{sql}");
}

#[test]
fn dropping_unique_column_drops_companion_index_first() {
    let dialect = MySqlDialect::new();
    let col = ColumnModel {
        unique: true,
        ..column("email", "java.lang.String")
    };

    let sql = dialect.drop_column_sql("users", &col);
    let index_pos = sql.find("DROP INDEX `uk_users_email`").unwrap();
    let column_pos = sql.find("DROP COLUMN `email`").unwrap();
    assert!(index_pos < column_pos, "{sql}");
}

#[test]
fn drop_primary_key_demotes_auto_increment_first() {
    let dialect = MySqlDialect::new();
    let id = ColumnModel {
        generation: GenerationStrategy::Identity,
        ..pk_column("id", "java.lang.Long")
    };

    let sql = dialect.drop_primary_key_sql("users", &[&id]);
    let modify_pos = sql.find("MODIFY COLUMN `id` BIGINT NOT NULL").unwrap();
    let drop_pos = sql.find("DROP PRIMARY KEY").unwrap();
    assert!(modify_pos < drop_pos, "{sql}");
    assert!(!sql[modify_pos..drop_pos].contains("AUTO_INCREMENT"), "{sql}");
}

// ============================================================================
// Constraints and errors
// ============================================================================

#[test]
fn check_constraint_round_trip_sql() {
    let dialect = MySqlDialect::new();
    let cons = check_constraint("ck_age", "users", "age >= 21");

    let drop = dialect.drop_constraint_sql("users", &cons).unwrap();
    assert_eq!(drop, "ALTER TABLE `users` DROP CHECK `ck_age`;\n");
    let add = dialect.add_constraint_sql("users", &cons).unwrap();
    assert_eq!(
        add,
        "ALTER TABLE `users` ADD CONSTRAINT `ck_age` CHECK (age >= 21);\n"
    );
}

#[test]
fn blank_constraint_name_fails_fast() {
    let dialect = MySqlDialect::new();
    let cons = ConstraintModel {
        name: "  ".to_string(),
        table_name: "users".to_string(),
        type_kind: ConstraintType::Unique,
        columns: vec!["email".to_string()],
        ..ConstraintModel::default()
    };

    let err = dialect.drop_constraint_sql("users", &cons).unwrap_err();
    assert!(matches!(err, SchemaDiffError::BlankConstraintName { .. }));
}

#[test]
fn foreign_key_clause_includes_actions() {
    let dialect = MySqlDialect::new();
    let mut rel = relationship("users", &["team_id"], "teams", &["id"]);
    rel.on_delete = OnDeleteAction::Cascade;

    let sql = dialect.add_relationship_sql("users", &rel);
    assert!(sql.contains("FOREIGN KEY (`team_id`) REFERENCES `teams` (`id`)"), "{sql}");
    assert!(sql.contains("ON DELETE CASCADE"), "{sql}");
    assert!(!sql.contains("ON UPDATE"), "{sql}");
}

#[test]
fn no_constraint_relationship_emits_nothing() {
    let dialect = MySqlDialect::new();
    let mut rel = relationship("users", &["team_id"], "teams", &["id"]);
    rel.no_constraint = true;

    assert!(dialect.add_relationship_sql("users", &rel).is_empty());
    assert!(dialect.drop_relationship_sql("users", &rel).is_empty());
}

#[test]
fn generated_fk_names_respect_identifier_limit() {
    let dialect = MySqlDialect::new();
    let long_table = "a_table_name_that_is_quite_long_for_mysql_identifier_limits";
    let rel = relationship(
        long_table,
        &["some_rather_long_column_name", "another_long_column_name"],
        "teams",
        &["id"],
    );

    let sql = dialect.add_relationship_sql(long_table, &rel);
    let name_start = sql.find("ADD CONSTRAINT `").unwrap() + "ADD CONSTRAINT `".len();
    let name_end = sql[name_start..].find('`').unwrap();
    assert!(name_end <= 64, "generated name too long: {}", &sql[name_start..name_start + name_end]);
}

// ============================================================================
// Table generators
// ============================================================================

#[test]
fn table_generator_creates_table_then_seed_row() {
    let dialect = MySqlDialect::new();
    let tg = table_generator("order_ids", "id_gen");

    let sql = dialect.table_generators().unwrap()
        .create_table_generator_sql(&tg)
        .unwrap();
    let create_pos = sql.find("CREATE TABLE IF NOT EXISTS `id_gen`").unwrap();
    let insert_pos = sql.find("INSERT IGNORE INTO `id_gen`").unwrap();
    assert!(create_pos < insert_pos, "{sql}");
    assert!(sql.contains("VALUES ('order_ids', 1)"), "{sql}");
}

#[test]
fn table_generator_without_table_fails() {
    let dialect = MySqlDialect::new();
    let mut tg = table_generator("order_ids", "");
    tg.table = String::new();

    let err = dialect
        .table_generators()
        .unwrap()
        .create_table_generator_sql(&tg)
        .unwrap_err();
    assert!(matches!(err, SchemaDiffError::MissingGeneratorTable { .. }));
}
