//! End-to-end migration runs over snapshot files on disk

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use schemadiff::error::SchemaDiffError;
use schemadiff::{generate_migration, MigrateOptions, MigrateOutcome};

/// Writes a snapshot JSON file the way the extraction layer does.
fn write_snapshot(dir: &Path, stamp: &str, body: &str) {
    fs::write(dir.join(format!("schema-{}.json", stamp)), body).unwrap();
}

fn options(schema_dir: &Path, output_dir: &Path) -> MigrateOptions {
    MigrateOptions {
        schema_dir: schema_dir.to_path_buf(),
        dialect: "mysql".to_string(),
        output_dir: output_dir.to_path_buf(),
        baseline: None,
        rollback: false,
        changelog: false,
    }
}

const OLD_SNAPSHOT: &str = r#"{
  "version": "1",
  "entities": {
    "User": {
      "entityName": "User",
      "tableName": "users",
      "columns": {
        "id": {
          "columnName": "id",
          "javaType": "java.lang.Long",
          "primaryKey": true,
          "nullable": false,
          "generation": "IDENTITY"
        }
      }
    }
  }
}"#;

const NEW_SNAPSHOT: &str = r#"{
  "version": "2",
  "entities": {
    "User": {
      "entityName": "User",
      "tableName": "users",
      "columns": {
        "id": {
          "columnName": "id",
          "javaType": "java.lang.Long",
          "primaryKey": true,
          "nullable": false,
          "generation": "IDENTITY"
        },
        "email": {
          "columnName": "email",
          "javaType": "java.lang.String",
          "length": 100,
          "unique": true
        }
      }
    }
  }
}"#;

#[test]
fn generates_migration_from_two_newest_snapshots() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    write_snapshot(schema_dir.path(), "20250102000000", NEW_SNAPSHOT);

    let outcome = generate_migration(&options(schema_dir.path(), out_dir.path())).unwrap();
    let MigrateOutcome::Generated { written, .. } = outcome else {
        panic!("expected generated outcome");
    };
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("migration-2.sql"));

    let sql = fs::read_to_string(&written[0]).unwrap();
    assert!(sql.contains("ALTER TABLE `users` ADD COLUMN `email` VARCHAR(100)"), "{sql}");
    assert!(sql.contains("ADD UNIQUE INDEX `uk_users_email`"), "{sql}");
}

#[test]
fn newest_two_win_over_older_snapshots() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    // An even older snapshot that would produce a table drop if selected.
    write_snapshot(schema_dir.path(), "20240101000000", r#"{"version":"0","entities":{}}"#);
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    write_snapshot(schema_dir.path(), "20250102000000", NEW_SNAPSHOT);

    let outcome = generate_migration(&options(schema_dir.path(), out_dir.path())).unwrap();
    let MigrateOutcome::Generated { written, .. } = outcome else {
        panic!("expected generated outcome");
    };
    let sql = fs::read_to_string(&written[0]).unwrap();
    assert!(!sql.contains("CREATE TABLE"), "{sql}");
}

#[test]
fn identical_snapshots_report_no_changes() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    write_snapshot(schema_dir.path(), "20250102000000", OLD_SNAPSHOT);

    let outcome = generate_migration(&options(schema_dir.path(), out_dir.path())).unwrap();
    assert!(matches!(outcome, MigrateOutcome::NoChanges));
}

#[test]
fn single_snapshot_reports_no_changes() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);

    let outcome = generate_migration(&options(schema_dir.path(), out_dir.path())).unwrap();
    assert!(matches!(outcome, MigrateOutcome::NoChanges));
}

#[test]
fn non_snapshot_files_are_ignored() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    fs::write(schema_dir.path().join("schema-notes.json"), "{}").unwrap();
    fs::write(schema_dir.path().join("readme.txt"), "ignore me").unwrap();

    let outcome = generate_migration(&options(schema_dir.path(), out_dir.path())).unwrap();
    assert!(matches!(outcome, MigrateOutcome::NoChanges));
}

#[test]
fn unsupported_dialect_fails_without_output() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    write_snapshot(schema_dir.path(), "20250102000000", NEW_SNAPSHOT);

    let mut opts = options(schema_dir.path(), out_dir.path());
    opts.dialect = "sybase".to_string();

    let err = generate_migration(&opts).unwrap_err();
    assert!(err.to_string().contains("Unsupported dialect"));
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_schema_dir_fails() {
    let out_dir = TempDir::new().unwrap();
    let opts = options(Path::new("/nonexistent/schema/dir"), out_dir.path());

    let err = generate_migration(&opts).unwrap_err();
    assert!(matches!(err, SchemaDiffError::SchemaDirNotFound { .. }));
}

#[test]
fn missing_baseline_fails() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250102000000", NEW_SNAPSHOT);

    let mut opts = options(schema_dir.path(), out_dir.path());
    opts.baseline = Some(schema_dir.path().join("baseline.json"));

    let err = generate_migration(&opts).unwrap_err();
    assert!(matches!(err, SchemaDiffError::MissingBaseline { .. }));
}

#[test]
fn explicit_baseline_is_diffed_against_newest() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let baseline = schema_dir.path().join("baseline.json");
    fs::write(&baseline, OLD_SNAPSHOT).unwrap();
    write_snapshot(schema_dir.path(), "20250102000000", NEW_SNAPSHOT);

    let mut opts = options(schema_dir.path(), out_dir.path());
    opts.baseline = Some(baseline);

    let outcome = generate_migration(&opts).unwrap();
    assert!(matches!(outcome, MigrateOutcome::Generated { .. }));
}

#[test]
fn malformed_snapshot_reports_parse_error() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    write_snapshot(schema_dir.path(), "20250102000000", "{ not json");

    let err = generate_migration(&options(schema_dir.path(), out_dir.path())).unwrap_err();
    assert!(matches!(err, SchemaDiffError::SnapshotParseError { .. }));
}

#[test]
fn rollback_and_changelog_artifacts_are_written() {
    let schema_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write_snapshot(schema_dir.path(), "20250101000000", OLD_SNAPSHOT);
    write_snapshot(schema_dir.path(), "20250102000000", NEW_SNAPSHOT);

    let mut opts = options(schema_dir.path(), out_dir.path());
    opts.rollback = true;
    opts.changelog = true;

    let outcome = generate_migration(&opts).unwrap();
    let MigrateOutcome::Generated { written, .. } = outcome else {
        panic!("expected generated outcome");
    };
    assert_eq!(written.len(), 3);

    let rollback = fs::read_to_string(&written[1]).unwrap();
    assert!(written[1].ends_with("rollback-2.sql"));
    assert!(rollback.contains("DROP COLUMN `email`"), "{rollback}");

    let changelog = fs::read_to_string(&written[2]).unwrap();
    assert!(changelog.contains("databaseChangeLog:"), "{changelog}");
    assert!(changelog.contains("addColumn:"), "{changelog}");
}
