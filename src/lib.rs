//! schemadiff: A fast Rust migration generator for ORM schema snapshots
//!
//! This library diffs two point-in-time schema snapshots and renders the
//! delta as dialect-specific migration SQL or a changeset-format changelog.

pub mod builder;
pub mod changeset;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod generator;
pub mod model;
pub mod output;
pub mod util;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use changeset::ChangesetGenerator;
use diff::SchemaDiffer;
use generator::MigrationGenerator;
use model::SchemaModel;

pub use error::SchemaDiffError;

/// Snapshot files are named `schema-<yyyyMMddHHmmss>.json` by the
/// extraction layer.
static SNAPSHOT_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^schema-\d{14}\.json$").expect("valid regex"));

/// Options for one migration generation run
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Directory holding the snapshot JSON files
    pub schema_dir: PathBuf,
    /// Database-type token (e.g. "mysql")
    pub dialect: String,
    /// Output directory for generated artifacts
    pub output_dir: PathBuf,
    /// Explicit baseline snapshot to diff the newest snapshot against
    /// (instead of the second-newest snapshot)
    pub baseline: Option<PathBuf>,
    /// Also generate the reverse migration
    pub rollback: bool,
    /// Also generate the changeset-format changelog
    pub changelog: bool,
}

/// Result of a migration generation run
#[derive(Debug)]
pub enum MigrateOutcome {
    /// Identical snapshots, or fewer than two snapshots available. Not an
    /// error.
    NoChanges,
    /// Artifacts were written
    Generated {
        written: Vec<PathBuf>,
        warnings: Vec<String>,
    },
}

/// Diff the two newest snapshots (or baseline + newest) and write the
/// requested migration artifacts.
pub fn generate_migration(options: &MigrateOptions) -> Result<MigrateOutcome, SchemaDiffError> {
    // Dialect resolution fails fast, before any snapshot is read.
    let bundle = dialect::resolve_dialect(&options.dialect)?;

    let Some((old_schema, new_schema)) = load_snapshot_pair(options)? else {
        return Ok(MigrateOutcome::NoChanges);
    };

    let differ = SchemaDiffer::new();
    let diff = differ.diff(&old_schema, &new_schema);
    if diff.is_empty() {
        return Ok(MigrateOutcome::NoChanges);
    }
    let warnings = diff.warnings.clone();

    let sql = MigrationGenerator::new(&bundle).generate_sql(&diff)?;
    let mut written = vec![output::write_migration_sql(
        &sql,
        &new_schema.version,
        &options.output_dir,
    )?];

    if options.rollback {
        // The reverse migration is the same pipeline with the snapshots
        // swapped.
        let rollback_diff = differ.diff(&new_schema, &old_schema);
        let rollback_sql = MigrationGenerator::new(&bundle).generate_sql(&rollback_diff)?;
        written.push(output::write_rollback_sql(
            &rollback_sql,
            &new_schema.version,
            &options.output_dir,
        )?);
    }

    if options.changelog {
        let changelog = ChangesetGenerator::new(&bundle).generate(&diff)?;
        written.push(output::write_changelog(&changelog, &options.output_dir)?);
    }

    info!(
        "migration generated for version {} ({} files)",
        new_schema.version,
        written.len()
    );
    Ok(MigrateOutcome::Generated { written, warnings })
}

/// Loads the snapshot pair to diff: baseline + newest head when a baseline
/// is given, otherwise the two newest snapshots in the schema directory.
/// Returns `None` when there is nothing to compare.
fn load_snapshot_pair(
    options: &MigrateOptions,
) -> Result<Option<(SchemaModel, SchemaModel)>, SchemaDiffError> {
    let mut snapshots = find_snapshot_files(&options.schema_dir)?;

    let (old_path, new_path) = match &options.baseline {
        Some(baseline) => {
            if !baseline.exists() {
                return Err(SchemaDiffError::MissingBaseline {
                    path: baseline.clone(),
                });
            }
            let Some(head) = snapshots.first().cloned() else {
                return Ok(None);
            };
            (baseline.clone(), head)
        }
        None => {
            if snapshots.len() < 2 {
                debug!(
                    "{} snapshot(s) in {}; nothing to compare",
                    snapshots.len(),
                    options.schema_dir.display()
                );
                return Ok(None);
            }
            let new_path = snapshots.remove(0);
            let old_path = snapshots.remove(0);
            (old_path, new_path)
        }
    };

    let old_schema = load_snapshot(&old_path)?;
    let new_schema = load_snapshot(&new_path)?;
    Ok(Some((old_schema, new_schema)))
}

/// Snapshot files in the schema directory, newest first.
fn find_snapshot_files(schema_dir: &Path) -> Result<Vec<PathBuf>, SchemaDiffError> {
    if !schema_dir.is_dir() {
        return Err(SchemaDiffError::SchemaDirNotFound {
            path: schema_dir.to_path_buf(),
        });
    }
    let entries = fs::read_dir(schema_dir).map_err(|source| SchemaDiffError::SnapshotReadError {
        path: schema_dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SNAPSHOT_FILE.is_match(name))
        })
        .collect();
    // Timestamped names sort lexicographically; newest first.
    files.sort();
    files.reverse();
    Ok(files)
}

/// Loads one snapshot JSON file.
pub fn load_snapshot(path: &Path) -> Result<SchemaModel, SchemaDiffError> {
    let contents = fs::read_to_string(path).map_err(|source| SchemaDiffError::SnapshotReadError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SchemaDiffError::SnapshotParseError {
        path: path.to_path_buf(),
        source,
    })
}
