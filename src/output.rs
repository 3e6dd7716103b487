//! Output handlers: write migration artifacts to the output directory

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::changeset::ChangeLog;
use crate::error::SchemaDiffError;

fn ensure_dir(output_dir: &Path) -> Result<(), SchemaDiffError> {
    fs::create_dir_all(output_dir).map_err(|source| SchemaDiffError::OutputWriteError {
        path: output_dir.to_path_buf(),
        source,
    })
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, SchemaDiffError> {
    fs::write(&path, contents).map_err(|source| SchemaDiffError::OutputWriteError {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Writes the forward migration as `migration-<version>.sql`.
pub fn write_migration_sql(
    sql: &str,
    version: &str,
    output_dir: &Path,
) -> Result<PathBuf, SchemaDiffError> {
    ensure_dir(output_dir)?;
    write_file(output_dir.join(format!("migration-{}.sql", version)), sql)
}

/// Writes the rollback migration as `rollback-<version>.sql`.
pub fn write_rollback_sql(
    sql: &str,
    version: &str,
    output_dir: &Path,
) -> Result<PathBuf, SchemaDiffError> {
    ensure_dir(output_dir)?;
    write_file(output_dir.join(format!("rollback-{}.sql", version)), sql)
}

/// Serializes and writes the changeset changelog as
/// `changelog-<timestamp>.yaml`.
pub fn write_changelog(
    changelog: &ChangeLog,
    output_dir: &Path,
) -> Result<PathBuf, SchemaDiffError> {
    ensure_dir(output_dir)?;
    let yaml = serde_yaml::to_string(changelog)?;
    let name = format!("changelog-{}.yaml", Local::now().format("%Y%m%d%H%M%S"));
    write_file(output_dir.join(name), &yaml)
}
