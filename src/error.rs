//! Error types for schemadiff

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during schema diffing and migration generation
#[derive(Error, Debug)]
pub enum SchemaDiffError {
    #[error("Unsupported dialect: {name}")]
    UnsupportedDialect { name: String },

    #[error("Schema directory not found: {path}")]
    SchemaDirNotFound { path: PathBuf },

    #[error("Baseline snapshot not found: {path}")]
    MissingBaseline { path: PathBuf },

    #[error("Failed to read schema snapshot: {path}")]
    SnapshotReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema snapshot: {path}")]
    SnapshotParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Constraint on table {table} has a blank name")]
    BlankConstraintName { table: String },

    #[error("Index on table {table} has a blank name")]
    BlankIndexName { table: String },

    #[error("Table generator {name} is missing a target table name")]
    MissingGeneratorTable { name: String },

    #[error("Failed to serialize changelog: {message}")]
    ChangelogSerializeError { message: String },

    #[error("Failed to write migration output to {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for SchemaDiffError {
    fn from(err: serde_yaml::Error) -> Self {
        SchemaDiffError::ChangelogSerializeError {
            message: err.to_string(),
        }
    }
}
