//! Dialect abstraction
//!
//! A dialect bundles the per-database strategy: type mapping, literal
//! formatting, identifier rules and a DDL clause generator for every
//! mutation primitive. Each primitive is a pure function of its structural
//! inputs plus the dialect's own rules; no state is shared between calls.
//!
//! Dialects are looked up through a static registration table keyed by
//! [`DatabaseType`]. Requesting an unregistered database type fails with an
//! explicit unsupported-dialect error rather than a silent fallback.

pub mod ident;
mod mysql;

pub use ident::{shorten, IdentifierPolicy};
pub use mysql::MySqlDialect;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::SchemaDiffError;
use crate::model::{
    ColumnModel, ConstraintModel, EntityModel, IndexModel, RelationshipModel, SequenceModel,
    TableGeneratorModel,
};

/// Supported database families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseType {
    MySql,
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::MySql => write!(f, "mysql"),
        }
    }
}

impl FromStr for DatabaseType {
    type Err = SchemaDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(DatabaseType::MySql),
            _ => Err(SchemaDiffError::UnsupportedDialect {
                name: s.to_string(),
            }),
        }
    }
}

/// How a native type renders its length/precision arguments.
#[derive(Debug, Clone, Copy)]
enum TypeTemplate {
    Plain(&'static str),
    Length(&'static str),
    PrecisionScale(&'static str),
}

/// A logical type resolved against one dialect: the native column type plus
/// its default literal and quoting requirement.
#[derive(Debug, Clone)]
pub struct MappedType {
    template: TypeTemplate,
    needs_quotes: bool,
    default_value: Option<&'static str>,
}

impl MappedType {
    pub fn plain(sql: &'static str) -> Self {
        MappedType {
            template: TypeTemplate::Plain(sql),
            needs_quotes: false,
            default_value: None,
        }
    }

    pub fn with_length(sql: &'static str) -> Self {
        MappedType {
            template: TypeTemplate::Length(sql),
            needs_quotes: false,
            default_value: None,
        }
    }

    pub fn with_precision_scale(sql: &'static str) -> Self {
        MappedType {
            template: TypeTemplate::PrecisionScale(sql),
            needs_quotes: false,
            default_value: None,
        }
    }

    pub fn quoted(mut self) -> Self {
        self.needs_quotes = true;
        self
    }

    pub fn defaulting(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Renders the native type with the column's length/precision/scale,
    /// falling back to conventional defaults when unset.
    pub fn sql_type(&self, length: u32, precision: u32, scale: u32) -> String {
        match self.template {
            TypeTemplate::Plain(sql) => sql.to_string(),
            TypeTemplate::Length(sql) => {
                format!("{}({})", sql, if length > 0 { length } else { 255 })
            }
            TypeTemplate::PrecisionScale(sql) => format!(
                "{}({},{})",
                sql,
                if precision > 0 { precision } else { 10 },
                if scale > 0 { scale } else { 2 }
            ),
        }
    }

    pub fn needs_quotes(&self) -> bool {
        self.needs_quotes
    }

    pub fn default_value(&self) -> Option<&'static str> {
        self.default_value
    }
}

/// Maps a logical (source-language) type name to a dialect-native type.
pub trait TypeMapper {
    fn map(&self, java_type: &str) -> MappedType;
}

/// Formats literal values for embedding in DDL.
pub trait ValueTransformer {
    fn quote_literal(&self, value: &str, mapped: &MappedType) -> String;
}

/// Per-database DDL strategy. Every method is a pure function of its inputs.
pub trait Dialect {
    fn database_type(&self) -> DatabaseType;
    fn identifier_policy(&self) -> &dyn IdentifierPolicy;
    fn type_mapper(&self) -> &dyn TypeMapper;
    fn value_transformer(&self) -> &dyn ValueTransformer;

    fn quote(&self, raw: &str) -> String {
        self.identifier_policy().quote(raw)
    }

    /// FK constraint name: the snapshot's explicit name when present,
    /// otherwise a deterministic generated one within the identifier rules.
    fn relationship_constraint_name(&self, table: &str, rel: &RelationshipModel) -> String {
        match &rel.constraint_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                let mut parts: Vec<&str> = vec![table];
                parts.extend(rel.columns.iter().map(String::as_str));
                ident::shorten("fk", self.identifier_policy(), &parts)
            }
        }
    }

    // Tables
    fn open_create_table(&self, table: &str) -> String;
    fn close_create_table(&self) -> String;
    fn create_table_sql(&self, entity: &EntityModel) -> Result<String, SchemaDiffError>;
    fn drop_table_sql(&self, table: &str) -> String;
    fn rename_table_sql(&self, old_table: &str, new_table: &str) -> String;

    // Column and key definitions inside CREATE TABLE
    fn column_definition_sql(&self, column: &ColumnModel) -> String;
    fn primary_key_definition_sql(&self, pk_columns: &[String]) -> String;
    fn constraint_definition_sql(
        &self,
        constraint: &ConstraintModel,
    ) -> Result<String, SchemaDiffError>;

    // Column mutations
    fn add_column_sql(&self, table: &str, column: &ColumnModel) -> String;
    fn drop_column_sql(&self, table: &str, column: &ColumnModel) -> String;
    fn modify_column_sql(
        &self,
        table: &str,
        new_column: &ColumnModel,
        old_column: &ColumnModel,
    ) -> String;
    fn rename_column_sql(
        &self,
        table: &str,
        new_column: &ColumnModel,
        old_column: &ColumnModel,
    ) -> String;

    // Primary keys
    fn add_primary_key_sql(&self, table: &str, pk_columns: &[String]) -> String;
    fn drop_primary_key_sql(&self, table: &str, current_columns: &[&ColumnModel]) -> String;

    // Indexes
    fn index_statement_sql(
        &self,
        index: &IndexModel,
        table: &str,
    ) -> Result<String, SchemaDiffError>;
    fn drop_index_sql(&self, table: &str, index_name: &str) -> Result<String, SchemaDiffError>;

    // Constraints
    fn add_constraint_sql(
        &self,
        table: &str,
        constraint: &ConstraintModel,
    ) -> Result<String, SchemaDiffError>;
    fn drop_constraint_sql(
        &self,
        table: &str,
        constraint: &ConstraintModel,
    ) -> Result<String, SchemaDiffError>;

    // Relationships (foreign keys)
    fn add_relationship_sql(&self, table: &str, rel: &RelationshipModel) -> String;
    fn drop_relationship_sql(&self, table: &str, rel: &RelationshipModel) -> String;

    // Optional capabilities
    fn sequences(&self) -> Option<&dyn SequenceDialect> {
        None
    }
    fn table_generators(&self) -> Option<&dyn TableGeneratorDialect> {
        None
    }
    fn changesets(&self) -> Option<&dyn ChangesetDialect> {
        None
    }
}

/// Sequence DDL for databases that support sequences.
pub trait SequenceDialect {
    fn create_sequence_sql(&self, seq: &SequenceModel) -> String;
    fn drop_sequence_sql(&self, seq: &SequenceModel) -> String;
    fn alter_sequence_sql(&self, new_seq: &SequenceModel, old_seq: &SequenceModel) -> String;
}

/// Table-backed id generator DDL.
pub trait TableGeneratorDialect {
    fn create_table_generator_sql(
        &self,
        tg: &TableGeneratorModel,
    ) -> Result<String, SchemaDiffError>;
    fn drop_table_generator_sql(&self, tg: &TableGeneratorModel)
        -> Result<String, SchemaDiffError>;
    fn alter_table_generator_sql(
        &self,
        new_tg: &TableGeneratorModel,
        old_tg: &TableGeneratorModel,
    ) -> Result<String, SchemaDiffError>;
}

/// Type naming for the changeset output format.
pub trait ChangesetDialect {
    fn changeset_type_name(&self, column: &ColumnModel) -> String;
}

/// A resolved dialect plus its database type tag.
pub struct DialectBundle {
    database_type: DatabaseType,
    dialect: Box<dyn Dialect>,
}

impl std::fmt::Debug for DialectBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectBundle")
            .field("database_type", &self.database_type)
            .finish_non_exhaustive()
    }
}

impl DialectBundle {
    pub fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    pub fn ddl(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }
}

type DialectFactory = fn() -> Box<dyn Dialect>;

/// Static registration table: database type to dialect factory.
static REGISTRY: Lazy<HashMap<DatabaseType, DialectFactory>> = Lazy::new(|| {
    let mut map: HashMap<DatabaseType, DialectFactory> = HashMap::new();
    map.insert(DatabaseType::MySql, || Box::new(MySqlDialect::new()));
    map
});

/// Resolves a database-type token (e.g. `"mysql"`) to its dialect bundle.
pub fn resolve_dialect(name: &str) -> Result<DialectBundle, SchemaDiffError> {
    let database_type: DatabaseType = name.parse()?;
    let factory = REGISTRY
        .get(&database_type)
        .ok_or_else(|| SchemaDiffError::UnsupportedDialect {
            name: name.to_string(),
        })?;
    Ok(DialectBundle {
        database_type,
        dialect: factory(),
    })
}
