//! MySQL dialect: identifier policy, type mapping, value formatting and DDL
//! clause generation.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::builder::{CreateTableBuilder, PostCreateContributor, TableBodyContributor};
use crate::error::SchemaDiffError;
use crate::model::{
    ColumnModel, ConstraintModel, ConstraintType, EntityModel, GenerationStrategy, IndexModel,
    OnDeleteAction, OnUpdateAction, RelationshipModel, TableGeneratorModel, TemporalKind,
};

use super::ident::{shorten, IdentifierPolicy};
use super::{
    ChangesetDialect, DatabaseType, Dialect, MappedType, TableGeneratorDialect, TypeMapper,
    ValueTransformer,
};

/// MySQL 8.0 reserved words.
static MYSQL_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ACCESSIBLE", "ADD", "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC", "ASENSITIVE",
        "BEFORE", "BETWEEN", "BIGINT", "BINARY", "BLOB", "BOTH", "BY", "CALL", "CASCADE", "CASE",
        "CHANGE", "CHAR", "CHARACTER", "CHECK", "COLLATE", "COLUMN", "CONDITION", "CONSTRAINT",
        "CONTINUE", "CONVERT", "CREATE", "CROSS", "CUBE", "CUME_DIST", "CURRENT_DATE",
        "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "DATABASE", "DATABASES",
        "DAY_HOUR", "DAY_MICROSECOND", "DAY_MINUTE", "DAY_SECOND", "DEC", "DECIMAL", "DECLARE",
        "DEFAULT", "DELAYED", "DELETE", "DENSE_RANK", "DESC", "DESCRIBE", "DETERMINISTIC",
        "DISTINCT", "DISTINCTROW", "DIV", "DOUBLE", "DROP", "DUAL", "EACH", "ELSE", "ELSEIF",
        "EMPTY", "ENCLOSED", "ESCAPED", "EXCEPT", "EXISTS", "EXIT", "EXPLAIN", "FALSE", "FETCH",
        "FIRST_VALUE", "FLOAT", "FLOAT4", "FLOAT8", "FOR", "FORCE", "FOREIGN", "FROM", "FULLTEXT",
        "FUNCTION", "GENERATED", "GET", "GRANT", "GROUP", "GROUPING", "GROUPS", "HAVING",
        "HIGH_PRIORITY", "HOUR_MICROSECOND", "HOUR_MINUTE", "HOUR_SECOND", "IF", "IGNORE", "IN",
        "INDEX", "INFILE", "INNER", "INOUT", "INSENSITIVE", "INSERT", "INT", "INT1", "INT2",
        "INT3", "INT4", "INT8", "INTEGER", "INTERVAL", "INTO", "IO_AFTER_GTIDS",
        "IO_BEFORE_GTIDS", "IS", "ITERATE", "JOIN", "JSON_TABLE", "KEY", "KEYS", "KILL", "LAG",
        "LAST_VALUE", "LEAD", "LEADING", "LEAVE", "LEFT", "LIKE", "LIMIT", "LINEAR", "LINES",
        "LOAD", "LOCALTIME", "LOCALTIMESTAMP", "LOCK", "LONG", "LONGBLOB", "LONGTEXT", "LOOP",
        "LOW_PRIORITY", "MASTER_BIND", "MASTER_SSL_VERIFY_SERVER_CERT", "MATCH", "MAXVALUE",
        "MEDIUMBLOB", "MEDIUMINT", "MEDIUMTEXT", "MIDDLEINT", "MINUTE_MICROSECOND",
        "MINUTE_SECOND", "MOD", "MODIFIES", "NATURAL", "NOT", "NO_WRITE_TO_BINLOG", "NTH_VALUE",
        "NTILE", "NULL", "NUMERIC", "OF", "ON", "OPTIMIZE", "OPTIMIZER_COSTS", "OPTION",
        "OPTIONALLY", "OR", "ORDER", "OUT", "OUTER", "OUTFILE", "OVER", "PARTITION",
        "PERCENT_RANK", "PRECISION", "PRIMARY", "PROCEDURE", "PURGE", "RANGE", "RANK", "READ",
        "READS", "READ_WRITE", "REAL", "RECURSIVE", "REFERENCES", "REGEXP", "RELEASE", "RENAME",
        "REPEAT", "REPLACE", "REQUIRE", "RESIGNAL", "RESTRICT", "RETURN", "REVOKE", "RIGHT",
        "RLIKE", "ROW", "ROWS", "ROW_NUMBER", "SCHEMA", "SCHEMAS", "SECOND_MICROSECOND", "SELECT",
        "SENSITIVE", "SEPARATOR", "SET", "SHOW", "SIGNAL", "SMALLINT", "SPATIAL", "SPECIFIC",
        "SQL", "SQLEXCEPTION", "SQLSTATE", "SQLWARNING", "SQL_BIG_RESULT", "SQL_CALC_FOUND_ROWS",
        "SQL_SMALL_RESULT", "SSL", "STARTING", "STORED", "STRAIGHT_JOIN", "SYSTEM", "TABLE",
        "TERMINATED", "THEN", "TINYBLOB", "TINYINT", "TINYTEXT", "TO", "TRAILING", "TRIGGER",
        "TRUE", "UNDO", "UNION", "UNIQUE", "UNLOCK", "UNSIGNED", "UPDATE", "USAGE", "USE",
        "USING", "UTC_DATE", "UTC_TIME", "UTC_TIMESTAMP", "VALUES", "VARBINARY", "VARCHAR",
        "VARCHARACTER", "VARYING", "WHEN", "WHERE", "WHILE", "WINDOW", "WITH", "WRITE", "XOR",
        "YEAR_MONTH", "ZEROFILL",
    ]
    .into_iter()
    .collect()
});

static OVERRIDE_IDENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bauto_increment\b").expect("valid regex"));
static OVERRIDE_NOT_NULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bnot\s+null\b").expect("valid regex"));
static OVERRIDE_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdefault\b").expect("valid regex"));
static OVERRIDE_PRIMARY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bprimary\s+key\b").expect("valid regex"));
static INLINE_PRIMARY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+primary\s+key\b").expect("valid regex"));
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

pub(crate) fn is_mysql_keyword(name: &str) -> bool {
    MYSQL_KEYWORDS.contains(name.to_uppercase().as_str())
}

struct MySqlIdentifierPolicy;

impl IdentifierPolicy for MySqlIdentifierPolicy {
    fn max_length(&self) -> usize {
        64
    }

    fn quote(&self, raw: &str) -> String {
        format!("`{}`", raw)
    }

    fn normalize_case(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn is_keyword(&self, raw: &str) -> bool {
        is_mysql_keyword(raw)
    }
}

struct MySqlTypeMapper;

impl TypeMapper for MySqlTypeMapper {
    fn map(&self, java_type: &str) -> MappedType {
        match java_type {
            "int" | "java.lang.Integer" => MappedType::plain("INT"),
            "long" | "java.lang.Long" => MappedType::plain("BIGINT"),
            "short" => MappedType::plain("SMALLINT"),
            "byte" => MappedType::plain("TINYINT"),
            "double" | "java.lang.Double" => MappedType::plain("DOUBLE"),
            "float" | "java.lang.Float" => MappedType::plain("FLOAT"),
            "boolean" | "java.lang.Boolean" => MappedType::plain("TINYINT(1)").defaulting("0"),
            "char" => MappedType::plain("CHAR(1)").quoted(),
            "java.lang.String" => MappedType::with_length("VARCHAR").quoted(),
            "java.math.BigDecimal" => MappedType::with_precision_scale("DECIMAL"),
            "java.math.BigInteger" => MappedType::plain("BIGINT"),
            "java.time.LocalDate" => MappedType::plain("DATE").quoted(),
            "java.time.LocalTime" => MappedType::plain("TIME").quoted(),
            "java.time.LocalDateTime" => MappedType::plain("TIMESTAMP(6)").quoted(),
            "java.time.OffsetDateTime" | "java.time.ZonedDateTime" | "java.time.Instant" => {
                MappedType::plain("TIMESTAMP").quoted()
            }
            "java.util.UUID" => MappedType::plain("CHAR(36)").quoted(),
            "byte[]" => MappedType::with_length("VARBINARY"),
            _ => MappedType::plain("TEXT").quoted(),
        }
    }
}

struct MySqlValueTransformer;

impl ValueTransformer for MySqlValueTransformer {
    fn quote_literal(&self, value: &str, mapped: &MappedType) -> String {
        if value.eq_ignore_ascii_case("null") {
            return "NULL".to_string();
        }
        if mapped.needs_quotes() {
            format!("'{}'", value.replace('\'', "''"))
        } else {
            value.to_string()
        }
    }
}

/// The MySQL dialect.
pub struct MySqlDialect {
    policy: MySqlIdentifierPolicy,
    mapper: MySqlTypeMapper,
    transformer: MySqlValueTransformer,
}

impl MySqlDialect {
    pub fn new() -> Self {
        MySqlDialect {
            policy: MySqlIdentifierPolicy,
            mapper: MySqlTypeMapper,
            transformer: MySqlValueTransformer,
        }
    }

    fn should_use_auto_increment(&self, strategy: GenerationStrategy) -> bool {
        matches!(
            strategy,
            GenerationStrategy::Identity | GenerationStrategy::Auto
        )
    }

    fn identity_clause(&self) -> &'static str {
        " AUTO_INCREMENT"
    }

    fn uuid_default_value(&self) -> &'static str {
        "UUID()"
    }

    /// Name of the companion unique index backing a `unique` column flag.
    fn unique_index_name(&self, table: &str, column: &str) -> String {
        shorten("uk", &self.policy, &[table, column])
    }

    /// MySQL requires the auto-generated column to lead a composite key.
    fn reorder_for_identity(pk_columns: Vec<String>, columns: &[&ColumnModel]) -> Vec<String> {
        let identity = columns
            .iter()
            .filter(|c| c.generation == GenerationStrategy::Identity)
            .map(|c| c.column_name.clone())
            .find(|name| pk_columns.contains(name));

        let Some(identity) = identity else {
            return pk_columns;
        };
        let mut reordered: Vec<String> =
            pk_columns.into_iter().filter(|c| *c != identity).collect();
        reordered.insert(0, identity);
        reordered
    }

    fn native_sql_type(&self, column: &ColumnModel) -> String {
        let java_type = column
            .conversion_class
            .as_deref()
            .unwrap_or(&column.java_type);
        let mapped = self.mapper.map(java_type);

        if let Some(override_type) = column.sql_type_override.as_deref() {
            let trimmed = override_type.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        if column.lob {
            return if column.java_type == "java.lang.String" {
                "TEXT".to_string()
            } else {
                "BLOB".to_string()
            };
        }
        if column.version_column {
            return if column.java_type == "java.lang.Long" {
                "BIGINT".to_string()
            } else {
                "TIMESTAMP".to_string()
            };
        }
        if let Some(temporal) = column.temporal {
            return match temporal {
                TemporalKind::Date => "DATE".to_string(),
                TemporalKind::Time => "TIME".to_string(),
                TemporalKind::Timestamp => "DATETIME".to_string(),
            };
        }
        if !column.enum_values.is_empty() {
            return if column.enum_string_mapping {
                let values: Vec<String> = column
                    .enum_values
                    .iter()
                    .map(|v| format!("'{}'", v.replace('\'', "''")))
                    .collect();
                format!("ENUM({})", values.join(","))
            } else {
                "INT".to_string()
            };
        }
        mapped.sql_type(column.length, column.precision, column.scale)
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        MySqlDialect::new()
    }
}

impl Dialect for MySqlDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySql
    }

    fn identifier_policy(&self) -> &dyn IdentifierPolicy {
        &self.policy
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &self.mapper
    }

    fn value_transformer(&self) -> &dyn ValueTransformer {
        &self.transformer
    }

    fn open_create_table(&self, table: &str) -> String {
        format!("CREATE TABLE {} (\n", self.quote(table))
    }

    fn close_create_table(&self) -> String {
        "\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;".to_string()
    }

    fn create_table_sql(&self, entity: &EntityModel) -> Result<String, SchemaDiffError> {
        let columns: Vec<&ColumnModel> = entity.columns.values().collect();
        let pk_columns: Vec<String> = entity.primary_key_columns();
        let reordered_pk = MySqlDialect::reorder_for_identity(pk_columns, &columns);

        let mut builder = CreateTableBuilder::new(&entity.table_name, self);
        builder.add_body(TableBodyContributor::Columns {
            pk_columns: reordered_pk,
            columns,
        });
        for constraint in &entity.constraints {
            builder.add_body(TableBodyContributor::Constraint(constraint));
        }
        for index in entity.indexes.values() {
            builder.add_post(PostCreateContributor::Index(index));
        }
        builder.build()
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {};\n", self.quote(table))
    }

    fn rename_table_sql(&self, old_table: &str, new_table: &str) -> String {
        format!(
            "RENAME TABLE {} TO {};\n",
            self.quote(old_table),
            self.quote(new_table)
        )
    }

    fn column_definition_sql(&self, column: &ColumnModel) -> String {
        let java_type = column
            .conversion_class
            .as_deref()
            .unwrap_or(&column.java_type);
        let mapped = self.mapper.map(java_type);

        let override_text = column
            .sql_type_override
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let override_has_identity =
            override_text.is_some_and(|t| OVERRIDE_IDENTITY.is_match(t));
        let override_has_not_null =
            override_text.is_some_and(|t| OVERRIDE_NOT_NULL.is_match(t));
        let override_has_default = override_text.is_some_and(|t| OVERRIDE_DEFAULT.is_match(t));
        let override_has_primary_key =
            override_text.is_some_and(|t| OVERRIDE_PRIMARY_KEY.is_match(t));

        let sql_type = self.native_sql_type(column);
        let identity_like =
            override_has_identity || self.should_use_auto_increment(column.generation);

        let mut sql = String::new();
        sql.push_str(&self.quote(&column.column_name));
        sql.push(' ');
        sql.push_str(&sql_type);

        if (!column.nullable || identity_like) && !override_has_not_null {
            sql.push_str(" NOT NULL");
        }
        if self.should_use_auto_increment(column.generation) && !override_has_identity {
            sql.push_str(self.identity_clause());
        }
        if column.manual_primary_key && !override_has_primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if !identity_like && !column.lob && !override_has_default {
            if let Some(default) = &column.default_value {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.transformer.quote_literal(default, &mapped));
            } else if column.generation == GenerationStrategy::Uuid {
                sql.push_str(" DEFAULT ");
                sql.push_str(self.uuid_default_value());
            } else if let Some(default) = mapped.default_value() {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.transformer.quote_literal(default, &mapped));
            }
        }

        sql
    }

    fn primary_key_definition_sql(&self, pk_columns: &[String]) -> String {
        let columns: Vec<String> = pk_columns.iter().map(|c| self.quote(c)).collect();
        format!("PRIMARY KEY ({})", columns.join(", "))
    }

    fn constraint_definition_sql(
        &self,
        constraint: &ConstraintModel,
    ) -> Result<String, SchemaDiffError> {
        match constraint.type_kind {
            ConstraintType::Unique => {
                require_name(constraint)?;
                let columns: Vec<String> =
                    constraint.columns.iter().map(|c| self.quote(c)).collect();
                Ok(format!(
                    "CONSTRAINT {} UNIQUE ({})",
                    self.quote(&constraint.name),
                    columns.join(", ")
                ))
            }
            ConstraintType::Check => {
                require_name(constraint)?;
                let mut sql = format!("CONSTRAINT {}", self.quote(&constraint.name));
                if let Some(check) = &constraint.check_clause {
                    sql.push_str(&format!(" CHECK ({})", check));
                }
                Ok(sql)
            }
            ConstraintType::PrimaryKey => Ok(self.primary_key_definition_sql(&constraint.columns)),
            ConstraintType::Index => {
                let index = IndexModel {
                    index_name: constraint.name.clone(),
                    table_name: constraint.table_name.clone(),
                    column_names: constraint.columns.clone(),
                    ..IndexModel::default()
                };
                self.index_statement_sql(&index, &constraint.table_name)
            }
            ConstraintType::ForeignKey
            | ConstraintType::Default
            | ConstraintType::NotNull
            | ConstraintType::Auto => Ok(String::new()),
        }
    }

    fn add_column_sql(&self, table: &str, column: &ColumnModel) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {};\n",
            self.quote(table),
            self.column_definition_sql(column)
        );
        if column.unique {
            let index_name = self.unique_index_name(table, &column.column_name);
            sql.push_str(&format!(
                "ALTER TABLE {} ADD UNIQUE INDEX {} ({});\n",
                self.quote(table),
                self.quote(&index_name),
                self.quote(&column.column_name)
            ));
        }
        sql
    }

    fn drop_column_sql(&self, table: &str, column: &ColumnModel) -> String {
        let mut sql = String::new();
        // A dropped unique column needs its companion index dropped first.
        if column.unique {
            let index_name = self.unique_index_name(table, &column.column_name);
            sql.push_str(&format!(
                "ALTER TABLE {} DROP INDEX {};\n",
                self.quote(table),
                self.quote(&index_name)
            ));
        }
        if column.primary_key {
            sql.push_str(&self.drop_primary_key_sql(table, &[column]));
        }
        sql.push_str(&format!(
            "ALTER TABLE {} DROP COLUMN {};\n",
            self.quote(table),
            self.quote(&column.column_name)
        ));
        sql
    }

    fn modify_column_sql(
        &self,
        table: &str,
        new_column: &ColumnModel,
        old_column: &ColumnModel,
    ) -> String {
        let mut sql = String::new();
        let unique_changed = old_column.unique != new_column.unique;

        if unique_changed && old_column.unique {
            let index_name = self.unique_index_name(table, &new_column.column_name);
            sql.push_str(&format!(
                "ALTER TABLE {} DROP INDEX {};\n",
                self.quote(table),
                self.quote(&index_name)
            ));
        }

        let definition = INLINE_PRIMARY_KEY
            .replace_all(&self.column_definition_sql(new_column), "")
            .to_string();
        sql.push_str(&format!(
            "ALTER TABLE {} MODIFY COLUMN {};\n",
            self.quote(table),
            definition
        ));

        if unique_changed && new_column.unique {
            let index_name = self.unique_index_name(table, &new_column.column_name);
            sql.push_str(&format!(
                "ALTER TABLE {} ADD UNIQUE INDEX {} ({});\n",
                self.quote(table),
                self.quote(&index_name),
                self.quote(&new_column.column_name)
            ));
        }
        sql
    }

    fn rename_column_sql(
        &self,
        table: &str,
        new_column: &ColumnModel,
        old_column: &ColumnModel,
    ) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {};\n",
            self.quote(table),
            self.quote(&old_column.column_name),
            self.quote(&new_column.column_name)
        )
    }

    fn add_primary_key_sql(&self, table: &str, pk_columns: &[String]) -> String {
        if pk_columns.is_empty() {
            return String::new();
        }
        let columns: Vec<String> = pk_columns.iter().map(|c| self.quote(c)).collect();
        format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({});\n",
            self.quote(table),
            columns.join(", ")
        )
    }

    fn drop_primary_key_sql(&self, table: &str, current_columns: &[&ColumnModel]) -> String {
        let mut sql = String::new();
        for column in current_columns {
            if !column.primary_key || !self.should_use_auto_increment(column.generation) {
                continue;
            }
            // AUTO_INCREMENT must be demoted before the key can be dropped.
            let mapped = self.mapper.map(&column.java_type);
            let mut sql_type = self.native_sql_type(column);
            sql_type = OVERRIDE_IDENTITY.replace_all(&sql_type, "").to_string();
            sql_type = MULTI_SPACE.replace_all(&sql_type, " ").trim().to_string();
            if sql_type.is_empty() {
                sql_type = mapped.sql_type(column.length, column.precision, column.scale);
            }
            sql.push_str(&format!(
                "ALTER TABLE {} MODIFY COLUMN {} {}",
                self.quote(table),
                self.quote(&column.column_name),
                sql_type
            ));
            if !column.nullable {
                sql.push_str(" NOT NULL");
            }
            if let Some(default) = &column.default_value {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.transformer.quote_literal(default, &mapped));
            }
            sql.push_str(";\n");
        }
        sql.push_str(&format!(
            "ALTER TABLE {} DROP PRIMARY KEY;\n",
            self.quote(table)
        ));
        sql
    }

    fn index_statement_sql(
        &self,
        index: &IndexModel,
        table: &str,
    ) -> Result<String, SchemaDiffError> {
        if index.index_name.trim().is_empty() {
            return Err(SchemaDiffError::BlankIndexName {
                table: table.to_string(),
            });
        }
        let columns: Vec<String> = index.column_names.iter().map(|c| self.quote(c)).collect();
        let unique = if index.unique { "UNIQUE " } else { "" };
        Ok(format!(
            "CREATE {}INDEX {} ON {} ({});\n",
            unique,
            self.quote(&index.index_name),
            self.quote(table),
            columns.join(", ")
        ))
    }

    fn drop_index_sql(&self, table: &str, index_name: &str) -> Result<String, SchemaDiffError> {
        if index_name.trim().is_empty() {
            return Err(SchemaDiffError::BlankIndexName {
                table: table.to_string(),
            });
        }
        Ok(format!(
            "DROP INDEX {} ON {};\n",
            self.quote(index_name),
            self.quote(table)
        ))
    }

    fn add_constraint_sql(
        &self,
        table: &str,
        constraint: &ConstraintModel,
    ) -> Result<String, SchemaDiffError> {
        match constraint.type_kind {
            ConstraintType::Unique => {
                require_name(constraint)?;
                let columns: Vec<String> =
                    constraint.columns.iter().map(|c| self.quote(c)).collect();
                Ok(format!(
                    "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({});\n",
                    self.quote(table),
                    self.quote(&constraint.name),
                    columns.join(", ")
                ))
            }
            ConstraintType::Check => {
                require_name(constraint)?;
                let mut sql = format!(
                    "ALTER TABLE {} ADD CONSTRAINT {}",
                    self.quote(table),
                    self.quote(&constraint.name)
                );
                if let Some(check) = &constraint.check_clause {
                    sql.push_str(&format!(" CHECK ({})", check));
                }
                sql.push_str(";\n");
                Ok(sql)
            }
            ConstraintType::PrimaryKey => Ok(format!(
                "ALTER TABLE {} ADD {};\n",
                self.quote(table),
                self.primary_key_definition_sql(&constraint.columns)
            )),
            ConstraintType::ForeignKey => {
                require_name(constraint)?;
                let columns: Vec<String> =
                    constraint.columns.iter().map(|c| self.quote(c)).collect();
                let referenced: Vec<String> = constraint
                    .referenced_columns
                    .iter()
                    .map(|c| self.quote(c))
                    .collect();
                let mut sql = format!(
                    "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                    self.quote(table),
                    self.quote(&constraint.name),
                    columns.join(", "),
                    self.quote(constraint.referenced_table.as_deref().unwrap_or("")),
                    referenced.join(", ")
                );
                if constraint.on_delete != OnDeleteAction::NoAction {
                    sql.push_str(" ON DELETE ");
                    sql.push_str(constraint.on_delete.sql());
                }
                if constraint.on_update != OnUpdateAction::NoAction {
                    sql.push_str(" ON UPDATE ");
                    sql.push_str(constraint.on_update.sql());
                }
                sql.push_str(";\n");
                Ok(sql)
            }
            ConstraintType::Index => {
                let index = IndexModel {
                    index_name: constraint.name.clone(),
                    table_name: table.to_string(),
                    column_names: constraint.columns.clone(),
                    ..IndexModel::default()
                };
                self.index_statement_sql(&index, table)
            }
            // DEFAULT and NOT_NULL are handled through the column path.
            ConstraintType::Default | ConstraintType::NotNull | ConstraintType::Auto => {
                Ok(String::new())
            }
        }
    }

    fn drop_constraint_sql(
        &self,
        table: &str,
        constraint: &ConstraintModel,
    ) -> Result<String, SchemaDiffError> {
        match constraint.type_kind {
            ConstraintType::Unique | ConstraintType::Index => {
                require_name(constraint)?;
                self.drop_index_sql(table, &constraint.name)
            }
            ConstraintType::Check => {
                require_name(constraint)?;
                Ok(format!(
                    "ALTER TABLE {} DROP CHECK {};\n",
                    self.quote(table),
                    self.quote(&constraint.name)
                ))
            }
            ConstraintType::PrimaryKey => Ok(format!(
                "ALTER TABLE {} DROP PRIMARY KEY;\n",
                self.quote(table)
            )),
            ConstraintType::ForeignKey => {
                require_name(constraint)?;
                Ok(format!(
                    "ALTER TABLE {} DROP FOREIGN KEY {};\n",
                    self.quote(table),
                    self.quote(&constraint.name)
                ))
            }
            ConstraintType::Default | ConstraintType::NotNull | ConstraintType::Auto => {
                Ok(String::new())
            }
        }
    }

    fn add_relationship_sql(&self, table: &str, rel: &RelationshipModel) -> String {
        if rel.no_constraint {
            return String::new();
        }
        let target_table = if rel.table_name.is_empty() {
            table
        } else {
            &rel.table_name
        };
        let constraint_name = self.relationship_constraint_name(target_table, rel);
        let columns: Vec<String> = rel.columns.iter().map(|c| self.quote(c)).collect();
        let referenced: Vec<String> = rel.referenced_columns.iter().map(|c| self.quote(c)).collect();

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote(target_table),
            self.quote(&constraint_name),
            columns.join(","),
            self.quote(&rel.referenced_table),
            referenced.join(",")
        );
        if rel.on_delete != OnDeleteAction::NoAction {
            sql.push_str(" ON DELETE ");
            sql.push_str(rel.on_delete.sql());
        }
        if rel.on_update != OnUpdateAction::NoAction {
            sql.push_str(" ON UPDATE ");
            sql.push_str(rel.on_update.sql());
        }
        sql.push_str(";\n");
        sql
    }

    fn drop_relationship_sql(&self, table: &str, rel: &RelationshipModel) -> String {
        if rel.no_constraint {
            return String::new();
        }
        let target_table = if rel.table_name.is_empty() {
            table
        } else {
            &rel.table_name
        };
        let constraint_name = self.relationship_constraint_name(target_table, rel);
        format!(
            "ALTER TABLE {} DROP FOREIGN KEY {};\n",
            self.quote(target_table),
            self.quote(&constraint_name)
        )
    }

    fn table_generators(&self) -> Option<&dyn TableGeneratorDialect> {
        Some(self)
    }

    fn changesets(&self) -> Option<&dyn ChangesetDialect> {
        Some(self)
    }
}

impl TableGeneratorDialect for MySqlDialect {
    fn create_table_generator_sql(
        &self,
        tg: &TableGeneratorModel,
    ) -> Result<String, SchemaDiffError> {
        require_generator_table(tg)?;
        let string_type = self.mapper.map("java.lang.String");
        let key_value = if tg.pk_column_value.is_empty() {
            &tg.name
        } else {
            &tg.pk_column_value
        };
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({} VARCHAR(255) NOT NULL PRIMARY KEY, {} BIGINT NOT NULL);\n",
            self.quote(&tg.table),
            self.quote(&tg.pk_column_name),
            self.quote(&tg.value_column_name)
        );
        sql.push_str(&format!(
            "INSERT IGNORE INTO {} ({}, {}) VALUES ({}, {});\n",
            self.quote(&tg.table),
            self.quote(&tg.pk_column_name),
            self.quote(&tg.value_column_name),
            self.transformer.quote_literal(key_value, &string_type),
            tg.initial_value
        ));
        Ok(sql)
    }

    fn drop_table_generator_sql(
        &self,
        tg: &TableGeneratorModel,
    ) -> Result<String, SchemaDiffError> {
        require_generator_table(tg)?;
        Ok(format!(
            "DROP TABLE IF EXISTS {};\n",
            self.quote(&tg.table)
        ))
    }

    fn alter_table_generator_sql(
        &self,
        new_tg: &TableGeneratorModel,
        old_tg: &TableGeneratorModel,
    ) -> Result<String, SchemaDiffError> {
        // The generator table carries live allocation state; layout changes
        // are applied as drop + create.
        if new_tg.table != old_tg.table
            || new_tg.pk_column_name != old_tg.pk_column_name
            || new_tg.value_column_name != old_tg.value_column_name
        {
            let mut sql = self.drop_table_generator_sql(old_tg)?;
            sql.push_str(&self.create_table_generator_sql(new_tg)?);
            return Ok(sql);
        }
        Ok(String::new())
    }
}

impl ChangesetDialect for MySqlDialect {
    fn changeset_type_name(&self, column: &ColumnModel) -> String {
        if let Some(override_type) = column.sql_type_override.as_deref() {
            let trimmed = override_type.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        if column.lob {
            return if column.java_type == "java.lang.String" {
                "TEXT".to_string()
            } else {
                "BLOB".to_string()
            };
        }
        if !column.enum_values.is_empty() {
            return if column.enum_string_mapping {
                format!("VARCHAR({})", column.length)
            } else {
                "INT".to_string()
            };
        }
        if let Some(temporal) = column.temporal {
            return match temporal {
                TemporalKind::Date => "DATE".to_string(),
                TemporalKind::Time => "TIME".to_string(),
                TemporalKind::Timestamp => "DATETIME".to_string(),
            };
        }
        self.mapper
            .map(&column.java_type)
            .sql_type(column.length, column.precision, column.scale)
    }
}

fn require_name(constraint: &ConstraintModel) -> Result<(), SchemaDiffError> {
    if constraint.name.trim().is_empty() {
        return Err(SchemaDiffError::BlankConstraintName {
            table: constraint.table_name.clone(),
        });
    }
    Ok(())
}

fn require_generator_table(tg: &TableGeneratorModel) -> Result<(), SchemaDiffError> {
    if tg.table.trim().is_empty() {
        return Err(SchemaDiffError::MissingGeneratorTable {
            name: tg.name.clone(),
        });
    }
    Ok(())
}
