//! CREATE TABLE builder
//!
//! Body contributors render comma-separated lines inside the table body;
//! post-create contributors render standalone statements after it (index
//! creation). The trailing separator of the last body line is trimmed before
//! the body is closed.

use crate::dialect::Dialect;
use crate::error::SchemaDiffError;
use crate::model::{ColumnModel, ConstraintModel, IndexModel};

/// One comma-separated fragment of the table body.
#[derive(Debug)]
pub enum TableBodyContributor<'a> {
    /// Column definitions followed by the table-level primary key.
    Columns {
        pk_columns: Vec<String>,
        columns: Vec<&'a ColumnModel>,
    },
    Constraint(&'a ConstraintModel),
}

impl TableBodyContributor<'_> {
    pub fn priority(&self) -> i32 {
        match self {
            TableBodyContributor::Columns { .. } => 40,
            TableBodyContributor::Constraint(_) => 60,
        }
    }

    fn contribute(&self, sql: &mut String, dialect: &dyn Dialect) -> Result<(), SchemaDiffError> {
        match self {
            TableBodyContributor::Columns {
                pk_columns,
                columns,
            } => {
                for column in columns {
                    sql.push_str(&dialect.column_definition_sql(column));
                    sql.push_str(",\n");
                }
                if !pk_columns.is_empty() {
                    sql.push_str(&dialect.primary_key_definition_sql(pk_columns));
                    sql.push_str(",\n");
                }
            }
            TableBodyContributor::Constraint(constraint) => {
                let definition = dialect.constraint_definition_sql(constraint)?;
                if !definition.is_empty() {
                    sql.push_str(&definition);
                    sql.push_str(",\n");
                }
            }
        }
        Ok(())
    }
}

/// A standalone statement emitted after the closing paren.
#[derive(Debug)]
pub enum PostCreateContributor<'a> {
    Index(&'a IndexModel),
}

impl PostCreateContributor<'_> {
    pub fn priority(&self) -> i32 {
        match self {
            PostCreateContributor::Index(_) => 60,
        }
    }

    fn contribute(
        &self,
        sql: &mut String,
        dialect: &dyn Dialect,
        table: &str,
    ) -> Result<(), SchemaDiffError> {
        match self {
            PostCreateContributor::Index(index) => {
                sql.push_str(&dialect.index_statement_sql(index, table)?);
            }
        }
        Ok(())
    }
}

/// Assembles one CREATE TABLE statement plus its post-create statements.
pub struct CreateTableBuilder<'a> {
    table: &'a str,
    dialect: &'a dyn Dialect,
    body: Vec<TableBodyContributor<'a>>,
    post: Vec<PostCreateContributor<'a>>,
}

impl<'a> CreateTableBuilder<'a> {
    pub fn new(table: &'a str, dialect: &'a dyn Dialect) -> Self {
        CreateTableBuilder {
            table,
            dialect,
            body: Vec::new(),
            post: Vec::new(),
        }
    }

    pub fn add_body(&mut self, contributor: TableBodyContributor<'a>) -> &mut Self {
        self.body.push(contributor);
        self
    }

    pub fn add_post(&mut self, contributor: PostCreateContributor<'a>) -> &mut Self {
        self.post.push(contributor);
        self
    }

    pub fn build(&mut self) -> Result<String, SchemaDiffError> {
        let mut sql = self.dialect.open_create_table(self.table);

        self.body.sort_by_key(TableBodyContributor::priority);
        for contributor in &self.body {
            contributor.contribute(&mut sql, self.dialect)?;
        }
        if let Some(stripped) = sql.strip_suffix(",\n") {
            sql.truncate(stripped.len());
        }
        sql.push_str(&self.dialect.close_create_table());
        sql.push('\n');

        self.post.sort_by_key(PostCreateContributor::priority);
        for contributor in &self.post {
            contributor.contribute(&mut sql, self.dialect, self.table)?;
        }

        Ok(sql)
    }
}
