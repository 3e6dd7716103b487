//! DROP TABLE builder

use crate::dialect::Dialect;
use crate::error::SchemaDiffError;

/// One table-drop statement.
#[derive(Debug)]
pub enum DropContributor<'a> {
    TableDrop(&'a str),
}

impl DropContributor<'_> {
    pub fn priority(&self) -> i32 {
        match self {
            DropContributor::TableDrop(_) => 10,
        }
    }

    fn contribute(&self, sql: &mut String, dialect: &dyn Dialect) {
        match self {
            DropContributor::TableDrop(table) => sql.push_str(&dialect.drop_table_sql(table)),
        }
    }
}

/// Accumulates table drops and renders them in priority order.
pub struct DropTableBuilder<'a> {
    dialect: &'a dyn Dialect,
    units: Vec<DropContributor<'a>>,
}

impl<'a> DropTableBuilder<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        DropTableBuilder {
            dialect,
            units: Vec::new(),
        }
    }

    pub fn add(&mut self, unit: DropContributor<'a>) -> &mut Self {
        self.units.push(unit);
        self
    }

    pub fn build(&mut self) -> Result<String, SchemaDiffError> {
        let mut sql = String::new();
        self.units.sort_by_key(DropContributor::priority);
        for unit in &self.units {
            unit.contribute(&mut sql, self.dialect);
        }
        Ok(sql.trim().to_string())
    }
}
