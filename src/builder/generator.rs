//! Table-generator builder
//!
//! Generator-table DDL has its own priority band: drops run before creates,
//! and a generator table is created before its seed row is inserted (the
//! create contributor emits both, in that order, as one unit).

use crate::dialect::TableGeneratorDialect;
use crate::error::SchemaDiffError;
use crate::model::TableGeneratorModel;

/// One table-generator mutation.
#[derive(Debug)]
pub enum TableGeneratorContributor<'a> {
    Drop(&'a TableGeneratorModel),
    Add(&'a TableGeneratorModel),
    Modify {
        new_tg: &'a TableGeneratorModel,
        old_tg: &'a TableGeneratorModel,
    },
}

impl TableGeneratorContributor<'_> {
    pub fn priority(&self) -> i32 {
        match self {
            TableGeneratorContributor::Drop(_) => 0,
            TableGeneratorContributor::Add(_) => 5,
            TableGeneratorContributor::Modify { .. } => 15,
        }
    }

    fn contribute(
        &self,
        sql: &mut String,
        dialect: &dyn TableGeneratorDialect,
    ) -> Result<(), SchemaDiffError> {
        match self {
            TableGeneratorContributor::Drop(tg) => {
                sql.push_str(&dialect.drop_table_generator_sql(tg)?)
            }
            TableGeneratorContributor::Add(tg) => {
                sql.push_str(&dialect.create_table_generator_sql(tg)?)
            }
            TableGeneratorContributor::Modify { new_tg, old_tg } => {
                sql.push_str(&dialect.alter_table_generator_sql(new_tg, old_tg)?)
            }
        }
        Ok(())
    }
}

/// Accumulates table-generator mutations and renders them in priority order.
pub struct TableGeneratorBuilder<'a> {
    dialect: &'a dyn TableGeneratorDialect,
    units: Vec<TableGeneratorContributor<'a>>,
}

impl<'a> TableGeneratorBuilder<'a> {
    pub fn new(dialect: &'a dyn TableGeneratorDialect) -> Self {
        TableGeneratorBuilder {
            dialect,
            units: Vec::new(),
        }
    }

    pub fn add(&mut self, unit: TableGeneratorContributor<'a>) -> &mut Self {
        self.units.push(unit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn build(&mut self) -> Result<String, SchemaDiffError> {
        let mut sql = String::new();
        self.units.sort_by_key(TableGeneratorContributor::priority);
        for unit in &self.units {
            unit.contribute(&mut sql, self.dialect)?;
        }
        Ok(sql.trim().to_string())
    }
}
