use std::fmt;

use super::Criteria;
use crate::core::{Result, SchemaError};

/// Outer join from the primary table to `table`, reachable in expressions
/// as `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftJoin {
    table: String,
    alias: String,
    on: Criteria,
}

impl LeftJoin {
    /// The alias is taken as given; `RowFields::add_join` checks it when the
    /// join is registered.
    pub fn new(table: &str, alias: &str, on: Criteria) -> Result<Self> {
        let table = table.trim();
        if table.is_empty() {
            return Err(SchemaError::missing("table"));
        }

        Ok(Self {
            table: table.to_string(),
            alias: alias.to_string(),
            on,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn on_criteria(&self) -> &Criteria {
        &self.on
    }

    pub fn to_sql(&self) -> String {
        format!("LEFT JOIN {} {} ON ({})", self.table, self.alias, self.on)
    }
}

impl fmt::Display for LeftJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}
