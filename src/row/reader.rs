use crate::core::{Result, SchemaError, Value};

/// Positional access to the current record of a query result.
pub trait DataReader {
    fn field_count(&self) -> usize;

    fn column_name(&self, column: usize) -> Option<&str>;

    fn is_null(&self, column: usize) -> Result<bool> {
        Ok(self.get_value(column)?.is_null())
    }

    fn get_value(&self, column: usize) -> Result<Value>;

    fn ordinal(&self, name: &str) -> Option<usize> {
        (0..self.field_count()).find(|&i| self.column_name(i) == Some(name))
    }
}

/// A single in-memory record exposed through [`DataReader`].
#[derive(Debug, Clone, Default)]
pub struct ValueReader {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl ValueReader {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(SchemaError::Reader(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let (columns, values) = pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self { columns, values }
    }
}

impl DataReader for ValueReader {
    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    fn get_value(&self, column: usize) -> Result<Value> {
        self.values
            .get(column)
            .cloned()
            .ok_or_else(|| SchemaError::Reader(format!("column {} out of range", column)))
    }
}
