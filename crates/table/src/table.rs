//! Whitespace-delimited table parsing.

use crate::error::{Result, TableError};
use crate::group::GroupedTable;
use crate::schema::{ColumnKind, Schema};
use std::path::Path;

/// One parsed field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

/// One parsed line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A fully parsed table: the schema it was read against plus its rows in
/// file order.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Read and parse the whitespace-delimited table at `path`.
    ///
    /// The whole file is consumed eagerly; the first malformed line aborts
    /// the load.
    pub fn read(path: &Path, schema: Schema) -> Result<Table> {
        let content = std::fs::read_to_string(path).map_err(|source| TableError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, schema, path)
    }

    /// Parse table content directly. `path` only labels error messages,
    /// which keeps parsing testable without touching the filesystem.
    pub fn parse(content: &str, schema: Schema, path: &Path) -> Result<Table> {
        let mut rows = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != schema.len() {
                return Err(TableError::FieldCount {
                    path: path.to_path_buf(),
                    line: index + 1,
                    expected: schema.len(),
                    found: fields.len(),
                });
            }
            let mut values = Vec::with_capacity(fields.len());
            for (column, field) in schema.columns().iter().zip(&fields) {
                let value = match column.kind {
                    ColumnKind::Text => Value::Text((*field).to_string()),
                    ColumnKind::Number => {
                        let number =
                            field
                                .parse::<f64>()
                                .map_err(|_| TableError::InvalidNumber {
                                    path: path.to_path_buf(),
                                    line: index + 1,
                                    column: column.name.clone(),
                                    value: (*field).to_string(),
                                })?;
                        Value::Number(number)
                    }
                };
                values.push(value);
            }
            rows.push(Row { values });
        }
        Ok(Table { schema, rows })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text value of `column` in `row`.
    pub fn text<'a>(&self, row: &'a Row, column: &str) -> Result<&'a str> {
        text_field(&self.schema, row, column)
    }

    /// Numeric value of `column` in `row`.
    pub fn number(&self, row: &Row, column: &str) -> Result<f64> {
        number_field(&self.schema, row, column)
    }

    /// Group rows by the text values of `key_columns`, consuming the table.
    ///
    /// Group keys keep their first-appearance order; rows keep their file
    /// order within each group.
    pub fn group_by(self, key_columns: &[&str]) -> Result<GroupedTable> {
        GroupedTable::build(self, key_columns)
    }

    pub(crate) fn into_parts(self) -> (Schema, Vec<Row>) {
        (self.schema, self.rows)
    }
}

pub(crate) fn text_field<'a>(schema: &Schema, row: &'a Row, column: &str) -> Result<&'a str> {
    match row.get(schema.position(column)?) {
        Some(Value::Text(text)) => Ok(text),
        _ => Err(TableError::ColumnKind {
            column: column.to_string(),
            expected: "text",
        }),
    }
}

pub(crate) fn number_field(schema: &Schema, row: &Row, column: &str) -> Result<f64> {
    match row.get(schema.position(column)?) {
        Some(Value::Number(number)) => Ok(*number),
        _ => Err(TableError::ColumnKind {
            column: column.to_string(),
            expected: "numeric",
        }),
    }
}
