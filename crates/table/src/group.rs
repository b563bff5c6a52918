//! Order-preserving row grouping.

use crate::error::{Result, TableError};
use crate::schema::Schema;
use crate::table::{self, Row, Table, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Rows grouped by the text values of one or more key columns.
///
/// Keys iterate in first-appearance order; within each group, rows keep
/// their original file order. Looking up a key no row carried is an error,
/// distinct from looking up a key whose group happens to be small.
#[derive(Debug)]
pub struct GroupedTable {
    schema: Schema,
    order: Vec<Vec<String>>,
    groups: HashMap<Vec<String>, Vec<Row>>,
}

impl GroupedTable {
    pub(crate) fn build(table: Table, key_columns: &[&str]) -> Result<GroupedTable> {
        let positions = key_columns
            .iter()
            .map(|column| table.schema().position(column))
            .collect::<Result<Vec<usize>>>()?;
        let (schema, rows) = table.into_parts();

        let mut order = Vec::new();
        let mut groups: HashMap<Vec<String>, Vec<Row>> = HashMap::new();
        for row in rows {
            let mut key = Vec::with_capacity(positions.len());
            for (&position, column) in positions.iter().zip(key_columns) {
                match row.get(position) {
                    Some(Value::Text(text)) => key.push(text.clone()),
                    _ => {
                        return Err(TableError::ColumnKind {
                            column: (*column).to_string(),
                            expected: "text",
                        })
                    }
                }
            }
            match groups.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().push(row),
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(vec![row]);
                }
            }
        }
        Ok(GroupedTable {
            schema,
            order,
            groups,
        })
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rows sharing `key`, or [`TableError::MissingGroup`] when no row
    /// carried that key.
    pub fn get(&self, key: &[&str]) -> Result<&[Row]> {
        let owned: Vec<String> = key.iter().map(|part| (*part).to_string()).collect();
        match self.groups.get(&owned) {
            Some(rows) => Ok(rows),
            None => Err(TableError::MissingGroup {
                key: owned.join(" "),
            }),
        }
    }

    /// Groups in first-appearance order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &[Row])> {
        self.order.iter().map(|key| {
            let rows = self
                .groups
                .get(key)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (key.as_slice(), rows)
        })
    }

    /// Text value of `column` in `row`.
    pub fn text<'a>(&self, row: &'a Row, column: &str) -> Result<&'a str> {
        table::text_field(&self.schema, row, column)
    }

    /// Numeric value of `column` in `row`.
    pub fn number(&self, row: &Row, column: &str) -> Result<f64> {
        table::number_field(&self.schema, row, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;
    use std::path::Path;

    const MDTM: &str = "\
REC02 1 0.0 5.0 speaker NA male CAROL
REC01 1 5.0 10.0 speaker NA male ALICE
REC01 1 20.0 5.5 speaker NA female BOB
REC02 1 10.0 2.0 speaker NA male CAROL
";

    fn mdtm_table() -> Table {
        let schema = Schema::new([
            Column::text("uri"),
            Column::text("channel"),
            Column::number("start"),
            Column::number("duration"),
            Column::text("modality"),
            Column::text("confidence"),
            Column::text("gender"),
            Column::text("speaker"),
        ]);
        Table::parse(MDTM, schema, Path::new("test.mdtm")).unwrap()
    }

    #[test]
    fn keys_keep_first_appearance_order() {
        let grouped = mdtm_table().group_by(&["uri"]).unwrap();
        let keys: Vec<&str> = grouped.iter().map(|(key, _)| key[0].as_str()).collect();
        assert_eq!(keys, vec!["REC02", "REC01"]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn rows_keep_file_order_within_group() {
        let grouped = mdtm_table().group_by(&["uri"]).unwrap();
        let rows = grouped.get(&["REC02"]).unwrap();
        let starts: Vec<f64> = rows
            .iter()
            .map(|row| grouped.number(row, "start").unwrap())
            .collect();
        assert_eq!(starts, vec![0.0, 10.0]);
    }

    #[test]
    fn grouping_by_multiple_columns() {
        let grouped = mdtm_table().group_by(&["uri", "speaker"]).unwrap();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped.get(&["REC02", "CAROL"]).unwrap().len(), 2);
        assert_eq!(grouped.get(&["REC01", "BOB"]).unwrap().len(), 1);
    }

    #[test]
    fn missing_key_is_an_error() {
        let grouped = mdtm_table().group_by(&["uri"]).unwrap();
        assert!(matches!(
            grouped.get(&["REC99"]),
            Err(TableError::MissingGroup { key }) if key == "REC99"
        ));
    }

    #[test]
    fn grouping_by_unknown_column_fails() {
        assert!(matches!(
            mdtm_table().group_by(&["session"]),
            Err(TableError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn grouping_by_numeric_column_fails() {
        assert!(matches!(
            mdtm_table().group_by(&["start"]),
            Err(TableError::ColumnKind { .. })
        ));
    }
}
