//! Schema-driven loading of whitespace-delimited annotation tables.
//!
//! The corpus annotation files (UEM, MDTM, RTTM, session and trial lists)
//! are headerless text tables: one record per line, fields separated by
//! runs of whitespace. This crate turns them into typed rows:
//!
//! - [`Schema`] names each column and declares it text or numeric
//! - [`Table`] reads and parses a file against a schema
//! - [`GroupedTable`] groups rows by key columns, preserving file order
//!
//! Every malformed line is a hard error; there is no row-level recovery.
//!
//! # Example
//!
//! ```ignore
//! use odessa_table::{Column, Schema, Table};
//!
//! let schema = Schema::new([
//!     Column::text("uri"),
//!     Column::number("start"),
//!     Column::number("end"),
//! ]);
//! let table = Table::read(Path::new("AMI.p1.dev.uem"), schema)?;
//! let by_uri = table.group_by(&["uri"])?;
//! ```

mod error;
mod group;
mod schema;
mod table;

pub use error::{Result, TableError};
pub use group::GroupedTable;
pub use schema::{Column, ColumnKind, Schema};
pub use table::{Row, Table, Value};
