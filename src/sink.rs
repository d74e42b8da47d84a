//! Persistence targets for a clean table: a CSV file and a relational table.
//!
//! The two writes are independent. A failure in the relational write leaves
//! the CSV in place and nothing is rolled back.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use itertools::Itertools;
use log::info;
use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};

use crate::{
    config::StoreLocation,
    data::{Cell, Value},
    frame::Table,
    io_utils,
};

/// A store that can replace a whole table at once.
///
/// The pipeline only ever needs full-replace writes, so this is the whole
/// contract; other engines plug in by implementing it.
pub trait RelationalStore {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlAffinity {
    Integer,
    Real,
    Text,
}

impl SqlAffinity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlAffinity::Integer => "INTEGER",
            SqlAffinity::Real => "REAL",
            SqlAffinity::Text => "TEXT",
        }
    }

    /// Integer and boolean columns are `INTEGER`, any float makes a column
    /// `REAL`, any text makes it `TEXT`. Columns with no values are `REAL`.
    pub fn infer<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut any_value = false;
        let mut any_float = false;
        for value in cells.into_iter().flatten() {
            any_value = true;
            match value {
                Value::Text(_) => return SqlAffinity::Text,
                Value::Float(_) => any_float = true,
                Value::Integer(_) | Value::Boolean(_) => {}
            }
        }
        if any_float || !any_value {
            SqlAffinity::Real
        } else {
            SqlAffinity::Integer
        }
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_value(cell: &Cell) -> SqlValue {
    match cell {
        None => SqlValue::Null,
        Some(Value::Text(s)) => SqlValue::Text(s.clone()),
        Some(Value::Integer(i)) => SqlValue::Integer(*i),
        Some(Value::Float(f)) => SqlValue::Real(*f),
        Some(Value::Boolean(b)) => SqlValue::Integer(i64::from(*b)),
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(location: &StoreLocation) -> Result<Self> {
        let conn = match location {
            StoreLocation::Memory => {
                Connection::open_in_memory().context("Opening in-memory SQLite database")?
            }
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Creating database directory {parent:?}"))?;
                }
                Connection::open(path)
                    .with_context(|| format!("Opening SQLite database {path:?}"))?
            }
        };
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreLocation::Memory)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RelationalStore for SqliteStore {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<()> {
        if table.column_count() == 0 {
            bail!("Table '{name}' has no columns to store");
        }
        let quoted = quote_identifier(name);
        let definitions = table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                format!(
                    "{} {}",
                    quote_identifier(header),
                    SqlAffinity::infer(table.column(idx)).as_str()
                )
            })
            .join(", ");
        let placeholders = (1..=table.column_count())
            .map(|idx| format!("?{idx}"))
            .join(", ");

        let tx = self
            .conn
            .transaction()
            .with_context(|| format!("Starting write to table '{name}'"))?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {quoted}; CREATE TABLE {quoted} ({definitions});"
        ))
        .with_context(|| format!("Recreating table '{name}'"))?;
        {
            let mut stmt = tx
                .prepare(&format!("INSERT INTO {quoted} VALUES ({placeholders})"))
                .with_context(|| format!("Preparing insert into '{name}'"))?;
            for (idx, row) in table.rows().iter().enumerate() {
                stmt.execute(params_from_iter(row.iter().map(sql_value)))
                    .with_context(|| format!("Inserting row {} into '{name}'", idx + 1))?;
            }
        }
        tx.commit()
            .with_context(|| format!("Committing table '{name}'"))?;
        Ok(())
    }
}

/// Writes `<dir>/<name>.csv`, creating `dir` when needed.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    pub fn write(&self, name: &str, table: &Table) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Creating output directory {:?}", self.dir))?;
        let path = self.path_for(name);
        let mut writer = io_utils::open_csv_writer(&path)?;
        io_utils::write_csv_table(table, &mut writer)
            .with_context(|| format!("Writing {path:?}"))?;
        Ok(path)
    }
}

/// The flat-file and relational targets written for every dataset.
pub struct DualSink<'a> {
    csv: CsvSink,
    store: &'a mut dyn RelationalStore,
}

impl<'a> DualSink<'a> {
    pub fn new(csv: CsvSink, store: &'a mut dyn RelationalStore) -> Self {
        Self { csv, store }
    }

    /// Writes the CSV file, then replaces the relational table.
    pub fn write(&mut self, name: &str, table: &Table) -> Result<PathBuf> {
        let path = self.csv.write(name, table)?;
        info!("Wrote {} row(s) to {path:?}", table.row_count());
        self.store
            .replace_table(name, table)
            .with_context(|| format!("Storing table '{name}'"))?;
        info!("Replaced relational table '{name}'");
        Ok(path)
    }
}
