//! In-memory table shared by every stage of a dataset pipeline.

use anyhow::{Result, bail};
use itertools::Itertools;

use crate::{data::Cell, error::EtlError};

/// Ordered rows under an ordered header. Loaded once per dataset, transformed
/// in place, written to both sinks and then dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// A header that lost its column to a later column with the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub name: String,
    pub kept_position: usize,
    pub dropped_position: usize,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            bail!(EtlError::RaggedRow {
                row: idx + 1,
                expected: headers.len(),
                found: row.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Builds a table from named columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<Cell>)>) -> Result<Self> {
        let height = columns.first().map(|(_, cells)| cells.len()).unwrap_or(0);
        if let Some((name, cells)) = columns.iter().find(|(_, cells)| cells.len() != height) {
            bail!(
                "Column '{name}' has {} value(s) but the table has {height} row(s)",
                cells.len()
            );
        }
        let mut headers = Vec::with_capacity(columns.len());
        let mut rows = vec![Vec::with_capacity(columns.len()); height];
        for (name, cells) in columns {
            headers.push(name);
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.push(cell);
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Looks up a column, treating its absence as a configuration fault.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            EtlError::MissingColumn {
                column: name.to_string(),
                available: self.headers.iter().join(", "),
            }
            .into()
        })
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    pub fn column_mut(&mut self, index: usize) -> impl Iterator<Item = &mut Cell> + '_ {
        self.rows.iter_mut().map(move |row| &mut row[index])
    }

    /// Replaces the named column, or appends it when absent.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<()> {
        if values.len() != self.rows.len() {
            bail!(
                "Column '{name}' has {} value(s) but the table has {} row(s)",
                values.len(),
                self.rows.len()
            );
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Renames every column at once. When two columns end up with the same
    /// name the later one wins: its values move into the earlier position and
    /// the later position is removed.
    pub fn set_headers(&mut self, names: Vec<String>) -> Result<Vec<Collision>> {
        if names.len() != self.headers.len() {
            bail!(
                "Expected {} column name(s), got {}",
                self.headers.len(),
                names.len()
            );
        }

        let mut collisions = Vec::new();
        let mut first_seen: Vec<(String, usize)> = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            match first_seen.iter().find(|(seen, _)| seen == name) {
                Some((_, kept)) => collisions.push(Collision {
                    name: name.clone(),
                    kept_position: *kept,
                    dropped_position: idx,
                }),
                None => first_seen.push((name.clone(), idx)),
            }
        }

        for collision in &collisions {
            for row in &mut self.rows {
                row[collision.kept_position] = row[collision.dropped_position].take();
            }
        }
        let dropped = collisions
            .iter()
            .map(|c| c.dropped_position)
            .collect::<Vec<_>>();
        self.headers = names
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !dropped.contains(idx))
            .map(|(_, name)| name)
            .collect();
        for row in &mut self.rows {
            let mut position = 0usize;
            row.retain(|_| {
                let keep = !dropped.contains(&position);
                position += 1;
                keep
            });
        }
        Ok(collisions)
    }

    /// Renames one column. Returns `false` when `from` is not present.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool> {
        let Some(idx) = self.column_index(from) else {
            return Ok(false);
        };
        let mut names = self.headers.clone();
        names[idx] = to.to_string();
        self.set_headers(names)?;
        Ok(true)
    }
}
