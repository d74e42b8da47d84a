use std::borrow::Cow;

use anyhow::Result;

use crate::{
    data::{Cell, Value, cell_display},
    frame::Table,
};

/// Trims leading/trailing whitespace without allocating.
pub fn trim(input: &str) -> Cow<'_, str> {
    Cow::Borrowed(input.trim())
}

/// Returns an uppercase representation, avoiding allocation when unnecessary.
pub fn uppercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_lowercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_uppercase())
    }
}

/// Text form of a cell, trimmed and uppercased. Missing cells become `NAN`.
pub fn normalize_text(cell: &Cell) -> String {
    let text = cell_display(cell);
    uppercase(&trim(&text)).into_owned()
}

/// Rewrites each listed column as normalized text. Every column is looked up
/// before any of them is touched, so a missing column leaves the table as is.
pub fn normalize_strings<S: AsRef<str>>(table: &mut Table, columns: &[S]) -> Result<()> {
    let indices = columns
        .iter()
        .map(|name| table.require_column(name.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    for idx in indices {
        for cell in table.column_mut(idx) {
            *cell = Some(Value::Text(normalize_text(cell)));
        }
    }
    Ok(())
}
