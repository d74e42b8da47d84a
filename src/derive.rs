//! Derived ratio columns and the numeric fixes applied before them.

use anyhow::{Result, bail};
use log::debug;

use crate::{
    data::{Cell, Value, is_float_column},
    error::EtlError,
    frame::Table,
};

/// `output = numerator / denominator`, evaluated row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedMetric {
    pub numerator: &'static str,
    pub denominator: &'static str,
    pub output: &'static str,
}

impl DerivedMetric {
    pub const fn new(
        numerator: &'static str,
        denominator: &'static str,
        output: &'static str,
    ) -> Self {
        Self {
            numerator,
            denominator,
            output,
        }
    }

    /// Divides two cells. A zero or missing denominator, a missing or
    /// non-numeric operand, or a NaN quotient all yield a missing value.
    pub fn ratio(numerator: &Cell, denominator: &Cell) -> Cell {
        let numerator = numerator.as_ref().and_then(Value::as_f64)?;
        let denominator = denominator.as_ref().and_then(Value::as_f64)?;
        if denominator == 0.0 {
            return None;
        }
        let quotient = numerator / denominator;
        if quotient.is_nan() {
            None
        } else {
            Some(Value::Float(quotient))
        }
    }

    /// Appends (or overwrites) the output column.
    pub fn apply(&self, table: &mut Table) -> Result<()> {
        let num_idx = table.require_column(self.numerator)?;
        let den_idx = table.require_column(self.denominator)?;
        let values = table
            .rows()
            .iter()
            .map(|row| Self::ratio(&row[num_idx], &row[den_idx]))
            .collect::<Vec<_>>();
        let missing = values.iter().filter(|v| v.is_none()).count();
        debug!(
            "Derived '{}' = '{}' / '{}' ({missing} missing of {})",
            self.output,
            self.numerator,
            self.denominator,
            values.len()
        );
        table.set_column(self.output, values)
    }
}

/// Replaces missing values in `column` with zero and returns how many were
/// filled. Float columns get `0.0`, anything else gets the integer `0`.
pub fn fill_missing_with_zero(table: &mut Table, column: &str) -> Result<usize> {
    let idx = table.require_column(column)?;
    let zero = if is_float_column(table.column(idx)) {
        Value::Float(0.0)
    } else {
        Value::Integer(0)
    };
    let mut filled = 0usize;
    for cell in table.column_mut(idx) {
        if cell.is_none() {
            *cell = Some(zero.clone());
            filled += 1;
        }
    }
    debug!("Filled {filled} missing value(s) in '{column}' with {zero}");
    Ok(filled)
}

/// Converts every value in `column` to a float. Missing values stay missing;
/// text that is not a number aborts with a coercion fault.
pub fn coerce_to_float(table: &mut Table, column: &str) -> Result<()> {
    let idx = table.require_column(column)?;
    for (row, cell) in table.column_mut(idx).enumerate() {
        let Some(value) = cell.as_ref() else {
            continue;
        };
        let Some(number) = value.as_f64() else {
            bail!(EtlError::TypeCoercion {
                column: column.to_string(),
                row: row + 1,
                value: value.as_display(),
            });
        };
        *cell = Some(Value::Float(number));
    }
    Ok(())
}
