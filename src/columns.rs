//! Canonical column names.
//!
//! A raw label is trimmed, lowercased, has its spaces turned into underscores
//! and then loses every character outside `[a-z0-9_]`. Accented letters are
//! dropped rather than transliterated, so `Producción` becomes `produccin`.

use anyhow::Result;
use log::{debug, warn};

use crate::frame::{Collision, Table};

pub fn normalize_column_name(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

pub fn normalize_column_names<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|label| normalize_column_name(label.as_ref()))
        .collect()
}

/// Renames every column of `table` to its canonical form.
pub fn normalize_columns(table: &mut Table) -> Result<Vec<Collision>> {
    let canonical = normalize_column_names(table.headers());
    for (raw, name) in table.headers().iter().zip(&canonical) {
        if raw != name {
            debug!("Column '{raw}' -> '{name}'");
        }
    }
    let collisions = table.set_headers(canonical)?;
    for collision in &collisions {
        warn!(
            "Columns {} and {} both normalize to '{}'; keeping the values of column {}",
            collision.kept_position + 1,
            collision.dropped_position + 1,
            collision.name,
            collision.dropped_position + 1
        );
    }
    Ok(collisions)
}
