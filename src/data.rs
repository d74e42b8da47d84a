//! Cell values and column type inference.
//!
//! Source files are loaded verbatim into [`Cell`]s: an absent value is `None`,
//! everything else is a typed [`Value`]. Types are decided per column, the way
//! the tabular loaders this job was designed around do it: a column that is
//! entirely integral stays integral unless it has gaps, in which case it is
//! widened to float so the gaps can be represented.

use std::fmt;

/// Raw tokens that load as a missing value rather than text.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text written in place of a missing value when a cell is coerced to a string.
pub const MISSING_TEXT: &str = "nan";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

pub type Cell = Option<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl Value {
    /// Textual form used for flat-file output and string normalization.
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Boolean(true) => "True".to_string(),
            Value::Boolean(false) => "False".to_string(),
        }
    }

    /// Numeric view of the value. Text counts only when it parses as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Formats a float so whole numbers keep a trailing `.0` (`100.0`, `0.5`).
///
/// Magnitudes from `1e16` up or below `1e-4` use scientific notation with a
/// signed exponent of at least two digits (`1e+16`, `2.5e-05`).
pub fn format_float(value: f64) -> String {
    let shortest = format!("{value:?}");
    let Some((mantissa, exponent)) = shortest.split_once('e') else {
        return shortest;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

pub fn cell_display(cell: &Cell) -> String {
    cell.as_ref()
        .map(Value::as_display)
        .unwrap_or_else(|| MISSING_TEXT.to_string())
}

pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

fn parse_boolean(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Decides the type of a column from its raw text values.
pub fn infer_column_kind<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a str>,
{
    let mut any_missing = false;
    let mut all_integer = true;
    let mut all_float = true;
    let mut all_boolean = true;
    let mut seen = 0usize;

    for raw in values {
        if is_missing_token(raw) {
            any_missing = true;
            continue;
        }
        seen += 1;
        let trimmed = raw.trim();
        if all_integer && trimmed.parse::<i64>().is_err() {
            all_integer = false;
        }
        if all_float && trimmed.parse::<f64>().is_err() {
            all_float = false;
        }
        if all_boolean && parse_boolean(trimmed).is_none() {
            all_boolean = false;
        }
    }

    if seen == 0 {
        return ColumnKind::Float;
    }
    match (all_integer, all_float, all_boolean) {
        (true, _, _) if any_missing => ColumnKind::Float,
        (true, _, _) => ColumnKind::Integer,
        (_, true, _) => ColumnKind::Float,
        (_, _, true) => ColumnKind::Boolean,
        _ => ColumnKind::Text,
    }
}

/// Parses one raw value under an already inferred column kind.
pub fn parse_cell(raw: &str, kind: ColumnKind) -> Cell {
    if is_missing_token(raw) {
        return None;
    }
    let trimmed = raw.trim();
    match kind {
        ColumnKind::Integer => trimmed.parse().ok().map(Value::Integer),
        ColumnKind::Float => trimmed.parse().ok().map(Value::Float),
        ColumnKind::Boolean => parse_boolean(trimmed).map(Value::Boolean),
        ColumnKind::Text => Some(Value::Text(raw.to_string())),
    }
}

/// Infers the kind of a column and parses every value in it.
pub fn parse_column(raw: &[&str]) -> Vec<Cell> {
    let kind = infer_column_kind(raw.iter().copied());
    raw.iter().map(|value| parse_cell(value, kind)).collect()
}

/// Aligns a column of already typed numbers: integral columns with gaps
/// become float, and whole-valued float columns without gaps become integer.
/// Columns that hold anything besides numbers are left alone.
pub fn harmonize_numeric_column(cells: &mut [Cell]) {
    let mut any_missing = false;
    let mut all_integral = true;
    for cell in cells.iter() {
        match cell {
            None => any_missing = true,
            Some(Value::Integer(_)) => {}
            Some(Value::Float(f)) => {
                if f.fract() != 0.0 || !f.is_finite() || f.abs() >= i64::MAX as f64 {
                    all_integral = false;
                }
            }
            Some(_) => return,
        }
    }
    for cell in cells.iter_mut() {
        let Some(value) = cell.as_ref() else {
            continue;
        };
        let promoted = match value {
            Value::Integer(i) if any_missing || !all_integral => Value::Float(*i as f64),
            Value::Float(f) if !any_missing && all_integral => Value::Integer(*f as i64),
            _ => continue,
        };
        *cell = Some(promoted);
    }
}

/// True when every present value is a float; vacuously true for empty columns.
pub fn is_float_column<'a, I>(cells: I) -> bool
where
    I: IntoIterator<Item = &'a Cell>,
{
    cells
        .into_iter()
        .flatten()
        .all(|value| matches!(value, Value::Float(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_float_keeps_whole_number_suffix() {
        assert_eq!(format_float(100.0), "100.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-3.0), "-3.0");
    }

    #[test]
    fn format_float_pads_scientific_exponent() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e16), "1.5e+16");
        assert_eq!(format_float(1e-5), "1e-05");
        assert_eq!(format_float(2.5e-7), "2.5e-07");
        assert_eq!(format_float(1e300), "1e+300");
        assert_eq!(format_float(0.0001), "0.0001");
    }

    #[test]
    fn infer_column_kind_widens_integers_with_gaps() {
        assert_eq!(infer_column_kind(["1", "2", "3"]), ColumnKind::Integer);
        assert_eq!(infer_column_kind(["1", "", "3"]), ColumnKind::Float);
        assert_eq!(infer_column_kind(["1", "NA", "3"]), ColumnKind::Float);
        assert_eq!(infer_column_kind(["1.5", "2"]), ColumnKind::Float);
        assert_eq!(infer_column_kind(["True", "false"]), ColumnKind::Boolean);
        assert_eq!(infer_column_kind(["Jalisco", "7"]), ColumnKind::Text);
        assert_eq!(infer_column_kind(["", "nan"]), ColumnKind::Float);
    }

    #[test]
    fn parse_column_keeps_text_verbatim() {
        let cells = parse_column(&[" Jalisco ", "", "Sonora"]);
        assert_eq!(
            cells,
            vec![
                Some(Value::Text(" Jalisco ".to_string())),
                None,
                Some(Value::Text("Sonora".to_string())),
            ]
        );
    }

    #[test]
    fn float_display_keeps_decimal_point() {
        assert_eq!(Value::Float(100.0).as_display(), "100.0");
        assert_eq!(Value::Float(0.5).as_display(), "0.5");
        assert_eq!(Value::Integer(7).as_display(), "7");
        assert_eq!(Value::Boolean(true).as_display(), "True");
        assert_eq!(cell_display(&None), "nan");
    }

    #[test]
    fn as_f64_parses_numeric_text_only() {
        assert_eq!(Value::Text(" 12.5 ".to_string()).as_f64(), Some(12.5));
        assert_eq!(Value::Text("n/d".to_string()).as_f64(), None);
        assert_eq!(Value::Boolean(false).as_f64(), Some(0.0));
    }

    #[test]
    fn harmonize_numeric_column_promotes_and_demotes() {
        let mut gaps = vec![Some(Value::Integer(1)), None];
        harmonize_numeric_column(&mut gaps);
        assert_eq!(gaps, vec![Some(Value::Float(1.0)), None]);

        let mut whole = vec![Some(Value::Float(3.0)), Some(Value::Integer(4))];
        harmonize_numeric_column(&mut whole);
        assert_eq!(whole, vec![Some(Value::Integer(3)), Some(Value::Integer(4))]);

        let mut mixed = vec![Some(Value::Float(3.0)), Some(Value::Text("x".into()))];
        harmonize_numeric_column(&mut mixed);
        assert_eq!(mixed[0], Some(Value::Float(3.0)));
    }

    #[test]
    fn is_float_column_ignores_missing() {
        let cells = vec![None, Some(Value::Float(1.0))];
        assert!(is_float_column(&cells));
        let cells = vec![None, Some(Value::Text("x".into()))];
        assert!(!is_float_column(&cells));
        assert!(is_float_column(&Vec::<Cell>::new()));
    }
}
