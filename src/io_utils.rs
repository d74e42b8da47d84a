//! Loading source tables and writing clean CSV.
//!
//! - **Format dispatch**: `.csv` goes through the `csv` reader, `.xlsx`/`.xls`
//!   (and `.xlsm`/`.ods`) through `calamine`. Any other extension is rejected
//!   before the file is opened.
//! - **Encoding**: CSV input is decoded as UTF-8 via `encoding_rs`; a leading
//!   BOM is dropped and undecodable bytes are an error.
//! - **Headers**: blank header cells become `Unnamed: <idx>` and repeated
//!   headers get `.1`, `.2`, ... suffixes, so a raw table never has two
//!   columns with the same label.
//! - **Output**: comma-delimited, header row, quoting only where needed,
//!   missing values as empty fields.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::{Cell, Value, harmonize_numeric_column, is_missing_token, parse_column},
    error::EtlError,
    frame::Table,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(SourceFormat::Csv),
            Some(ext)
                if ["xlsx", "xls", "xlsm", "ods"]
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known)) =>
            {
                Ok(SourceFormat::Spreadsheet)
            }
            _ => Err(EtlError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }
}

/// Reads a source file into a raw table according to its extension.
pub fn load_table(path: &Path) -> Result<Table> {
    let table = match SourceFormat::from_path(path)? {
        SourceFormat::Csv => {
            let bytes = fs::read(path).with_context(|| format!("Opening input file {path:?}"))?;
            let text = decode_bytes(&bytes, UTF_8)
                .with_context(|| format!("Decoding input file {path:?}"))?;
            read_csv_table(&text)
        }
        SourceFormat::Spreadsheet => read_spreadsheet_table(path),
    }
    .with_context(|| format!("Loading {path:?}"))?;
    debug!(
        "Loaded {} row(s) x {} column(s) from {path:?}",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

/// Parses CSV text with a header row, inferring a type per column.
pub fn read_csv_table(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(DEFAULT_CSV_DELIMITER)
        .double_quote(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers = reader
        .headers()
        .context("Reading header row")?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if raw_headers.is_empty() {
        bail!("No columns to parse from file");
    }
    let headers = dedupe_headers(raw_headers);

    let mut records = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        if record.len() > headers.len() {
            bail!(EtlError::RaggedRow {
                row: row_idx + 1,
                expected: headers.len(),
                found: record.len(),
            });
        }
        records.push(record);
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let raw = records
                .iter()
                .map(|record| record.get(idx).unwrap_or(""))
                .collect::<Vec<_>>();
            (name, parse_column(&raw))
        })
        .collect();
    Table::from_columns(columns)
}

/// Reads the first worksheet of a workbook, using its first row as header.
pub fn read_spreadsheet_table(path: &Path) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook {path:?} has no worksheets"))?
        .with_context(|| format!("Reading first worksheet of {path:?}"))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("No columns to parse from file");
    };
    let headers = dedupe_headers(header_row.iter().map(header_text).collect());

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(spreadsheet_cell));
        }
    }
    for column in &mut columns {
        harmonize_numeric_column(column);
    }
    Table::from_columns(headers.into_iter().zip(columns).collect())
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => None,
        Data::String(s) if is_missing_token(s) => None,
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) => Some(Value::Float(*f)),
        Data::Bool(b) => Some(Value::Boolean(*b)),
        Data::Error(_) => None,
        other => Some(Value::Text(other.to_string())),
    }
}

/// Fills in blank labels and disambiguates repeated ones.
pub fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, label) in raw.into_iter().enumerate() {
        let base = if label.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            label
        };
        let mut candidate = base.clone();
        let mut suffix = 1usize;
        while headers.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

pub fn open_csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    Ok(csv_writer(BufWriter::new(file)))
}

pub fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(writer)
}

/// Writes the header row and every row of `table`.
pub fn write_csv_table<W: Write>(table: &Table, writer: &mut csv::Writer<W>) -> Result<()> {
    writer
        .write_record(table.headers())
        .context("Writing output headers")?;
    for (idx, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| {
                cell.as_ref()
                    .map(Value::as_display)
                    .unwrap_or_default()
            }))
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}
