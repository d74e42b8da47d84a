use std::fmt::Write as _;

use crate::pipeline::DatasetReport;

/// Renders rows as left-aligned, two-space separated columns under a dashed
/// header rule.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    for line in std::iter::once(headers)
        .chain(std::iter::once(rule.as_slice()))
        .chain(rows.iter().map(Vec::as_slice))
    {
        let _ = writeln!(output, "{}", format_row(line, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, &width)| {
            let clean = value.replace(['\n', '\r', '\t'], " ");
            format!("{clean:<width$}")
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

/// Summary printed after a successful run.
pub fn render_reports(reports: &[DatasetReport]) -> String {
    let headers = ["dataset", "rows", "columns", "csv"]
        .map(String::from)
        .to_vec();
    let rows = reports
        .iter()
        .map(|report| {
            vec![
                report.name.to_string(),
                report.rows.to_string(),
                report.columns.to_string(),
                report.output.display().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows)
}

pub fn print_reports(reports: &[DatasetReport]) {
    print!("{}", render_reports(reports));
}
