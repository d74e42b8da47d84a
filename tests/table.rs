use std::path::PathBuf;

use agro_etl::pipeline::DatasetReport;
use agro_etl::table::{render_reports, render_table};

#[test]
fn render_table_widens_columns_to_longest_dataset_name() {
    let headers = vec!["dataset".to_string(), "rows".to_string(), "n".to_string()];
    let rows = vec![
        vec!["units_irrigation".to_string(), "2".to_string(), "3".to_string()],
        vec!["tecnologia".to_string(), "1".to_string(), "4".to_string()],
    ];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec![
            "dataset           rows  n",
            "----------------  ----  ---",
            "units_irrigation  2     3",
            "tecnologia        1     4",
        ]
    );
}

#[test]
fn render_table_keeps_paths_with_line_breaks_on_one_line() {
    let headers = vec!["dataset".to_string(), "csv".to_string()];
    let rows = vec![vec![
        "perennes".to_string(),
        "data/clean\nperennes.csv\tcopy".to_string(),
    ]];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "perennes  data/clean perennes.csv copy");
}

#[test]
fn render_reports_lists_each_dataset() {
    let reports = vec![DatasetReport {
        name: "ciclo_oi",
        rows: 3,
        columns: 5,
        output: PathBuf::from("data/clean/ciclo_oi.csv"),
    }];

    let rendered = render_reports(&reports);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "dataset   rows  columns  csv");
    assert_eq!(lines[2], "ciclo_oi  3     5        data/clean/ciclo_oi.csv");
}
