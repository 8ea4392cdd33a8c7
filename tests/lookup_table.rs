use std::{fs, path::PathBuf};

use pem_electrolyzer_twin::lookup_table::{
    self, DataSourceError, KeyMatch, LookupTable, MeasurementRecord, TableCache,
};

const HEADER: &str = "Voltaje,Corriente,Tasa de producción H2(ml/min)";

fn temp_csv(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "pem_twin_{}_{name}.csv",
        std::process::id()
    ));
    fs::write(&path, body).expect("write temp csv");
    path
}

#[test]
fn reads_rows_and_averages_repeated_keys() {
    let csv = format!("{HEADER}\n5.3,1.5,40\n5.3,1.5,60\n6.2,6.6,310.5\n");
    let table = lookup_table::from_reader(csv.as_bytes()).expect("parse");
    assert_eq!(table.len(), 3);
    let rate = table.query_samples(5.3, 1.5).expect("row");
    assert_eq!(rate.samples, 2);
    assert!((rate.h2_l_min - 0.05).abs() < 1e-12);
    assert!((table.query(6.2, 6.6).expect("row") - 0.3105).abs() < 1e-12);
    assert_eq!(table.query(5.75, 4.0), None);
}

#[test]
fn extra_columns_and_column_order_are_tolerated() {
    let csv = "Fecha,Tasa de producción H2(ml/min),Corriente,Voltaje\n\
               2024-01-01,25,2.05,5.3\n";
    let table = lookup_table::from_reader(csv.as_bytes()).expect("parse");
    assert!((table.query(5.3, 2.05).expect("row") - 0.025).abs() < 1e-12);
}

#[test]
fn semicolon_files_use_decimal_commas() {
    let csv = "Voltaje;Corriente;Tasa de producción H2(ml/min)\n5,75;4,5;132,25\n";
    let table = lookup_table::from_reader(csv.as_bytes()).expect("parse");
    assert_eq!(
        table.records(),
        &[MeasurementRecord {
            voltage: 5.75,
            current: 4.5,
            gas_rate_ml_per_min: 132.25,
        }]
    );
}

#[test]
fn byte_order_mark_and_blank_rows_are_skipped() {
    let csv = format!("\u{feff}{HEADER}\n5.3,1.5,50\n,,\n\n6.2,5.4,90\n");
    let table = lookup_table::from_reader(csv.as_bytes()).expect("parse");
    assert_eq!(table.len(), 2);
}

#[test]
fn missing_column_is_reported_by_name() {
    let csv = "Voltaje,Corriente\n5.3,1.5\n";
    match lookup_table::from_reader(csv.as_bytes()) {
        Err(DataSourceError::MissingColumn(name)) => {
            assert_eq!(name, lookup_table::RATE_COLUMN)
        }
        other => panic!("expected missing column, got {other:?}"),
    }
}

#[test]
fn malformed_cell_reports_line_and_column() {
    let csv = format!("{HEADER}\n5.3,1.5,50\n5.3,abc,60\n");
    match lookup_table::from_reader(csv.as_bytes()) {
        Err(DataSourceError::Malformed {
            line,
            column,
            value,
        }) => {
            assert_eq!(line, 3);
            assert_eq!(column, lookup_table::CURRENT_COLUMN);
            assert_eq!(value, "abc");
        }
        other => panic!("expected malformed cell, got {other:?}"),
    }
}

#[test]
fn key_matching_modes() {
    let records = vec![MeasurementRecord {
        voltage: 5.75,
        current: 4.0,
        gas_rate_ml_per_min: 100.0,
    }];
    let tolerant = LookupTable::new(records.clone());
    assert_eq!(tolerant.key_match(), KeyMatch::default());
    assert!(tolerant.query(5.75 + 1e-9, 4.0).is_some());
    assert!(tolerant.query(5.76, 4.0).is_none());

    let exact = LookupTable::new(records).with_key_match(KeyMatch::Exact);
    assert!(exact.query(5.75, 4.0).is_some());
    assert!(exact.query(5.75 + 1e-9, 4.0).is_none());

    assert_eq!(KeyMatch::from_tolerance(None), KeyMatch::Exact);
    assert_eq!(KeyMatch::from_tolerance(Some(0.0)), KeyMatch::Exact);
    assert_eq!(
        KeyMatch::from_tolerance(Some(0.01)),
        KeyMatch::Tolerance(0.01)
    );
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("pem_twin_does_not_exist.csv");
    assert!(matches!(
        lookup_table::load(&path),
        Err(DataSourceError::Io(_))
    ));
}

#[test]
fn cache_reads_each_path_once() {
    let path = temp_csv("cache", &format!("{HEADER}\n5.3,1.5,50\n"));
    let mut cache = TableCache::new();
    assert!(!cache.contains(&path));
    let first = cache
        .get_or_load(&path, KeyMatch::default())
        .expect("first load");
    assert!(cache.contains(&path));

    // 파일이 바뀌어도 캐시된 표가 그대로 쓰인다.
    fs::write(&path, format!("{HEADER}\n5.3,1.5,80\n6.2,6.0,1\n")).expect("rewrite");
    let second = cache
        .get_or_load(&path, KeyMatch::default())
        .expect("cached");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 1);
    let _ = fs::remove_file(&path);
}

#[test]
fn failed_load_is_not_cached() {
    let path = std::env::temp_dir().join(format!(
        "pem_twin_{}_late.csv",
        std::process::id()
    ));
    let _ = fs::remove_file(&path);
    let mut cache = TableCache::new();
    assert!(cache.get_or_load(&path, KeyMatch::Exact).is_err());
    assert!(!cache.contains(&path));

    fs::write(&path, format!("{HEADER}\n5.3,1.5,50\n")).expect("write");
    let table = cache.get_or_load(&path, KeyMatch::Exact).expect("load");
    assert_eq!(table.key_match(), KeyMatch::Exact);
    let _ = fs::remove_file(&path);
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn workbook_first_sheet_is_read_and_averaged() {
    let table = lookup_table::load(fixture("mediciones.xlsx")).expect("workbook");
    // 빈 행은 건너뛰고 4개 측정값만 남는다.
    assert_eq!(table.len(), 4);
    let rate = table.query_samples(5.3, 1.5).expect("row");
    assert_eq!(rate.samples, 2);
    assert!((rate.h2_l_min - 0.05).abs() < 1e-12);
    assert!((table.query(6.2, 6.6).expect("row") - 0.3105).abs() < 1e-12);
    // 텍스트 셀 "132,25"는 소수점 쉼표로 읽는다.
    assert!((table.query(5.75, 4.0).expect("row") - 0.13225).abs() < 1e-12);
}

#[test]
fn workbook_without_rate_column_is_rejected() {
    match lookup_table::load(fixture("sin_tasa.xlsx")) {
        Err(DataSourceError::MissingColumn(name)) => {
            assert_eq!(name, lookup_table::RATE_COLUMN)
        }
        other => panic!("expected missing column, got {other:?}"),
    }
}

#[test]
fn format_is_chosen_by_extension() {
    assert!(lookup_table::is_workbook(std::path::Path::new("Datosvoltaje.xlsx")));
    assert!(lookup_table::is_workbook(std::path::Path::new("DATOS.XLS")));
    assert!(!lookup_table::is_workbook(std::path::Path::new("datos.csv")));
    assert!(!lookup_table::is_workbook(std::path::Path::new("datos")));

    // 통합문서를 CSV로 읽지 않는다.
    let copy = std::env::temp_dir().join(format!(
        "pem_twin_{}_copy.xlsx",
        std::process::id()
    ));
    fs::copy(fixture("mediciones.xlsx"), &copy).expect("copy fixture");
    let mut cache = TableCache::new();
    let table = cache
        .get_or_load(&copy, KeyMatch::default())
        .expect("workbook through cache");
    assert_eq!(table.len(), 4);
    let _ = fs::remove_file(&copy);

    let missing = std::env::temp_dir().join("pem_twin_missing_book.xlsx");
    assert!(matches!(
        lookup_table::load(&missing),
        Err(DataSourceError::Io(_))
    ));
}
