//! Directory-level behavior against temporary fixtures: write, load,
//! reformat and validate a data directory end to end.

use std::fs;
use std::path::Path;

use curdata_core::{CurrencyCode, CurrencyLocaleTable, CurrencyMeta, LocaleId, MetaTable};
use curdata_store::{
    IssueKind, StoreError, format_dir, load_dir, validate_dir, write_meta, write_table,
};
use tracing::Level;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::parse(s).unwrap()
}

fn table(locale: &str, rows: &[(&str, &str, &str)]) -> CurrencyLocaleTable {
    let mut t = CurrencyLocaleTable::new(LocaleId::parse(locale).unwrap());
    for (c, symbol, name) in rows {
        t.insert(code(c), *symbol, *name).unwrap();
    }
    t
}

fn seed(dir: &Path) {
    write_table(
        dir,
        &table("en", &[("EUR", "€", "Euro"), ("USD", "$", "US Dollar")]),
    )
    .unwrap();
    write_table(
        dir,
        &table("de", &[("EUR", "€", "Euro")]).with_version("36"),
    )
    .unwrap();

    let mut meta = MetaTable::new();
    meta.set_fraction_info(code("JPY"), CurrencyMeta::uniform(0, 0));
    meta.set_numeric_code(code("EUR"), 978).unwrap();
    meta.set_numeric_code(code("USD"), 840).unwrap();
    write_meta(dir, &meta).unwrap();
}

#[test]
fn written_directory_loads_back() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let catalog = load_dir(dir.path()).unwrap();
    assert_eq!(catalog.locales(), vec!["de", "en"]);
    assert_eq!(catalog.lookup("en", code("USD")).unwrap(), ("$", "US Dollar"));
    assert_eq!(catalog.table("de").unwrap().version(), Some("36"));
    assert_eq!(catalog.fraction_digits(code("JPY")), 0);
    assert_eq!(catalog.for_numeric_code(840).unwrap(), &[code("USD")]);

    let report = catalog.coverage_report();
    assert_eq!(report.total_codes, 2);
    assert_eq!(report.locales[0].missing, vec![code("USD")]);
}

#[test]
fn missing_meta_keeps_defaults() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), &table("en", &[("EUR", "€", "Euro")])).unwrap();

    let catalog = load_dir(dir.path()).unwrap();
    assert_eq!(catalog.fraction_digits(code("EUR")), 2);
    assert!(catalog.numeric_code(code("EUR")).is_err());
}

#[test]
fn first_bad_file_aborts_load_with_its_path() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let bad = dir.path().join("fr.json");
    fs::write(&bad, r#"{"names": {"EUR": ["€", "euro", "extra"]}}"#).unwrap();

    let err = load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Data { .. }));
    assert_eq!(err.path(), bad);
}

#[test]
fn format_then_validate_is_clean() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    fs::write(
        dir.path().join("fr.json"),
        r#"{"names":{"USD":["$US","dollar des États-Unis"],"EUR":["€","euro"]}}"#,
    )
    .unwrap();

    let before = validate_dir(dir.path()).unwrap();
    assert_eq!(before.files_checked, 3);
    assert!(before.is_ok(false));
    assert!(!before.is_ok(true));
    assert_eq!(before.warnings().next().unwrap().kind, IssueKind::NotCanonical);

    let changed = format_dir(dir.path(), false).unwrap();
    assert_eq!(changed, vec![dir.path().join("fr.json")]);

    let after = validate_dir(dir.path()).unwrap();
    assert!(after.is_ok(true), "{:?}", after.issues);

    let text = fs::read_to_string(dir.path().join("fr.json")).unwrap();
    assert!(text.find("\"EUR\"").unwrap() < text.find("\"USD\"").unwrap());
    assert!(text.ends_with("}\n"));
}

#[test]
fn validation_report_serializes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("en.json"), r#"{"names":{"EUR":["","Euro"]}}"#).unwrap();

    let report = validate_dir(dir.path()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["files_checked"], 1);
    assert_eq!(json["issues"][0]["kind"], "empty_symbol");
    assert_eq!(json["issues"][0]["code"], "EUR");
    assert_eq!(json["issues"][1]["kind"], "not_canonical");
    assert!(json["issues"][1].get("code").is_none());
}
