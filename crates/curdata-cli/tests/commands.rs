//! End-to-end command runs against the shipped data and temp directories.

use std::fs;
use std::path::PathBuf;

use curdata_cli::cli::{Command, Opts};
use curdata_cli::commands::{CliError, run};
use curdata_core::{CurrencyCode, CurrencyError, LocaleId};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/currencies")
}

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::parse(s).unwrap()
}

fn opts(command: Command) -> Opts {
    Opts {
        command,
        data_dir: data_dir(),
        ..Opts::default()
    }
}

fn run_text(opts: &Opts) -> (bool, String) {
    let mut out = Vec::new();
    let ok = run(opts, &mut out).unwrap();
    (ok, String::from_utf8(out).unwrap())
}

fn run_json(mut opts: Opts) -> serde_json::Value {
    opts.json = true;
    let (ok, text) = run_text(&opts);
    assert!(ok);
    serde_json::from_str(&text).unwrap()
}

#[test]
fn lookup_in_default_locale() {
    let (ok, text) = run_text(&opts(Command::Lookup {
        code: code("USD"),
        locale: None,
    }));
    assert!(ok);
    assert_eq!(text, "$\tUS Dollar\n");
}

#[test]
fn lookup_uses_locale_option_then_argument() {
    let mut o = opts(Command::Lookup {
        code: code("CHF"),
        locale: None,
    });
    o.locale = LocaleId::parse("de").unwrap();
    assert_eq!(run_text(&o).1, "CHF\tSchweizer Franken\n");

    o.command = Command::Lookup {
        code: code("CHF"),
        locale: Some("en".into()),
    };
    assert_eq!(run_text(&o).1, "CHF\tSwiss Franc\n");
}

#[test]
fn lookup_json() {
    let value = run_json(opts(Command::Lookup {
        code: code("EUR"),
        locale: Some("de".into()),
    }));
    assert_eq!(value["code"], "EUR");
    assert_eq!(value["locale"], "de");
    assert_eq!(value["symbol"], "€");
    assert_eq!(value["name"], "Euro");
}

#[test]
fn lookup_failures_are_errors() {
    let mut out = Vec::new();
    let err = run(
        &opts(Command::Lookup {
            code: code("USD"),
            locale: Some("xx".into()),
        }),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CliError::Query(CurrencyError::LocaleNotFound(ref l)) if l == "xx"
    ));

    let err = run(
        &opts(Command::Lookup {
            code: code("QQQ"),
            locale: None,
        }),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CliError::Query(CurrencyError::CurrencyNotFound { .. })
    ));
    assert!(out.is_empty());
}

#[test]
fn names_are_sorted_by_display_name() {
    let (_, text) = run_text(&opts(Command::Names { locale: None }));
    let names: Vec<String> = text
        .lines()
        .map(|l| l.split('\t').nth(1).unwrap().to_lowercase())
        .collect();
    assert_eq!(names.len(), 293);
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn codes_and_locales() {
    let (_, text) = run_text(&opts(Command::Locales));
    let locales: Vec<&str> = text.lines().collect();
    assert_eq!(locales.len(), 42);
    assert!(locales.contains(&"bs_Cyrl"));

    let codes = run_json(opts(Command::Codes));
    let codes = codes.as_array().unwrap();
    assert!(codes.contains(&serde_json::json!("EUR")));
    assert!(codes.windows(2).all(|w| w[0].as_str() < w[1].as_str()));
}

#[test]
fn meta_text_and_json() {
    let (_, text) = run_text(&opts(Command::Meta { code: code("CHF") }));
    assert!(text.contains("cash_rounding_increment: 5\n"));
    assert!(text.contains("numeric_code: 756\n"));

    let value = run_json(opts(Command::Meta { code: code("JPY") }));
    assert_eq!(value["fraction_digits"], 0);
    assert_eq!(value["numeric_code"], 392);
}

#[test]
fn numeric_lookup() {
    let (_, text) = run_text(&opts(Command::Numeric { numeric: 978 }));
    assert_eq!(text, "EUR\n");

    let mut out = Vec::new();
    let err = run(&opts(Command::Numeric { numeric: 1 }), &mut out).unwrap_err();
    assert!(matches!(
        err,
        CliError::Query(CurrencyError::UnknownNumericCode(1))
    ));
}

#[test]
fn coverage_lists_every_locale() {
    let value = run_json(opts(Command::Coverage));
    let locales = value["locales"].as_array().unwrap();
    assert_eq!(locales.len(), 42);
    assert!(value["total_codes"].as_u64().unwrap() >= 293);
}

#[test]
fn shipped_data_validates_strictly() {
    let mut o = opts(Command::Validate);
    o.strict = true;
    let (ok, text) = run_text(&o);
    assert!(ok, "{text}");
    assert!(text.ends_with("0 errors, 0 warnings\n"));
}

#[test]
fn shipped_data_is_formatted() {
    let mut o = opts(Command::Fmt);
    o.check = true;
    let (ok, text) = run_text(&o);
    assert!(ok, "{text}");
    assert!(text.is_empty());
}

#[test]
fn fmt_check_fails_then_fix_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("en.json"),
        r#"{"names":{"EUR":["€","Euro"]}}"#,
    )
    .unwrap();
    let mut o = Opts {
        command: Command::Fmt,
        data_dir: dir.path().to_path_buf(),
        check: true,
        ..Opts::default()
    };

    let (ok, text) = run_text(&o);
    assert!(!ok);
    assert!(text.starts_with("would reformat "));

    o.check = false;
    assert!(run_text(&o).0);

    o.check = true;
    assert_eq!(run_text(&o), (true, String::new()));
}

#[test]
fn validate_reports_failure_without_erroring() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("en.json"), r#"{"names":{"eur":["€","Euro"]}}"#).unwrap();
    let o = Opts {
        command: Command::Validate,
        data_dir: dir.path().to_path_buf(),
        ..Opts::default()
    };
    let (ok, text) = run_text(&o);
    assert!(!ok);
    assert!(text.contains("error: "));
    assert!(text.ends_with("1 files checked, 1 errors, 0 warnings\n"));
}

#[test]
fn missing_data_dir_is_store_error() {
    let dir = tempfile::tempdir().unwrap();
    let o = Opts {
        command: Command::Codes,
        data_dir: dir.path().join("absent"),
        ..Opts::default()
    };
    let mut out = Vec::new();
    let err = run(&o, &mut out).unwrap_err();
    assert!(matches!(err, CliError::Store(_)));
    assert!(err.to_string().contains("absent"));
}
