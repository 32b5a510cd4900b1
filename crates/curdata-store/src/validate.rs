//! Whole-directory validation that reports every problem found.
//!
//! Unlike [`load_dir`](crate::load_dir), which stops at the first bad file,
//! validation keeps going and returns one [`ValidationReport`].
//!
//! | Check | Kind | Severity |
//! |-------|------|----------|
//! | File stem is not a locale id | `InvalidFileName` | error |
//! | Unparseable JSON or UTF-8, bad code, bad tuple, duplicate key | `Parse` | error |
//! | Zero-length symbol | `EmptySymbol` | error |
//! | Zero-length display name | `EmptyName` | error |
//! | Not byte-identical to canonical encoding | `NotCanonical` | warning |
//! | `meta.json` undecodable, invalid or repeating a key | `Meta` | error |
//! | File unreadable | `Io` | error |

use std::fs;
use std::path::{Path, PathBuf};

use curdata_core::{CurrencyCode, CurrencyLocaleTable, LocaleId, MetaTable};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::loader::{META_FILE, table_files};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InvalidFileName,
    Parse,
    EmptySymbol,
    EmptyName,
    NotCanonical,
    Meta,
    Io,
}

impl IssueKind {
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::NotCanonical => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One problem in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: PathBuf,
    pub kind: IssueKind,
    /// The entry concerned, for per-entry checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CurrencyCode>,
    pub message: String,
}

impl Issue {
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}", self.path.display())?;
        if let Some(code) = self.code {
            write!(f, " [{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Result of validating a data directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Table files examined (`meta.json` not included).
    pub files_checked: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
    }

    /// No errors; in strict mode, no warnings either.
    #[must_use]
    pub fn is_ok(&self, strict: bool) -> bool {
        if strict {
            self.issues.is_empty()
        } else {
            self.errors().next().is_none()
        }
    }

    fn push(&mut self, path: &Path, kind: IssueKind, code: Option<CurrencyCode>, message: String) {
        self.issues.push(Issue {
            path: path.to_path_buf(),
            kind,
            code,
            message,
        });
    }
}

/// Validate every table file in `dir` and its `meta.json`, if any.
///
/// Only a failure to list `dir` itself is returned as `Err`.
pub fn validate_dir(dir: impl AsRef<Path>) -> Result<ValidationReport> {
    let dir = dir.as_ref();
    let mut report = ValidationReport::default();

    for path in table_files(dir)? {
        report.files_checked += 1;
        validate_table_file(&path, &mut report);
    }

    let meta_path = dir.join(META_FILE);
    if meta_path.is_file()
        && let Some(text) = read_text(&meta_path, IssueKind::Meta, &mut report)
        && let Err(err) = MetaTable::from_json(&text)
    {
        report.push(&meta_path, IssueKind::Meta, None, err.to_string());
    }

    for issue in &report.issues {
        match issue.severity() {
            Severity::Error => warn!(%issue, "validation error"),
            Severity::Warning => debug!(%issue, "validation warning"),
        }
    }
    Ok(report)
}

/// Read `path` as UTF-8. A read failure is an `Io` issue; undecodable
/// bytes are reported as `bad_encoding`.
fn read_text(
    path: &Path,
    bad_encoding: IssueKind,
    report: &mut ValidationReport,
) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            report.push(path, IssueKind::Io, None, err.to_string());
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(err) => {
            report.push(path, bad_encoding, None, format!("not valid UTF-8: {err}"));
            None
        }
    }
}

fn validate_table_file(path: &Path, report: &mut ValidationReport) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let locale = match LocaleId::parse(stem) {
        Ok(locale) => locale,
        Err(err) => {
            report.push(path, IssueKind::InvalidFileName, None, err.to_string());
            return;
        }
    };

    let Some(text) = read_text(path, IssueKind::Parse, report) else {
        return;
    };

    let table = match CurrencyLocaleTable::from_json(locale, &text) {
        Ok(table) => table,
        Err(err) => {
            report.push(path, IssueKind::Parse, None, err.to_string());
            return;
        }
    };

    for (code, entry) in table.iter() {
        if entry.symbol.is_empty() {
            report.push(path, IssueKind::EmptySymbol, Some(code), "empty symbol".into());
        }
        if entry.name.is_empty() {
            report.push(path, IssueKind::EmptyName, Some(code), "empty display name".into());
        }
    }

    match table.to_json() {
        Ok(canonical) if canonical != text => report.push(
            path,
            IssueKind::NotCanonical,
            None,
            "not in canonical form (run `curdata fmt`)".into(),
        ),
        Ok(_) => {}
        Err(err) => report.push(path, IssueKind::Parse, None, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn kinds(report: &ValidationReport) -> Vec<IssueKind> {
        report.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn clean_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "de.json",
            "{\n  \"names\": {\n    \"EUR\": [\n      \"€\",\n      \"Euro\"\n    ]\n  }\n}\n",
        );
        let report = validate_dir(dir.path()).unwrap();
        assert_eq!(report.files_checked, 1);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert!(report.is_ok(true));
    }

    #[test]
    fn collects_every_problem() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "de-AT.json", r#"{"names": {}}"#);
        write(dir.path(), "fr.json", r#"{"names": {"EUR": ["€"]}}"#);
        write(dir.path(), "it.json", r#"{"names":{"EUR":["",""]}}"#);
        write(dir.path(), META_FILE, r#"{"numeric_codes": {"EUR": 0}}"#);

        let report = validate_dir(dir.path()).unwrap();
        assert_eq!(report.files_checked, 3);
        assert_eq!(
            kinds(&report),
            vec![
                IssueKind::InvalidFileName,
                IssueKind::Parse,
                IssueKind::EmptySymbol,
                IssueKind::EmptyName,
                IssueKind::NotCanonical,
                IssueKind::Meta,
            ]
        );
        assert!(!report.is_ok(false));
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.errors().count(), 5);
    }

    #[test]
    fn non_canonical_is_only_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "de.json", r#"{"names":{"EUR":["€","Euro"]}}"#);
        let report = validate_dir(dir.path()).unwrap();
        assert_eq!(kinds(&report), vec![IssueKind::NotCanonical]);
        assert!(report.is_ok(false));
        assert!(!report.is_ok(true));
    }

    #[test]
    fn whitespace_values_are_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "de.json",
            "{\n  \"names\": {\n    \"EUR\": [\n      \" \",\n      \" \"\n    ]\n  }\n}\n",
        );
        let report = validate_dir(dir.path()).unwrap();
        assert!(report.issues.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn invalid_utf8_is_a_parse_issue() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.json"),
            b"{\"names\": {\"EUR\": [\"\xFF\", \"Euro\"]}}",
        )
        .unwrap();
        fs::write(dir.path().join(META_FILE), b"{\"default\": \"\xFE\"}").unwrap();

        let report = validate_dir(dir.path()).unwrap();
        assert_eq!(kinds(&report), vec![IssueKind::Parse, IssueKind::Meta]);
        assert!(report.issues[0].message.contains("UTF-8"));
    }

    #[test]
    fn unreadable_table_is_an_io_issue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fr.json");
        fs::create_dir(&path).unwrap();
        let mut report = ValidationReport::default();
        validate_table_file(&path, &mut report);
        assert_eq!(kinds(&report), vec![IssueKind::Io]);
        assert_eq!(report.issues[0].path, path);
    }

    #[test]
    fn repeated_meta_key_is_a_meta_issue() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), META_FILE, r#"{"numeric_codes": {"EUR": 978, "EUR": 5}}"#);
        let report = validate_dir(dir.path()).unwrap();
        assert_eq!(report.files_checked, 0);
        assert_eq!(kinds(&report), vec![IssueKind::Meta]);
        assert!(report.issues[0].message.contains("duplicate key 'EUR'"));
    }

    #[test]
    fn duplicate_key_is_a_parse_issue() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "de.json",
            r#"{"names": {"EUR": ["€", "Euro"], "EUR": ["€", "Euro"]}}"#,
        );
        let report = validate_dir(dir.path()).unwrap();
        assert_eq!(kinds(&report), vec![IssueKind::Parse]);
        assert!(report.issues[0].message.contains("duplicate"));
    }

    #[test]
    fn issue_display_includes_code() {
        let issue = Issue {
            path: PathBuf::from("it.json"),
            kind: IssueKind::EmptyName,
            code: Some(CurrencyCode::parse("EUR").unwrap()),
            message: "empty display name".into(),
        };
        assert_eq!(issue.to_string(), "error: it.json [EUR]: empty display name");
    }
}
