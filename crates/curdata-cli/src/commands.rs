//! Command execution: load the data directory, answer, print.
//!
//! Output goes to a caller-supplied writer so the same code serves the
//! binary (stdout) and tests (a `Vec<u8>`). Logs go through `tracing`,
//! never to the writer.

use std::io::{self, Write};

use curdata_core::{CurrencyCatalog, CurrencyCode, CurrencyError};
use curdata_store::{StoreError, format_dir, load_dir, validate_dir};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Command, Opts};

/// Why a command could not produce its answer.
#[derive(Debug)]
pub enum CliError {
    /// The data directory could not be read or written.
    Store(StoreError),
    /// A lookup or metadata query failed.
    Query(CurrencyError),
    /// Writing the answer failed.
    Output(io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "cannot write output: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<CurrencyError> for CliError {
    fn from(err: CurrencyError) -> Self {
        Self::Query(err)
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Output(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.into())
    }
}

/// Run the command in `opts`, writing its answer to `out`.
///
/// `Ok(false)` means the command ran but its check failed (`validate`
/// found errors, `fmt --check` found unformatted files).
pub fn run(opts: &Opts, out: &mut impl Write) -> Result<bool, CliError> {
    debug!(command = ?opts.command, data_dir = %opts.data_dir.display(), "running command");
    match &opts.command {
        Command::Validate => return validate(opts, out),
        Command::Fmt => return fmt(opts, out),
        _ => {}
    }

    let mut catalog = load_dir(&opts.data_dir)?;
    catalog.set_default_locale(opts.locale.clone());

    match &opts.command {
        Command::Lookup { code, locale } => lookup(opts, &catalog, *code, locale.as_deref(), out)?,
        Command::Names { locale } => names(opts, &catalog, locale.as_deref(), out)?,
        Command::Codes => {
            let codes = catalog.currency_codes();
            if opts.json {
                emit_json(out, &codes)?;
            } else {
                for code in codes {
                    writeln!(out, "{code}")?;
                }
            }
        }
        Command::Locales => {
            let locales = catalog.locales();
            if opts.json {
                emit_json(out, &locales)?;
            } else {
                for locale in locales {
                    writeln!(out, "{locale}")?;
                }
            }
        }
        Command::Meta { code } => meta(opts, &catalog, *code, out)?,
        Command::Numeric { numeric } => {
            let codes = catalog.for_numeric_code(*numeric)?;
            if opts.json {
                emit_json(out, &codes)?;
            } else {
                for code in codes {
                    writeln!(out, "{code}")?;
                }
            }
        }
        Command::Coverage => coverage(opts, &catalog, out)?,
        Command::Validate | Command::Fmt => {}
    }
    Ok(true)
}

fn emit_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    code: CurrencyCode,
    locale: &'a str,
    symbol: &'a str,
    name: &'a str,
}

fn lookup(
    opts: &Opts,
    catalog: &CurrencyCatalog,
    code: CurrencyCode,
    locale: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let locale = opts.locale_or_default(locale);
    let (symbol, name) = catalog.lookup(locale, code)?;
    if opts.json {
        emit_json(
            out,
            &LookupOutput {
                code,
                locale,
                symbol,
                name,
            },
        )
    } else {
        writeln!(out, "{symbol}\t{name}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct NameOutput<'a> {
    code: CurrencyCode,
    name: &'a str,
}

fn names(
    opts: &Opts,
    catalog: &CurrencyCatalog,
    locale: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let listed = catalog.names(opts.locale_or_default(locale))?;
    if opts.json {
        let rows: Vec<NameOutput<'_>> = listed
            .into_iter()
            .map(|(code, name)| NameOutput { code, name })
            .collect();
        emit_json(out, &rows)
    } else {
        for (code, name) in listed {
            writeln!(out, "{code}\t{name}")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct MetaOutput {
    code: CurrencyCode,
    fraction_digits: u8,
    rounding_increment: u32,
    cash_fraction_digits: u8,
    cash_rounding_increment: u32,
    numeric_code: Option<u16>,
}

fn meta(
    opts: &Opts,
    catalog: &CurrencyCatalog,
    code: CurrencyCode,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let info = catalog.meta().fraction_info(code);
    let numeric_code = match catalog.numeric_code(code) {
        Ok(n) => Some(n),
        Err(CurrencyError::NumericCodeNotFound(_)) => None,
        Err(err) => return Err(err.into()),
    };
    let row = MetaOutput {
        code,
        fraction_digits: info.fraction_digits,
        rounding_increment: info.rounding_increment,
        cash_fraction_digits: info.cash_fraction_digits,
        cash_rounding_increment: info.cash_rounding_increment,
        numeric_code,
    };
    if opts.json {
        return emit_json(out, &row);
    }
    writeln!(out, "code: {}", row.code)?;
    writeln!(out, "fraction_digits: {}", row.fraction_digits)?;
    writeln!(out, "rounding_increment: {}", row.rounding_increment)?;
    writeln!(out, "cash_fraction_digits: {}", row.cash_fraction_digits)?;
    writeln!(out, "cash_rounding_increment: {}", row.cash_rounding_increment)?;
    match row.numeric_code {
        Some(n) => writeln!(out, "numeric_code: {n:03}")?,
        None => writeln!(out, "numeric_code: -")?,
    }
    Ok(())
}

fn coverage(opts: &Opts, catalog: &CurrencyCatalog, out: &mut impl Write) -> Result<(), CliError> {
    let report = catalog.coverage_report();
    if opts.json {
        return emit_json(out, &report);
    }
    for row in &report.locales {
        writeln!(
            out,
            "{}\t{}/{}\t{:.1}%",
            row.locale, row.present, report.total_codes, row.coverage_percent
        )?;
    }
    Ok(())
}

fn validate(opts: &Opts, out: &mut impl Write) -> Result<bool, CliError> {
    let report = validate_dir(&opts.data_dir)?;
    let ok = report.is_ok(opts.strict);
    info!(
        files = report.files_checked,
        issues = report.issues.len(),
        strict = opts.strict,
        ok,
        "validation finished"
    );

    if opts.json {
        emit_json(out, &report)?;
        return Ok(ok);
    }
    for issue in &report.issues {
        writeln!(out, "{issue}")?;
    }
    writeln!(
        out,
        "{} files checked, {} errors, {} warnings",
        report.files_checked,
        report.errors().count(),
        report.warnings().count()
    )?;
    Ok(ok)
}

fn fmt(opts: &Opts, out: &mut impl Write) -> Result<bool, CliError> {
    let changed = format_dir(&opts.data_dir, opts.check)?;
    if opts.json {
        emit_json(out, &changed)?;
    } else {
        let verb = if opts.check { "would reformat" } else { "reformatted" };
        for path in &changed {
            writeln!(out, "{verb} {}", path.display())?;
        }
    }
    Ok(!opts.check || changed.is_empty())
}
