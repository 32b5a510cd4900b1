#![forbid(unsafe_code)]

//! Command-line argument parsing for `curdata`.
//!
//! Parses args by hand to keep the binary lean. Supports environment
//! variable overrides via the `CURDATA_*` prefix; explicit flags win.

use std::env;
use std::path::PathBuf;
use std::process;

use curdata_core::{CurrencyCode, LocaleId};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data directory used when neither `--data-dir` nor `CURDATA_DATA_DIR` is set.
pub const DEFAULT_DATA_DIR: &str = "data/currencies";

const HELP_TEXT: &str = "\
curdata - localized currency names, symbols and metadata

USAGE:
    curdata [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    lookup <CODE> [LOCALE]   Print symbol and display name
    names [LOCALE]           All names of a locale, sorted by display name
    codes                    All known currency codes
    locales                  All loaded locales
    meta <CODE>              Fraction digits, rounding, numeric code
    numeric <N>              Alphabetic codes for an ISO numeric code
    coverage                 Per-locale coverage against all codes
    validate                 Validate the data directory
    fmt                      Rewrite tables in canonical form

OPTIONS:
    --data-dir=PATH      Data directory (default: data/currencies)
    --locale=LOCALE      Default display locale (default: en)
    --json               Emit JSON instead of text
    --strict             validate: treat non-canonical files as errors
    --check              fmt: report instead of rewriting
    --log=FILTER         tracing filter directive (default: warn)
    --log-json           JSON log lines on stderr
    --help, -h           Show this help message
    --version, -V        Show version

Currency codes are accepted in any case (usd, Usd, USD).

ENVIRONMENT VARIABLES:
    CURDATA_DATA_DIR     Override --data-dir
    CURDATA_LOCALE       Override --locale
    CURDATA_LOG          Override --log
    CURDATA_LOG_JSON     JSON log lines (1/true)";

/// What to do once the data directory is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Symbol and name of one code; locale falls back to `--locale`.
    Lookup {
        code: CurrencyCode,
        locale: Option<String>,
    },
    Names {
        locale: Option<String>,
    },
    Codes,
    Locales,
    Meta {
        code: CurrencyCode,
    },
    Numeric {
        numeric: u16,
    },
    Coverage,
    Validate,
    Fmt,
}

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    pub command: Command,
    /// Directory holding `<locale>.json` tables and `meta.json`.
    pub data_dir: PathBuf,
    /// Locale used when a command takes no explicit one.
    pub locale: LocaleId,
    pub json: bool,
    pub strict: bool,
    pub check: bool,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    pub log_json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    MissingArg(&'static str),
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            command: Command::Locales,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            locale: LocaleId::default(),
            json: false,
            strict: false,
            check: false,
            log_filter: "warn".into(),
            log_json: false,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("curdata {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::MissingArg(what)) => {
                eprintln!("Missing {what}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("CURDATA_DATA_DIR")
            && !val.trim().is_empty()
        {
            opts.data_dir = PathBuf::from(val);
        }
        if let Some(val) = get_env("CURDATA_LOCALE")
            && let Ok(locale) = LocaleId::parse(val.trim())
        {
            opts.locale = locale;
        }
        if let Some(val) = get_env("CURDATA_LOG")
            && !val.trim().is_empty()
        {
            opts.log_filter = val;
        }
        if let Some(val) = get_env("CURDATA_LOG_JSON") {
            opts.log_json = val == "1" || val.eq_ignore_ascii_case("true");
        }

        // Parse command-line args (override env vars)
        let mut positional: Vec<String> = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                "--json" => opts.json = true,
                "--strict" => opts.strict = true,
                "--check" => opts.check = true,
                "--log-json" => opts.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--data-dir=") {
                        if val.is_empty() {
                            return Err(ParseError::InvalidValue {
                                flag: "--data-dir",
                                value: val.to_string(),
                            });
                        }
                        opts.data_dir = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--locale=") {
                        match LocaleId::parse(val) {
                            Ok(locale) => opts.locale = locale,
                            Err(_) => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--locale",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log_filter = val.to_string();
                    } else if other.starts_with('-') {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    } else {
                        positional.push(other.to_string());
                    }
                }
            }
        }

        opts.command = parse_command(positional)?;
        Ok(opts)
    }

    /// Locale for a command: the explicit argument, else `--locale`.
    #[must_use]
    pub fn locale_or_default<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit.unwrap_or(self.locale.as_str())
    }
}

fn parse_command(positional: Vec<String>) -> Result<Command, ParseError> {
    let mut words = positional.into_iter();
    let Some(name) = words.next() else {
        return Err(ParseError::MissingArg("COMMAND"));
    };

    let command = match name.as_str() {
        "lookup" => {
            let code = parse_code(words.next())?;
            Command::Lookup {
                code,
                locale: words.next(),
            }
        }
        "names" => Command::Names {
            locale: words.next(),
        },
        "codes" => Command::Codes,
        "locales" => Command::Locales,
        "meta" => Command::Meta {
            code: parse_code(words.next())?,
        },
        "numeric" => {
            let Some(raw) = words.next() else {
                return Err(ParseError::MissingArg("<N>"));
            };
            match raw.parse::<u16>() {
                Ok(numeric) => Command::Numeric { numeric },
                Err(_) => {
                    return Err(ParseError::InvalidValue {
                        flag: "<N>",
                        value: raw,
                    });
                }
            }
        }
        "coverage" => Command::Coverage,
        "validate" => Command::Validate,
        "fmt" => Command::Fmt,
        _ => return Err(ParseError::UnknownArg(name)),
    };

    if let Some(extra) = words.next() {
        return Err(ParseError::UnknownArg(extra));
    }
    Ok(command)
}

fn parse_code(raw: Option<String>) -> Result<CurrencyCode, ParseError> {
    let Some(raw) = raw else {
        return Err(ParseError::MissingArg("<CODE>"));
    };
    CurrencyCode::parse_lenient(&raw).map_err(|_| ParseError::InvalidValue {
        flag: "<CODE>",
        value: raw,
    })
}
