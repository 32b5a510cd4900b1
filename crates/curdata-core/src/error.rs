//! Error type shared by every currency data operation.

use crate::code::CurrencyCode;

/// Errors from parsing or querying currency data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// A string was not a three-letter uppercase ISO 4217 code.
    InvalidCurrencyCode(String),
    /// A string was not a well-formed locale identifier.
    InvalidLocale(String),
    /// No table is loaded for the locale.
    LocaleNotFound(String),
    /// The locale's table has no entry for the code.
    CurrencyNotFound { locale: String, code: CurrencyCode },
    /// A code appeared twice in one table.
    DuplicateCode { locale: String, code: CurrencyCode },
    /// The code has no ISO 4217 numeric equivalent.
    NumericCodeNotFound(CurrencyCode),
    /// No alphabetic code maps to this numeric code.
    UnknownNumericCode(u16),
    /// A data document could not be parsed.
    Parse(String),
}

impl std::fmt::Display for CurrencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCurrencyCode(c) => write!(f, "invalid currency code: {c:?}"),
            Self::InvalidLocale(l) => write!(f, "invalid locale: {l:?}"),
            Self::LocaleNotFound(l) => write!(f, "locale not found: {l}"),
            Self::CurrencyNotFound { locale, code } => {
                write!(f, "currency '{code}' not found in locale '{locale}'")
            }
            Self::DuplicateCode { locale, code } => {
                write!(f, "duplicate currency '{code}' in locale '{locale}'")
            }
            Self::NumericCodeNotFound(code) => {
                write!(f, "currency '{code}' has no numeric code")
            }
            Self::UnknownNumericCode(n) => write!(f, "no currency has numeric code {n}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for CurrencyError {}

impl From<serde_json::Error> for CurrencyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result alias for currency data operations.
pub type Result<T> = std::result::Result<T, CurrencyError>;
