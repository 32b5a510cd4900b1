//! Validated identifiers: ISO 4217 alphabetic codes and locale ids.
//!
//! Both types validate on construction, so a value that exists is always
//! well-formed. Tables and catalogs rely on this and never re-check keys.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CurrencyError, Result};

/// ISO 4217 alphabetic currency code (`^[A-Z]{3}$`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Parse a code exactly as written. Lowercase input is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        match s.as_bytes() {
            &[a, b, c] if [a, b, c].iter().all(u8::is_ascii_uppercase) => Ok(Self([a, b, c])),
            _ => Err(CurrencyError::InvalidCurrencyCode(s.to_string())),
        }
    }

    /// Parse user input: surrounding whitespace is trimmed and letters
    /// are uppercased before validation.
    pub fn parse_lenient(s: &str) -> Result<Self> {
        Self::parse(&s.trim().to_ascii_uppercase())
            .map_err(|_| CurrencyError::InvalidCurrencyCode(s.to_string()))
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction guarantees three ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Locale assumed when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Locale identifier as used by data file names (`en`, `bs_Cyrl`, `es_419`).
///
/// A 2-3 letter lowercase language subtag, then any number of
/// `_`-separated, non-empty ASCII alphanumeric subtags.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocaleId(String);

impl LocaleId {
    pub fn parse(s: &str) -> Result<Self> {
        if is_valid_locale(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(CurrencyError::InvalidLocale(s.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_locale(s: &str) -> bool {
    let mut parts = s.split('_');
    let Some(language) = parts.next() else {
        return false;
    };
    if !(2..=3).contains(&language.len()) || !language.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }
    parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}

impl Default for LocaleId {
    /// [`DEFAULT_LOCALE`].
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleId {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Borrow<str> for LocaleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for LocaleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LocaleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
