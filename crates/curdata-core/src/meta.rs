//! Locale-independent currency metadata: fraction digits, rounding, and
//! ISO 4217 numeric codes.
//!
//! Persisted as `meta.json`:
//!
//! ```json
//! {
//!   "default": [2, 0, 2, 0],
//!   "fractions": { "CHF": [2, 0, 2, 5], "JPY": [0, 0, 0, 0] },
//!   "numeric_codes": { "CHF": 756, "JPY": 392 }
//! }
//! ```
//!
//! Fraction arrays are `[digits, rounding, cash digits, cash rounding]`.
//! Only currencies that differ from `default` are listed.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::code::CurrencyCode;
use crate::error::{CurrencyError, Result};
use crate::table::EntryList;

/// Largest ISO 4217 numeric code.
pub const MAX_NUMERIC_CODE: u16 = 999;

/// Fraction and rounding rules for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyMeta {
    pub fraction_digits: u8,
    /// Rounding increment in minor units; `0` means no rounding.
    pub rounding_increment: u32,
    pub cash_fraction_digits: u8,
    pub cash_rounding_increment: u32,
}

impl CurrencyMeta {
    /// Rules used for currencies without an explicit record.
    pub const DEFAULT: Self = Self {
        fraction_digits: 2,
        rounding_increment: 0,
        cash_fraction_digits: 2,
        cash_rounding_increment: 0,
    };

    /// Same digits and rounding for cash and non-cash amounts.
    #[must_use]
    pub const fn uniform(fraction_digits: u8, rounding_increment: u32) -> Self {
        Self {
            fraction_digits,
            rounding_increment,
            cash_fraction_digits: fraction_digits,
            cash_rounding_increment: rounding_increment,
        }
    }
}

impl Default for CurrencyMeta {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Serialize for CurrencyMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (
            self.fraction_digits,
            self.rounding_increment,
            self.cash_fraction_digits,
            self.cash_rounding_increment,
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CurrencyMeta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (fraction_digits, rounding_increment, cash_fraction_digits, cash_rounding_increment) =
            <(u8, u32, u8, u32)>::deserialize(deserializer)?;
        Ok(Self {
            fraction_digits,
            rounding_increment,
            cash_fraction_digits,
            cash_rounding_increment,
        })
    }
}

/// Metadata for all currencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTable {
    default: CurrencyMeta,
    fractions: BTreeMap<CurrencyCode, CurrencyMeta>,
    numeric_codes: BTreeMap<CurrencyCode, u16>,
    // Reverse index; several historic codes can share a number.
    by_numeric: BTreeMap<u16, Vec<CurrencyCode>>,
}

impl MetaTable {
    /// Empty metadata: every currency uses [`CurrencyMeta::DEFAULT`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rules used for unlisted currencies.
    pub fn set_default(&mut self, meta: CurrencyMeta) {
        self.default = meta;
    }

    /// Record explicit rules for one currency.
    pub fn set_fraction_info(&mut self, code: CurrencyCode, meta: CurrencyMeta) {
        self.fractions.insert(code, meta);
    }

    /// Record the ISO 4217 numeric code of `code`, replacing any earlier one.
    pub fn set_numeric_code(&mut self, code: CurrencyCode, numeric: u16) -> Result<()> {
        if numeric == 0 || numeric > MAX_NUMERIC_CODE {
            return Err(CurrencyError::Parse(format!(
                "numeric code {numeric} for '{code}' is outside 1..={MAX_NUMERIC_CODE}"
            )));
        }
        if let Some(previous) = self.numeric_codes.insert(code, numeric)
            && let Some(codes) = self.by_numeric.get_mut(&previous)
        {
            codes.retain(|c| *c != code);
            if codes.is_empty() {
                self.by_numeric.remove(&previous);
            }
        }
        let codes = self.by_numeric.entry(numeric).or_default();
        codes.push(code);
        codes.sort_unstable();
        Ok(())
    }

    #[must_use]
    pub fn default_info(&self) -> CurrencyMeta {
        self.default
    }

    /// Rules for `code`, falling back to the default record.
    #[must_use]
    pub fn fraction_info(&self, code: CurrencyCode) -> CurrencyMeta {
        self.fractions.get(&code).copied().unwrap_or(self.default)
    }

    #[must_use]
    pub fn fraction_digits(&self, code: CurrencyCode) -> u8 {
        self.fraction_info(code).fraction_digits
    }

    #[must_use]
    pub fn rounding_increment(&self, code: CurrencyCode) -> u32 {
        self.fraction_info(code).rounding_increment
    }

    #[must_use]
    pub fn cash_fraction_digits(&self, code: CurrencyCode) -> u8 {
        self.fraction_info(code).cash_fraction_digits
    }

    #[must_use]
    pub fn cash_rounding_increment(&self, code: CurrencyCode) -> u32 {
        self.fraction_info(code).cash_rounding_increment
    }

    /// ISO 4217 numeric code of `code`.
    pub fn numeric_code(&self, code: CurrencyCode) -> Result<u16> {
        self.numeric_codes
            .get(&code)
            .copied()
            .ok_or(CurrencyError::NumericCodeNotFound(code))
    }

    /// Alphabetic codes sharing `numeric`, ascending.
    pub fn for_numeric_code(&self, numeric: u16) -> Result<&[CurrencyCode]> {
        self.by_numeric
            .get(&numeric)
            .map(Vec::as_slice)
            .ok_or(CurrencyError::UnknownNumericCode(numeric))
    }

    /// All `(code, numeric)` pairs in code order.
    pub fn numeric_codes(&self) -> impl Iterator<Item = (CurrencyCode, u16)> + '_ {
        self.numeric_codes.iter().map(|(c, n)| (*c, *n))
    }

    /// Number of currencies with explicit fraction rules.
    #[must_use]
    pub fn explicit_fraction_count(&self) -> usize {
        self.fractions.len()
    }

    /// Parse a `meta.json` document.
    ///
    /// A code repeated within `fractions` or `numeric_codes` is an error.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: MetaDocument = serde_json::from_str(text)?;
        let mut table = Self::new();
        table.default = doc.default;
        for (code, meta) in doc.fractions.0 {
            if table.fractions.insert(code, meta).is_some() {
                return Err(duplicate_key("fractions", code));
            }
        }
        for (code, numeric) in doc.numeric_codes.0 {
            if table.numeric_codes.contains_key(&code) {
                return Err(duplicate_key("numeric_codes", code));
            }
            table.set_numeric_code(code, numeric)?;
        }
        Ok(table)
    }

    /// Encode in the same canonical layout as locale tables.
    pub fn to_json(&self) -> Result<String> {
        let doc = MetaDocumentRef {
            default: self.default,
            fractions: &self.fractions,
            numeric_codes: &self.numeric_codes,
        };
        let mut out = serde_json::to_string_pretty(&doc)?;
        out.push('\n');
        Ok(out)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MetaDocument {
    #[serde(default)]
    default: CurrencyMeta,
    #[serde(default)]
    fractions: EntryList<CurrencyMeta>,
    #[serde(default)]
    numeric_codes: EntryList<u16>,
}

fn duplicate_key(section: &str, code: CurrencyCode) -> CurrencyError {
    CurrencyError::Parse(format!("duplicate key '{code}' in {section}"))
}

#[derive(Serialize)]
struct MetaDocumentRef<'a> {
    default: CurrencyMeta,
    fractions: &'a BTreeMap<CurrencyCode, CurrencyMeta>,
    numeric_codes: &'a BTreeMap<CurrencyCode, u16>,
}
