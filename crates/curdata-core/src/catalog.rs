//! Currency catalog: per-locale tables plus shared metadata.
//!
//! # Invariants
//!
//! 1. **No fallback**: a lookup consults exactly one table. A locale
//!    without a table is [`CurrencyError::LocaleNotFound`] even when a
//!    related locale (`de` for `de_AT`) is loaded.
//!
//! 2. **Locale before code**: when both are missing the error names the
//!    locale.
//!
//! 3. **Thread safety**: `CurrencyCatalog` is `Send + Sync`; every query
//!    takes `&self` and nothing is mutated after loading.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing locale | No table registered | `LocaleNotFound` |
//! | Missing code | Table lacks the code | `CurrencyNotFound` |
//! | No numeric code | Not in metadata | `NumericCodeNotFound` |
//! | Empty catalog | No tables loaded | Lookups fail, listings are empty |

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::code::{CurrencyCode, LocaleId};
use crate::error::{CurrencyError, Result};
use crate::meta::MetaTable;
use crate::table::{CurrencyEntry, CurrencyLocaleTable};

/// Central currency catalog.
///
/// # Example
///
/// ```
/// use curdata_core::{CurrencyCatalog, CurrencyCode, CurrencyLocaleTable, LocaleId};
///
/// let eur = CurrencyCode::parse("EUR").unwrap();
/// let mut de = CurrencyLocaleTable::new(LocaleId::parse("de").unwrap());
/// de.insert(eur, "€", "Euro").unwrap();
///
/// let mut catalog = CurrencyCatalog::new();
/// catalog.add_locale(de);
///
/// assert_eq!(catalog.lookup("de", eur).unwrap(), ("€", "Euro"));
/// assert!(catalog.lookup("de_AT", eur).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    locales: FxHashMap<LocaleId, CurrencyLocaleTable>,
    meta: MetaTable,
    default_locale: LocaleId,
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyCatalog {
    /// Create an empty catalog with default metadata.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locales: FxHashMap::default(),
            meta: MetaTable::new(),
            default_locale: LocaleId::default(),
        }
    }

    /// Register a table under its own locale, replacing any earlier one.
    pub fn add_locale(&mut self, table: CurrencyLocaleTable) {
        let locale = table.locale().clone();
        if let Some(previous) = self.locales.insert(locale, table) {
            warn!(
                locale = %previous.locale(),
                replaced_entries = previous.len(),
                "replacing currency table"
            );
        }
    }

    pub fn set_meta(&mut self, meta: MetaTable) {
        self.meta = meta;
    }

    #[must_use]
    pub fn meta(&self) -> &MetaTable {
        &self.meta
    }

    /// Set the locale used by [`name_default`](Self::name_default) and friends.
    ///
    /// The locale does not need a loaded table yet.
    pub fn set_default_locale(&mut self, locale: LocaleId) {
        self.default_locale = locale;
    }

    #[must_use]
    pub fn default_locale(&self) -> &LocaleId {
        &self.default_locale
    }

    /// The table for `locale`.
    pub fn table(&self, locale: &str) -> Result<&CurrencyLocaleTable> {
        self.locales
            .get(locale)
            .ok_or_else(|| CurrencyError::LocaleNotFound(locale.to_string()))
    }

    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Look up one entry.
    pub fn entry(&self, locale: &str, code: CurrencyCode) -> Result<&CurrencyEntry> {
        self.table(locale)?
            .get(code)
            .ok_or_else(|| CurrencyError::CurrencyNotFound {
                locale: locale.to_string(),
                code,
            })
    }

    /// `(symbol, display name)` of `code` in `locale`.
    pub fn lookup(&self, locale: &str, code: CurrencyCode) -> Result<(&str, &str)> {
        self.entry(locale, code)
            .map(|e| (e.symbol.as_str(), e.name.as_str()))
    }

    pub fn symbol(&self, locale: &str, code: CurrencyCode) -> Result<&str> {
        self.entry(locale, code).map(|e| e.symbol.as_str())
    }

    pub fn name(&self, locale: &str, code: CurrencyCode) -> Result<&str> {
        self.entry(locale, code).map(|e| e.name.as_str())
    }

    /// Every `(code, display name)` of `locale`, sorted by display name.
    pub fn names(&self, locale: &str) -> Result<Vec<(CurrencyCode, &str)>> {
        self.table(locale).map(CurrencyLocaleTable::names_sorted)
    }

    pub fn name_default(&self, code: CurrencyCode) -> Result<&str> {
        self.name(self.default_locale.as_str(), code)
    }

    pub fn symbol_default(&self, code: CurrencyCode) -> Result<&str> {
        self.symbol(self.default_locale.as_str(), code)
    }

    pub fn names_default(&self) -> Result<Vec<(CurrencyCode, &str)>> {
        self.names(self.default_locale.as_str())
    }

    /// All registered locales, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(LocaleId::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Union of codes across every table, ascending.
    #[must_use]
    pub fn currency_codes(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self
            .locales
            .values()
            .flat_map(CurrencyLocaleTable::codes)
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Whether any table names `code`.
    #[must_use]
    pub fn exists(&self, code: CurrencyCode) -> bool {
        self.locales.values().any(|t| t.contains(code))
    }

    // -----------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------

    #[must_use]
    pub fn fraction_digits(&self, code: CurrencyCode) -> u8 {
        self.meta.fraction_digits(code)
    }

    #[must_use]
    pub fn rounding_increment(&self, code: CurrencyCode) -> u32 {
        self.meta.rounding_increment(code)
    }

    #[must_use]
    pub fn cash_fraction_digits(&self, code: CurrencyCode) -> u8 {
        self.meta.cash_fraction_digits(code)
    }

    #[must_use]
    pub fn cash_rounding_increment(&self, code: CurrencyCode) -> u32 {
        self.meta.cash_rounding_increment(code)
    }

    pub fn numeric_code(&self, code: CurrencyCode) -> Result<u16> {
        self.meta.numeric_code(code)
    }

    pub fn for_numeric_code(&self, numeric: u16) -> Result<&[CurrencyCode]> {
        self.meta.for_numeric_code(numeric)
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Same as [`currency_codes`](Self::currency_codes); the reference set
    /// for coverage.
    #[must_use]
    pub fn all_codes(&self) -> Vec<CurrencyCode> {
        self.currency_codes()
    }

    /// Codes from `reference` absent from `locale`, ascending.
    ///
    /// An unknown locale is missing everything.
    #[must_use]
    pub fn missing_codes(&self, locale: &str, reference: &[CurrencyCode]) -> Vec<CurrencyCode> {
        let table = self.locales.get(locale);
        let mut missing: Vec<CurrencyCode> = reference
            .iter()
            .copied()
            .filter(|code| !table.is_some_and(|t| t.contains(*code)))
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Coverage of every locale against [`all_codes`](Self::all_codes).
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all = self.all_codes();
        let total = all.len();

        let locales = self
            .locales()
            .into_iter()
            .map(|tag| {
                let missing = self.missing_codes(tag, &all);
                let present = total.saturating_sub(missing.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                LocaleCoverage {
                    locale: tag.to_string(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_codes: total,
            locales,
        }
    }
}

/// Coverage report for a currency catalog.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CoverageReport {
    /// Number of distinct codes across all locales.
    pub total_codes: usize,
    /// Per-locale coverage, sorted by locale.
    pub locales: Vec<LocaleCoverage>,
}

/// Per-locale coverage statistics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LocaleCoverage {
    pub locale: String,
    /// Reference codes the locale names.
    pub present: usize,
    /// Reference codes the locale lacks.
    pub missing: Vec<CurrencyCode>,
    /// Coverage as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}
