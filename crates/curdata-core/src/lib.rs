#![forbid(unsafe_code)]

//! Localized ISO 4217 currency display data.
//!
//! Provides validated currency codes and locale ids, per-locale tables of
//! `(symbol, display name)` pairs with their JSON file format, currency
//! metadata (fraction digits, rounding, numeric codes), and an in-memory
//! catalog for lookups. No I/O happens here; see `curdata-store`.

pub mod catalog;
pub mod code;
pub mod error;
pub mod meta;
pub mod table;

pub use catalog::{CoverageReport, CurrencyCatalog, LocaleCoverage};
pub use code::{CurrencyCode, DEFAULT_LOCALE, LocaleId};
pub use error::{CurrencyError, Result};
pub use meta::{CurrencyMeta, MAX_NUMERIC_CODE, MetaTable};
pub use table::{CurrencyEntry, CurrencyLocaleTable};
