//! Per-locale currency display tables and their JSON file format.
//!
//! # File format
//!
//! ```json
//! {
//!   "version": "36",
//!   "names": {
//!     "EUR": ["€", "Euro"],
//!     "USD": ["US$", "US-Dollar"]
//!   }
//! }
//! ```
//!
//! `version` is optional. The locale is not part of the document: it is
//! supplied by whoever reads the file (normally the file stem).
//!
//! # Invariants
//!
//! 1. **Unique codes**: a code maps to exactly one entry. Both
//!    [`CurrencyLocaleTable::insert`] and [`CurrencyLocaleTable::from_json`]
//!    reject a repeated code instead of letting the later value win.
//!
//! 2. **Canonical encoding**: [`CurrencyLocaleTable::to_json`] emits codes in
//!    ascending order with two-space indentation and a trailing newline, so
//!    equal tables encode to equal bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::code::{CurrencyCode, LocaleId};
use crate::error::{CurrencyError, Result};

/// Localized symbol and display name of one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyEntry {
    /// Display symbol (`€`, `US$`, or the code itself).
    pub symbol: String,
    /// Localized display name.
    pub name: String,
}

impl CurrencyEntry {
    #[must_use]
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// Whether the symbol differs from the bare currency code.
    #[must_use]
    pub fn has_localized_symbol(&self, code: CurrencyCode) -> bool {
        self.symbol != code.as_str()
    }
}

// On disk an entry is a two-element array: `[symbol, name]`.
impl Serialize for CurrencyEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.symbol, &self.name).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CurrencyEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (symbol, name) = <(String, String)>::deserialize(deserializer)?;
        Ok(Self { symbol, name })
    }
}

/// Currency names for a single locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyLocaleTable {
    locale: LocaleId,
    version: Option<String>,
    names: BTreeMap<CurrencyCode, CurrencyEntry>,
}

impl CurrencyLocaleTable {
    /// Create an empty table for `locale`.
    #[must_use]
    pub fn new(locale: LocaleId) -> Self {
        Self {
            locale,
            version: None,
            names: BTreeMap::new(),
        }
    }

    /// Attach a data version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Insert an entry. Fails if the code is already present.
    pub fn insert(
        &mut self,
        code: CurrencyCode,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<()> {
        self.insert_entry(code, CurrencyEntry::new(symbol, name))
    }

    /// Insert an entry whose symbol is the code itself.
    pub fn insert_name(&mut self, code: CurrencyCode, name: impl Into<String>) -> Result<()> {
        self.insert(code, code.as_str(), name)
    }

    fn insert_entry(&mut self, code: CurrencyCode, entry: CurrencyEntry) -> Result<()> {
        if self.names.contains_key(&code) {
            return Err(CurrencyError::DuplicateCode {
                locale: self.locale.to_string(),
                code,
            });
        }
        self.names.insert(code, entry);
        Ok(())
    }

    #[must_use]
    pub fn locale(&self) -> &LocaleId {
        &self.locale
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn get(&self, code: CurrencyCode) -> Option<&CurrencyEntry> {
        self.names.get(&code)
    }

    #[must_use]
    pub fn symbol(&self, code: CurrencyCode) -> Option<&str> {
        self.get(code).map(|e| e.symbol.as_str())
    }

    #[must_use]
    pub fn name(&self, code: CurrencyCode) -> Option<&str> {
        self.get(code).map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, code: CurrencyCode) -> bool {
        self.names.contains_key(&code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = CurrencyCode> + '_ {
        self.names.keys().copied()
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, &CurrencyEntry)> {
        self.names.iter().map(|(code, entry)| (*code, entry))
    }

    /// `(code, display name)` pairs ordered by display name.
    ///
    /// Names compare by their lowercase form first, then as written, then
    /// by code, so the order is total and stable across runs.
    #[must_use]
    pub fn names_sorted(&self) -> Vec<(CurrencyCode, &str)> {
        let mut keyed: Vec<(String, &str, CurrencyCode)> = self
            .names
            .iter()
            .map(|(code, entry)| (entry.name.to_lowercase(), entry.name.as_str(), *code))
            .collect();
        keyed.sort_unstable();
        keyed
            .into_iter()
            .map(|(_, name, code)| (code, name))
            .collect()
    }

    /// Parse a table document for `locale`.
    pub fn from_json(locale: LocaleId, text: &str) -> Result<Self> {
        let doc: TableDocument = serde_json::from_str(text)?;
        let mut table = Self::new(locale);
        table.version = doc.version;
        for (code, entry) in doc.names.0 {
            table.insert_entry(code, entry)?;
        }
        Ok(table)
    }

    /// Encode the table in canonical form.
    pub fn to_json(&self) -> Result<String> {
        let doc = TableDocumentRef {
            version: self.version.as_deref(),
            names: &self.names,
        };
        let mut out = serde_json::to_string_pretty(&doc)?;
        out.push('\n');
        Ok(out)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    #[serde(default)]
    version: Option<String>,
    names: EntryList<CurrencyEntry>,
}

#[derive(Serialize)]
struct TableDocumentRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    names: &'a BTreeMap<CurrencyCode, CurrencyEntry>,
}

/// Map entries in document order, duplicates kept so the caller can
/// report them.
pub(crate) struct EntryList<V>(pub(crate) Vec<(CurrencyCode, V)>);

impl<V> Default for EntryList<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for EntryList<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntryListVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntryListVisitor<V> {
            type Value = EntryList<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by currency code")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((code, value)) = map.next_entry::<CurrencyCode, V>()? {
                    entries.push((code, value));
                }
                Ok(EntryList(entries))
            }
        }

        deserializer.deserialize_map(EntryListVisitor(PhantomData))
    }
}
