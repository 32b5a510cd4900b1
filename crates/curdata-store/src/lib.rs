#![forbid(unsafe_code)]

//! Filesystem layer for curdata.
//!
//! A data directory holds one `<locale>.json` table per locale plus an
//! optional `meta.json`. This crate loads such a directory into a
//! [`CurrencyCatalog`](curdata_core::CurrencyCatalog), writes tables back in
//! canonical form, and validates a directory without stopping at the first
//! bad file.

pub mod error;
pub mod loader;
pub mod validate;
pub mod writer;

pub use error::{Result, StoreError};
pub use loader::{META_FILE, load_dir, load_meta, load_table, locale_from_path, table_files};
pub use validate::{Issue, IssueKind, Severity, ValidationReport, validate_dir};
pub use writer::{format_dir, is_canonical, write_meta, write_table};
