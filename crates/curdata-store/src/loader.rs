//! Load currency tables and metadata from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use curdata_core::{CurrencyCatalog, CurrencyLocaleTable, LocaleId, MetaTable};
use tracing::{debug, info, info_span};

use crate::error::{Result, StoreError};

/// File name of the metadata document inside a data directory.
pub const META_FILE: &str = "meta.json";

/// Locale named by a table file's stem (`data/bs_Cyrl.json` → `bs_Cyrl`).
pub fn locale_from_path(path: &Path) -> Result<LocaleId> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    LocaleId::parse(stem).map_err(|err| StoreError::data(path, err))
}

/// Read one `<locale>.json` table.
pub fn load_table(path: impl AsRef<Path>) -> Result<CurrencyLocaleTable> {
    let path = path.as_ref();
    let locale = locale_from_path(path)?;
    let text = fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let table =
        CurrencyLocaleTable::from_json(locale, &text).map_err(|err| StoreError::data(path, err))?;
    debug!(
        path = %path.display(),
        locale = %table.locale(),
        entries = table.len(),
        "loaded currency table"
    );
    Ok(table)
}

/// Read a `meta.json` document.
pub fn load_meta(path: impl AsRef<Path>) -> Result<MetaTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let meta = MetaTable::from_json(&text).map_err(|err| StoreError::data(path, err))?;
    debug!(
        path = %path.display(),
        fractions = meta.explicit_fraction_count(),
        "loaded currency metadata"
    );
    Ok(meta)
}

/// Table files of `dir`: every `*.json` except [`META_FILE`], sorted by name.
pub fn table_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|err| StoreError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| StoreError::io(dir, err))?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_meta = path.file_name().is_some_and(|name| name == META_FILE);
        if is_json && !is_meta && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load a whole data directory into a catalog.
///
/// Every table file becomes a locale. `meta.json` supplies metadata when
/// present; otherwise the catalog keeps the default metadata. The first
/// bad file aborts the load.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<CurrencyCatalog> {
    let dir = dir.as_ref();
    let _span = info_span!("load_dir", dir = %dir.display()).entered();
    let start = Instant::now();

    let mut catalog = CurrencyCatalog::new();
    for path in table_files(dir)? {
        catalog.add_locale(load_table(&path)?);
    }

    let meta_path = dir.join(META_FILE);
    let has_meta = meta_path.is_file();
    if has_meta {
        catalog.set_meta(load_meta(&meta_path)?);
    }

    info!(
        locales = catalog.locales().len(),
        has_meta,
        elapsed_us = start.elapsed().as_micros() as u64,
        "currency data loaded"
    );
    Ok(catalog)
}

/// Path of `locale`'s table inside `dir`.
pub(crate) fn table_path(dir: &Path, locale: &LocaleId) -> PathBuf {
    dir.join(format!("{locale}.json"))
}
