//! Canonical, atomic writes of tables and metadata.
//!
//! Every write goes to a hidden sibling file first and is renamed over the
//! target, so a concurrent reader sees either the old or the new file.

use std::fs;
use std::path::{Path, PathBuf};

use curdata_core::{CurrencyLocaleTable, MetaTable};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::loader::{META_FILE, load_table, locale_from_path, table_files, table_path};

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(err) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(&tmp, err));
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, err));
    }
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Write `table` as `<dir>/<locale>.json` in canonical form.
pub fn write_table(dir: impl AsRef<Path>, table: &CurrencyLocaleTable) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let path = table_path(dir, table.locale());
    let json = table.to_json().map_err(|err| StoreError::data(&path, err))?;
    write_atomic(&path, &json)?;
    Ok(path)
}

/// Write `meta` as `<dir>/meta.json`.
pub fn write_meta(dir: impl AsRef<Path>, meta: &MetaTable) -> Result<PathBuf> {
    let path = dir.as_ref().join(META_FILE);
    let json = meta.to_json().map_err(|err| StoreError::data(&path, err))?;
    write_atomic(&path, &json)?;
    Ok(path)
}

/// Whether the file at `path` is byte-identical to the canonical encoding
/// of the table it contains. Unparseable files are errors, not `false`.
pub fn is_canonical(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let locale = locale_from_path(path)?;
    let table =
        CurrencyLocaleTable::from_json(locale, &text).map_err(|err| StoreError::data(path, err))?;
    let canonical = table.to_json().map_err(|err| StoreError::data(path, err))?;
    Ok(canonical == text)
}

/// Bring every table in `dir` into canonical form.
///
/// Returns the files that were rewritten, or with `check` set, the files
/// that would be; nothing is written in check mode.
pub fn format_dir(dir: impl AsRef<Path>, check: bool) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut changed = Vec::new();
    for path in table_files(dir)? {
        if is_canonical(&path)? {
            continue;
        }
        if !check {
            let table = load_table(&path)?;
            write_table(dir, &table)?;
        }
        changed.push(path);
    }
    info!(dir = %dir.display(), changed = changed.len(), check, "format pass finished");
    Ok(changed)
}
