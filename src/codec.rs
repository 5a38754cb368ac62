//! JSON import/export of the whole collection.
//!
//! Export writes the pretty-printed array. Import is all-or-nothing: any
//! malformed element rejects the whole file with one message, and accepted
//! records are appended with freshly assigned ids (see
//! [`WebsiteStore::import`](crate::store::WebsiteStore::import)), so an
//! export/import round trip duplicates records rather than restoring them.

use crate::error::{Error, Result};
use crate::website::Website;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default export file name.
pub const EXPORT_FILE: &str = "websites.json";

pub fn export_json(websites: &[Website]) -> Result<String> {
    Ok(serde_json::to_string_pretty(websites)?)
}

pub fn export_to_file(websites: &[Website], path: &Path) -> Result<()> {
    fs::write(path, export_json(websites)?)?;
    Ok(())
}

/// Parse an import file into `(name, url, icon)` triples. Any incoming `id`
/// is ignored; ids are reassigned on append.
pub fn parse_import(raw: &str) -> Result<Vec<(String, String, String)>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| Error::Import(format!("file is not valid JSON: {err}")))?;
    let Value::Array(items) = value else {
        return Err(Error::Import("JSON content must be an array".to_string()));
    };
    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let field = |key: &str| -> Result<String> {
            match item.get(key).and_then(Value::as_str) {
                Some(s) if !s.is_empty() => Ok(s.to_string()),
                _ => Err(Error::Import(format!(
                    "element {index} is missing a non-empty `{key}`"
                ))),
            }
        };
        parsed.push((field("name")?, field("url")?, field("icon")?));
    }
    Ok(parsed)
}

pub fn parse_import_file(path: &Path) -> Result<Vec<(String, String, String)>> {
    let raw = fs::read_to_string(path)?;
    parse_import(&raw)
}
