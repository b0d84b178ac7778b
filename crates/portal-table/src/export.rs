//! CSV export of a table view.

use std::fs;
use std::path::Path;

use portal_model::{ColumnDescriptor, Record};

use crate::error::{Result, TableError};

/// Serializes `rows` as CSV.
///
/// With declared `columns` the header row holds their labels in declared
/// order; otherwise it holds the keys of the first row. Non-numeric fields
/// are quoted. An empty view produces an empty string.
pub fn to_csv(rows: &[&Record], columns: &[ColumnDescriptor]) -> Result<String> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let (keys, headers): (Vec<String>, Vec<String>) = if columns.is_empty() {
        first.keys().map(|k| (k.to_string(), k.to_string())).unzip()
    } else {
        columns
            .iter()
            .map(|c| (c.key.clone(), c.label.clone()))
            .unzip()
    };

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&headers)?;
    for row in rows {
        let fields: Vec<String> = keys
            .iter()
            .map(|key| row.get(key).map(|v| v.display().into_owned()).unwrap_or_default())
            .collect();
        writer.write_record(&fields)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Csv(csv::Error::from(e.into_error())))?;
    String::from_utf8(bytes).map_err(|_| TableError::Encoding)
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| TableError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}
