//! Roster CSV import.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use portal_model::{CellValue, ColumnDescriptor, ColumnKind, Record};

use crate::error::{Result, RosterError};

const UTF8_BOM: char = '\u{feff}';

/// Reads roster rows from CSV.
///
/// Header cells match a column by key or by label, ignoring surrounding
/// whitespace; unmatched headers are skipped. Select cells holding an option
/// label are stored as the option value. Number cells that parse are stored
/// as numbers; anything else is kept as text for [`crate::check_row`] to
/// report. Rows get sequential ids from 1 and blank rows are skipped.
pub fn import_csv<R: Read>(reader: R, columns: &[ColumnDescriptor]) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mapping: Vec<Option<&ColumnDescriptor>> = headers
        .iter()
        .map(|header| match_column(header.trim_start_matches(UTF8_BOM).trim(), columns))
        .collect();
    if mapping.iter().all(Option::is_none) {
        return Err(RosterError::NoMatchingColumns {
            expected: columns.iter().map(|c| c.label.clone()).collect(),
        });
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let mut row = Record::new(rows.len() as u64 + 1);
        for column in columns {
            row.set(column.key.clone(), empty_cell(column));
        }
        for (raw, column) in record.iter().zip(&mapping) {
            if let Some(column) = column {
                row.set(column.key.clone(), convert(raw, column));
            }
        }
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), "roster rows imported");
    Ok(rows)
}

/// [`import_csv`] over a file on disk.
pub fn import_csv_path(path: &Path, columns: &[ColumnDescriptor]) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_csv(file, columns)
}

fn match_column<'a>(header: &str, columns: &'a [ColumnDescriptor]) -> Option<&'a ColumnDescriptor> {
    columns
        .iter()
        .find(|c| c.key == header)
        .or_else(|| columns.iter().find(|c| c.label == header))
}

fn empty_cell(column: &ColumnDescriptor) -> CellValue {
    match column.kind {
        ColumnKind::Number => CellValue::Null,
        ColumnKind::Text | ColumnKind::Select => CellValue::text(""),
    }
}

fn convert(raw: &str, column: &ColumnDescriptor) -> CellValue {
    if raw.is_empty() {
        return empty_cell(column);
    }
    match column.kind {
        ColumnKind::Text => CellValue::text(raw),
        ColumnKind::Select => column
            .option_for_label(raw)
            .or_else(|| column.option_for_value(raw))
            .map_or_else(|| CellValue::text(raw), |o| CellValue::text(o.value.as_str())),
        ColumnKind::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map_or_else(|| CellValue::text(raw), CellValue::Number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_model::SelectOption;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::text("name", "姓名"),
            ColumnDescriptor::number("age", "年龄"),
            ColumnDescriptor::select(
                "gender",
                "性别",
                vec![SelectOption::new("男", "male"), SelectOption::new("女", "female")],
            ),
        ]
    }

    #[test]
    fn maps_labels_and_keys() {
        let input = "\u{feff}姓名, age ,性别,备注\n张三,12,男,x\n李四,abc,female\n,,\n";
        let rows = import_csv(input.as_bytes(), &columns()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.get(), 1);
        assert_eq!(rows[0].get("name"), Some(&CellValue::text("张三")));
        assert_eq!(rows[0].get("age"), Some(&CellValue::Number(12.0)));
        assert_eq!(rows[0].get("gender"), Some(&CellValue::text("male")));
        assert!(rows[0].get("备注").is_none());
        assert_eq!(rows[1].get("age"), Some(&CellValue::text("abc")));
        assert_eq!(rows[1].get("gender"), Some(&CellValue::text("female")));
    }

    #[test]
    fn missing_columns_are_blank() {
        let rows = import_csv("姓名\n王五\n".as_bytes(), &columns()).unwrap();
        assert_eq!(rows[0].get("age"), Some(&CellValue::Null));
        assert_eq!(rows[0].get("gender"), Some(&CellValue::text("")));
    }

    #[test]
    fn rejects_unrelated_headers() {
        let err = import_csv("a,b\n1,2\n".as_bytes(), &columns()).unwrap_err();
        assert!(matches!(err, RosterError::NoMatchingColumns { .. }));
    }
}
