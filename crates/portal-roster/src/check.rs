//! Per-row checks against column constraints.

use std::fmt;

use portal_model::{CellValue, ColumnDescriptor, ColumnKind, Record, RowId};
use serde::Serialize;

/// A cell that breaks its column's declared constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
    /// Select value outside the option list
    UnknownOption { field: String, value: String },
    /// Number column holding something that is not a number
    NotANumber { field: String, value: String },
    BelowMin { field: String, value: f64, min: f64 },
    AboveMax { field: String, value: f64, max: f64 },
    TooLong {
        field: String,
        length: usize,
        max_length: usize,
    },
}

impl RowIssue {
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownOption { field, .. }
            | Self::NotANumber { field, .. }
            | Self::BelowMin { field, .. }
            | Self::AboveMax { field, .. }
            | Self::TooLong { field, .. } => field,
        }
    }

    /// Message shown next to the cell, prefixed with the column label.
    pub fn message(&self, label: &str) -> String {
        match self {
            Self::UnknownOption { value, .. } => format!("{label}的取值“{value}”不在可选范围内"),
            Self::NotANumber { value, .. } => format!("{label}必须是数字，当前为“{value}”"),
            Self::BelowMin { min, .. } => format!("{label}不能小于{}", CellValue::Number(*min)),
            Self::AboveMax { max, .. } => format!("{label}不能大于{}", CellValue::Number(*max)),
            Self::TooLong { max_length, .. } => format!("{label}长度不能超过{max_length}位"),
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(self.field()))
    }
}

/// Checks one row. Blank cells pass; requiredness is the form's concern.
pub fn check_row(record: &Record, columns: &[ColumnDescriptor]) -> Vec<RowIssue> {
    let mut issues = Vec::new();
    for column in columns {
        let Some(cell) = record.get(&column.key) else {
            continue;
        };
        if cell.is_blank() {
            continue;
        }
        check_cell(column, cell, &mut issues);
    }
    issues
}

/// Checks every row, pairing each issue with its row id.
pub fn check_rows<'a, I>(records: I, columns: &[ColumnDescriptor]) -> Vec<(RowId, RowIssue)>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .flat_map(|record| {
            check_row(record, columns)
                .into_iter()
                .map(move |issue| (record.id, issue))
        })
        .collect()
}

fn check_cell(column: &ColumnDescriptor, cell: &CellValue, issues: &mut Vec<RowIssue>) {
    let field = || column.key.clone();
    let text = cell.display();

    match column.kind {
        ColumnKind::Select => {
            if !column.options.is_empty() && column.option_for_value(&text).is_none() {
                issues.push(RowIssue::UnknownOption {
                    field: field(),
                    value: text.into_owned(),
                });
                return;
            }
        }
        ColumnKind::Number => {
            let parsed = cell.as_f64().or_else(|| text.trim().parse::<f64>().ok());
            let Some(value) = parsed.filter(|n| n.is_finite()) else {
                issues.push(RowIssue::NotANumber {
                    field: field(),
                    value: text.into_owned(),
                });
                return;
            };
            if let Some(min) = column.constraints.min
                && value < min
            {
                issues.push(RowIssue::BelowMin {
                    field: field(),
                    value,
                    min,
                });
            }
            if let Some(max) = column.constraints.max
                && value > max
            {
                issues.push(RowIssue::AboveMax {
                    field: field(),
                    value,
                    max,
                });
            }
        }
        ColumnKind::Text => {}
    }

    if let Some(max_length) = column.constraints.max_length {
        let length = text.chars().count();
        if length > max_length {
            issues.push(RowIssue::TooLong {
                field: field(),
                length,
                max_length,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age() -> ColumnDescriptor {
        ColumnDescriptor::number("age", "年龄").min(1.0).max(120.0)
    }

    #[test]
    fn number_bounds() {
        let columns = vec![age()];
        let issues = check_row(&Record::new(1).with("age", 130_i64), &columns);
        assert_eq!(
            issues,
            vec![RowIssue::AboveMax {
                field: "age".to_string(),
                value: 130.0,
                max: 120.0
            }]
        );
        assert_eq!(issues[0].message("年龄"), "年龄不能大于120");
        assert!(check_row(&Record::new(1).with("age", 12_i64), &columns).is_empty());
    }

    #[test]
    fn text_in_number_column() {
        let issues = check_row(&Record::new(1).with("age", "twelve"), &[age()]);
        assert!(matches!(&issues[0], RowIssue::NotANumber { value, .. } if value == "twelve"));
    }

    #[test]
    fn blank_cells_pass() {
        let record = Record::new(1).with("age", CellValue::Null);
        assert!(check_row(&record, &[age()]).is_empty());
    }
}
