//! The derivation pipeline: filter, sort, paginate.
//!
//! Each stage is a pure function over borrowed rows so the stages can be
//! checked on their own.

use portal_model::{CellValue, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// Rows whose searchable cells contain `keyword`, ignoring case.
///
/// A blank keyword keeps every row. With no declared search keys every cell
/// is searched. Null, empty, `false` and zero cells never match.
pub fn filter_rows<'a>(rows: &'a [Record], keyword: &str, keys: &[String]) -> Vec<&'a Record> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            let matches = |cell: &CellValue| {
                !cell.is_falsy() && cell.display().to_lowercase().contains(&keyword)
            };
            if keys.is_empty() {
                row.cells.values().any(matches)
            } else {
                keys.iter().filter_map(|key| row.get(key)).any(matches)
            }
        })
        .collect()
}

/// Stable sort by one field; ties keep their incoming order.
pub fn sort_rows(rows: &mut [&Record], spec: &SortSpec) {
    let null = CellValue::Null;
    rows.sort_by(|a, b| {
        let left = a.get(&spec.field).unwrap_or(&null);
        let right = b.get(&spec.field).unwrap_or(&null);
        let ordering = left.total_cmp(right);
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// The 1-based `page` of `size` items. Page 0, size 0 and pages past the
/// end are empty.
pub fn paginate<T>(items: &[T], page: usize, size: usize) -> &[T] {
    if page == 0 || size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

pub fn page_count(len: usize, size: usize) -> usize {
    if size == 0 { 0 } else { len.div_ceil(size) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Record> {
        vec![
            Record::new(1).with("name", "Alice").with("age", 30_i64),
            Record::new(2).with("name", "bob").with("age", 0_i64),
            Record::new(3).with("name", "Carol").with("age", 30_i64),
            Record::new(4).with("name", CellValue::Null).with("age", 25_i64),
        ]
    }

    #[test]
    fn filter_is_case_insensitive_and_trimmed() {
        let rows = rows();
        let keys = vec!["name".to_string()];
        let hits: Vec<u64> = filter_rows(&rows, "  AL ", &keys)
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(hits, vec![1]);
        assert_eq!(filter_rows(&rows, "   ", &keys).len(), 4);
    }

    #[test]
    fn falsy_cells_never_match() {
        let rows = rows();
        assert!(filter_rows(&rows, "0", &["age".to_string()]).is_empty());
        assert_eq!(filter_rows(&rows, "25", &[]).len(), 1);
    }

    #[test]
    fn descending_sort_keeps_ties_stable() {
        let rows = rows();
        let mut view: Vec<&Record> = rows.iter().collect();
        sort_rows(&mut view, &SortSpec::descending("age"));
        let ids: Vec<u64> = view.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 3, 4, 2]);
    }

    #[test]
    fn missing_field_sorts_as_null() {
        let rows = rows();
        let mut view: Vec<&Record> = rows.iter().collect();
        sort_rows(&mut view, &SortSpec::ascending("name"));
        assert_eq!(view[0].id.get(), 4);
    }

    #[test]
    fn pagination_edges() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(&items, 3, 10).len(), 5);
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 0, 10).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(0, 10), 0);
    }
}
