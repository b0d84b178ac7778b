//! The table controller.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use portal_model::{CellValue, ColumnDescriptor, Notice, Notifier, Record, RowId};
use serde_json::Value;

use crate::error::{Result, TableError};
use crate::export::{to_csv, write_file};
use crate::query::{SortDirection, SortSpec, filter_rows, page_count, paginate, sort_rows};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

pub const EXPORT_SUCCEEDED_MESSAGE: &str = "导出成功";
pub const EXPORT_FAILED_MESSAGE: &str = "导出失败";

/// Construction options for [`TableState`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub page_size: usize,
    /// Fields searched by keyword; empty means every field.
    pub search_keys: Vec<String>,
    /// Column order and labels used by export.
    pub columns: Vec<ColumnDescriptor>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_keys: Vec::new(),
            columns: Vec::new(),
        }
    }
}

impl TableOptions {
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }
}

/// In-memory grid state.
///
/// `source` is the only stored collection. The filtered, sorted and paged
/// views are recomputed from it on every read. Rows are addressed by id;
/// positions are derived on demand. The selection only ever holds ids of
/// rows currently in `source`: removing a row drops it from the selection.
#[derive(Debug, Clone)]
pub struct TableState {
    source: Vec<Record>,
    search_keys: Vec<String>,
    columns: Vec<ColumnDescriptor>,
    keyword: String,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
    selection: BTreeSet<RowId>,
    next_id: u64,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(TableOptions::default())
    }
}

impl TableState {
    pub fn new(options: TableOptions) -> Self {
        Self {
            source: Vec::new(),
            search_keys: options.search_keys,
            columns: options.columns,
            keyword: String::new(),
            sort: None,
            page: 1,
            page_size: options.page_size,
            selection: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn with_rows(options: TableOptions, rows: Vec<Record>) -> Self {
        let mut table = Self::new(options);
        table.set_source(rows);
        table
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn search_keys(&self) -> &[String] {
        &self.search_keys
    }

    // ---------------------------------------------------------------------
    // Source mutation
    // ---------------------------------------------------------------------

    /// Replaces the collection and returns to page 1.
    ///
    /// Rows sharing an id with an earlier row get a fresh id. Selected ids
    /// that still exist stay selected.
    pub fn set_source(&mut self, rows: Vec<Record>) {
        self.next_id = rows.iter().map(|r| r.id.get()).max().map_or(1, |max| max + 1);
        let mut seen = BTreeSet::new();
        let mut source = Vec::with_capacity(rows.len());
        for mut row in rows {
            if !seen.insert(row.id) {
                row.id = self.fresh_id();
                seen.insert(row.id);
            }
            source.push(row);
        }
        self.source = source;
        self.page = 1;
        self.prune_selection();
        tracing::debug!(rows = self.source.len(), "table source replaced");
    }

    /// Loads JSON objects, taking ids from `id` or `index` fields when present.
    pub fn set_source_json(&mut self, rows: &[Value]) {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, value)| Record::from_json(value, RowId::new(i as u64 + 1)))
            .collect();
        self.set_source(records);
    }

    /// Appends a row, assigning a fresh id if its id is taken.
    pub fn add_row(&mut self, mut row: Record) -> RowId {
        if self.index_of(row.id).is_some() {
            row.id = self.fresh_id();
        } else {
            self.next_id = self.next_id.max(row.id.get() + 1);
        }
        let id = row.id;
        self.source.push(row);
        id
    }

    /// Appends a row built from cells under a fresh id.
    pub fn add_cells(&mut self, cells: BTreeMap<String, CellValue>) -> RowId {
        let id = self.fresh_id();
        self.source.push(Record { id, cells });
        id
    }

    /// Replaces the cells of row `id`.
    pub fn update_row(&mut self, id: RowId, cells: BTreeMap<String, CellValue>) -> Result<()> {
        let row = self.row_mut(id).ok_or(TableError::RowNotFound(id))?;
        row.cells = cells;
        Ok(())
    }

    /// Sets one cell of row `id`.
    pub fn update_cell(
        &mut self,
        id: RowId,
        key: impl Into<String>,
        value: impl Into<CellValue>,
    ) -> Result<()> {
        let row = self.row_mut(id).ok_or(TableError::RowNotFound(id))?;
        row.set(key, value);
        Ok(())
    }

    /// Positional form of [`update_row`](Self::update_row).
    pub fn update_at(&mut self, index: usize, cells: BTreeMap<String, CellValue>) -> Result<()> {
        let id = self.id_at(index)?;
        self.update_row(id, cells)
    }

    /// Removes row `id` and drops it from the selection.
    pub fn remove_row(&mut self, id: RowId) -> Option<Record> {
        let index = self.index_of(id)?;
        self.selection.remove(&id);
        Some(self.source.remove(index))
    }

    /// Removes every listed row; returns how many existed.
    pub fn remove_rows(&mut self, ids: &[RowId]) -> usize {
        let doomed: BTreeSet<RowId> = ids.iter().copied().collect();
        let before = self.source.len();
        self.source.retain(|row| !doomed.contains(&row.id));
        self.selection.retain(|id| !doomed.contains(id));
        before - self.source.len()
    }

    /// Positional form of [`remove_row`](Self::remove_row).
    pub fn remove_at(&mut self, index: usize) -> Option<Record> {
        let id = self.source.get(index)?.id;
        self.remove_row(id)
    }

    /// Removes rows by position, highest index first. Duplicates and
    /// out-of-range indices are ignored.
    pub fn remove_at_many(&mut self, indices: &[usize]) -> usize {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        unique
            .into_iter()
            .rev()
            .filter_map(|index| self.remove_at(index))
            .count()
    }

    /// Empties the collection and selection and returns to page 1.
    pub fn clear_data(&mut self) {
        self.source.clear();
        self.selection.clear();
        self.page = 1;
    }

    pub fn rows(&self) -> &[Record] {
        &self.source
    }

    pub fn row(&self, id: RowId) -> Option<&Record> {
        self.source.iter().find(|row| row.id == id)
    }

    /// Current position of `id` in the source collection.
    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.source.iter().position(|row| row.id == id)
    }

    // ---------------------------------------------------------------------
    // Query state
    // ---------------------------------------------------------------------

    /// Sets the search keyword and returns to page 1.
    pub fn search(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
        self.page = 1;
    }

    /// Drops the keyword and returns to page 1.
    pub fn clear_search(&mut self) {
        self.keyword.clear();
        self.page = 1;
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Sorts the view by `field`; the page is left as is.
    pub fn sort(&mut self, field: impl Into<String>, direction: SortDirection) {
        self.sort = Some(SortSpec::new(field, direction));
    }

    /// Restores source order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Moves to `page`; a non-zero `size` also changes the page size.
    pub fn set_page(&mut self, page: usize, size: Option<usize>) {
        self.page = page;
        if let Some(size) = size.filter(|s| *s > 0) {
            self.page_size = size;
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Page 1, no search, no sort.
    pub fn refresh(&mut self) {
        self.clear_search();
        self.clear_sort();
    }

    // ---------------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------------

    /// Filtered and sorted rows.
    pub fn filtered(&self) -> Vec<&Record> {
        let mut rows = filter_rows(&self.source, &self.keyword, &self.search_keys);
        if let Some(spec) = &self.sort {
            sort_rows(&mut rows, spec);
        }
        rows
    }

    /// The current page of the filtered and sorted rows.
    pub fn paged(&self) -> Vec<&Record> {
        paginate(&self.filtered(), self.page, self.page_size).to_vec()
    }

    /// Rows in the source collection, ignoring the search.
    pub fn total(&self) -> usize {
        self.source.len()
    }

    /// Rows matching the current search.
    pub fn filtered_len(&self) -> usize {
        filter_rows(&self.source, &self.keyword, &self.search_keys).len()
    }

    /// Pages in the filtered view, zero when it is empty.
    pub fn total_pages(&self) -> usize {
        page_count(self.filtered_len(), self.page_size)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Replaces the selection. Unknown ids are ignored.
    pub fn select(&mut self, ids: impl IntoIterator<Item = RowId>) {
        let known: BTreeSet<RowId> = self.source.iter().map(|r| r.id).collect();
        self.selection = ids.into_iter().filter(|id| known.contains(id)).collect();
    }

    /// Selects every row of the filtered view.
    pub fn select_all(&mut self) {
        self.selection = filter_rows(&self.source, &self.keyword, &self.search_keys)
            .iter()
            .map(|r| r.id)
            .collect();
    }

    /// Flips selection of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.selection.remove(&id) {
            return false;
        }
        if self.index_of(id).is_none() {
            return false;
        }
        self.selection.insert(id)
    }

    /// Unselects `id` if selected.
    pub fn deselect(&mut self, id: RowId) {
        self.selection.remove(&id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids in source order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selected_rows().iter().map(|r| r.id).collect()
    }

    /// Selected rows in source order.
    pub fn selected_rows(&self) -> Vec<&Record> {
        self.source
            .iter()
            .filter(|row| self.selection.contains(&row.id))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// CSV of the filtered and sorted view, ignoring pagination.
    pub fn export_csv(&self) -> Result<String> {
        to_csv(&self.filtered(), &self.columns)
    }

    /// Writes [`export_csv`](Self::export_csv) to `path` and posts a notice.
    pub fn export_to(&self, path: &Path, notifier: &dyn Notifier) -> bool {
        let result = self
            .export_csv()
            .and_then(|contents| write_file(path, &contents));
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), rows = self.filtered_len(), "table exported");
                notifier.notify(Notice::success(EXPORT_SUCCEEDED_MESSAGE));
                true
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "table export failed");
                notifier.notify(Notice::error(EXPORT_FAILED_MESSAGE));
                false
            }
        }
    }

    fn fresh_id(&mut self) -> RowId {
        let id = RowId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut Record> {
        self.source.iter_mut().find(|row| row.id == id)
    }

    fn id_at(&self, index: usize) -> Result<RowId> {
        self.source
            .get(index)
            .map(|row| row.id)
            .ok_or(TableError::IndexOutOfRange {
                index,
                len: self.source.len(),
            })
    }

    fn prune_selection(&mut self) {
        let known: BTreeSet<RowId> = self.source.iter().map(|r| r.id).collect();
        self.selection.retain(|id| known.contains(id));
    }
}
