pub mod columns;
pub mod filter;
pub mod flatten;
pub mod paginate;
pub mod sort;


use crate::core::{
    FlatRecord,
    RawRecord,
};
pub use columns::collect_columns;
pub use filter::{
    FilterState,
    MetricPredicate,
    PosFilter,
    PredicateOp,
    WordLengthFilter,
};
pub use flatten::{
    flatten_batch,
    flatten_record,
};
pub use paginate::{
    PageState,
    PAGE_SIZE,
};
pub use sort::{
    SortDirection,
    SortState,
    COL_POS,
    COL_WORD,
};

/// The result pipeline behind the word table. Owns the flattened batch and
/// the sort/filter/page configuration, recomputing the visible row set
/// lazily whenever any of them changes. Every stage is a pure function of
/// its inputs; this struct only sequences them and enforces the page-reset
/// rules.
pub struct TableState {
    records: Vec<FlatRecord>,
    columns: Vec<String>,
    sort: SortState,
    filter: FilterState,
    page: PageState,
    visible_indices: Vec<usize>,
    dirty: bool,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            columns: Vec::new(),
            sort: SortState::default(),
            filter: FilterState::default(),
            page: PageState::default(),
            visible_indices: Vec::new(),
            dirty: true,
        }
    }
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw batch. Sort and page reset; filters persist so a
    /// re-run with the same configuration stays comparable.
    pub fn set_records(&mut self, raw: &[RawRecord]) {
        self.records = flatten_batch(raw);
        self.columns = collect_columns(&self.records);
        self.sort = SortState::default();
        self.page.reset();
        self.dirty = true;
    }

    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    /// Sorted metric column names for the current batch.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    fn is_sortable(&self, column: &str) -> bool {
        column == COL_WORD || column == COL_POS || self.columns.iter().any(|c| c == column)
    }

    /// Header click. Unknown columns are ignored so a stale key (after a
    /// batch swap) cannot poison the sort state.
    pub fn toggle_sort(&mut self, column: &str) {
        if !self.is_sortable(column) {
            return;
        }
        self.sort.toggle(column);
        self.page.reset();
        self.dirty = true;
    }

    pub fn set_word_length(&mut self, min: Option<u32>, max: Option<u32>) {
        self.filter.word_length = WordLengthFilter { min, max };
        self.filter_changed();
    }

    pub fn include_pos(&mut self, tag: impl Into<String>) {
        self.filter.pos.include.insert(tag.into());
        self.filter_changed();
    }

    pub fn exclude_pos(&mut self, tag: impl Into<String>) {
        self.filter.pos.exclude.insert(tag.into());
        self.filter_changed();
    }

    pub fn remove_include_pos(&mut self, tag: &str) {
        if self.filter.pos.include.remove(tag) {
            self.filter_changed();
        }
    }

    pub fn remove_exclude_pos(&mut self, tag: &str) {
        if self.filter.pos.exclude.remove(tag) {
            self.filter_changed();
        }
    }

    pub fn add_predicate(&mut self, predicate: MetricPredicate) {
        self.filter.predicates.push(predicate);
        self.filter_changed();
    }

    pub fn update_predicate(&mut self, index: usize, predicate: MetricPredicate) {
        if let Some(slot) = self.filter.predicates.get_mut(index) {
            *slot = predicate;
            self.filter_changed();
        }
    }

    pub fn remove_predicate(&mut self, index: usize) {
        if index < self.filter.predicates.len() {
            self.filter.predicates.remove(index);
            self.filter_changed();
        }
    }

    /// Explicit clear: filters back to the empty default, sort back to the
    /// inactive state, page back to 1.
    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.sort = SortState::default();
        self.page.reset();
        self.dirty = true;
    }

    fn filter_changed(&mut self) {
        self.page.reset();
        self.dirty = true;
    }

    /// Jump to an absolute page. Out-of-range requests are rejected rather
    /// than clamped; the pipeline never sees an invalid page.
    pub fn set_page(&mut self, page: usize) -> bool {
        self.ensure_recompute();
        let total = paginate::total_pages(self.visible_indices.len());
        if page < 1 || page > total {
            return false;
        }
        self.page.current_page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        let target = self.page.current_page + 1;
        self.set_page(target)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page.current_page <= 1 {
            return false;
        }
        let target = self.page.current_page - 1;
        self.set_page(target)
    }

    pub fn total_pages(&mut self) -> usize {
        self.ensure_recompute();
        paginate::total_pages(self.visible_indices.len())
    }

    /// Rows for the current page, in display order.
    pub fn page_rows(&mut self) -> Vec<&FlatRecord> {
        self.ensure_recompute();
        paginate::page_slice(&self.visible_indices, &self.page)
            .iter()
            .map(|&idx| &self.records[idx])
            .collect()
    }

    /// The full filtered sequence, bypassing pagination. This is what the
    /// CSV export serializes.
    pub fn filtered_rows(&mut self) -> Vec<&FlatRecord> {
        self.ensure_recompute();
        self.visible_indices.iter().map(|&idx| &self.records[idx]).collect()
    }

    fn ensure_recompute(&mut self) {
        if !self.dirty {
            return;
        }

        self.visible_indices = (0..self.records.len()).collect();
        sort::sort_indices(&mut self.visible_indices, &self.records, &self.sort);
        filter::filter_indices(&mut self.visible_indices, &self.records, &self.filter);

        // Defensive clamp: a shrinking filtered set must not strand the
        // current page past the end.
        let total = paginate::total_pages(self.visible_indices.len());
        if self.page.current_page > total.max(1) {
            self.page.current_page = total.max(1);
        }

        self.dirty = false;
    }
}
