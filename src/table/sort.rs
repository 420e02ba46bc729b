use std::cmp::Ordering;

use crate::core::{
    FlatRecord,
    MetricValue,
};

/// Column keys for the two fixed, non-metric columns.
pub const COL_WORD: &str = "word";
pub const COL_POS: &str = "pos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// One step of the header-click cycle.
    pub fn cycled(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn is_active(&self) -> bool {
        self.direction != SortDirection::None && !self.column.is_empty()
    }

    /// Header click: the same column cycles ascending, descending, none;
    /// a different column always starts over at ascending.
    pub fn toggle(&mut self, column: &str) {
        if self.column == column {
            self.direction = self.direction.cycled();
            if self.direction == SortDirection::None {
                self.column.clear();
            }
        } else {
            self.column = column.to_string();
            self.direction = SortDirection::Ascending;
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self { column: String::new(), direction: SortDirection::None }
    }
}

/// Reorder `indices` into `records` according to the sort state. An inactive
/// state leaves the incoming order untouched. The sort is stable, so ties
/// keep their prior relative order.
pub fn sort_indices(indices: &mut [usize], records: &[FlatRecord], state: &SortState) {
    if !state.is_active() {
        return;
    }

    indices.sort_by(|&lhs, &rhs| {
        let ordering = compare_records(&records[lhs], &records[rhs], &state.column);
        match state.direction {
            SortDirection::Descending => ordering.reverse(),
            _ => ordering,
        }
    });
}

/// Ascending comparison of two records on one column. The fixed columns
/// compare as strings; metric columns compare numerically inside the
/// numeric class, with everything non-numeric (missing coerced to "")
/// ordered as strings after it, so a column mixing numbers and text still
/// gets a total order.
pub fn compare_records(left: &FlatRecord, right: &FlatRecord, column: &str) -> Ordering {
    match column {
        COL_WORD => left.word.cmp(&right.word),
        COL_POS => left.part_of_speech.cmp(&right.part_of_speech),
        _ => compare_metrics(left.metric(column), right.metric(column)),
    }
}

fn compare_metrics(left: &MetricValue, right: &MetricValue) -> Ordering {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.display().cmp(&right.display()),
    }
}
