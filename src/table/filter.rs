use std::collections::HashSet;

use crate::core::FlatRecord;

/// Tolerance for the `=` operator, absorbing float noise from the metric
/// computations upstream.
pub const EQ_TOLERANCE: f64 = 1e-4;

/// Effective bounds when only one side of the length range is set.
const LENGTH_MIN_DEFAULT: u32 = 0;
const LENGTH_MAX_DEFAULT: u32 = 99;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordLengthFilter {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl WordLengthFilter {
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, length: usize) -> bool {
        if !self.is_active() {
            return true;
        }
        let min = self.min.unwrap_or(LENGTH_MIN_DEFAULT) as usize;
        let max = self.max.unwrap_or(LENGTH_MAX_DEFAULT) as usize;
        length >= min && length <= max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosFilter {
    pub include: HashSet<String>,
    pub exclude: HashSet<String>,
}

impl PosFilter {
    /// Exclude dominates: a tag present in both lists is rejected.
    pub fn allows(&self, pos: &str) -> bool {
        if !self.exclude.is_empty() && self.exclude.contains(pos) {
            return false;
        }
        if !self.include.is_empty() && !self.include.contains(pos) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl PredicateOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            ">" | "gt" => Some(PredicateOp::Gt),
            "<" | "lt" => Some(PredicateOp::Lt),
            ">=" | "gte" => Some(PredicateOp::Ge),
            "<=" | "lte" => Some(PredicateOp::Le),
            "=" | "eq" => Some(PredicateOp::Eq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PredicateOp::Gt => ">",
            PredicateOp::Lt => "<",
            PredicateOp::Ge => ">=",
            PredicateOp::Le => "<=",
            PredicateOp::Eq => "=",
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            PredicateOp::Gt => lhs > rhs,
            PredicateOp::Lt => lhs < rhs,
            PredicateOp::Ge => lhs >= rhs,
            PredicateOp::Le => lhs <= rhs,
            PredicateOp::Eq => (lhs - rhs).abs() <= EQ_TOLERANCE,
        }
    }
}

/// One `metric op value` condition. The value is kept as the user typed it;
/// an entry only participates once both the metric name and a parseable
/// number are present.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPredicate {
    pub metric: String,
    pub op: PredicateOp,
    pub value: String,
}

impl MetricPredicate {
    pub fn new(metric: impl Into<String>, op: PredicateOp, value: impl Into<String>) -> Self {
        Self { metric: metric.into(), op, value: value.into() }
    }

    fn threshold(&self) -> Option<f64> {
        if self.metric.is_empty() {
            return None;
        }
        self.value.trim().parse::<f64>().ok()
    }

    /// Fail-closed: an active predicate excludes any record whose metric is
    /// missing or non-numeric. Inactive predicates match everything.
    pub fn matches(&self, record: &FlatRecord) -> bool {
        let Some(threshold) = self.threshold() else {
            return true;
        };
        match record.metric(&self.metric).as_number() {
            Some(value) => self.op.apply(value, threshold),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub word_length: WordLengthFilter,
    pub pos: PosFilter,
    pub predicates: Vec<MetricPredicate>,
}

impl FilterState {
    /// AND across every active category.
    pub fn matches(&self, record: &FlatRecord) -> bool {
        if !self.word_length.contains(record.word_len()) {
            return false;
        }
        if !self.pos.allows(&record.part_of_speech) {
            return false;
        }
        self.predicates.iter().all(|p| p.matches(record))
    }
}

/// Drop every index whose record fails the filter, preserving order.
pub fn filter_indices(indices: &mut Vec<usize>, records: &[FlatRecord], state: &FilterState) {
    indices.retain(|&idx| state.matches(&records[idx]));
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        core::RawRecord,
        table::flatten::flatten_record,
    };

    fn record(word: &str, pos: &str, metrics: serde_json::Value) -> FlatRecord {
        flatten_record(&RawRecord::new(word, pos, metrics))
    }

    #[test]
    fn length_filter_bounds_are_inclusive() {
        let ab = record("ab", "n", json!({}));

        let exact = WordLengthFilter { min: Some(2), max: Some(2) };
        assert!(exact.contains(ab.word_len()));

        let too_short = WordLengthFilter { min: Some(3), max: None };
        assert!(!too_short.contains(ab.word_len()));
    }

    #[test]
    fn length_filter_counts_chars_not_bytes() {
        let word = record("跑步", "v", json!({}));
        let filter = WordLengthFilter { min: Some(2), max: Some(2) };

        assert!(filter.contains(word.word_len()));
    }

    #[test]
    fn unset_length_filter_passes_everything() {
        assert!(WordLengthFilter::default().contains(0));
        assert!(WordLengthFilter::default().contains(500));
    }

    #[test]
    fn exclude_dominates_include() {
        let mut pos = PosFilter::default();
        pos.include.insert("n".to_string());
        pos.exclude.insert("n".to_string());

        assert!(!pos.allows("n"));
    }

    #[test]
    fn include_requires_membership() {
        let mut pos = PosFilter::default();
        pos.include.insert("v".to_string());

        assert!(pos.allows("v"));
        assert!(!pos.allows("n"));
    }

    #[test]
    fn equality_predicate_is_epsilon_tolerant() {
        let predicate = MetricPredicate::new("x", PredicateOp::Eq, "1.0000");

        let close = record("a", "n", json!({"x": 1.00005}));
        assert!(predicate.matches(&close));

        let far = record("b", "n", json!({"x": 1.001}));
        assert!(!predicate.matches(&far));
    }

    #[test]
    fn missing_metric_fails_every_operator() {
        let rec = record("a", "n", json!({"freq": 0.5}));
        for op in [PredicateOp::Gt, PredicateOp::Lt, PredicateOp::Ge, PredicateOp::Le, PredicateOp::Eq]
        {
            let predicate = MetricPredicate::new("dispersion", op, "0");
            assert!(!predicate.matches(&rec), "op {} should fail closed", op.symbol());
        }
    }

    #[test]
    fn non_numeric_metric_fails_closed() {
        let rec = record("a", "n", json!({"note": "rare"}));
        let predicate = MetricPredicate::new("note", PredicateOp::Gt, "0");

        assert!(!predicate.matches(&rec));
    }

    #[test]
    fn blank_or_unparseable_predicates_are_inactive() {
        let rec = record("a", "n", json!({}));

        assert!(MetricPredicate::new("", PredicateOp::Gt, "1").matches(&rec));
        assert!(MetricPredicate::new("freq", PredicateOp::Gt, "").matches(&rec));
        assert!(MetricPredicate::new("freq", PredicateOp::Gt, "abc").matches(&rec));
    }

    #[test]
    fn categories_combine_with_and() {
        let mut state = FilterState::default();
        state.word_length = WordLengthFilter { min: Some(1), max: Some(1) };
        state.pos.include.insert("v".to_string());
        state.predicates.push(MetricPredicate::new("freq", PredicateOp::Gt, "0.6"));

        let passing = record("跑", "v", json!({"freq": 0.9}));
        assert!(state.matches(&passing));

        let wrong_pos = record("的", "u", json!({"freq": 0.9}));
        assert!(!state.matches(&wrong_pos));

        let low_freq = record("吃", "v", json!({"freq": 0.5}));
        assert!(!state.matches(&low_freq));
    }

    #[test]
    fn operator_parsing_accepts_symbols_and_names() {
        assert_eq!(PredicateOp::parse(">"), Some(PredicateOp::Gt));
        assert_eq!(PredicateOp::parse("gt"), Some(PredicateOp::Gt));
        assert_eq!(PredicateOp::parse("<="), Some(PredicateOp::Le));
        assert_eq!(PredicateOp::parse("=="), None);
    }
}
