use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

/// One backend-produced triple. `metrics` arrives as arbitrary JSON and is
/// flattened before the table ever sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub word: String,
    pub part_of_speech: String,
    pub metrics: serde_json::Value,
}

impl RawRecord {
    pub fn new(
        word: impl Into<String>,
        part_of_speech: impl Into<String>,
        metrics: serde_json::Value,
    ) -> Self {
        RawRecord { word: word.into(), part_of_speech: part_of_speech.into(), metrics }
    }
}

impl From<(String, String, serde_json::Value)> for RawRecord {
    fn from((word, part_of_speech, metrics): (String, String, serde_json::Value)) -> Self {
        RawRecord { word, part_of_speech, metrics }
    }
}

/// A metric leaf after flattening. Keeping "missing" in the type makes the
/// fail-closed predicate rule a plain match instead of a runtime type probe.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String form used for comparisons and CSV cells. Missing renders empty.
    pub fn display(&self) -> String {
        match self {
            MetricValue::Number(n) => n.to_string(),
            MetricValue::Text(s) => s.clone(),
            MetricValue::Missing => String::new(),
        }
    }
}

/// One row of the table: a RawRecord with its metrics flattened to
/// dotted-path keys. Derived, never mutated in place.
#[derive(Debug, Clone)]
pub struct FlatRecord {
    pub word: String,
    pub part_of_speech: String,
    pub metrics: HashMap<String, MetricValue>,
}

impl FlatRecord {
    pub fn metric(&self, key: &str) -> &MetricValue {
        self.metrics.get(key).unwrap_or(&MetricValue::Missing)
    }

    /// Character count of the word, the length the word-length filter uses.
    pub fn word_len(&self) -> usize {
        self.word.chars().count()
    }
}

/// Progress event emitted by the backend while an analysis run is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub current: usize,
    pub total: usize,
    pub file: String,
}

impl ProgressEvent {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f32 / self.total as f32
    }
}
