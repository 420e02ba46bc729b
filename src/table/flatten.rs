use std::collections::HashMap;

use serde_json::Value;

use crate::core::{
    FlatRecord,
    MetricValue,
    RawRecord,
};

/// Flatten one raw record into a table row. Nested objects become
/// dotted-path keys; arrays and primitives are leaves. A malformed metrics
/// payload (anything but an object) flattens to an empty mapping.
pub fn flatten_record(raw: &RawRecord) -> FlatRecord {
    let mut metrics = HashMap::new();
    if let Value::Object(map) = &raw.metrics {
        for (key, value) in map {
            flatten_value(key, value, &mut metrics);
        }
    }

    FlatRecord {
        word: raw.word.clone(),
        part_of_speech: raw.part_of_speech.clone(),
        metrics,
    }
}

pub fn flatten_batch(raw: &[RawRecord]) -> Vec<FlatRecord> {
    raw.iter().map(flatten_record).collect()
}

fn flatten_value(path: &str, value: &Value, out: &mut HashMap<String, MetricValue>) {
    let leaf = match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_value(&format!("{}.{}", path, key), nested, out);
            }
            return;
        }
        // Null leaves keep their key so the column still shows up, but carry
        // no value that a predicate could pass on.
        Value::Null => MetricValue::Missing,
        Value::Number(n) => match n.as_f64() {
            Some(f) => MetricValue::Number(f),
            None => MetricValue::Text(n.to_string()),
        },
        Value::String(s) => MetricValue::Text(s.clone()),
        Value::Bool(b) => MetricValue::Text(b.to_string()),
        // Arrays are leaves, carried through verbatim.
        Value::Array(_) => MetricValue::Text(value.to_string()),
    };
    out.insert(path.to_string(), leaf);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(metrics: Value) -> RawRecord {
        RawRecord::new("跑", "v", metrics)
    }

    #[test]
    fn already_flat_input_is_identity_on_shape() {
        let flat = flatten_record(&record(json!({"freq": 0.5, "range": 3})));

        assert_eq!(flat.metrics.len(), 2);
        assert_eq!(flat.metric("freq"), &MetricValue::Number(0.5));
        assert_eq!(flat.metric("range"), &MetricValue::Number(3.0));
    }

    #[test]
    fn nested_objects_become_dotted_paths() {
        let flat = flatten_record(&record(json!({"a": {"b": 1, "c": {"d": 2}}})));

        assert_eq!(flat.metric("a.b"), &MetricValue::Number(1.0));
        assert_eq!(flat.metric("a.c.d"), &MetricValue::Number(2.0));
        assert_eq!(flat.metrics.len(), 2);
    }

    #[test]
    fn null_leaf_keeps_its_key_as_missing() {
        let flat = flatten_record(&record(json!({"juilland_d": null, "dp": 0.2})));

        assert!(flat.metrics.contains_key("juilland_d"));
        assert_eq!(flat.metric("juilland_d"), &MetricValue::Missing);
    }

    #[test]
    fn arrays_are_leaves() {
        let flat = flatten_record(&record(json!({"per_part": [1, 2, 3]})));

        assert_eq!(flat.metric("per_part"), &MetricValue::Text("[1,2,3]".to_string()));
    }

    #[test]
    fn malformed_metrics_flatten_to_empty() {
        assert!(flatten_record(&record(json!(null))).metrics.is_empty());
        assert!(flatten_record(&record(json!(42))).metrics.is_empty());
        assert!(flatten_record(&record(json!("oops"))).metrics.is_empty());
    }
}
