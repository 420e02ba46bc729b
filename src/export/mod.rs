use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::Path,
};

use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};

use crate::core::{
    FlatRecord,
    WordsiftError,
};

/// Serialize the full filtered sequence (all pages) to CSV text. Header is
/// `Word,POS,<metric columns in sorted order>`; metric cells render as the
/// raw value, or empty when absent.
pub fn render_csv(rows: &[&FlatRecord], columns: &[String]) -> String {
    let mut out = String::new();

    out.push_str("Word,POS");
    for column in columns {
        out.push(',');
        out.push_str(&escape_if_needed(column));
    }
    out.push('\n');

    for record in rows {
        out.push_str(&quote(&record.word));
        out.push(',');
        out.push_str(&quote(&record.part_of_speech));
        for column in columns {
            out.push(',');
            match record.metric(column) {
                value if value.as_number().is_some() => out.push_str(&value.display()),
                value => out.push_str(&escape_if_needed(&value.display())),
            }
        }
        out.push('\n');
    }

    out
}

/// Export filename: `wordlist_results_<timestamp>.csv`, where the timestamp
/// is the ISO 8601 instant with ':' and '.' flattened to '-' and truncated
/// to second precision (19 chars).
pub fn csv_filename(now: DateTime<Utc>) -> String {
    let stamp: String = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
        .chars()
        .take(19)
        .collect();
    format!("wordlist_results_{}.csv", stamp)
}

/// Write the export to disk. A `None` path means the user cancelled the
/// save dialog, which is a silent no-op rather than an error.
pub fn write_csv(
    path: Option<&Path>,
    rows: &[&FlatRecord],
    columns: &[String],
) -> Result<(), WordsiftError> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_csv(rows, columns).as_bytes())?;
    writer.flush()?;

    println!("Exported CSV to: {}", path.display());
    Ok(())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn escape_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::{
        core::RawRecord,
        table::{
            collect_columns,
            flatten_batch,
        },
    };

    fn batch() -> (Vec<FlatRecord>, Vec<String>) {
        let records = flatten_batch(&[
            RawRecord::new("的", "u", json!({"freq": 0.5, "stats": {"dp": 0.25}})),
            RawRecord::new("跑", "v", json!({"freq": 0.9})),
        ]);
        let columns = collect_columns(&records);
        (records, columns)
    }

    #[test]
    fn header_lists_fixed_columns_then_sorted_metrics() {
        let (records, columns) = batch();
        let rows: Vec<&FlatRecord> = records.iter().collect();

        let csv = render_csv(&rows, &columns);
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "Word,POS,freq,stats.dp");
    }

    #[test]
    fn rows_quote_word_and_pos_and_leave_absent_metrics_empty() {
        let (records, columns) = batch();
        let rows: Vec<&FlatRecord> = records.iter().collect();

        let csv = render_csv(&rows, &columns);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"的\",\"u\",0.5,0.25");
        assert_eq!(lines[2], "\"跑\",\"v\",0.9,");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let records = flatten_batch(&[RawRecord::new("a\"b", "n", json!({}))]);
        let rows: Vec<&FlatRecord> = records.iter().collect();

        let csv = render_csv(&rows, &[]);
        assert_eq!(csv.lines().nth(1).unwrap(), "\"a\"\"b\",\"n\"");
    }

    #[test]
    fn text_metric_with_comma_is_quoted() {
        let records = flatten_batch(&[RawRecord::new("a", "n", json!({"note": "x,y"}))]);
        let columns = collect_columns(&records);
        let rows: Vec<&FlatRecord> = records.iter().collect();

        let csv = render_csv(&rows, &columns);
        assert_eq!(csv.lines().nth(1).unwrap(), "\"a\",\"n\",\"x,y\"");
    }

    #[test]
    fn empty_filtered_set_still_produces_a_header() {
        let csv = render_csv(&[], &["freq".to_string()]);
        assert_eq!(csv, "Word,POS,freq\n");
    }

    #[test]
    fn filename_flattens_punctuation_and_truncates_to_seconds() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 14, 3, 59).unwrap();
        assert_eq!(csv_filename(now), "wordlist_results_2026-08-29T14-03-59.csv");
    }

    #[test]
    fn cancelled_save_path_is_a_no_op() {
        assert!(write_csv(None, &[], &[]).is_ok());
    }
}
