//! Output shaping: column-union table for CSV, records as-is for JSON

use serde::Serialize;

use crate::types::FixtureRecord;

/// Supported output formats for `get_full`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive); unknown names are None and
    /// surface as `FeedError::InvalidFormat`
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Fixture records aligned into a rectangular table
///
/// Columns are the union of keys across all records in first-seen order
/// (`url`, `competitors`, then `time` and odds keys as they appear); cells a
/// record has no value for are empty strings. Row order is record order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OddsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OddsTable {
    pub fn from_records(records: &[FixtureRecord]) -> Self {
        let mut columns = vec!["url".to_string(), "competitors".to_string()];
        for record in records {
            if record.time.is_some() && !columns.iter().any(|c| c == "time") {
                columns.push("time".to_string());
            }
            for key in record.odds.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| columns.iter().map(|column| cell(record, column)).collect())
            .collect();

        Self { columns, rows }
    }

    /// Render as delimited text: header row, then one row per record.
    /// Fields containing the delimiter, quotes or newlines are quoted with
    /// doubled inner quotes.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_row(&mut out, &self.columns);
        for row in &self.rows {
            push_row(&mut out, row);
        }
        out
    }
}

fn cell(record: &FixtureRecord, column: &str) -> String {
    match column {
        "url" => record.url.clone(),
        "competitors" => record.competitors.clone(),
        "time" => record.time.clone().unwrap_or_default(),
        key => record.odds.get(key).map(|odds| odds.to_string()).unwrap_or_default(),
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Result of a full feed pass, shaped per the requested format
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Export {
    /// `"json"`: per-fixture objects with heterogeneous field sets
    Records(Vec<FixtureRecord>),
    /// `"csv"`: column-union table ready for delimited text
    Table(OddsTable),
}

impl Export {
    pub fn records(&self) -> Option<&[FixtureRecord]> {
        match self {
            Export::Records(records) => Some(records),
            Export::Table(_) => None,
        }
    }

    pub fn table(&self) -> Option<&OddsTable> {
        match self {
            Export::Table(table) => Some(table),
            Export::Records(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(competitors: &str, time: Option<&str>, odds: &[(&str, f64)]) -> FixtureRecord {
        let mut r = FixtureRecord::new(format!("http://feed/{competitors}"), competitors);
        r.time = time.map(str::to_string);
        for (key, value) in odds {
            r.odds.insert(key.to_string(), *value);
        }
        r
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("csv"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("xml"), None);
        assert_eq!(OutputFormat::from_str(""), None);
    }

    #[test]
    fn test_column_union_first_seen_order() {
        let records = vec![
            record("A - B", Some("2024-01-01 12:00:00"), &[("Home", 1.5), ("Away", 4.2)]),
            record("C - D", Some("2024-01-01 13:00:00"), &[("Draw", 3.0), ("Home", 2.0)]),
        ];

        let table = OddsTable::from_records(&records);
        assert_eq!(table.columns, vec!["url", "competitors", "time", "Away", "Home", "Draw"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_missing_cells_are_empty() {
        let records = vec![
            record("A - B", Some("2024-01-01 12:00:00"), &[("Home", 1.5)]),
            record("C - D", None, &[]),
        ];

        let table = OddsTable::from_records(&records);
        assert_eq!(table.columns, vec!["url", "competitors", "time", "Home"]);

        let bare = &table.rows[1];
        assert_eq!(bare[1], "C - D");
        assert_eq!(bare[2], "");
        assert_eq!(bare[3], "");
    }

    #[test]
    fn test_records_without_odds_have_two_columns() {
        let records = vec![record("A - B", None, &[])];
        let table = OddsTable::from_records(&records);
        assert_eq!(table.columns, vec!["url", "competitors"]);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_csv_rendering() {
        let records = vec![record("A - B", Some("2024-01-01 12:00:00"), &[("Home", 1.5)])];
        let csv = OddsTable::from_records(&records).to_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("url,competitors,time,Home"));
        assert_eq!(lines.next(), Some("http://feed/A - B,A - B,2024-01-01 12:00:00,1.5"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_quoting() {
        let mut r = FixtureRecord::new("http://feed/x", "Team, FC - Quote \"A\"");
        r.odds.insert("Over 2.5".to_string(), 1.9);
        let csv = OddsTable::from_records(&[r]).to_csv();

        assert!(csv.contains("\"Team, FC - Quote \"\"A\"\"\""));
        assert!(csv.lines().next().unwrap().contains("Over 2.5"));
    }

    #[test]
    fn test_json_records_match_table_data() {
        let records = vec![
            record("A - B", Some("2024-01-01 12:00:00"), &[("Home", 1.5), ("Draw", 3.25)]),
            record("C - D", None, &[("Away", 2.2)]),
        ];

        let table = OddsTable::from_records(&records);
        let json = serde_json::to_value(&records).unwrap();

        for (row, obj) in table.rows.iter().zip(json.as_array().unwrap()) {
            for (column, value) in table.columns.iter().zip(row) {
                match obj.get(column) {
                    Some(v) if v.is_string() => assert_eq!(v.as_str().unwrap(), value),
                    Some(v) => assert_eq!(v.to_string(), *value),
                    // Column-union padding only: JSON omits what CSV blanks
                    None => assert_eq!(value, ""),
                }
            }
        }
    }
}
