//! Tests for output module

use super::*;
use crate::error::Error;
use crate::normalize::{IgdbNormalizer, ListStyle, Normalizer, RawgNormalizer};
use crate::types::{JsonValue, NormalizedRecord};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::tempdir;
use test_case::test_case;

fn rawg_records(style: ListStyle) -> Vec<NormalizedRecord> {
    let normalizer = RawgNormalizer::new(style);
    vec![
        json!({
            "id": 1,
            "name": "Portal",
            "rating": 4.5,
            "genres": [{"id": 5, "name": "Puzzle"}, {"id": 3, "name": "Action"}]
        }),
        json!({"id": 2, "name": "Café, \"Deluxe\"", "metacritic": 88}),
    ]
    .iter()
    .map(|raw| normalizer.normalize(raw).unwrap())
    .collect()
}

// ============================================================================
// Format and filename Tests
// ============================================================================

#[test_case("csv", OutputFormat::Csv)]
#[test_case("JSON", OutputFormat::Json)]
#[test_case(" json ", OutputFormat::Json)]
fn test_output_format_from_str(input: &str, expected: OutputFormat) {
    assert_eq!(input.parse::<OutputFormat>().unwrap(), expected);
}

#[test]
fn test_output_format_rejects_unknown() {
    let err = "parquet".parse::<OutputFormat>().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_timestamped_filename() {
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap();
    assert_eq!(
        timestamped_filename("rawg_games", OutputFormat::Csv, now),
        "rawg_games_20240105_090307.csv"
    );
    assert_eq!(
        timestamped_filename("igdb_games", OutputFormat::Json, now),
        "igdb_games_20240105_090307.json"
    );
}

// ============================================================================
// CSV Tests
// ============================================================================

#[test]
fn test_write_csv_empty_is_no_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let err = write_csv(&[], &path).unwrap_err();
    assert!(matches!(err, Error::NoData));
    assert!(!path.exists());
}

#[test]
fn test_write_csv_header_and_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("games.csv");
    let records = rawg_records(ListStyle::Joined);

    let rows = write_csv(&records, &path).unwrap();
    assert_eq!(rows, 2);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let expected: Vec<String> = records[0].keys().cloned().collect();
    assert_eq!(header, expected);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][col("rawg_id")], "1");
    assert_eq!(&rows[0][col("genres")], "Puzzle,Action");
    assert_eq!(&rows[0][col("rating")], "4.5");
    assert_eq!(&rows[0][col("metacritic")], "");
    assert_eq!(&rows[1][col("name")], "Café, \"Deluxe\"");
    assert_eq!(&rows[1][col("data_source")], "rawg");
}

#[test]
fn test_write_csv_nested_values_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("igdb.csv");
    let record = IgdbNormalizer::new(ListStyle::Array)
        .normalize(&json!({
            "id": 9,
            "genres": [{"name": "Shooter"}],
            "age_ratings": [{"category": 2, "rating": 3}]
        }))
        .unwrap();

    write_csv(std::slice::from_ref(&record), &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header = reader.headers().unwrap().clone();
    let row = reader.records().next().unwrap().unwrap();
    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(&row[col("genres")], r#"["Shooter"]"#);
    assert_eq!(&row[col("age_ratings")], r#"{"PEGI":3}"#);
}

#[test]
fn test_write_csv_rejects_unknown_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.csv");
    let rawg = RawgNormalizer::default().normalize(&json!({"id": 1})).unwrap();
    let igdb = IgdbNormalizer::default().normalize(&json!({"id": 2})).unwrap();

    let err = write_csv(&[rawg, igdb], &path).unwrap_err();
    assert!(matches!(err, Error::Output { .. }), "got {err:?}");
}

#[test]
fn test_csv_writer_counts_rows() {
    let dir = tempdir().unwrap();
    let mut writer = CsvWriter::create(dir.path().join("count.csv")).unwrap();
    assert_eq!(writer.rows_written(), 0);

    for record in rawg_records(ListStyle::Joined) {
        writer.write(&record).unwrap();
    }
    assert_eq!(writer.rows_written(), 2);
    assert_eq!(writer.close().unwrap(), 2);
}

// ============================================================================
// JSON Tests
// ============================================================================

#[test]
fn test_write_json_empty_writes_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");

    let rows = write_json(&[], &path).unwrap();
    assert_eq!(rows, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn test_write_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("games.json");
    let records = rawg_records(ListStyle::Array);

    write_json(&records, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let parsed: Vec<JsonValue> = serde_json::from_str(&content).unwrap();
    let originals: Vec<JsonValue> = records.into_iter().map(JsonValue::from).collect();
    assert_eq!(parsed, originals);
}

#[test]
fn test_write_json_is_indented_and_keeps_unicode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pretty.json");
    let records = rawg_records(ListStyle::Array);

    write_json(&records, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("[\n  {\n    \"rawg_id\": 1,"));
    assert!(content.contains("Café"));
    assert!(!content.contains("\\u00e9"));
}

// ============================================================================
// Save Tests
// ============================================================================

#[test]
fn test_save_records_creates_dir_and_timestamped_name() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data").join("raw");

    let path = save_records(
        &rawg_records(ListStyle::Joined),
        &data_dir,
        "rawg_games",
        OutputFormat::Csv,
        None,
    )
    .unwrap();

    assert!(path.exists());
    assert_eq!(path.parent(), Some(data_dir.as_path()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("rawg_games_"));
    assert!(name.ends_with(".csv"));
    // rawg_games_YYYYMMDD_HHMMSS.csv
    assert_eq!(name.len(), "rawg_games_".len() + 15 + ".csv".len());
}

#[test]
fn test_save_records_explicit_filename() {
    let dir = tempdir().unwrap();

    let path = save_records(&[], dir.path(), "igdb_games", OutputFormat::Json, Some("top.json"))
        .unwrap();

    assert_eq!(path, dir.path().join("top.json"));
    assert_eq!(fs::read_to_string(path).unwrap(), "[]");
}

#[test]
fn test_write_records_dispatch() {
    let dir = tempdir().unwrap();
    let err = write_records(OutputFormat::Csv, &[], dir.path().join("a.csv")).unwrap_err();
    assert!(matches!(err, Error::NoData));

    let rows = write_records(
        OutputFormat::Json,
        &rawg_records(ListStyle::Array),
        dir.path().join("a.json"),
    )
    .unwrap();
    assert_eq!(rows, 2);
}
