// Tests for CSV export functionality

use websift_core::export::{
    expand_destination, suggested_filename, write_csv, ExportOutcome, UTF8_BOM,
};
use websift_scanner::PageRecord;

fn sample_records() -> Vec<PageRecord> {
    vec![
        PageRecord::new(
            "https://example.com/docs".to_string(),
            "Documentation".to_string(),
            "Read the docs".to_string(),
            200,
        ),
        PageRecord::new(
            "https://example.com/docs/api".to_string(),
            "No Title".to_string(),
            "N/A".to_string(),
            200,
        ),
        PageRecord::new(
            "https://example.com/docs/guide".to_string(),
            "Guide, with a comma".to_string(),
            "Héading".to_string(),
            200,
        ),
    ]
}

// ============================================================================
// Suggested Filename Tests
// ============================================================================

#[test]
fn test_suggested_filename_simple_category() {
    assert_eq!(suggested_filename("/docs"), "crawl_data_docs.csv");
}

#[test]
fn test_suggested_filename_nested_category() {
    assert_eq!(suggested_filename("/docs/api/v1"), "crawl_data_docs_api_v1.csv");
}

#[test]
fn test_suggested_filename_trailing_slash() {
    assert_eq!(suggested_filename("/docs/"), "crawl_data_docs.csv");
}

// ============================================================================
// Destination Expansion Tests
// ============================================================================

#[test]
fn test_expand_destination_plain_path() {
    let path = expand_destination("out/data.csv");
    assert_eq!(path.to_str().unwrap(), "out/data.csv");
}

#[test]
fn test_expand_destination_tilde() {
    let path = expand_destination("~/data.csv");
    assert!(!path.to_str().unwrap().starts_with('~'));
    assert!(path.to_str().unwrap().ends_with("data.csv"));
}

#[test]
fn test_expand_destination_trims_whitespace() {
    let path = expand_destination("  data.csv  ");
    assert_eq!(path.to_str().unwrap(), "data.csv");
}

// ============================================================================
// CSV Writing Tests
// ============================================================================

#[test]
fn test_write_csv_starts_with_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    write_csv(&sample_records(), &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
}

#[test]
fn test_write_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let records = sample_records();
    write_csv(&records, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);

    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers, vec!["URL", "Title", "Main_Heading", "Status"]);

    let rows: Vec<PageRecord> = reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(rows, records);
}

#[test]
fn test_write_csv_preserves_collection_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    write_csv(&sample_records(), &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let first = content.find("https://example.com/docs,").unwrap();
    let second = content.find("https://example.com/docs/api,").unwrap();
    let third = content.find("https://example.com/docs/guide,").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_write_csv_quotes_embedded_commas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    write_csv(&sample_records(), &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"Guide, with a comma\""));
}

#[test]
fn test_write_csv_fails_on_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist").join("out.csv");

    let result = write_csv(&sample_records(), &path);
    assert!(result.is_err());
}

#[test]
fn test_export_outcome_distinguishes_cancellation() {
    let written = ExportOutcome::Written("out.csv".into());
    let cancelled = ExportOutcome::Cancelled;
    assert_ne!(written, cancelled);
}
