// Tests for the crawl summary

use websift_core::summary::{extract_url_path, generate_crawl_summary};
use websift_scanner::PageRecord;

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
}

#[test]
fn test_extract_url_path_empty_path() {
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(
        extract_url_path("http://example.com/docs/api/v1"),
        "/docs/api/v1"
    );
}

#[test]
fn test_extract_url_path_with_query() {
    assert_eq!(extract_url_path("http://example.com/docs?page=2"), "/docs");
}

#[test]
fn test_extract_url_path_with_port() {
    assert_eq!(extract_url_path("http://example.com:8080/docs"), "/docs");
}

#[test]
fn test_extract_url_path_invalid_url() {
    // Should return the original string for invalid URLs
    assert_eq!(extract_url_path("not a valid url"), "not a valid url");
}

// ============================================================================
// Summary Generation Tests
// ============================================================================

#[test]
fn test_generate_crawl_summary_counts() {
    let records = vec![
        PageRecord::new(
            "https://example.com/docs".to_string(),
            "Docs".to_string(),
            "Welcome".to_string(),
            200,
        ),
        PageRecord::new(
            "https://example.com/docs/faq".to_string(),
            "No Title".to_string(),
            "N/A".to_string(),
            200,
        ),
    ];

    let summary = generate_crawl_summary("/docs", &records);

    assert!(summary.contains("# Section /docs"));
    assert!(summary.contains("Pages collected: 2"));
    assert!(summary.contains("Pages with a main heading: 1"));
    assert!(summary.contains("Untitled pages: 1"));
    assert!(summary.contains("/docs/faq"));
    assert!(summary.contains("Docs"));
}

#[test]
fn test_generate_crawl_summary_empty() {
    let summary = generate_crawl_summary("/docs", &[]);
    assert!(summary.contains("Pages collected: 0"));
}
