use websift::handlers::*;
use websift_core::export::{ExportOutcome, UTF8_BOM};
use websift_scanner::PageRecord;

#[test]
fn test_normalize_base_url_strips_trailing_slash() {
    assert_eq!(
        normalize_base_url("https://example.com/"),
        "https://example.com"
    );
    assert_eq!(
        normalize_base_url("  https://example.com/admin/  "),
        "https://example.com/admin"
    );
}

#[test]
fn test_normalize_base_url_leaves_clean_urls_alone() {
    assert_eq!(
        normalize_base_url("https://example.com/admin"),
        "https://example.com/admin"
    );
}

#[test]
fn test_normalize_section_adds_leading_slash() {
    assert_eq!(normalize_section("docs"), "/docs");
    assert_eq!(normalize_section("docs/api"), "/docs/api");
}

#[test]
fn test_normalize_section_strips_trailing_slash() {
    assert_eq!(normalize_section("/docs/"), "/docs");
    assert_eq!(normalize_section(" /docs "), "/docs");
}

#[test]
fn test_prompt_export_with_explicit_output_writes_without_prompting() {
    let records = vec![PageRecord::new(
        "https://example.com/docs".to_string(),
        "Docs".to_string(),
        "Welcome".to_string(),
        200,
    )];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let outcome = prompt_export(&records, "/docs", Some(&path)).unwrap();
    assert_eq!(outcome, ExportOutcome::Written(path.clone()));

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));

    let content = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("URL,Title,Main_Heading,Status"));
    assert_eq!(
        lines.next(),
        Some("https://example.com/docs,Docs,Welcome,200")
    );
}

#[test]
fn test_prompt_export_propagates_write_errors() {
    let records = vec![PageRecord::new(
        "https://example.com/docs".to_string(),
        "Docs".to_string(),
        "Welcome".to_string(),
        200,
    )];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");

    let result = prompt_export(&records, "/docs", Some(&path));
    assert!(result.is_err());
}
