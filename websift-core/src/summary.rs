// Plain-text summary of a section crawl, printed by the CLI surface.

use url::Url;
use websift_scanner::PageRecord;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Generate a crawl summary from collected records
pub fn generate_crawl_summary(category: &str, records: &[PageRecord]) -> String {
    let mut summary = String::new();
    summary.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    summary.push_str(&format!("# Section {}\n", category));
    summary.push_str(&format!("  Pages collected: {}\n", records.len()));

    let with_heading = records.iter().filter(|r| r.main_heading != "N/A").count();
    summary.push_str(&format!("  Pages with a main heading: {}\n", with_heading));

    let untitled = records.iter().filter(|r| r.title == "No Title").count();
    summary.push_str(&format!("  Untitled pages: {}\n", untitled));

    summary.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for record in records {
        let path = extract_url_path(&record.url);

        // Color code based on status
        let status_str = match record.status {
            200..=299 => format!("\x1b[32m{}\x1b[0m", record.status), // Green
            300..=399 => format!("\x1b[36m{}\x1b[0m", record.status), // Cyan
            400..=499 => format!("\x1b[33m{}\x1b[0m", record.status), // Orange/Yellow
            500..=599 => format!("\x1b[31m{}\x1b[0m", record.status), // Red
            _ => format!("{}", record.status),
        };

        let mut line = format!("  {} {}", status_str, path);
        if record.title != "No Title" {
            line.push_str(&format!(" \x1b[90m{}\x1b[0m", record.title));
        }

        summary.push_str(&line);
        summary.push('\n');
    }

    summary
}
