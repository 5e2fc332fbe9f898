// CSV export of collected page records.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use websift_scanner::PageRecord;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// What became of an export prompt. Cancellation is an ordinary outcome,
/// not an error: nothing was written and nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    Cancelled,
}

/// Written before the CSV payload so spreadsheet applications detect the
/// encoding as UTF-8.
pub const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Default export filename for a category, e.g. `/docs/api` becomes
/// `crawl_data_docs_api.csv`.
pub fn suggested_filename(category: &str) -> String {
    let clean = category.trim_matches('/').replace('/', "_");
    format!("crawl_data_{}.csv", clean)
}

/// Expand `~` in a user-supplied destination.
pub fn expand_destination(input: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(input.trim()).as_ref())
}

/// Write records as UTF-8 CSV with a BOM. The header row comes from the
/// record shape (`URL,Title,Main_Heading,Status`); rows keep collection
/// order.
pub fn write_csv(records: &[PageRecord], path: &Path) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
