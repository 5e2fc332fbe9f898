pub mod error;
pub mod record;
pub mod scanner;

pub use error::ScanError;
pub use record::PageRecord;
pub use scanner::{ProgressCallback, SiteScanner};
