// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{normalize_base_url, normalize_section, prompt_export};

// Re-export summary helpers from websift-core
pub use websift_core::summary::{extract_url_path, generate_crawl_summary};
