use serde::{Deserialize, Serialize};

/// Metadata extracted from one successfully fetched page.
///
/// Field names serialize to the CSV column headers, so the exported
/// file reads `URL,Title,Main_Heading,Status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Main_Heading")]
    pub main_heading: String,
    #[serde(rename = "Status")]
    pub status: u16,
}

impl PageRecord {
    pub fn new(url: String, title: String, main_heading: String, status: u16) -> Self {
        Self {
            url,
            title,
            main_heading,
            status,
        }
    }
}
