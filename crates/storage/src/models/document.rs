use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of leading pages whose text is analyzed.
pub const MAX_ANALYZED_PAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedDocument {
    pub file_name: String,
    /// True page count of the uploaded file.
    pub total_pages: usize,
    pub analyzed_pages: usize,
    pub text: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDocument {
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} pages. (Analyzing first {})",
            self.total_pages, MAX_ANALYZED_PAGES
        )
    }
}
