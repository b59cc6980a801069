use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::AnnotatedDocument;

/// File name of the JSON-lines artifact written for every audit.
pub const REPORT_FILE_NAME: &str = "data.jsonl";

/// Writes and reads annotated documents as JSON lines.
///
/// Every save targets the same fixed file, so two audits running at the
/// same time in one working directory overwrite each other.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    output_dir: PathBuf,
}

impl ReportRepository {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }

    pub async fn save(&self, documents: &[AnnotatedDocument]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut contents = String::new();
        for document in documents {
            contents.push_str(&serde_json::to_string(document)?);
            contents.push('\n');
        }

        let path = self.path();
        tokio::fs::write(&path, contents).await?;

        tracing::info!(
            "Saved {} annotated document(s) to: {}",
            documents.len(),
            path.display()
        );
        Ok(path)
    }

    pub async fn load(path: &Path) -> Result<Vec<AnnotatedDocument>> {
        let contents = tokio::fs::read_to_string(path).await?;

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str::<AnnotatedDocument>(line)?))
            .collect()
    }
}
