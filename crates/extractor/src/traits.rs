use storage::models::{AnnotatedDocument, ExampleData, ModelId};

use crate::Result;

/// Everything one extraction call needs. Built fresh for every audit run.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub text: String,
    pub instruction: String,
    pub examples: Vec<ExampleData>,
    pub model: ModelId,
}

#[async_trait::async_trait]
pub trait ExtractionEngine: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<AnnotatedDocument>;
}
