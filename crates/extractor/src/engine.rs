use storage::models::AnnotatedDocument;

use crate::extractors::{
    Aligner, ExtractionValidator, GeminiClient, Preprocessor, PromptBuilder, Resolver,
};
use crate::{ExtractionEngine, ExtractionRequest, Result};

/// Grounded extraction on top of Gemini.
///
/// The text is split into chunks, each chunk is sent with the few-shot
/// prompt, and the resolved extractions are aligned back onto the chunk.
pub struct LangExtractor {
    client: GeminiClient,
    aligner: Aligner,
    max_char_buffer: usize,
}

impl LangExtractor {
    pub const DEFAULT_MAX_CHAR_BUFFER: usize = 1000;

    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            aligner: Aligner::default(),
            max_char_buffer: Self::DEFAULT_MAX_CHAR_BUFFER,
        }
    }

    pub fn with_max_char_buffer(mut self, max_char_buffer: usize) -> Self {
        self.max_char_buffer = max_char_buffer.max(1);
        self
    }
}

#[async_trait::async_trait]
impl ExtractionEngine for LangExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<AnnotatedDocument> {
        let chunks = Preprocessor::chunk_text(&request.text, self.max_char_buffer);
        tracing::info!(
            "Starting extraction ({} bytes, {} chunks, model: {})",
            request.text.len(),
            chunks.len(),
            request.model
        );

        let mut extractions = Vec::new();
        let mut group_offset = 0;

        for chunk in chunks.iter().filter(|c| !c.text.trim().is_empty()) {
            let prompt =
                PromptBuilder::few_shot_prompt(&request.instruction, &request.examples, chunk.text)?;
            let raw = self
                .client
                .generate_json(request.model, &prompt, None)
                .await?;

            let mut resolved = Resolver::resolve(&raw)?;
            self.aligner.align(&mut resolved, chunk.text, chunk.offset);

            let groups = resolved
                .iter()
                .filter_map(|e| e.group_index)
                .max()
                .map_or(0, |max| max + 1);
            for extraction in &mut resolved {
                extraction.group_index = extraction.group_index.map(|g| g + group_offset);
            }
            group_offset += groups;

            extractions.extend(resolved);
        }

        let (mut extractions, report) = ExtractionValidator::validate(extractions);
        report.log_warnings();

        for (index, extraction) in extractions.iter_mut().enumerate() {
            extraction.extraction_index = Some(index + 1);
        }

        let document = AnnotatedDocument::new(request.text.clone(), extractions);
        tracing::info!(
            "Extraction complete: {} items ({} grounded)",
            document.len(),
            document.grounded_count()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use storage::models::{AlignmentStatus, ModelId};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::ExtractorError;

    fn gemini_answer(extractions: serde_json::Value) -> ResponseTemplate {
        let text = serde_json::json!({ "extractions": extractions }).to_string();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    fn request(text: &str) -> ExtractionRequest {
        ExtractionRequest {
            text: text.to_string(),
            instruction: PromptBuilder::instruction("Risk Factors", "category, summary"),
            examples: PromptBuilder::demonstration_examples(),
            model: ModelId::Gemini25Flash,
        }
    }

    #[tokio::test]
    async fn extracts_and_grounds_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(body_string_contains("Extract 'Risk Factors'. Fields: category, summary."))
            .respond_with(gemini_answer(serde_json::json!([
                { "risk": "Rising interest rates", "risk_attributes": { "category": "Market" } },
                { "risk": "supplier concentration", "risk_attributes": { "category": "Operational" } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let engine = LangExtractor::new(GeminiClient::new(server.uri(), "key").unwrap());
        let text = "Rising interest rates may hurt margins.\nWe depend on supplier concentration.\n";
        let document = engine.extract(&request(text)).await.unwrap();

        assert_eq!(document.len(), 2);
        assert_eq!(document.text, text);
        let first = &document.extractions[0];
        assert_eq!(first.extraction_index, Some(1));
        assert_eq!(first.alignment_status, Some(AlignmentStatus::MatchExact));
        assert_eq!(
            first.char_interval.unwrap().slice(text),
            Some("Rising interest rates")
        );
        assert_eq!(
            document.extractions[1].char_interval.unwrap().slice(text),
            Some("supplier concentration")
        );
    }

    #[tokio::test]
    async fn issues_one_call_per_chunk_and_offsets_spans() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(gemini_answer(serde_json::json!([{ "item": "debt" }])))
            .expect(2)
            .mount(&server)
            .await;

        let engine = LangExtractor::new(GeminiClient::new(server.uri(), "key").unwrap())
            .with_max_char_buffer(20);
        let text = "Revenue grew.\nNew debt issued.\n";
        let document = engine.extract(&request(text)).await.unwrap();

        assert_eq!(document.len(), 2);
        assert!(document.extractions[0].char_interval.is_none());
        let second = document.extractions[1].char_interval.unwrap();
        assert_eq!(second.slice(text), Some("debt"));
        assert_eq!(document.extractions[1].group_index, Some(1));
    }

    #[tokio::test]
    async fn blank_text_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(gemini_answer(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let engine = LangExtractor::new(GeminiClient::new(server.uri(), "key").unwrap());
        let document = engine.extract(&request("\n\n  \n")).await.unwrap();
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn malformed_answer_fails_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "I found some risks!" }] } }]
            })))
            .mount(&server)
            .await;

        let engine = LangExtractor::new(GeminiClient::new(server.uri(), "key").unwrap());
        let err = engine.extract(&request("Some text.")).await.unwrap_err();
        assert!(matches!(err, ExtractorError::ResolveError(_)));
    }
}
