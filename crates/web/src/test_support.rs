use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use extractor::{ExtractionEngine, ExtractionRequest, ExtractorError};
use storage::ReportRepository;
use storage::models::{
    AnnotatedDocument, CharInterval, Extraction, LoadedDocument, ModelId, Session,
};

use crate::features::audit::services::{ExtractionInvoker, ReportRenderer};
use crate::state::AppState;

pub const DOCUMENT_TEXT: &str =
    "The company faces regulatory risks.\nRising interest rates could hurt margins.\n";

#[derive(Clone)]
enum Outcome {
    Items(usize),
    Fail(String),
}

/// Engine double that counts calls and returns a fixed outcome.
#[derive(Clone)]
pub struct MockEngine {
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<ExtractionRequest>>>,
    outcome: Outcome,
    delay: Option<Duration>,
}

impl MockEngine {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
            outcome,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn succeeding(item_count: usize) -> Self {
        Self::with_outcome(Outcome::Items(item_count))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Outcome::Fail(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ExtractionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ExtractionEngine for MockEngine {
    async fn extract(&self, request: &ExtractionRequest) -> extractor::Result<AnnotatedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Outcome::Items(count) => {
                let extractions = (0..*count)
                    .map(|i| {
                        let mut extraction = Extraction::new("item", "regulatory risks")
                            .with_attribute("category", "Legal");
                        extraction.char_interval = request
                            .text
                            .find("regulatory risks")
                            .map(|start| CharInterval::new(start, start + 16));
                        extraction.extraction_index = Some(i + 1);
                        extraction
                    })
                    .collect();
                Ok(AnnotatedDocument::new(request.text.clone(), extractions))
            }
            Outcome::Fail(message) => Err(ExtractorError::ApiError {
                status: 429,
                body: message.clone(),
            }),
        }
    }
}

pub fn test_state(engine: MockEngine, api_key: Option<&str>, report_dir: &Path) -> AppState {
    AppState::new(
        ExtractionInvoker::new(Arc::new(engine), api_key.map(str::to_string)),
        ReportRenderer::new(ReportRepository::new(report_dir)),
    )
}

pub fn loaded_session() -> Session {
    let mut session = Session::new(ModelId::default());
    session
        .load(LoadedDocument {
            file_name: "annual-report.pdf".to_string(),
            total_pages: 12,
            analyzed_pages: 5,
            text: DOCUMENT_TEXT.to_string(),
            loaded_at: Utc::now(),
        })
        .unwrap();
    session
}
