use std::sync::Arc;
use std::time::Instant;

use extractor::PdfLoader;
use storage::SessionRepository;

use crate::features::audit::services::{ExtractionInvoker, ReportRenderer};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRepository,
    pub loader: Arc<PdfLoader>,
    pub invoker: Arc<ExtractionInvoker>,
    pub renderer: Arc<ReportRenderer>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(invoker: ExtractionInvoker, renderer: ReportRenderer) -> Self {
        Self {
            sessions: SessionRepository::new(),
            loader: Arc::new(PdfLoader::default()),
            invoker: Arc::new(invoker),
            renderer: Arc::new(renderer),
            started_at: Instant::now(),
        }
    }

    pub fn with_sessions(mut self, sessions: SessionRepository) -> Self {
        self.sessions = sessions;
        self
    }
}
